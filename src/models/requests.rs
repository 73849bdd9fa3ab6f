use serde::{Deserialize, Serialize};

use crate::core::{Team, MAX_GAME_ID_LEN};
use crate::error::{ScoreError, ScoreResult};

/// Request to register a game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGameRequest {
    /// Caller-chosen id; the server generates one when absent
    #[serde(default)]
    pub game_id: Option<String>,
}

impl CreateGameRequest {
    /// Validate and clean a caller-supplied game id
    ///
    /// # Validation Rules
    ///
    /// - Must not be empty after trimming
    /// - At most 64 characters
    /// - Only ASCII letters, digits, `-` and `_`
    pub fn validate_game_id(game_id: &str) -> ScoreResult<String> {
        let cleaned = game_id.trim();

        if cleaned.is_empty() {
            return Err(ScoreError::InvalidArgument(
                "Game id cannot be empty".to_string(),
            ));
        }

        if cleaned.len() > MAX_GAME_ID_LEN {
            return Err(ScoreError::InvalidArgument(format!(
                "Game id must be {} characters or less",
                MAX_GAME_ID_LEN
            )));
        }

        if !cleaned
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ScoreError::InvalidArgument(
                "Game id must contain only letters, numbers, '-' and '_'".to_string(),
            ));
        }

        Ok(cleaned.to_string())
    }

    /// The validated game id, if one was supplied
    pub fn validated_game_id(&self) -> ScoreResult<Option<String>> {
        self.game_id
            .as_deref()
            .map(Self::validate_game_id)
            .transpose()
    }
}

/// A made shot reported by the scoring operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotRequest {
    /// "home" or "away"
    pub team: String,
    /// Points scored; validated by the score keeper
    pub points: i64,
}

impl ShotRequest {
    pub fn team(&self) -> ScoreResult<Team> {
        self.team.parse()
    }
}
