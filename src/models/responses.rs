use serde::{Deserialize, Serialize};

use crate::core::{ScoreKeeper, Snapshot};

/// Game information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    /// Game's unique ID
    pub game_id: String,
    /// Unix timestamp of registration
    pub created_at: i64,
    /// Whether the game clock is running
    pub started: bool,
    /// Current score and clock
    pub score: Snapshot,
}

impl GameResponse {
    pub fn from_keeper(keeper: &ScoreKeeper) -> Self {
        Self {
            game_id: keeper.game_id().to_string(),
            created_at: keeper.created_at().unix_timestamp(),
            started: keeper.is_started(),
            score: keeper.current_snapshot(),
        }
    }
}

/// Message sent on a live score stream
///
/// Serialized as `{"type": "score", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Latest score and clock
    Score(Snapshot),
    /// Server ended the stream
    Ended { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Team;
    use std::time::Duration;

    #[test]
    fn test_game_response_from_keeper() {
        let keeper = ScoreKeeper::new("G1");
        keeper.shot_made(Team::Away, 2).unwrap();

        let response = GameResponse::from_keeper(&keeper);
        assert_eq!(response.game_id, "G1");
        assert!(!response.started);
        assert_eq!(response.score.away_score, 2);
        assert!(response.created_at > 0);
    }

    #[test]
    fn test_score_message_format() {
        let message = StreamMessage::Score(Snapshot {
            home_score: 3,
            away_score: 1,
            elapsed_clock: Duration::from_secs(65),
        });

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "score");
        assert_eq!(json["data"]["home_score"], 3);
        assert_eq!(json["data"]["elapsed_clock"]["secs"], 65);
    }

    #[test]
    fn test_ended_message_format() {
        let message = StreamMessage::Ended {
            reason: "game removed".to_string(),
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "ended");
        assert_eq!(json["data"]["reason"], "game removed");

        let parsed: StreamMessage = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, message);
    }
}
