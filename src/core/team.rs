use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoreError;

/// Side of the court a shot is credited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Home => "home",
            Team::Away => "away",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = ScoreError;

    /// Parse a team name, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Team::Home),
            "away" => Ok(Team::Away),
            other => Err(ScoreError::InvalidArgument(format!(
                "Unknown team '{}', expected 'home' or 'away'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team() {
        assert_eq!("home".parse::<Team>(), Ok(Team::Home));
        assert_eq!(" AWAY ".parse::<Team>(), Ok(Team::Away));
    }

    #[test]
    fn test_parse_unknown_team() {
        let result = "referee".parse::<Team>();
        assert!(matches!(result, Err(ScoreError::InvalidArgument(_))));

        let result = "".parse::<Team>();
        assert!(matches!(result, Err(ScoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Team::Home).unwrap(), "\"home\"");
        let team: Team = serde_json::from_str("\"away\"").unwrap();
        assert_eq!(team, Team::Away);
    }
}
