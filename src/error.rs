use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors raised by the registry, score keepers and score streams
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// A game with this id is already registered
    #[error("Game {0} already exists")]
    AlreadyExists(String),
    /// No game is registered under this id
    #[error("Game {0} not found")]
    NotFound(String),
    /// Bad points, team or game id
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The observer could not be reached
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type ScoreResult<T> = Result<T, ScoreError>;

impl ScoreError {
    /// HTTP status used when this error reaches a route
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScoreError::AlreadyExists(_) => StatusCode::CONFLICT,
            ScoreError::NotFound(_) => StatusCode::NOT_FOUND,
            ScoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ScoreError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(status = %status, "Request failed: {}", self);

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ScoreError::AlreadyExists("G1".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ScoreError::NotFound("G1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ScoreError::InvalidArgument("points".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScoreError::Transport("gone".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ScoreError::NotFound("G1".to_string());
        assert_eq!(err.to_string(), "Game G1 not found");

        let err = ScoreError::AlreadyExists("G1".to_string());
        assert_eq!(err.to_string(), "Game G1 already exists");
    }

    #[test]
    fn test_into_response_status() {
        let response = ScoreError::InvalidArgument("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
