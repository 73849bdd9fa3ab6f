use std::sync::Arc;
use std::time::Duration;

use crate::core::GameRegistry;
use crate::services::ScoreStreamer;

/// Shared application state, built once at startup and cloned into handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GameRegistry>,
    pub streamer: ScoreStreamer,
}

impl AppState {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            registry: Arc::new(GameRegistry::new()),
            streamer: ScoreStreamer::new(poll_interval),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            registry: Arc::new(GameRegistry::new()),
            streamer: ScoreStreamer::default(),
        }
    }
}
