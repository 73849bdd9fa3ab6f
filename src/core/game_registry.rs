use rand::{distributions::Alphanumeric, Rng};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ScoreKeeper, GENERATED_GAME_ID_LEN};
use crate::error::{ScoreError, ScoreResult};

/// Registry of all active games
///
/// Owned by the application root and shared through `AppState`. Every
/// operation takes the internal lock, so create/get/remove are linearizable
/// without any locking by callers.
#[derive(Debug, Default)]
pub struct GameRegistry {
    /// Map of game_id to its score keeper
    games: RwLock<HashMap<String, Arc<ScoreKeeper>>>,
}

impl GameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new game under a caller-chosen id
    ///
    /// # Arguments
    ///
    /// * `game_id` - The game's unique identifier
    ///
    /// # Returns
    ///
    /// Handle to the new game's score keeper
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the id is already registered
    pub async fn create_game(&self, game_id: &str) -> ScoreResult<Arc<ScoreKeeper>> {
        let mut games = self.games.write().await;

        match games.entry(game_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::warn!(game_id = %game_id, "Game already exists");
                Err(ScoreError::AlreadyExists(game_id.to_string()))
            }
            Entry::Vacant(slot) => {
                let keeper = Arc::new(ScoreKeeper::new(game_id));
                slot.insert(Arc::clone(&keeper));
                tracing::info!(game_id = %game_id, "Game created");
                Ok(keeper)
            }
        }
    }

    /// Register a new game under a freshly generated id
    pub async fn create_generated_game(&self) -> Arc<ScoreKeeper> {
        let mut games = self.games.write().await;

        let mut game_id = Self::generate_game_id();

        // Ensure uniqueness (very unlikely to collide, but check anyway)
        while games.contains_key(&game_id) {
            game_id = Self::generate_game_id();
        }

        let keeper = Arc::new(ScoreKeeper::new(game_id.clone()));
        games.insert(game_id.clone(), Arc::clone(&keeper));
        tracing::info!(game_id = %game_id, "Game created with generated id");
        keeper
    }

    /// Generate a URL-safe random game ID from OS randomness
    fn generate_game_id() -> String {
        use rand::rngs::OsRng;

        OsRng
            .sample_iter(&Alphanumeric)
            .take(GENERATED_GAME_ID_LEN)
            .map(char::from)
            .collect()
    }

    /// Look up a game by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id was never created or has been removed
    pub async fn get_game(&self, game_id: &str) -> ScoreResult<Arc<ScoreKeeper>> {
        self.games
            .read()
            .await
            .get(game_id)
            .cloned()
            .ok_or_else(|| ScoreError::NotFound(game_id.to_string()))
    }

    /// Remove a game and close its score keeper
    ///
    /// Removing an unknown id is a no-op.
    ///
    /// # Returns
    ///
    /// The removed score keeper, or None if the id was not registered
    pub async fn remove_game(&self, game_id: &str) -> Option<Arc<ScoreKeeper>> {
        let removed = self.games.write().await.remove(game_id);

        match &removed {
            Some(keeper) => {
                keeper.close();
                tracing::info!(game_id = %game_id, "Game removed");
            }
            None => tracing::debug!(game_id = %game_id, "Remove of unknown game ignored"),
        }

        removed
    }

    /// Number of registered games
    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}
