use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use super::{Snapshot, Team, SCORE_CHANNEL_CAPACITY};
use crate::error::{ScoreError, ScoreResult};

/// Scores and clock, always read and written together
#[derive(Debug, Default)]
struct Tally {
    home_score: u32,
    away_score: u32,
    /// None until the clock is started
    started_at: Option<Instant>,
}

impl Tally {
    fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started_at| started_at.elapsed())
            .unwrap_or_default()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            home_score: self.home_score,
            away_score: self.away_score,
            elapsed_clock: self.elapsed(),
        }
    }
}

/// Live score and game clock for a single game
///
/// All reads and writes go through one lock so a [`Snapshot`] never mixes
/// state from before and after a shot. Subscribers registered with
/// [`ScoreKeeper::subscribe`] are notified synchronously on every shot.
#[derive(Debug)]
pub struct ScoreKeeper {
    /// Unique identifier for this game
    game_id: String,
    /// When the game was registered
    created_at: OffsetDateTime,
    tally: Mutex<Tally>,
    /// Push notifications, one per shot
    score_tx: broadcast::Sender<Snapshot>,
    /// Flipped once when the game leaves the registry
    closed_tx: watch::Sender<bool>,
}

impl ScoreKeeper {
    /// Create a game with both scores at zero and the clock stopped
    ///
    /// # Arguments
    ///
    /// * `game_id` - Unique identifier for this game
    pub fn new(game_id: impl Into<String>) -> Self {
        let (score_tx, _) = broadcast::channel(SCORE_CHANNEL_CAPACITY);
        let (closed_tx, _) = watch::channel(false);

        Self {
            game_id: game_id.into(),
            created_at: OffsetDateTime::now_utc(),
            tally: Mutex::new(Tally::default()),
            score_tx,
            closed_tx,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Start the game clock
    ///
    /// Starting an already running clock is a no-op: the clock keeps its
    /// original start time.
    ///
    /// # Returns
    ///
    /// True if this call started the clock, false if it was already running
    pub fn start(&self) -> bool {
        let mut tally = self.lock_tally();

        if tally.started_at.is_some() {
            tracing::debug!(game_id = %self.game_id, "Clock already running");
            return false;
        }

        tally.started_at = Some(Instant::now());
        tracing::info!(game_id = %self.game_id, "Game clock started");
        true
    }

    pub fn is_started(&self) -> bool {
        self.lock_tally().started_at.is_some()
    }

    /// Credit a made shot to a team and notify subscribers
    ///
    /// # Arguments
    ///
    /// * `team` - Team that scored
    /// * `points` - Points scored, must be positive
    ///
    /// # Returns
    ///
    /// Snapshot of the game after the shot
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if points is not positive or the score would
    /// overflow. The score is left unchanged in both cases.
    pub fn shot_made(&self, team: Team, points: i64) -> ScoreResult<Snapshot> {
        if points <= 0 {
            return Err(ScoreError::InvalidArgument(format!(
                "Points must be positive, got {}",
                points
            )));
        }
        let points = u32::try_from(points).map_err(|_| {
            ScoreError::InvalidArgument(format!("Points out of range: {}", points))
        })?;

        let mut tally = self.lock_tally();
        let score = match team {
            Team::Home => &mut tally.home_score,
            Team::Away => &mut tally.away_score,
        };
        *score = score.checked_add(points).ok_or_else(|| {
            ScoreError::InvalidArgument(format!("{} score would overflow", team))
        })?;

        let snapshot = tally.snapshot();

        // Sent under the lock so subscribers see shots in order
        let receivers = self.score_tx.send(snapshot).unwrap_or(0);

        tracing::debug!(
            game_id = %self.game_id,
            team = %team,
            points = points,
            home = snapshot.home_score,
            away = snapshot.away_score,
            subscribers = receivers,
            "Shot made"
        );

        Ok(snapshot)
    }

    /// Consistent read of both scores and the clock
    pub fn current_snapshot(&self) -> Snapshot {
        self.lock_tally().snapshot()
    }

    /// Receive a snapshot after every shot made on this game
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.score_tx.subscribe()
    }

    /// Watch for this game being removed from its registry
    pub fn closed_watcher(&self) -> watch::Receiver<bool> {
        self.closed_tx.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed_tx.borrow()
    }

    /// Mark the game as removed, ending streams that watch it
    pub(crate) fn close(&self) {
        self.closed_tx.send_replace(true);
    }

    fn lock_tally(&self) -> MutexGuard<'_, Tally> {
        // Every critical section leaves the tally valid, so a poisoned lock is still usable
        self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
