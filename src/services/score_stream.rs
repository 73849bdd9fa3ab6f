use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::core::{GameRegistry, ScoreKeeper, Snapshot, DEFAULT_POLL_INTERVAL_SECS};
use crate::error::{ScoreError, ScoreResult};

/// Observer end of a score stream
#[async_trait]
pub trait SnapshotSink: Send {
    /// Deliver one snapshot to the observer
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the observer is gone
    async fn push(&mut self, snapshot: Snapshot) -> ScoreResult<()>;

    /// Called once after the stream ends, before the sink is dropped
    async fn finish(&mut self, _outcome: &StreamOutcome) {}
}

#[async_trait]
impl SnapshotSink for mpsc::Sender<Snapshot> {
    async fn push(&mut self, snapshot: Snapshot) -> ScoreResult<()> {
        self.send(snapshot)
            .await
            .map_err(|_| ScoreError::Transport("Observer disconnected".to_string()))
    }
}

/// How a score stream ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The observer or caller asked the stream to stop
    Cancelled,
    /// The game was removed from the registry
    GameRemoved,
    /// Pushing to the observer failed
    Failed(ScoreError),
}

impl StreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamOutcome::Cancelled => "cancelled",
            StreamOutcome::GameRemoved => "game_removed",
            StreamOutcome::Failed(_) => "failed",
        }
    }
}

/// Opens score streams with a fixed polling cadence
#[derive(Debug, Clone, Copy)]
pub struct ScoreStreamer {
    poll_interval: Duration,
}

impl Default for ScoreStreamer {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS))
    }
}

impl ScoreStreamer {
    /// A zero interval is raised to one millisecond
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Open a stream on a registered game
    ///
    /// The registry lock is released before this returns; the stream only
    /// holds the game's score keeper.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the game is not registered
    pub async fn open(&self, registry: &GameRegistry, game_id: &str) -> ScoreResult<ScoreStream> {
        let keeper = registry.get_game(game_id).await?;

        Ok(ScoreStream {
            session_id: Uuid::new_v4(),
            keeper,
            poll_interval: self.poll_interval,
        })
    }

    /// Open a stream and run it on its own task
    pub async fn spawn<S>(
        &self,
        registry: &GameRegistry,
        game_id: &str,
        sink: S,
    ) -> ScoreResult<StreamHandle>
    where
        S: SnapshotSink + 'static,
    {
        Ok(self.open(registry, game_id).await?.spawn(sink))
    }
}

/// An opened score stream that has not started streaming yet
#[derive(Debug)]
pub struct ScoreStream {
    session_id: Uuid,
    keeper: Arc<ScoreKeeper>,
    poll_interval: Duration,
}

impl ScoreStream {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn game_id(&self) -> &str {
        self.keeper.game_id()
    }

    /// Push a snapshot now and then once per poll interval until the stream ends
    ///
    /// Cancellation and game removal are checked before every push and raced
    /// against both the interval wait and the push itself, so no snapshot is
    /// delivered once either has been seen.
    pub async fn run<S>(self, sink: &mut S, mut cancel: watch::Receiver<bool>) -> StreamOutcome
    where
        S: SnapshotSink + ?Sized,
    {
        let mut removed = self.keeper.closed_watcher();
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            session = %self.session_id,
            game_id = %self.game_id(),
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Score stream opened"
        );

        let mut pushed: u64 = 0;
        let outcome = loop {
            tokio::select! {
                biased;
                _ = signalled(&mut cancel) => break StreamOutcome::Cancelled,
                _ = signalled(&mut removed) => break StreamOutcome::GameRemoved,
                _ = ticker.tick() => {}
            }

            let snapshot = self.keeper.current_snapshot();

            tokio::select! {
                biased;
                _ = signalled(&mut cancel) => break StreamOutcome::Cancelled,
                _ = signalled(&mut removed) => break StreamOutcome::GameRemoved,
                result = sink.push(snapshot) => match result {
                    Ok(()) => pushed += 1,
                    Err(err) => {
                        tracing::warn!(
                            session = %self.session_id,
                            game_id = %self.game_id(),
                            "Score push failed: {}",
                            err
                        );
                        break StreamOutcome::Failed(err);
                    }
                },
            }
        };

        drop(ticker);
        sink.finish(&outcome).await;

        tracing::info!(
            session = %self.session_id,
            game_id = %self.game_id(),
            outcome = outcome.as_str(),
            snapshots = pushed,
            "Score stream closed"
        );

        outcome
    }

    /// Run the stream on its own task, taking ownership of the sink
    pub fn spawn<S>(self, sink: S) -> StreamHandle
    where
        S: SnapshotSink + 'static,
    {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let session_id = self.session_id;

        let task = tokio::spawn(async move {
            let mut sink = sink;
            self.run(&mut sink, cancel_rx).await
        });

        StreamHandle {
            session_id,
            cancel: StreamCanceller(Arc::new(cancel_tx)),
            task,
        }
    }
}

/// Resolve once the watched flag is set or its sender is gone
pub(crate) async fn signalled(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|flag| *flag).await;
}

/// Cancels a running stream from anywhere
#[derive(Debug, Clone)]
pub struct StreamCanceller(Arc<watch::Sender<bool>>);

impl StreamCanceller {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Owner of a spawned score stream
///
/// Dropping the handle cancels the stream.
#[derive(Debug)]
pub struct StreamHandle {
    session_id: Uuid,
    cancel: StreamCanceller,
    task: JoinHandle<StreamOutcome>,
}

impl StreamHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Ask the stream to stop; it ends as `Cancelled` unless already ended
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Canceller that outlives a pending `join`
    pub fn canceller(&self) -> StreamCanceller {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the stream to end
    pub async fn join(mut self) -> StreamOutcome {
        match (&mut self.task).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => StreamOutcome::Cancelled,
            Err(err) => {
                tracing::error!(session = %self.session_id, "Score stream task failed: {}", err);
                StreamOutcome::Failed(ScoreError::Transport(format!(
                    "Stream task failed: {}",
                    err
                )))
            }
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
