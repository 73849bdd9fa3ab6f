use async_trait::async_trait;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::{
    stream::{self, SplitSink},
    SinkExt, Stream, StreamExt,
};
use tokio::sync::mpsc;

use crate::{
    core::Snapshot,
    error::{ScoreError, ScoreResult},
    models::StreamMessage,
    services::{ScoreStream, SnapshotSink, StreamHandle, StreamOutcome},
    state::AppState,
};

/// Close code sent when the game is removed (normal closure)
const CLOSE_NORMAL: u16 = 1000;

const GAME_REMOVED: &str = "game removed";

/// WebSocket endpoint streaming live scores for one game
///
/// # Arguments
///
/// * `game_id` - The game from path
/// * `ws` - WebSocket upgrade request
/// * `state` - Shared application state
///
/// # Returns
///
/// WebSocket upgrade response, or 404 if the game is not registered
///
/// # Flow
///
/// 1. Open the stream (fails before upgrading if the game is unknown)
/// 2. Push a snapshot every poll interval as a JSON text frame
/// 3. Cancel when the client closes or disconnects
/// 4. Send an `ended` message and a close frame if the game is removed
pub async fn websocket_handler(
    Path(game_id): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> ScoreResult<impl IntoResponse> {
    tracing::debug!(game_id = %game_id, "Score stream WebSocket requested");

    let stream = state.streamer.open(&state.registry, &game_id).await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, stream)))
}

/// Drive a score stream over an upgraded WebSocket
async fn handle_socket(socket: WebSocket, stream: ScoreStream) {
    let (sender, mut receiver) = socket.split();
    let session_id = stream.session_id();
    let game_id = stream.game_id().to_string();

    let handle = stream.spawn(WebSocketSink { sender });
    let canceller = handle.canceller();

    // Handle incoming messages from client
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => {
                    tracing::debug!(session = %session_id, "Close message from observer");
                    break;
                }
                Message::Text(text) => {
                    tracing::debug!(session = %session_id, "Ignoring text from observer: {}", text);
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Axum handles WebSocket ping/pong frames automatically
                }
                Message::Binary(_) => {
                    tracing::warn!(session = %session_id, "Unexpected binary message from observer");
                }
            }
        }
    });

    let join = handle.join();
    tokio::pin!(join);

    let outcome = tokio::select! {
        outcome = &mut join => {
            recv_task.abort();
            outcome
        }
        _ = &mut recv_task => {
            canceller.cancel();
            join.await
        }
    };

    tracing::info!(
        session = %session_id,
        game_id = %game_id,
        outcome = outcome.as_str(),
        "WebSocket score stream finished"
    );
}

/// Sends snapshots as JSON text frames
struct WebSocketSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl SnapshotSink for WebSocketSink {
    async fn push(&mut self, snapshot: Snapshot) -> ScoreResult<()> {
        let text = serde_json::to_string(&StreamMessage::Score(snapshot))
            .map_err(|e| ScoreError::Transport(e.to_string()))?;

        self.sender
            .send(Message::Text(text))
            .await
            .map_err(|e| ScoreError::Transport(e.to_string()))
    }

    async fn finish(&mut self, outcome: &StreamOutcome) {
        match outcome {
            StreamOutcome::GameRemoved => {
                if let Ok(text) = serde_json::to_string(&ended_message()) {
                    let _ = self.sender.send(Message::Text(text)).await;
                }

                let _ = self
                    .sender
                    .send(Message::Close(Some(CloseFrame {
                        code: CLOSE_NORMAL,
                        reason: GAME_REMOVED.into(),
                    })))
                    .await;
            }
            // Complete the closing handshake the observer started
            StreamOutcome::Cancelled => {
                let _ = self.sender.send(Message::Close(None)).await;
            }
            StreamOutcome::Failed(_) => {}
        }
    }
}

fn ended_message() -> StreamMessage {
    StreamMessage::Ended {
        reason: GAME_REMOVED.to_string(),
    }
}

/// Server-Sent Events endpoint streaming live scores for one game
///
/// Each snapshot is a `score` event carrying the same `{"type", "data"}`
/// message as the WebSocket stream. Removing the game sends a final `ended`
/// event and ends the response; the stream is cancelled when the client goes
/// away.
pub async fn sse_handler(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> ScoreResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let (tx, rx) = mpsc::channel::<Snapshot>(1);
    let handle = state.streamer.spawn(&state.registry, &game_id, tx).await?;

    tracing::debug!(
        session = %handle.session_id(),
        game_id = %game_id,
        "Score stream SSE opened"
    );

    Ok(Sse::new(snapshot_events(rx, handle)).keep_alive(KeepAlive::default()))
}

/// Turn received snapshots into SSE events
///
/// The stream handle rides along so dropping the response body cancels the
/// score stream.
fn snapshot_events(
    rx: mpsc::Receiver<Snapshot>,
    handle: StreamHandle,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold(Some((rx, handle)), |state| async move {
        let (mut rx, handle) = state?;

        match rx.recv().await {
            Some(snapshot) => {
                let event = Event::default()
                    .event("score")
                    .json_data(StreamMessage::Score(snapshot));
                Some((event, Some((rx, handle))))
            }
            None => {
                let session_id = handle.session_id();
                let outcome = handle.join().await;
                tracing::info!(
                    session = %session_id,
                    outcome = outcome.as_str(),
                    "SSE score stream finished"
                );

                if outcome != StreamOutcome::GameRemoved {
                    return None;
                }
                let event = Event::default().event("ended").json_data(ended_message());
                Some((event, None))
            }
        }
    })
}
