use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::future::Future;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::core::Snapshot;
use crate::models::StreamMessage;
use crate::services::score_stream::signalled;

/// Why a score subscription stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientExit {
    /// The local cancel signal fired
    Cancelled,
    /// The server ended the stream with a reason
    Ended(String),
    /// The connection closed without an explanation
    Closed,
}

/// How the client reaches the score stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Transport {
    /// WebSocket stream with JSON text frames
    Ws,
    /// Server-Sent Events stream
    Sse,
}

/// Cancel flag that is set once `signal` resolves successfully
///
/// If the signal cannot be listened for, the flag is never set and the
/// subscription runs until the server ends it.
pub fn cancel_on<F>(signal: F) -> watch::Receiver<bool>
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let (cancel_tx, cancel_rx) = watch::channel(false);

    tokio::spawn(async move {
        match signal.await {
            Ok(()) => {
                let _ = cancel_tx.send(true);
            }
            Err(err) => {
                warn!("Cannot listen for cancel signal: {}", err);
                // A dropped sender reads as cancelled
                std::future::pending::<()>().await;
                drop(cancel_tx);
            }
        }
    });

    cancel_rx
}

/// WebSocket URL of a game's score stream
///
/// # Arguments
///
/// * `server` - Base URL such as `ws://localhost:8000`
/// * `game_id` - Game to watch
pub fn stream_url(server: &str, game_id: &str) -> String {
    format!("{}/ws/games/{}/score", server.trim_end_matches('/'), game_id)
}

/// Subscribe to a score stream and hand each snapshot to `on_snapshot`
///
/// Runs until the cancel flag is set, the server ends the stream, or the
/// connection closes. Cancelling sends a close frame and is not an error.
///
/// # Errors
///
/// Returns an error if the connection cannot be made or fails mid-stream
pub async fn watch_scores<F>(
    url: &str,
    mut cancel: watch::Receiver<bool>,
    mut on_snapshot: F,
) -> Result<ClientExit>
where
    F: FnMut(&Snapshot),
{
    let (ws_stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .with_context(|| format!("Failed to connect to {}", url))?;
    info!("Subscribed to {}", url);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            _ = signalled(&mut cancel) => {
                debug!("Subscription cancelled");
                let _ = write.send(Message::Close(None)).await;
                return Ok(ClientExit::Cancelled);
            }
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if let Some(exit) = handle_message(&text, &mut on_snapshot) {
                        return Ok(exit);
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!("Server closed stream: {:?}", frame);
                    return Ok(ClientExit::Closed);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Score stream failed"),
                None => return Ok(ClientExit::Closed),
            }
        }
    }
}

/// Dispatch one stream message; returns the exit if the server ended the stream
pub(crate) fn handle_message<F>(text: &str, on_snapshot: &mut F) -> Option<ClientExit>
where
    F: FnMut(&Snapshot),
{
    match serde_json::from_str::<StreamMessage>(text) {
        Ok(StreamMessage::Score(snapshot)) => {
            on_snapshot(&snapshot);
            None
        }
        Ok(StreamMessage::Ended { reason }) => {
            info!("Stream ended by server: {}", reason);
            Some(ClientExit::Ended(reason))
        }
        Err(e) => {
            warn!("Unrecognised stream message: {}", e);
            None
        }
    }
}
