use anyhow::{Context, Result};
use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, info};

use super::subscriber::{handle_message, ClientExit};
use crate::core::Snapshot;
use crate::services::score_stream::signalled;

/// Server-Sent Events URL of a game's score stream
///
/// WebSocket schemes in `server` are swapped for their HTTP counterparts so
/// the same `--server` value works for both transports.
pub fn events_url(server: &str, game_id: &str) -> String {
    let server = server.trim_end_matches('/');
    let base = if let Some(rest) = server.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else if let Some(rest) = server.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else {
        server.to_string()
    };

    format!("{}/api/games/{}/score/events", base, game_id)
}

/// Subscribe to a score stream over SSE and hand each snapshot to `on_snapshot`
///
/// Behaves like [`watch_scores`](super::watch_scores): runs until the cancel
/// flag is set, the server ends the stream, or the response closes.
///
/// # Errors
///
/// Returns an error if the request fails, the server answers with an error
/// status, or the response breaks mid-stream
pub async fn watch_score_events<F>(
    url: &str,
    mut cancel: watch::Receiver<bool>,
    mut on_snapshot: F,
) -> Result<ClientExit>
where
    F: FnMut(&Snapshot),
{
    let response = reqwest::Client::new()
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
        .with_context(|| format!("Failed to connect to {}", url))?
        .error_for_status()
        .with_context(|| format!("Score stream refused at {}", url))?;
    info!("Subscribed to {}", url);

    let mut body = response.bytes_stream();
    let mut buffer = String::new();

    loop {
        tokio::select! {
            biased;
            _ = signalled(&mut cancel) => {
                debug!("Subscription cancelled");
                return Ok(ClientExit::Cancelled);
            }
            chunk = body.next() => match chunk {
                Some(Ok(bytes)) => {
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    for data in drain_event_data(&mut buffer) {
                        if let Some(exit) = handle_message(&data, &mut on_snapshot) {
                            return Ok(exit);
                        }
                    }
                }
                Some(Err(e)) => return Err(e).context("Score stream failed"),
                None => return Ok(ClientExit::Closed),
            }
        }
    }
}

/// Remove every complete event from `buffer` and return its data payloads
///
/// Comment-only events (keep-alives) carry no data and are skipped.
fn drain_event_data(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();

    while let Some(end) = buffer.find("\n\n") {
        let block: String = buffer.drain(..end + 2).collect();
        let data: Vec<&str> = block
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|value| value.strip_prefix(' ').unwrap_or(value))
            .collect();

        if !data.is_empty() {
            payloads.push(data.join("\n"));
        }
    }

    payloads
}
