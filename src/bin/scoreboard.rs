use clap::Parser;

use courtside::client::{
    cancel_on, events_url, render_snapshot, stream_url, watch_score_events, watch_scores,
    ClientExit, Transport,
};
use courtside::core::Snapshot;

/// Console scoreboard that follows one game's live score
#[derive(Parser, Debug)]
#[command(name = "scoreboard", version, about)]
struct Args {
    /// Score server base URL
    #[arg(long, env = "SCORE_SERVER", default_value = "ws://localhost:8000")]
    server: String,

    /// Game to follow
    #[arg(long, env = "GAME_ID", default_value = "1")]
    game_id: String,

    /// Stream transport: WebSocket or Server-Sent Events
    #[arg(long, env = "SCORE_TRANSPORT", value_enum, default_value_t = Transport::Ws)]
    transport: Transport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtside=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cancel_rx = cancel_on(tokio::signal::ctrl_c());
    let print = |snapshot: &Snapshot| println!("{}", render_snapshot(snapshot));

    let result = match args.transport {
        Transport::Ws => {
            let url = stream_url(&args.server, &args.game_id);
            watch_scores(&url, cancel_rx, print).await
        }
        Transport::Sse => {
            let url = events_url(&args.server, &args.game_id);
            watch_score_events(&url, cancel_rx, print).await
        }
    };

    match result {
        Ok(ClientExit::Ended(reason)) => println!("Game over: {}", reason),
        Ok(ClientExit::Cancelled) | Ok(ClientExit::Closed) => {}
        // Stream failures end the scoreboard quietly
        Err(err) => tracing::warn!("Score stream stopped: {:#}", err),
    }

    Ok(())
}
