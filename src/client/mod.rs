pub mod events;
pub mod render;
pub mod subscriber;

pub use events::{events_url, watch_score_events};
pub use render::{format_clock, render_snapshot};
pub use subscriber::{cancel_on, stream_url, watch_scores, ClientExit, Transport};
