use std::time::Duration;

use crate::core::Snapshot;

/// Format a game clock as `[d.]hh:mm:ss[.fffffff]`
///
/// The fraction is in 100ns ticks and is omitted when zero; the day prefix
/// only appears past 24 hours.
pub fn format_clock(clock: Duration) -> String {
    let total = clock.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    let ticks = clock.subsec_nanos() / 100;

    let mut out = if days > 0 {
        format!("{}.", days)
    } else {
        String::new()
    };
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if ticks > 0 {
        out.push_str(&format!(".{:07}", ticks));
    }
    out
}

/// Render a snapshot as the console scoreboard block
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    format!(
        "Home: {}\nAway: {}\nTime: {}\n",
        snapshot.home_score,
        snapshot.away_score,
        format_clock(snapshot.elapsed_clock)
    )
}
