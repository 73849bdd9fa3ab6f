/// Default seconds between snapshots on a score stream
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Buffered push notifications per game before slow subscribers lag
pub const SCORE_CHANNEL_CAPACITY: usize = 100;

/// Length of server-generated game ids
pub const GENERATED_GAME_ID_LEN: usize = 12;

/// Longest game id accepted from callers
pub const MAX_GAME_ID_LEN: usize = 64;
