use clap::Parser;
use std::time::Duration;

use crate::core::DEFAULT_POLL_INTERVAL_SECS;

/// Live score server
#[derive(Parser, Debug, Clone)]
#[command(name = "courtside", version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Seconds between snapshots on each score stream
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = DEFAULT_POLL_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,

    /// Tracing filter directives
    #[arg(
        long,
        env = "RUST_LOG",
        default_value = "courtside=info,tower_http=warn"
    )]
    pub log_filter: String,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["courtside"]).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "courtside",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--poll-interval-secs",
            "2",
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let result = Config::try_parse_from(["courtside", "--poll-interval-secs", "0"]);
        assert!(result.is_err());
    }
}
