use std::time::Duration;

use clap::Parser;
use lora_tagger::RetryPolicy;

/// Local image-tagging studio: pads and downscales dataset images in place.
#[derive(Parser, Debug, Clone)]
#[command(name = "studio", version, about)]
pub struct Config {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1:3000", env = "LORA_TAGGER_ADDR")]
    pub addr: String,

    /// Attempts per file write before giving up.
    #[arg(long, default_value_t = 3)]
    pub write_attempts: u32,

    /// Pause between failed write attempts, in milliseconds.
    #[arg(long, default_value_t = 250)]
    pub write_backoff_ms: u64,
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.write_attempts, Duration::from_millis(self.write_backoff_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_policy() {
        let config = Config::parse_from(["studio"]);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn flags_override() {
        let config = Config::parse_from(["studio", "--addr", "0.0.0.0:8080", "--write-attempts", "5", "--write-backoff-ms", "10"]);
        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.retry_policy(), RetryPolicy::new(5, Duration::from_millis(10)));
    }
}
