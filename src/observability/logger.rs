//! Subscriber installation

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `cmdkit=debug`
pub const LOG_ENV: &str = "CMDKIT_LOG";

/// Build the filter from [`LOG_ENV`], falling back to `default_level`.
pub fn filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("Invalid log level: {}", default_level)),
    }
}

/// Install a formatting subscriber writing to stderr.
///
/// Fails if the level is not a valid filter or a global subscriber is
/// already installed.
pub fn init_logging(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_level() {
        if std::env::var(LOG_ENV).is_err() {
            assert!(filter("debug").is_ok());
            assert!(filter("cmdkit=trace,clap=warn").is_ok());
        }
    }

    #[test]
    fn test_invalid_level() {
        if std::env::var(LOG_ENV).is_err() {
            assert!(filter("cmdkit=loudest").is_err());
        }
    }

    #[test]
    fn test_init_twice_fails() {
        let _ = init_logging("info");
        assert!(init_logging("info").is_err());
    }
}
