//! Optional tracing setup.
//!
//! The library only emits `tracing` events. Applications that already
//! install a subscriber should skip this.

use crate::FinanceError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "yiqiying_finance=debug";

/// Build the filter: `RUST_LOG` if set and valid, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install a process-wide text subscriber writing to stdout.
///
/// # Errors
/// * `ConfigError` - a global subscriber is already installed
pub fn init_logging(default_level: &str) -> Result<(), FinanceError> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| FinanceError::ConfigError(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_default() {
        let filter = env_filter(DEFAULT_LOG_LEVEL);
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_second_init_fails() {
        let _ = init_logging("warn");
        assert!(matches!(
            init_logging("warn"),
            Err(FinanceError::ConfigError(_))
        ));
    }
}
