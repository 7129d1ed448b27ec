//! Tracing initialization
//!
//! Diagnostics go to stderr so stdout stays clean for command output and
//! `exec` responses.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, Settings};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `settings.log_level`. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match settings.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let mut settings = Settings::default();
        init(&settings);
        settings.log_format = LogFormat::Json;
        init(&settings);
        tracing::info!("still alive");
    }

    #[test]
    fn test_bad_level_falls_back() {
        let settings = Settings {
            log_level: "not a [valid filter".to_string(),
            ..Settings::default()
        };
        init(&settings);
    }
}
