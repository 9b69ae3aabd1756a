//! Logging initialization for the CLI.
//!
//! Logs go to stderr; stdout carries the scan listing and JSON output.
//! Precedence for the level: `RUST_LOG`, then `--verbose`, then the
//! configured level.

use glimpse_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem with the given default level.
pub fn init(default_level: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the config file with CLI flags taking
/// precedence. `--verbose` forces debug; otherwise the configured level
/// (error through trace) becomes the default filter.
pub fn init_from_config(config: &Config, verbose: bool, json_logs: bool) {
    let json_format = json_logs || config.logging.format == "json";
    init(resolve_level(config, verbose), json_format);
}

fn resolve_level(config: &Config, verbose: bool) -> &str {
    if verbose {
        "debug"
    } else {
        &config.logging.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_level_prefers_verbose_flag() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();

        assert_eq!(resolve_level(&config, true), "debug");
        assert_eq!(resolve_level(&config, false), "warn");
    }
}
