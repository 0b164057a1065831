//! Subscriber setup: stderr console output plus an optional log file.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;

/// Console filter directive. `RUST_LOG` wins, then `-v` flags, then the
/// configured level.
fn console_directive(configured: &str, verbose: u8) -> String {
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !env.trim().is_empty()
    {
        return env;
    }
    match verbose {
        0 => configured.to_owned(),
        1 => "info".to_owned(),
        2 => "debug".to_owned(),
        _ => "trace".to_owned(),
    }
}

fn filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter '{directive}'"))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process so buffered file output is flushed.
///
/// # Errors
/// Fails on an invalid filter directive, an unusable log file path, or when
/// a global subscriber is already installed.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<Option<WorkerGuard>> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(&console_directive(&config.console_level, verbose))?);

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log file path '{}' has no file name", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory '{}'", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter(&config.file_level)?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        temp_env::with_var_unset("RUST_LOG", || {
            assert_eq!(console_directive("warn", 0), "warn");
            assert_eq!(console_directive("warn", 1), "info");
            assert_eq!(console_directive("warn", 2), "debug");
            assert_eq!(console_directive("warn", 5), "trace");
        });
    }

    #[test]
    fn rust_log_wins() {
        temp_env::with_var("RUST_LOG", Some("user_directory=trace"), || {
            assert_eq!(console_directive("warn", 2), "user_directory=trace");
        });
    }

    #[test]
    fn invalid_directive_is_reported() {
        assert!(filter("info").is_ok());
        assert!(filter("user_search=notalevel").is_err());
    }
}
