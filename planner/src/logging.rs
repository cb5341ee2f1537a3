//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "PLANNER_LOG";

const DEFAULT_FILTER: &str = "info";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file. Used while the TUI owns the terminal.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    pub fn default_file() -> Self {
        LogTarget::File(PathBuf::from("planner.log"))
    }
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(target: LogTarget) -> io::Result<()> {
    let directives = std::env::var(LOG_ENV).ok();
    let filter = filter_from(directives.as_deref());

    let installed = match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!("logging initialised");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_falls_back_to_default() {
        assert_eq!(filter_from(None).to_string(), DEFAULT_FILTER);
        assert_eq!(filter_from(Some("planner_core=debug")).to_string(), "planner_core=debug");
    }

    #[test]
    fn test_default_file_target() {
        assert_eq!(LogTarget::default_file(), LogTarget::File(PathBuf::from("planner.log")));
    }
}
