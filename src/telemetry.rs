//! Structured logging setup.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appends to a file; used while the terminal UI owns the screen.
    File(PathBuf),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails when the log file cannot be opened. A second call is a no-op.
pub fn init(target: &LogTarget) -> io::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter());
    let installed = match target {
        LogTarget::Stderr => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_target_creates_log_file() {
        let path = std::env::temp_dir().join(format!("colab-planner-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        init(&LogTarget::File(path.clone())).unwrap();
        assert!(path.exists());
        // A second install is tolerated.
        init(&LogTarget::Stderr).unwrap();
        let _ = std::fs::remove_file(&path);
    }
}
