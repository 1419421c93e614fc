//! Tracing subscriber setup
//!
//! The interactive UI owns the terminal, so it logs to a file in the cache
//! directory. Batch subcommands log to stderr. `RUST_LOG` overrides the
//! default `info` level in both cases.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "tenki.log";

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `tenki.log` in the given directory
    File(PathBuf),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber
///
/// Returns the log file path when logging to a file. A subscriber that is
/// already installed is left in place.
pub fn init(target: LogTarget) -> std::io::Result<Option<PathBuf>> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init();
            Ok(None)
        }
        LogTarget::File(dir) => {
            let (file, path) = open_log_file(&dir)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            Ok(Some(path))
        }
    }
}

fn open_log_file(dir: &Path) -> std::io::Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().join("logs");

        let (_file, path) = open_log_file(&dir).expect("Should open log file");

        assert!(path.exists());
        assert!(path.ends_with(LOG_FILE));
    }
}
