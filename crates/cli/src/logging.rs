//! Tracing setup for the binary.
//!
//! Command output goes to stdout, so plain commands log to stderr. The
//! terminal UI owns the screen; its logs go to a file instead.

use std::env;
use std::fs::{OpenOptions, create_dir_all};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log file used while the UI runs.
pub const LOG_PATH_ENV: &str = "PAYDESK_LOG_PATH";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to the file named by [`resolve_log_path`], appending.
pub fn init_file() -> Result<PathBuf> {
    let path = resolve_log_path();
    if let Some(parent) = path.parent() {
        create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .try_init();
    Ok(path)
}

/// `PAYDESK_LOG_PATH` if set, else `<data dir>/paydesk/paydesk.log`.
pub fn resolve_log_path() -> PathBuf {
    if let Some(path) = env::var_os(LOG_PATH_ENV)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }

    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paydesk")
        .join("paydesk.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_prefers_environment() {
        temp_env::with_var(LOG_PATH_ENV, Some("/tmp/paydesk-test.log"), || {
            assert_eq!(resolve_log_path(), PathBuf::from("/tmp/paydesk-test.log"));
        });
    }

    #[test]
    fn empty_override_falls_back_to_data_dir() {
        temp_env::with_var(LOG_PATH_ENV, Some(""), || {
            let path = resolve_log_path();
            assert!(path.ends_with("paydesk/paydesk.log"));
        });
    }
}
