//! Log output for the summarization server.
//!
//! Every request is logged to stdout. Setting `DOCSUM_LOG_FILE` additionally appends the same
//! events, without ANSI colours, to that file. Both `RUST_LOG` and `DOCSUM_LOG_FILE` are read
//! when [`init_tracing`] runs, so a `.env` file must already be loaded by then.
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable naming the optional log file.
pub const LOG_FILE_VAR: &str = "DOCSUM_LOG_FILE";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber: `RUST_LOG` filtering (default `info`), compact stdout output,
/// and the `DOCSUM_LOG_FILE` sink when one is configured and can be opened.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match log_file_path().and_then(open_log_file) {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
}

/// Path from `DOCSUM_LOG_FILE`, ignoring an unset or blank value.
pub fn log_file_path() -> Option<PathBuf> {
    std::env::var(LOG_FILE_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

// The guard flushes buffered lines on drop, so it lives for the whole process.
fn open_log_file(path: PathBuf) -> Option<NonBlocking> {
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}
