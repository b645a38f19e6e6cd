//! Log setup: stderr plus a per-session file under the platform cache dir.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform log directory:
/// - Linux: `~/.cache/wulin/logs` (or `$XDG_CACHE_HOME/wulin/logs`)
/// - macOS: `~/Library/Caches/wulin/logs`
/// - Windows: `%LOCALAPPDATA%\wulin\cache\logs`
/// - Fallback: `/tmp/wulin/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "wulin")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/wulin"))
        .join("logs")
}

/// Installs the subscriber. Keep the guard alive until exit so the file
/// writer flushes.
pub fn init(session_id: Option<String>) -> Result<WorkerGuard> {
    let session_id = session_id.unwrap_or_else(|| {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{seconds}")
    });

    let session_dir = log_dir().join(&session_id);
    std::fs::create_dir_all(&session_dir)
        .with_context(|| format!("failed to create log directory {}", session_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_dir, "arena.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!(session = %session_id, dir = %session_dir.display(), "logging initialized");
    Ok(guard)
}
