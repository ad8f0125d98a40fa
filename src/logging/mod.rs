//! Logging
//!
//! Stdout logging is always on. `--debug` adds a daily rolling log file
//! written through a non-blocking worker; the returned guard must be held
//! until the process exits or buffered lines are lost.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

const LOG_FILE_PREFIX: &str = "voice-relay";
const LOG_FILE_SUFFIX: &str = "log";

/// Logging setup for one process
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug_mode: bool,
    pub log_dir: PathBuf,
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            log_dir: default_log_dir(),
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    pub fn with_log_dir(mut self, log_dir: PathBuf) -> Self {
        self.log_dir = log_dir;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// `<data_local_dir>/voice-relay/logs`, or `./logs` when no data dir exists
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("voice-relay").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// Returns the file writer guard in debug mode.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let stdout_layer = if config.json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter(&config.level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_filter(env_filter(&config.level))
            .boxed()
    };
    layers.push(stdout_layer);

    let mut guard = None;
    if config.debug_mode {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory: {:?}", config.log_dir)
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix(LOG_FILE_SUFFIX)
            .build(&config.log_dir)
            .context("Failed to create rolling log file")?;
        let (writer, file_guard) = tracing_appender::non_blocking(appender);

        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter("debug"))
                .boxed(),
        );
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if config.debug_mode {
        tracing::info!("Debug logging to {}", config.log_dir.display());
    }

    Ok(guard)
}

fn is_log_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    name.starts_with(LOG_FILE_PREFIX) && path.extension().is_some_and(|e| e == LOG_FILE_SUFFIX)
}

fn log_files(log_dir: &Path) -> Result<Vec<(PathBuf, std::fs::Metadata)>> {
    if !log_dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log directory: {:?}", log_dir))?
    {
        let entry = entry?;
        let path = entry.path();
        if is_log_file(&path)
            && let Ok(metadata) = entry.metadata()
        {
            files.push((path, metadata));
        }
    }
    Ok(files)
}

/// Most recently modified log file in `log_dir`
pub fn get_log_path(log_dir: &Path) -> Option<PathBuf> {
    log_files(log_dir)
        .ok()?
        .into_iter()
        .filter_map(|(path, metadata)| metadata.modified().ok().map(|m| (path, m)))
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path)
}

/// Number of log files and their combined size in bytes
pub fn log_stats(log_dir: &Path) -> Result<(usize, u64)> {
    let files = log_files(log_dir)?;
    let total = files.iter().map(|(_, metadata)| metadata.len()).sum();
    Ok((files.len(), total))
}

/// Delete log files last modified more than `days` days ago.
pub fn cleanup_old_logs(log_dir: &Path, days: u64) -> Result<usize> {
    let max_age = Duration::from_secs(days.saturating_mul(24 * 60 * 60));
    let now = SystemTime::now();
    let mut removed = 0;

    for (path, metadata) in log_files(log_dir)? {
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove log file: {:?}", path))?;
            tracing::debug!("Removed old log file: {:?}", path);
            removed += 1;
        }
    }

    Ok(removed)
}
