//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start one rotating file logger per process (`flexi_logger` backend).
//! - Optionally mirror warnings to stderr for terminal hosts.
//! - Capture panics as sanitized `event=panic_captured` records.
//!
//! # Invariants
//! - Initialization is idempotent for an identical configuration.
//! - A second call with a different level or directory is rejected.
//! - Nothing in this module panics.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "starcrawl";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Logging bootstrap failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory(String),
    AlreadyInitialized { current: String, requested: String },
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(details) => write!(f, "invalid log directory: {details}"),
            Self::AlreadyInitialized { current, requested } => write!(
                f,
                "logging already initialized with {current}; refusing to switch to {requested}"
            ),
            Self::Backend(details) => write!(f, "failed to start logger: {details}"),
        }
    }
}

impl Error for LoggingError {}

/// Initializes file logging at `log_dir` with the given level.
///
/// When `echo_stderr` is set, warnings and errors are duplicated to stderr.
/// The flag only matters for the first successful call.
///
/// # Errors
/// - `UnsupportedLevel` for anything outside trace|debug|info|warn|error.
/// - `InvalidDirectory` for empty or relative paths, or when creation fails.
/// - `AlreadyInitialized` when a different level or directory is active.
/// - `Backend` when flexi_logger cannot start.
pub fn init_logging(level: &str, log_dir: &str, echo_stderr: bool) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let log_dir = parse_log_dir(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(level, &log_dir, echo_stderr))?;
    ensure_same_config(active, level, &log_dir)
}

/// Returns `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(
    level: &'static str,
    log_dir: &Path,
    echo_stderr: bool,
) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        LoggingError::InvalidDirectory(format!("cannot create `{}`: {err}", log_dir.display()))
    })?;

    let duplicate = if echo_stderr {
        Duplicate::Warn
    } else {
        Duplicate::None
    };

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .duplicate_to_stderr(duplicate)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();

    info!(
        "event=logging_init module=logging status=ok level={} log_dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn ensure_same_config(
    active: &ActiveLogger,
    level: &'static str,
    log_dir: &Path,
) -> Result<(), LoggingError> {
    if active.log_dir != log_dir {
        return Err(LoggingError::AlreadyInitialized {
            current: format!("directory `{}`", active.log_dir.display()),
            requested: format!("directory `{}`", log_dir.display()),
        });
    }
    if active.level != level {
        return Err(LoggingError::AlreadyInitialized {
            current: format!("level `{}`", active.level),
            requested: format!("level `{level}`"),
        });
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::InvalidDirectory("path is empty".to_string()));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::InvalidDirectory(format!(
            "`{trimmed}` is not absolute"
        )));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        // Payloads may echo buffer text; keep one line and cap the length.
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location,
            single_line(&payload, PANIC_PAYLOAD_LIMIT)
        );
        previous(info);
    }));
}

fn single_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut out: String = flattened.chars().take(max_chars).collect();
    if flattened.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
