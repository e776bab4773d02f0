//! Core logging bootstrap.
//!
//! # Responsibility
//! - Start one rolling file logger per process.
//! - Keep manager events metadata-only: ids, counts and positions. Names,
//!   diseases, contact numbers and visit notes never reach a log line.
//!
//! # Invariants
//! - Starting twice with equal [`LogSettings`] is a no-op.
//! - Starting with different settings after the first start is rejected.
//! - Start never panics.

use flexi_logger::{
    Age, Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "patient_core";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 7;
const PANIC_SUMMARY_CHARS: usize = 120;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Validated logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    /// Absolute directory receiving `patient_core*.log` files.
    pub dir: PathBuf,
}

impl LogSettings {
    /// Parses a level name (`off` excluded) and an absolute directory.
    pub fn parse(level: &str, dir: &str) -> Result<Self, LoggingError> {
        Ok(Self {
            level: parse_level(level)?,
            dir: parse_dir(dir)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnknownLevel(String),
    MissingDir,
    RelativeDir(PathBuf),
    DirCreate { dir: PathBuf, reason: String },
    Backend(String),
    /// Logger already running with other settings.
    AlreadyActive { active: LogSettings, requested: LogSettings },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => {
                write!(f, "unknown log level `{level}` (use trace|debug|info|warn|error)")
            }
            Self::MissingDir => write!(f, "log directory is required"),
            Self::RelativeDir(dir) => {
                write!(f, "log directory must be absolute: `{}`", dir.display())
            }
            Self::DirCreate { dir, reason } => {
                write!(f, "cannot create log directory `{}`: {reason}", dir.display())
            }
            Self::Backend(reason) => write!(f, "logger backend failed: {reason}"),
            Self::AlreadyActive { active, requested } => write!(
                f,
                "logging already active at {} in `{}`; requested {} in `{}`",
                active.level,
                active.dir.display(),
                requested.level,
                requested.dir.display()
            ),
        }
    }
}

impl Error for LoggingError {}

/// Parses settings and starts the logger.
///
/// # Errors
/// - Any [`LogSettings::parse`] failure.
/// - See [`start_logging`].
pub fn init_logging(level: &str, dir: &str) -> Result<(), LoggingError> {
    start_logging(LogSettings::parse(level, dir)?)
}

/// Starts the logger once; later calls must repeat the same settings.
///
/// # Errors
/// - `DirCreate` / `Backend` when the first start fails.
/// - `AlreadyActive` when settings differ from the running logger.
pub fn start_logging(settings: LogSettings) -> Result<(), LoggingError> {
    let active = ACTIVE.get_or_try_init(|| spawn(settings.clone()))?;
    if active.settings == settings {
        return Ok(());
    }
    Err(LoggingError::AlreadyActive {
        active: active.settings.clone(),
        requested: settings,
    })
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn spawn(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|err| LoggingError::DirCreate {
        dir: settings.dir.clone(),
        reason: err.to_string(),
    })?;

    let handle = Logger::with(LogSpecification::builder().default(settings.level).build())
        .log_to_file(
            FileSpec::default()
                .directory(&settings.dir)
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::AgeOrSize(Age::Day, ROTATE_AT_BYTES),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    hook_panics();
    info!(
        "event=logging_start module=logging status=ok level={} dir={} version={}",
        settings.level,
        settings.dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    let trimmed = raw.trim();
    let name = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match name.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(LoggingError::UnknownLevel(trimmed.to_string())),
        Ok(level) => Ok(level),
    }
}

fn parse_dir(raw: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::MissingDir);
    }
    let dir = Path::new(trimmed);
    if dir.is_relative() {
        return Err(LoggingError::RelativeDir(dir.to_path_buf()));
    }
    Ok(dir.to_path_buf())
}

fn hook_panics() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let at = panic
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic
            .payload()
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| panic.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        // Panic messages may quote patient fields; only a flattened prefix is kept.
        error!(
            "event=panic module=core status=error location={} payload={}",
            at,
            one_line_prefix(&payload, PANIC_SUMMARY_CHARS)
        );
        chained(panic);
    }));
}

fn one_line_prefix(text: &str, limit: usize) -> String {
    let mut out: String = text
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .take(limit)
        .collect();
    if text.chars().count() > limit {
        out.push('…');
    }
    out
}
