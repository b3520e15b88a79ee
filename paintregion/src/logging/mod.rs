//! Logging setup.
//!
//! Installs a global `tracing` subscriber with a stderr layer and, when a log
//! file is configured, a non-blocking file layer. The filter comes from
//! `RUST_LOG` when set, otherwise from [`LogConfig::directive`].
//!
//! Keep the returned [`LoggingGuard`] alive for the life of the program:
//! dropping it flushes and stops the file writer.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "paintregion=info";

/// Filter used in verbose mode.
pub const VERBOSE_DIRECTIVE: &str = "paintregion=debug";

/// Errors while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive does not parse.
    #[error("Invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// The log file path has no file name.
    #[error("Invalid log file path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// The log directory could not be created.
    #[error("Failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub directive: String,
    /// Also write to this file.
    pub log_file: Option<PathBuf>,
    /// Colorize stderr output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_DIRECTIVE.to_string(),
            log_file: None,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Switch between the default and the verbose directive.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.directive = if verbose {
            VERBOSE_DIRECTIVE
        } else {
            DEFAULT_DIRECTIVE
        }
        .to_string();
        self
    }

    /// Use a custom filter directive.
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = directive.into();
        self
    }

    /// Also log to `path`.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Enable or disable ANSI colors on stderr.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Keeps the file writer running. Flushes on drop.
#[derive(Debug)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the directive is invalid, the log directory cannot be created,
/// or a subscriber has already been installed.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.directive)?,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(local_timer())
        .with_ansi(config.ansi);

    let (file_layer, file_guard) = match &config.log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .with_writer(writer)
                .with_timer(local_timer())
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LoggingGuard { _file: file_guard })
}

/// Parse a filter directive such as `paintregion=debug`.
pub fn parse_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|source| LoggingError::Filter {
        directive: directive.to_string(),
        source,
    })
}

fn local_timer() -> OffsetTime<Rfc3339> {
    // The local offset is unavailable in some multi-threaded contexts.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn file_writer(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.directive, "paintregion=info");
        assert!(config.log_file.is_none());
        assert!(config.ansi);
    }

    #[test]
    fn test_builder_methods() {
        let config = LogConfig::default()
            .with_verbose(true)
            .with_log_file("/tmp/paintregion.log")
            .with_ansi(false);

        assert_eq!(config.directive, VERBOSE_DIRECTIVE);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/paintregion.log")));
        assert!(!config.ansi);

        let quiet = config.with_verbose(false);
        assert_eq!(quiet.directive, DEFAULT_DIRECTIVE);
    }

    #[test]
    fn test_parse_filter_accepts_directives() {
        assert!(parse_filter(DEFAULT_DIRECTIVE).is_ok());
        assert!(parse_filter("warn,paintregion::sequencer=trace").is_ok());
    }

    #[test]
    fn test_parse_filter_rejects_bad_level() {
        let err = parse_filter("paintregion=loudest").unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }));
        assert!(err.to_string().contains("paintregion=loudest"));
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("logs").join("paint.log");

        let (_writer, guard) = file_writer(&path).unwrap();
        drop(guard);

        assert!(temp.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_writer_rejects_path_without_name() {
        let err = file_writer(Path::new("/")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidPath(_)));
    }
}
