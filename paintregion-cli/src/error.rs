//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use paintregion::config::ConfigError;
use paintregion::control::ControlError;
use paintregion::geojson::GeoJsonError;
use paintregion::logging::LoggingError;
use paintregion::recording::RecordingError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration problem with a user-facing explanation.
    Config(String),
    /// The configuration file could not be loaded or saved.
    ConfigFile(ConfigError),
    /// A command-line value is out of range.
    InvalidArgument(String),
    /// The recording could not be loaded or replayed.
    Recording(RecordingError),
    /// The brush control rejected its input.
    Control(ControlError),
    /// Region data could not be serialized.
    GeoJson(GeoJsonError),
    /// Logging could not be initialized.
    Logging(LoggingError),
    /// The output file could not be written.
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CliError {
    /// Print the error and exit with a non-zero status.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(1);
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Recording(e) => write!(f, "{}", e),
            CliError::Control(e) => write!(f, "{}", e),
            CliError::GeoJson(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Output { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Recording(e) => Some(e),
            CliError::Control(e) => Some(e),
            CliError::GeoJson(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Output { source, .. } => Some(source),
            CliError::Config(_) | CliError::InvalidArgument(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<RecordingError> for CliError {
    fn from(e: RecordingError) -> Self {
        CliError::Recording(e)
    }
}

impl From<ControlError> for CliError {
    fn from(e: ControlError) -> Self {
        CliError::Control(e)
    }
}

impl From<GeoJsonError> for CliError {
    fn from(e: GeoJsonError) -> Self {
        CliError::GeoJson(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
