use std::fmt;
use std::path::PathBuf;

/// Result type for aecscan-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Catalog layer error
    Catalog(aecscan_catalog::Error),

    /// Scanner layer error
    Scanner(aecscan_scanner::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Project not initialized or unknown
    NotInitialized(String),

    /// Invalid operation or state
    InvalidOperation(String),

    /// Another scan of the same project is already running in this process
    ScanInProgress(String),

    /// Path rejected by the allowed-base-paths policy
    PathNotAllowed(PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Catalog(err) => write!(f, "Catalog error: {}", err),
            Error::Scanner(err) => write!(f, "Scanner error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::NotInitialized(msg) => write!(f, "Project not initialized: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            Error::ScanInProgress(project) => {
                write!(f, "A scan of project {} is already running", project)
            }
            Error::PathNotAllowed(path) => {
                write!(f, "Path not under an allowed base path: {}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Catalog(err) => Some(err),
            Error::Scanner(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_)
            | Error::NotInitialized(_)
            | Error::InvalidOperation(_)
            | Error::ScanInProgress(_)
            | Error::PathNotAllowed(_) => None,
        }
    }
}

impl From<aecscan_catalog::Error> for Error {
    fn from(err: aecscan_catalog::Error) -> Self {
        Error::Catalog(err)
    }
}

impl From<aecscan_scanner::Error> for Error {
    fn from(err: aecscan_scanner::Error) -> Self {
        Error::Scanner(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
