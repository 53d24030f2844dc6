use std::fmt;
use std::path::PathBuf;

/// Result type for scanner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while scanning
#[derive(Debug)]
pub enum Error {
    /// The scan root does not exist or is not a directory
    RootNotFound(PathBuf),

    /// IO operation failed
    Io(std::io::Error),

    /// A worker thread or task terminated abnormally
    WorkerPanicked,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RootNotFound(path) => {
                write!(f, "Scan root not found: {}", path.display())
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::WorkerPanicked => write!(f, "Scan worker terminated abnormally"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::RootNotFound(_) | Error::WorkerPanicked => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
