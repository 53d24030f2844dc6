use std::fmt;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting metadata from one file
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// An OOXML container could not be opened or read
    Archive(String),

    /// The file's content did not match its claimed format
    Malformed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Archive(msg) => write!(f, "Archive error: {}", msg),
            Error::Malformed(msg) => write!(f, "Malformed file: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Archive(_) | Error::Malformed(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}
