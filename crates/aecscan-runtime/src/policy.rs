use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Confines scan roots to the configured base paths.
///
/// Paths are canonicalized before the check, so `..` segments and
/// symlinks cannot step outside an allowed base. An empty allow-list
/// means unrestricted.
#[derive(Debug, Clone, Default)]
pub struct PathPolicy {
    allowed: Vec<PathBuf>,
}

impl PathPolicy {
    pub fn new(allowed_base_paths: &[PathBuf]) -> Self {
        Self {
            allowed: allowed_base_paths.to_vec(),
        }
    }

    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Validate a scan root; returns its canonical form.
    pub fn validate(&self, path: &Path) -> Result<PathBuf> {
        let canonical = path
            .canonicalize()
            .map_err(|_| Error::PathNotAllowed(path.to_path_buf()))?;

        if self.allowed.is_empty() {
            return Ok(canonical);
        }

        for base in &self.allowed {
            // Unresolvable bases are configuration noise, not an open door.
            if let Ok(base) = base.canonicalize()
                && canonical.starts_with(&base)
            {
                return Ok(canonical);
            }
        }
        Err(Error::PathNotAllowed(path.to_path_buf()))
    }
}
