use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One discovered file, as produced by the directory scanner.
///
/// Timestamps come straight from filesystem metadata. `content_hash` is
/// only populated when hashing was requested; it dominates scan cost on
/// large trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// File name including extension.
    pub name: String,
    /// Lowercase extension with leading dot (`.pdf`), empty when absent.
    pub extension: String,
    /// Size in bytes.
    pub size: u64,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    /// Absolute path of the containing directory.
    pub parent: PathBuf,
    /// Depth below the scan root (files directly under the root are 0).
    pub depth: usize,
    /// Streaming SHA-256 of the content, lowercase hex.
    pub content_hash: Option<String>,
}

impl FileDescriptor {
    /// True when the file's modified-or-created time is strictly after
    /// `cutoff`. Used by incremental scans; a file with neither timestamp
    /// is treated as changed so it is never silently dropped.
    pub fn changed_since(&self, cutoff: DateTime<Utc>) -> bool {
        match (self.modified, self.created) {
            (Some(m), Some(c)) => m > cutoff || c > cutoff,
            (Some(m), None) => m > cutoff,
            (None, Some(c)) => c > cutoff,
            (None, None) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn descriptor(modified: Option<DateTime<Utc>>, created: Option<DateTime<Utc>>) -> FileDescriptor {
        FileDescriptor {
            path: PathBuf::from("/p/a.txt"),
            name: "a.txt".to_string(),
            extension: ".txt".to_string(),
            size: 1,
            created,
            modified,
            accessed: None,
            parent: PathBuf::from("/p"),
            depth: 0,
            content_hash: None,
        }
    }

    #[test]
    fn changed_since_is_strict() {
        let cutoff = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert!(!descriptor(Some(cutoff), Some(cutoff)).changed_since(cutoff));
        let later = cutoff + chrono::Duration::seconds(1);
        assert!(descriptor(Some(later), Some(cutoff)).changed_since(cutoff));
        assert!(descriptor(Some(cutoff), Some(later)).changed_since(cutoff));
    }

    #[test]
    fn missing_timestamps_count_as_changed() {
        let cutoff = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert!(descriptor(None, None).changed_since(cutoff));
    }
}
