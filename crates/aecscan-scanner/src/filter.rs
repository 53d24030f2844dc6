use std::collections::HashSet;

/// Project sidecar written by `init`; the one hidden file a scan admits.
pub const PROJECT_SIDECAR: &str = ".aecscan-project.json";

/// Why a file was left out of the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    ExcludedExtension,
    TooLarge,
}

/// Name- and size-based admission rules shared by both scan strategies.
///
/// Extension matching is case-insensitive and includes the leading dot;
/// directory matching is by bare name, also case-insensitive.
#[derive(Debug, Clone)]
pub struct ScanFilter {
    excluded_extensions: HashSet<String>,
    excluded_directories: HashSet<String>,
    max_file_size: u64,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self::new(
            [".tmp", ".log", ".bak", ".swp"].map(String::from),
            ["temp", ".git", "__pycache__", "node_modules"].map(String::from),
            500 * 1024 * 1024,
        )
    }
}

impl ScanFilter {
    pub fn new(
        excluded_extensions: impl IntoIterator<Item = String>,
        excluded_directories: impl IntoIterator<Item = String>,
        max_file_size: u64,
    ) -> Self {
        Self {
            excluded_extensions: excluded_extensions
                .into_iter()
                .map(|e| normalize_extension(&e))
                .collect(),
            excluded_directories: excluded_directories
                .into_iter()
                .map(|d| d.to_ascii_lowercase())
                .collect(),
            max_file_size,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Directories are pruned wholesale: nothing under an excluded or
    /// hidden directory is visited.
    pub fn excludes_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.excluded_directories.contains(&name.to_ascii_lowercase())
    }

    /// Name-based admission; size is checked later once the file has
    /// been stat'ed.
    pub fn skip_file_by_name(&self, name: &str) -> Option<SkipReason> {
        if name.starts_with('.') {
            if name == PROJECT_SIDECAR {
                return None;
            }
            return Some(SkipReason::Hidden);
        }
        let ext = name
            .rsplit_once('.')
            .map(|(_, e)| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        if self.excluded_extensions.contains(&ext) {
            return Some(SkipReason::ExcludedExtension);
        }
        None
    }

    pub fn skip_file_by_size(&self, size: u64) -> Option<SkipReason> {
        (size > self.max_file_size).then_some(SkipReason::TooLarge)
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_exclusions() {
        let filter = ScanFilter::default();
        assert!(filter.excludes_dir(".git"));
        assert!(filter.excludes_dir("TEMP"));
        assert!(!filter.excludes_dir("drawings"));
        assert_eq!(
            filter.skip_file_by_name("backup.BAK"),
            Some(SkipReason::ExcludedExtension)
        );
        assert_eq!(filter.skip_file_by_name(".DS_Store"), Some(SkipReason::Hidden));
        assert_eq!(filter.skip_file_by_name("plan.pdf"), None);
    }

    #[test]
    fn sidecar_is_exempt_from_hidden_rule() {
        let filter = ScanFilter::default();
        assert_eq!(filter.skip_file_by_name(PROJECT_SIDECAR), None);
    }

    #[test]
    fn size_limit_is_exclusive_above() {
        let filter = ScanFilter::new([], [], 100);
        assert_eq!(filter.skip_file_by_size(100), None);
        assert_eq!(filter.skip_file_by_size(101), Some(SkipReason::TooLarge));
    }

    #[test]
    fn extensions_normalized_with_leading_dot() {
        let filter = ScanFilter::new(["TMP".to_owned()], [], u64::MAX);
        assert_eq!(
            filter.skip_file_by_name("scratch.tmp"),
            Some(SkipReason::ExcludedExtension)
        );
    }
}
