use aecscan_types::FileDescriptor;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

const LARGEST_FILES_SHOWN: usize = 10;

/// Aggregate view of one inventory, for the `report` command.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub total_files: usize,
    pub total_bytes: u64,
    /// File count per lowercase extension (leading dot included).
    pub extension_counts: BTreeMap<String, usize>,
    /// Deepest directory level seen, relative to the scan root.
    pub max_depth: usize,
    /// The largest files, descending by size.
    pub largest_files: Vec<(PathBuf, u64)>,
}

impl ScanReport {
    pub fn from_descriptors(descriptors: &[FileDescriptor]) -> Self {
        let mut extension_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_bytes = 0u64;
        let mut max_depth = 0usize;
        for d in descriptors {
            let key = if d.extension.is_empty() {
                "(none)".to_owned()
            } else {
                d.extension.clone()
            };
            *extension_counts.entry(key).or_insert(0) += 1;
            total_bytes += d.size;
            max_depth = max_depth.max(d.depth);
        }

        let mut by_size: Vec<_> = descriptors.iter().map(|d| (d.path.clone(), d.size)).collect();
        by_size.sort_by(|a, b| b.1.cmp(&a.1));
        by_size.truncate(LARGEST_FILES_SHOWN);

        Self {
            total_files: descriptors.len(),
            total_bytes,
            extension_counts,
            max_depth,
            largest_files: by_size,
        }
    }
}
