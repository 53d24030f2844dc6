use crate::error::Result;
use crate::filter::{ScanFilter, SkipReason};
use aecscan_types::FileDescriptor;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// A file admitted by the name rules, before it has been stat'ed.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    pub depth: usize,
}

/// Walk `root` applying the filter's directory and file-name rules.
/// Both scan strategies go through this single traversal, so they can
/// never disagree about which files a scan considers. With `recursive`
/// off, only files directly under the root are considered.
pub fn collect<F>(
    root: &Path,
    filter: &ScanFilter,
    recursive: bool,
    mut on_skip: F,
) -> Result<Vec<Candidate>>
where
    F: FnMut(&Path, SkipReason),
{
    let mut candidates = Vec::new();
    let mut walker = WalkDir::new(root).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }
    let walker = walker
        .into_iter()
        .filter_entry(|entry| {
            // Prune excluded directories; the root itself is never pruned.
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            !filter.excludes_dir(&entry.file_name().to_string_lossy())
        });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(reason) = filter.skip_file_by_name(&name) {
            on_skip(entry.path(), reason);
            continue;
        }
        candidates.push(Candidate {
            path: entry.into_path(),
            depth: 0,
        });
    }

    for candidate in &mut candidates {
        candidate.depth = depth_under(root, &candidate.path);
    }
    Ok(candidates)
}

fn depth_under(root: &Path, path: &Path) -> usize {
    path.strip_prefix(root)
        .map(|rel| rel.components().count().saturating_sub(1))
        .unwrap_or(0)
}

fn to_utc(time: std::io::Result<SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

/// Stat one candidate into a full descriptor. Hashing is opt-in since it
/// reads the whole file.
pub fn describe(
    candidate: &Candidate,
    compute_hash: bool,
) -> std::io::Result<FileDescriptor> {
    let path = &candidate.path;
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name
        .rsplit_once('.')
        .map(|(_, e)| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    let content_hash = if compute_hash {
        Some(hash_file(path)?)
    } else {
        None
    };

    Ok(FileDescriptor {
        name,
        extension,
        size: metadata.len(),
        created: to_utc(metadata.created()),
        modified: to_utc(metadata.modified()),
        accessed: to_utc(metadata.accessed()),
        parent: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        depth: candidate.depth,
        content_hash,
        path: path.clone(),
    })
}

fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
