use crate::{ScanKind, ScanStatus};
use serde::{Deserialize, Serialize};

/// Structured summary returned to callers after a scan attempt.
///
/// This is the sole contract the CLI/UI layers rely on; the audit trail
/// itself lives in the catalog's scan_history table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub success: bool,
    /// Rowid of the scan_history record written for this attempt.
    pub scan_session_id: Option<i64>,
    pub scan_kind: ScanKind,
    pub status: ScanStatus,
    pub files_scanned: usize,
    pub files_added: usize,
    pub files_updated: usize,
    pub files_removed: usize,
    pub errors_encountered: usize,
    /// Per-file error descriptions, in observation order.
    pub errors: Vec<String>,
    pub scan_time_seconds: f64,
}
