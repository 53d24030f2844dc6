// Shared domain types for the scan-and-catalog pipeline.
// Schemas only; behavior lives in the downstream crates.

mod descriptor;
mod outcome;
pub mod vocab;

pub use descriptor::FileDescriptor;
pub use outcome::ScanOutcome;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of scan requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// Walk the whole tree and reconcile complete catalog state against it.
    Full,
    /// Full walk filtered to files modified after the last completed scan.
    Incremental,
    /// Full walk cross-checked against catalog rows without reconciling.
    Validation,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Full => "full",
            ScanKind::Incremental => "incremental",
            ScanKind::Validation => "validation",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(ScanKind::Full),
            "incremental" => Ok(ScanKind::Incremental),
            "validation" => Ok(ScanKind::Validation),
            other => Err(format!("unknown scan kind: {}", other)),
        }
    }
}

/// Final status of a recorded scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Completed,
    CompletedWithErrors,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Completed => "completed",
            ScanStatus::CompletedWithErrors => "completed_with_errors",
            ScanStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(ScanStatus::Completed),
            "completed_with_errors" => Some(ScanStatus::CompletedWithErrors),
            "failed" => Some(ScanStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a revision token parsed from a filename.
///
/// Check prints (`C05`) are internal not-yet-issued revisions; clean
/// revisions (`R1`) are client-issued; bare issue codes (`IFC`) mark an
/// issuance event rather than a numbered revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKind {
    CheckPrint,
    Clean,
    IssueCode,
}

impl RevisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionKind::CheckPrint => "check_print",
            RevisionKind::Clean => "clean",
            RevisionKind::IssueCode => "issue_code",
        }
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
