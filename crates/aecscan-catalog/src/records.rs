/// Project row from the catalog.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectRecord {
    pub id: i64,
    /// Project number as parsed from filenames or supplied at init.
    pub project_number: String,
    pub project_name: Option<String>,
    /// Absolute path to the project root, if known.
    pub base_path: Option<String>,
    /// `active` or `archived`; the only mutation a project row permits.
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Directory row; one per (project, directory) that contained at least
/// one catalogued file.
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    pub id: i64,
    pub project_id: i64,
    pub path: String,
    pub parent_path: Option<String>,
    pub depth: i64,
    pub created_at: String,
    pub last_scanned: Option<String>,
}

/// File row. Rows are never deleted by a scan; a file that left the disk
/// is deactivated and keeps its history.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileRecord {
    pub id: i64,
    pub project_id: i64,
    pub directory_id: Option<i64>,
    pub file_path: String,
    pub file_name: String,
    pub extension: String,
    pub size_bytes: i64,
    pub created_time: Option<String>,
    pub modified_time: Option<String>,
    pub accessed_time: Option<String>,
    pub content_hash: Option<String>,
    pub is_active: bool,
    pub first_seen: String,
    pub last_seen: String,
    pub scan_count: i64,
}

/// What a file upsert did to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileUpsert {
    Added(i64),
    Updated(i64),
}

impl FileUpsert {
    pub fn file_id(&self) -> i64 {
        match self {
            FileUpsert::Added(id) | FileUpsert::Updated(id) => *id,
        }
    }
}

/// Naming-convention fields for one file, replaced wholesale on re-parse.
#[derive(Debug, Clone, Default)]
pub struct AecMetadataRecord {
    pub is_standard: bool,
    pub naming_grammar: Option<String>,
    pub project_number: Option<String>,
    pub phase_code: Option<String>,
    pub discipline_code: Option<String>,
    pub document_type: Option<String>,
    pub sheet_number: Option<String>,
    pub revision: Option<String>,
    pub revision_kind: Option<String>,
    pub issue_code: Option<String>,
    pub date_issued: Option<String>,
    pub csi_division: Option<String>,
    pub csi_section: Option<String>,
    /// JSON array of keyword strings.
    pub keywords: Option<String>,
    /// JSON array of {kind, value} objects.
    pub special_identifiers: Option<String>,
}

/// Scan audit row. Every scan attempt writes exactly one, including
/// attempts that fail before touching any file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanSessionRecord {
    pub id: i64,
    pub project_id: Option<i64>,
    pub scan_kind: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub files_scanned: i64,
    pub files_added: i64,
    pub files_updated: i64,
    pub files_removed: i64,
    pub errors_count: i64,
    pub error_summary: Option<String>,
}

/// One extractor's stored output for one file, replaced wholesale on
/// re-extraction.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetadataPayload {
    pub extractor: String,
    pub extractor_version: String,
    pub payload: serde_json::Value,
    pub extracted_at: String,
}

/// Per-project breakdowns over active files.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectHistograms {
    /// (extension, count), descending by count.
    pub file_types: Vec<(String, i64)>,
    /// (discipline code, count) from parsed filenames, descending.
    pub disciplines: Vec<(String, i64)>,
}

/// Aggregate catalog counters for the `status` command.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogStats {
    pub projects: i64,
    pub directories: i64,
    pub active_files: i64,
    pub inactive_files: i64,
    pub total_bytes: i64,
    pub metadata_rows: i64,
    pub standard_named_files: i64,
    pub scan_sessions: i64,
}
