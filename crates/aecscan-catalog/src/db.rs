use std::path::{Path, PathBuf};

use crate::pool::{ConnectionPool, PooledConnection};
use crate::queries::{self, file::FileObservation, scan_session::SessionTotals};
use crate::records::{
    AecMetadataRecord, CatalogStats, FileRecord, FileUpsert, MetadataPayload, ProjectHistograms,
    ProjectRecord, ScanSessionRecord,
};
use crate::{Result, maintenance, schema};

/// Pooled handle to one catalog database.
///
/// Thin facade over the query modules; callers doing batched work inside
/// a transaction check a connection out via [`Catalog::connection`] and
/// use the query modules directly.
#[derive(Clone)]
pub struct Catalog {
    pool: ConnectionPool,
}

impl Catalog {
    pub fn open(db_path: &Path, pool_capacity: usize) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let pool = ConnectionPool::open(PathBuf::from(db_path), pool_capacity)?;
        {
            let conn = pool.acquire()?;
            schema::init_schema(&conn)?;
        }
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> Result<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        {
            let conn = pool.acquire()?;
            schema::init_schema(&conn)?;
        }
        Ok(Self { pool })
    }

    /// Check a connection out of the pool.
    pub fn connection(&self) -> Result<PooledConnection> {
        self.pool.acquire()
    }

    pub fn pool_capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn upsert_project(
        &self,
        project_number: &str,
        project_name: Option<&str>,
        base_path: Option<&str>,
    ) -> Result<i64> {
        let conn = self.connection()?;
        queries::project::insert_or_update(&conn, project_number, project_name, base_path)
    }

    pub fn get_project(&self, project_number: &str) -> Result<Option<ProjectRecord>> {
        let conn = self.connection()?;
        queries::project::get_by_number(&conn, project_number)
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        let conn = self.connection()?;
        queries::project::list(&conn)
    }

    pub fn set_project_status(&self, project_number: &str, status: &str) -> Result<()> {
        let conn = self.connection()?;
        queries::project::set_status(&conn, project_number, status)
    }

    pub fn upsert_directory(
        &self,
        project_id: i64,
        path: &str,
        parent_path: Option<&str>,
        depth: i64,
    ) -> Result<i64> {
        let conn = self.connection()?;
        queries::directory::insert_or_update(&conn, project_id, path, parent_path, depth)
    }

    pub fn upsert_file(&self, observation: &FileObservation<'_>) -> Result<FileUpsert> {
        let conn = self.connection()?;
        queries::file::insert_or_update(&conn, observation)
    }

    pub fn get_file(&self, file_path: &str) -> Result<Option<FileRecord>> {
        let conn = self.connection()?;
        queries::file::get_by_path(&conn, file_path)
    }

    pub fn list_files(&self, project_id: i64, active_only: bool) -> Result<Vec<FileRecord>> {
        let conn = self.connection()?;
        queries::file::list_for_project(&conn, project_id, active_only)
    }

    pub fn active_file_paths(&self, project_id: i64) -> Result<Vec<String>> {
        let conn = self.connection()?;
        queries::file::active_paths(&conn, project_id)
    }

    pub fn mark_files_inactive(&self, paths: &[String]) -> Result<usize> {
        let conn = self.connection()?;
        queries::file::mark_inactive(&conn, paths)
    }

    pub fn replace_metadata_payload(
        &self,
        file_id: i64,
        extractor: &str,
        extractor_version: &str,
        payload: &serde_json::Value,
    ) -> Result<()> {
        let conn = self.connection()?;
        queries::metadata::replace_payload(&conn, file_id, extractor, extractor_version, payload)
    }

    pub fn metadata_payloads(&self, file_id: i64) -> Result<Vec<MetadataPayload>> {
        let conn = self.connection()?;
        queries::metadata::payloads_for_file(&conn, file_id)
    }

    pub fn replace_aec_metadata(&self, file_id: i64, record: &AecMetadataRecord) -> Result<()> {
        let conn = self.connection()?;
        queries::metadata::replace_aec(&conn, file_id, record)
    }

    pub fn get_aec_metadata(&self, file_id: i64) -> Result<Option<AecMetadataRecord>> {
        let conn = self.connection()?;
        queries::metadata::get_aec(&conn, file_id)
    }

    pub fn begin_scan_session(&self, project_id: Option<i64>, scan_kind: &str) -> Result<i64> {
        let conn = self.connection()?;
        queries::scan_session::begin(&conn, project_id, scan_kind)
    }

    pub fn complete_scan_session(
        &self,
        session_id: i64,
        status: &str,
        totals: &SessionTotals,
        error_summary: Option<&str>,
    ) -> Result<()> {
        let conn = self.connection()?;
        queries::scan_session::complete(&conn, session_id, status, totals, error_summary)
    }

    pub fn get_scan_session(&self, session_id: i64) -> Result<Option<ScanSessionRecord>> {
        let conn = self.connection()?;
        queries::scan_session::get(&conn, session_id)
    }

    pub fn list_scan_sessions(
        &self,
        project_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<ScanSessionRecord>> {
        let conn = self.connection()?;
        queries::scan_session::list(&conn, project_id, limit)
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        let conn = self.connection()?;
        queries::stats::gather(&conn)
    }

    pub fn project_histograms(&self, project_id: i64) -> Result<ProjectHistograms> {
        let conn = self.connection()?;
        queries::stats::project_histograms(&conn, project_id)
    }

    pub fn vacuum(&self) -> Result<()> {
        let conn = self.connection()?;
        maintenance::vacuum(&conn)
    }

    pub fn backup_to(&self, dest: &Path) -> Result<()> {
        let conn = self.connection()?;
        maintenance::backup_to(&conn, dest)
    }

    pub fn cleanup_orphans(&self) -> Result<usize> {
        let conn = self.connection()?;
        maintenance::cleanup_orphans(&conn)
    }
}
