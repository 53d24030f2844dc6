use rusqlite::{Connection, OptionalExtension, params};

use crate::records::{FileRecord, FileUpsert};
use crate::Result;

/// Fields carried into a file upsert; everything observed on disk for
/// one file during one scan.
#[derive(Debug, Clone)]
pub struct FileObservation<'a> {
    pub project_id: i64,
    pub directory_id: Option<i64>,
    pub file_path: &'a str,
    pub file_name: &'a str,
    pub extension: &'a str,
    pub size_bytes: i64,
    pub created_time: Option<String>,
    pub modified_time: Option<String>,
    pub accessed_time: Option<String>,
    pub content_hash: Option<&'a str>,
}

/// Upsert by path. A re-observed file keeps its identity and first_seen,
/// bumps scan_count, and is reasserted active even if a previous scan
/// deactivated it.
pub fn insert_or_update(conn: &Connection, obs: &FileObservation<'_>) -> Result<FileUpsert> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM files WHERE file_path = ?1",
            [obs.file_path],
            |row| row.get(0),
        )
        .optional()?;
    let ts = chrono::Utc::now().to_rfc3339();

    conn.execute(
        r#"
        INSERT INTO files (
            project_id, directory_id, file_path, file_name, extension,
            size_bytes, created_time, modified_time, accessed_time,
            content_hash, is_active, first_seen, last_seen, scan_count
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?11, 1)
        ON CONFLICT(file_path) DO UPDATE SET
            project_id = ?1,
            directory_id = ?2,
            file_name = ?4,
            extension = ?5,
            size_bytes = ?6,
            created_time = ?7,
            modified_time = ?8,
            accessed_time = ?9,
            content_hash = COALESCE(?10, content_hash),
            is_active = 1,
            last_seen = ?11,
            scan_count = scan_count + 1
        "#,
        params![
            obs.project_id,
            obs.directory_id,
            obs.file_path,
            obs.file_name,
            obs.extension,
            obs.size_bytes,
            obs.created_time,
            obs.modified_time,
            obs.accessed_time,
            obs.content_hash,
            ts,
        ],
    )?;

    match existing {
        Some(id) => Ok(FileUpsert::Updated(id)),
        None => {
            let id: i64 = conn.query_row(
                "SELECT id FROM files WHERE file_path = ?1",
                [obs.file_path],
                |row| row.get(0),
            )?;
            Ok(FileUpsert::Added(id))
        }
    }
}

pub fn get_by_path(conn: &Connection, file_path: &str) -> Result<Option<FileRecord>> {
    let result = conn
        .query_row(
            &format!("{SELECT_FILE} WHERE file_path = ?1"),
            [file_path],
            row_to_record,
        )
        .optional()?;

    Ok(result)
}

/// Active file paths for a project; the reconciliation set.
pub fn active_paths(conn: &Connection, project_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT file_path
        FROM files
        WHERE project_id = ?1 AND is_active = 1
        "#,
    )?;

    let paths = stmt
        .query_map([project_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(paths)
}

/// Soft-delete by path; returns how many rows were deactivated.
pub fn mark_inactive(conn: &Connection, paths: &[String]) -> Result<usize> {
    let mut changed = 0usize;
    let mut stmt = conn.prepare("UPDATE files SET is_active = 0 WHERE file_path = ?1")?;
    for path in paths {
        changed += stmt.execute([path])?;
    }
    Ok(changed)
}

pub fn list_for_project(
    conn: &Connection,
    project_id: i64,
    active_only: bool,
) -> Result<Vec<FileRecord>> {
    let sql = if active_only {
        format!("{SELECT_FILE} WHERE project_id = ?1 AND is_active = 1 ORDER BY file_path")
    } else {
        format!("{SELECT_FILE} WHERE project_id = ?1 ORDER BY file_path")
    };
    let mut stmt = conn.prepare(&sql)?;

    let files = stmt
        .query_map([project_id], row_to_record)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(files)
}

const SELECT_FILE: &str = r#"
    SELECT id, project_id, directory_id, file_path, file_name, extension,
           size_bytes, created_time, modified_time, accessed_time,
           content_hash, is_active, first_seen, last_seen, scan_count
    FROM files
"#;

fn row_to_record(row: &rusqlite::Row<'_>) -> std::result::Result<FileRecord, rusqlite::Error> {
    Ok(FileRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        directory_id: row.get(2)?,
        file_path: row.get(3)?,
        file_name: row.get(4)?,
        extension: row.get(5)?,
        size_bytes: row.get(6)?,
        created_time: row.get(7)?,
        modified_time: row.get(8)?,
        accessed_time: row.get(9)?,
        content_hash: row.get(10)?,
        is_active: row.get(11)?,
        first_seen: row.get(12)?,
        last_seen: row.get(13)?,
        scan_count: row.get(14)?,
    })
}
