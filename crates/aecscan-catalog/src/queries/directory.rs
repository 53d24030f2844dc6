use rusqlite::{Connection, OptionalExtension, params};

use crate::{Result, records::DirectoryRecord};

/// Upsert by (project, absolute path); touches `last_scanned` either way
/// and returns the row id. The same path may belong to different projects
/// without colliding.
pub fn insert_or_update(
    conn: &Connection,
    project_id: i64,
    path: &str,
    parent_path: Option<&str>,
    depth: i64,
) -> Result<i64> {
    let ts = chrono::Utc::now().to_rfc3339();
    conn.execute(
        r#"
        INSERT INTO directories (project_id, path, parent_path, depth, created_at, last_scanned)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ON CONFLICT(project_id, path) DO UPDATE SET
            parent_path = ?3,
            depth = ?4,
            last_scanned = ?5
        "#,
        params![project_id, path, parent_path, depth, ts],
    )?;

    let id: i64 = conn.query_row(
        "SELECT id FROM directories WHERE project_id = ?1 AND path = ?2",
        params![project_id, path],
        |row| row.get(0),
    )?;
    Ok(id)
}

pub fn get_by_path(
    conn: &Connection,
    project_id: i64,
    path: &str,
) -> Result<Option<DirectoryRecord>> {
    let result = conn
        .query_row(
            r#"
        SELECT id, project_id, path, parent_path, depth, created_at, last_scanned
        FROM directories
        WHERE project_id = ?1 AND path = ?2
        "#,
            params![project_id, path],
            |row| {
                Ok(DirectoryRecord {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    path: row.get(2)?,
                    parent_path: row.get(3)?,
                    depth: row.get(4)?,
                    created_at: row.get(5)?,
                    last_scanned: row.get(6)?,
                })
            },
        )
        .optional()?;

    Ok(result)
}

pub fn count_for_project(conn: &Connection, project_id: i64) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM directories WHERE project_id = ?1",
        [project_id],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}
