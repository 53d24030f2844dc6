use rusqlite::Connection;

use crate::Result;
use crate::records::{CatalogStats, ProjectHistograms};

fn count(conn: &Connection, sql: &str) -> Result<i64> {
    Ok(conn.query_row(sql, [], |row| row.get(0))?)
}

fn histogram(conn: &Connection, sql: &str, project_id: i64) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([project_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

/// File-type and discipline breakdowns over one project's active files.
pub fn project_histograms(conn: &Connection, project_id: i64) -> Result<ProjectHistograms> {
    let file_types = histogram(
        conn,
        r#"
        SELECT CASE WHEN extension = '' THEN '(none)' ELSE extension END, COUNT(*)
        FROM files
        WHERE project_id = ?1 AND is_active = 1
        GROUP BY extension
        ORDER BY COUNT(*) DESC, extension
        "#,
        project_id,
    )?;
    let disciplines = histogram(
        conn,
        r#"
        SELECT m.discipline_code, COUNT(*)
        FROM aec_file_metadata m
        JOIN files f ON f.id = m.file_id
        WHERE f.project_id = ?1 AND f.is_active = 1 AND m.discipline_code IS NOT NULL
        GROUP BY m.discipline_code
        ORDER BY COUNT(*) DESC, m.discipline_code
        "#,
        project_id,
    )?;
    Ok(ProjectHistograms {
        file_types,
        disciplines,
    })
}

pub fn gather(conn: &Connection) -> Result<CatalogStats> {
    Ok(CatalogStats {
        projects: count(conn, "SELECT COUNT(*) FROM projects")?,
        directories: count(conn, "SELECT COUNT(*) FROM directories")?,
        active_files: count(conn, "SELECT COUNT(*) FROM files WHERE is_active = 1")?,
        inactive_files: count(conn, "SELECT COUNT(*) FROM files WHERE is_active = 0")?,
        total_bytes: count(
            conn,
            "SELECT COALESCE(SUM(size_bytes), 0) FROM files WHERE is_active = 1",
        )?,
        metadata_rows: count(conn, "SELECT COUNT(*) FROM file_metadata")?,
        standard_named_files: count(
            conn,
            "SELECT COUNT(*) FROM aec_file_metadata WHERE is_standard = 1",
        )?,
        scan_sessions: count(conn, "SELECT COUNT(*) FROM scan_history")?,
    })
}
