use rusqlite::{Connection, OptionalExtension, params};

use crate::Result;
use crate::records::ScanSessionRecord;

/// Open a scan_history row at scan start; counters are zero until the
/// scan completes or fails.
pub fn begin(conn: &Connection, project_id: Option<i64>, scan_kind: &str) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO scan_history (project_id, scan_kind, status, started_at)
        VALUES (?1, ?2, 'running', ?3)
        "#,
        params![project_id, scan_kind, chrono::Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Counter block written when a session closes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTotals {
    pub files_scanned: i64,
    pub files_added: i64,
    pub files_updated: i64,
    pub files_removed: i64,
    pub errors_count: i64,
}

pub fn complete(
    conn: &Connection,
    session_id: i64,
    status: &str,
    totals: &SessionTotals,
    error_summary: Option<&str>,
) -> Result<()> {
    conn.execute(
        r#"
        UPDATE scan_history SET
            status = ?2,
            completed_at = ?3,
            files_scanned = ?4,
            files_added = ?5,
            files_updated = ?6,
            files_removed = ?7,
            errors_count = ?8,
            error_summary = ?9
        WHERE id = ?1
        "#,
        params![
            session_id,
            status,
            chrono::Utc::now().to_rfc3339(),
            totals.files_scanned,
            totals.files_added,
            totals.files_updated,
            totals.files_removed,
            totals.errors_count,
            error_summary,
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, session_id: i64) -> Result<Option<ScanSessionRecord>> {
    let result = conn
        .query_row(
            &format!("{SELECT_SESSION} WHERE id = ?1"),
            [session_id],
            row_to_record,
        )
        .optional()?;

    Ok(result)
}

pub fn list(
    conn: &Connection,
    project_id: Option<i64>,
    limit: usize,
) -> Result<Vec<ScanSessionRecord>> {
    let mut sessions = Vec::new();
    match project_id {
        Some(id) => {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_SESSION} WHERE project_id = ?1 ORDER BY started_at DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![id, limit as i64], row_to_record)?;
            for row in rows {
                sessions.push(row?);
            }
        }
        None => {
            let mut stmt =
                conn.prepare(&format!("{SELECT_SESSION} ORDER BY started_at DESC LIMIT ?1"))?;
            let rows = stmt.query_map(params![limit as i64], row_to_record)?;
            for row in rows {
                sessions.push(row?);
            }
        }
    }

    Ok(sessions)
}

const SELECT_SESSION: &str = r#"
    SELECT id, project_id, scan_kind, status, started_at, completed_at,
           files_scanned, files_added, files_updated, files_removed,
           errors_count, error_summary
    FROM scan_history
"#;

fn row_to_record(
    row: &rusqlite::Row<'_>,
) -> std::result::Result<ScanSessionRecord, rusqlite::Error> {
    Ok(ScanSessionRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        scan_kind: row.get(2)?,
        status: row.get(3)?,
        started_at: row.get(4)?,
        completed_at: row.get(5)?,
        files_scanned: row.get(6)?,
        files_added: row.get(7)?,
        files_updated: row.get(8)?,
        files_removed: row.get(9)?,
        errors_count: row.get(10)?,
        error_summary: row.get(11)?,
    })
}
