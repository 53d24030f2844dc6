use rusqlite::{Connection, OptionalExtension, params};

use crate::{Error, Result, records::ProjectRecord};

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Upsert by project number; returns the row id.
pub fn insert_or_update(
    conn: &Connection,
    project_number: &str,
    project_name: Option<&str>,
    base_path: Option<&str>,
) -> Result<i64> {
    let ts = now();
    conn.execute(
        r#"
        INSERT INTO projects (project_number, project_name, base_path, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        ON CONFLICT(project_number) DO UPDATE SET
            project_name = COALESCE(?2, project_name),
            base_path = COALESCE(?3, base_path),
            updated_at = ?4
        "#,
        params![project_number, project_name, base_path, ts],
    )?;

    let id: i64 = conn.query_row(
        "SELECT id FROM projects WHERE project_number = ?1",
        [project_number],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// The only permitted mutation besides the upsert: flip a project between
/// `active` and `archived`. Rows are never hard-deleted.
pub fn set_status(conn: &Connection, project_number: &str, status: &str) -> Result<()> {
    if !matches!(status, "active" | "archived") {
        return Err(Error::Query(format!("unknown project status: {status}")));
    }
    let updated = conn.execute(
        "UPDATE projects SET status = ?2, updated_at = ?3 WHERE project_number = ?1",
        params![project_number, status, now()],
    )?;
    if updated == 0 {
        return Err(Error::Query(format!("unknown project: {project_number}")));
    }
    Ok(())
}

pub fn get_by_number(conn: &Connection, project_number: &str) -> Result<Option<ProjectRecord>> {
    let result = conn
        .query_row(
            &format!("{SELECT_PROJECT} WHERE project_number = ?1"),
            [project_number],
            row_to_record,
        )
        .optional()?;

    Ok(result)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<ProjectRecord>> {
    let result = conn
        .query_row(
            &format!("{SELECT_PROJECT} WHERE id = ?1"),
            [id],
            row_to_record,
        )
        .optional()?;

    Ok(result)
}

pub fn list(conn: &Connection) -> Result<Vec<ProjectRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_PROJECT} ORDER BY project_number"))?;

    let projects = stmt
        .query_map([], row_to_record)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(projects)
}

const SELECT_PROJECT: &str = r#"
    SELECT id, project_number, project_name, base_path, status, created_at, updated_at
    FROM projects
"#;

fn row_to_record(row: &rusqlite::Row<'_>) -> std::result::Result<ProjectRecord, rusqlite::Error> {
    Ok(ProjectRecord {
        id: row.get(0)?,
        project_number: row.get(1)?,
        project_name: row.get(2)?,
        base_path: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
