use rusqlite::Connection;

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 4;

// NOTE: Catalog Design Rationale
//
// Why path-keyed files with soft delete (is_active flag)?
// - The filesystem is the source of truth; the catalog is an index over it
// - A file that disappears from disk keeps its row and history; reappearing
//   at the same path reactivates the row and bumps scan_count
// - Avoids cascading deletes across the metadata tables
//
// Why per-extractor payload rows next to a typed aec_file_metadata table?
// - Extractors produce open-ended fields per format (pdf_version, width...)
//   so each extractor stores one JSON payload per file, replaced wholesale
//   on re-extraction; stale keys cannot outlive the run that produced them
// - Naming-convention fields are a fixed shape queried constantly, so they
//   get real columns and one row per file, replaced wholesale on re-parse
//
// Why drop-and-recreate on version mismatch instead of migrations?
// - Everything in the catalog can be rebuilt by a full scan
pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY,
            project_number TEXT NOT NULL UNIQUE,
            project_name TEXT,
            base_path TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS directories (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            path TEXT NOT NULL,
            parent_path TEXT,
            depth INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            last_scanned TEXT,
            UNIQUE (project_id, path),
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            directory_id INTEGER,
            file_path TEXT NOT NULL UNIQUE,
            file_name TEXT NOT NULL,
            extension TEXT NOT NULL DEFAULT '',
            size_bytes INTEGER NOT NULL DEFAULT 0,
            created_time TEXT,
            modified_time TEXT,
            accessed_time TEXT,
            content_hash TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL,
            scan_count INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (project_id) REFERENCES projects(id),
            FOREIGN KEY (directory_id) REFERENCES directories(id)
        );

        CREATE TABLE IF NOT EXISTS file_metadata (
            id INTEGER PRIMARY KEY,
            file_id INTEGER NOT NULL,
            extractor TEXT NOT NULL,
            extractor_version TEXT NOT NULL,
            payload TEXT NOT NULL,
            extracted_at TEXT NOT NULL,
            UNIQUE (file_id, extractor),
            FOREIGN KEY (file_id) REFERENCES files(id)
        );

        CREATE TABLE IF NOT EXISTS aec_file_metadata (
            id INTEGER PRIMARY KEY,
            file_id INTEGER NOT NULL UNIQUE,
            is_standard BOOLEAN NOT NULL DEFAULT 0,
            naming_grammar TEXT,
            project_number TEXT,
            phase_code TEXT,
            discipline_code TEXT,
            document_type TEXT,
            sheet_number TEXT,
            revision TEXT,
            revision_kind TEXT,
            issue_code TEXT,
            date_issued TEXT,
            csi_division TEXT,
            csi_section TEXT,
            keywords TEXT,
            special_identifiers TEXT,
            parsed_at TEXT NOT NULL,
            FOREIGN KEY (file_id) REFERENCES files(id)
        );

        CREATE TABLE IF NOT EXISTS scan_history (
            id INTEGER PRIMARY KEY,
            project_id INTEGER,
            scan_kind TEXT NOT NULL,
            status TEXT NOT NULL,
            started_at TEXT NOT NULL,
            completed_at TEXT,
            files_scanned INTEGER NOT NULL DEFAULT 0,
            files_added INTEGER NOT NULL DEFAULT 0,
            files_updated INTEGER NOT NULL DEFAULT 0,
            files_removed INTEGER NOT NULL DEFAULT 0,
            errors_count INTEGER NOT NULL DEFAULT 0,
            error_summary TEXT,
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        CREATE INDEX IF NOT EXISTS idx_directories_project ON directories(project_id);
        CREATE INDEX IF NOT EXISTS idx_files_project ON files(project_id);
        CREATE INDEX IF NOT EXISTS idx_files_directory ON files(directory_id);
        CREATE INDEX IF NOT EXISTS idx_files_active ON files(is_active);
        CREATE INDEX IF NOT EXISTS idx_files_extension ON files(extension);
        CREATE INDEX IF NOT EXISTS idx_metadata_file ON file_metadata(file_id);
        CREATE INDEX IF NOT EXISTS idx_aec_discipline ON aec_file_metadata(discipline_code);
        CREATE INDEX IF NOT EXISTS idx_history_project ON scan_history(project_id);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

/// Per-connection pragmas; run on every pooled connection, not just the
/// one that initialized the schema.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        "#,
    )?;
    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS scan_history;
        DROP TABLE IF EXISTS aec_file_metadata;
        DROP TABLE IF EXISTS file_metadata;
        DROP TABLE IF EXISTS files;
        DROP TABLE IF EXISTS directories;
        DROP TABLE IF EXISTS projects;
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_rebuilds_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO projects (project_number, created_at, updated_at) VALUES ('P1', 't', 't')",
            [],
        )
        .unwrap();

        conn.execute("PRAGMA user_version = 999", []).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);

        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn reinit_at_same_version_preserves_rows() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO projects (project_number, created_at, updated_at) VALUES ('P1', 't', 't')",
            [],
        )
        .unwrap();

        init_schema(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
