use rusqlite::Connection;
use rusqlite::backup::Backup;
use std::path::Path;
use std::time::Duration;

use crate::{Result, queries};

/// Rows copied per backup step; keeps the source briefly lockable by
/// other connections during long copies.
const BACKUP_STEP_PAGES: std::ffi::c_int = 512;

pub fn vacuum(conn: &Connection) -> Result<()> {
    conn.execute("VACUUM", [])?;
    Ok(())
}

/// Online backup to `dest`, safe while other pooled connections are live.
pub fn backup_to(conn: &Connection, dest: &Path) -> Result<()> {
    let mut target = Connection::open(dest)?;
    let backup = Backup::new(conn, &mut target)?;
    backup.run_to_completion(BACKUP_STEP_PAGES, Duration::from_millis(50), None)?;
    Ok(())
}

/// Remove metadata rows left behind by schema rebuilds or manual edits.
pub fn cleanup_orphans(conn: &Connection) -> Result<usize> {
    queries::metadata::cleanup_orphans(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn backup_copies_rows() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("live.db")).unwrap();
        schema::init_schema(&conn).unwrap();
        queries::project::insert_or_update(&conn, "PROJ123", Some("Test"), None).unwrap();

        let dest = dir.path().join("backup.db");
        backup_to(&conn, &dest).unwrap();

        let copy = Connection::open(&dest).unwrap();
        let count: i64 = copy
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
