use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;

use crate::records::{AecMetadataRecord, MetadataPayload};
use crate::{Error, Result};

/// Replace one extractor's payload for a file. At most one row exists per
/// (file, extractor); re-extraction overwrites it wholesale, so keys the
/// new run no longer produces disappear with the old payload.
pub fn replace_payload(
    conn: &Connection,
    file_id: i64,
    extractor: &str,
    extractor_version: &str,
    payload: &Value,
) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO file_metadata (file_id, extractor, extractor_version, payload, extracted_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(file_id, extractor) DO UPDATE SET
            extractor_version = ?3,
            payload = ?4,
            extracted_at = ?5
        "#,
        params![
            file_id,
            extractor,
            extractor_version,
            payload.to_string(),
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn payloads_for_file(conn: &Connection, file_id: i64) -> Result<Vec<MetadataPayload>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT extractor, extractor_version, payload, extracted_at
        FROM file_metadata
        WHERE file_id = ?1
        ORDER BY extractor
        "#,
    )?;

    let payloads = stmt
        .query_map([file_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    payloads
        .into_iter()
        .map(|(extractor, extractor_version, payload, extracted_at)| {
            let payload = serde_json::from_str(&payload).map_err(|err| {
                Error::Query(format!("corrupt payload for extractor {extractor}: {err}"))
            })?;
            Ok(MetadataPayload {
                extractor,
                extractor_version,
                payload,
                extracted_at,
            })
        })
        .collect()
}

/// Drop every extractor payload for a file; an extraction pass clears
/// before writing so rows from extractors that no longer apply cannot
/// linger.
pub fn clear_payloads(conn: &Connection, file_id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM file_metadata WHERE file_id = ?1", [file_id])?)
}

/// Replace the naming-convention row for a file. Delete-then-insert keeps
/// stale fields from a previous parse out of the new row.
pub fn replace_aec(conn: &Connection, file_id: i64, record: &AecMetadataRecord) -> Result<()> {
    conn.execute("DELETE FROM aec_file_metadata WHERE file_id = ?1", [file_id])?;
    conn.execute(
        r#"
        INSERT INTO aec_file_metadata (
            file_id, is_standard, naming_grammar, project_number, phase_code,
            discipline_code, document_type, sheet_number, revision,
            revision_kind, issue_code, date_issued, csi_division, csi_section,
            keywords, special_identifiers, parsed_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
        "#,
        params![
            file_id,
            record.is_standard,
            record.naming_grammar,
            record.project_number,
            record.phase_code,
            record.discipline_code,
            record.document_type,
            record.sheet_number,
            record.revision,
            record.revision_kind,
            record.issue_code,
            record.date_issued,
            record.csi_division,
            record.csi_section,
            record.keywords,
            record.special_identifiers,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_aec(conn: &Connection, file_id: i64) -> Result<Option<AecMetadataRecord>> {
    let result = conn
        .query_row(
            r#"
        SELECT is_standard, naming_grammar, project_number, phase_code,
               discipline_code, document_type, sheet_number, revision,
               revision_kind, issue_code, date_issued, csi_division,
               csi_section, keywords, special_identifiers
        FROM aec_file_metadata
        WHERE file_id = ?1
        "#,
            [file_id],
            |row| {
                Ok(AecMetadataRecord {
                    is_standard: row.get(0)?,
                    naming_grammar: row.get(1)?,
                    project_number: row.get(2)?,
                    phase_code: row.get(3)?,
                    discipline_code: row.get(4)?,
                    document_type: row.get(5)?,
                    sheet_number: row.get(6)?,
                    revision: row.get(7)?,
                    revision_kind: row.get(8)?,
                    issue_code: row.get(9)?,
                    date_issued: row.get(10)?,
                    csi_division: row.get(11)?,
                    csi_section: row.get(12)?,
                    keywords: row.get(13)?,
                    special_identifiers: row.get(14)?,
                })
            },
        )
        .optional()?;

    Ok(result)
}

/// Delete metadata rows whose file no longer exists; returns rows removed.
pub fn cleanup_orphans(conn: &Connection) -> Result<usize> {
    let a = conn.execute(
        "DELETE FROM file_metadata WHERE file_id NOT IN (SELECT id FROM files)",
        [],
    )?;
    let b = conn.execute(
        "DELETE FROM aec_file_metadata WHERE file_id NOT IN (SELECT id FROM files)",
        [],
    )?;
    Ok(a + b)
}
