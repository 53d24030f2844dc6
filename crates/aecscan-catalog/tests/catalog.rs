use aecscan_catalog::{
    AecMetadataRecord, Catalog, FileObservation, FileUpsert, SessionTotals,
};
use serde_json::json;

fn observation<'a>(project_id: i64, path: &'a str, name: &'a str, size: i64) -> FileObservation<'a> {
    FileObservation {
        project_id,
        directory_id: None,
        file_path: path,
        file_name: name,
        extension: ".pdf",
        size_bytes: size,
        created_time: None,
        modified_time: Some("2024-03-15T10:00:00Z".to_owned()),
        accessed_time: None,
        content_hash: None,
    }
}

#[test]
fn file_upsert_is_idempotent_by_path() {
    let catalog = Catalog::open_in_memory().unwrap();
    let project_id = catalog.upsert_project("PROJ123", None, None).unwrap();

    let first = catalog
        .upsert_file(&observation(project_id, "/p/a.pdf", "a.pdf", 10))
        .unwrap();
    let second = catalog
        .upsert_file(&observation(project_id, "/p/a.pdf", "a.pdf", 20))
        .unwrap();

    assert!(matches!(first, FileUpsert::Added(_)));
    assert!(matches!(second, FileUpsert::Updated(_)));
    assert_eq!(first.file_id(), second.file_id());

    let record = catalog.get_file("/p/a.pdf").unwrap().unwrap();
    assert_eq!(record.size_bytes, 20);
    assert_eq!(record.scan_count, 2);
    assert!(record.is_active);
}

#[test]
fn reobserved_file_is_reactivated() {
    let catalog = Catalog::open_in_memory().unwrap();
    let project_id = catalog.upsert_project("PROJ123", None, None).unwrap();
    catalog
        .upsert_file(&observation(project_id, "/p/a.pdf", "a.pdf", 10))
        .unwrap();

    let removed = catalog
        .mark_files_inactive(&["/p/a.pdf".to_owned()])
        .unwrap();
    assert_eq!(removed, 1);
    assert!(!catalog.get_file("/p/a.pdf").unwrap().unwrap().is_active);

    catalog
        .upsert_file(&observation(project_id, "/p/a.pdf", "a.pdf", 10))
        .unwrap();
    assert!(catalog.get_file("/p/a.pdf").unwrap().unwrap().is_active);
}

#[test]
fn aec_metadata_is_replaced_wholesale() {
    let catalog = Catalog::open_in_memory().unwrap();
    let project_id = catalog.upsert_project("PROJ123", None, None).unwrap();
    let file_id = catalog
        .upsert_file(&observation(project_id, "/p/a.pdf", "a.pdf", 10))
        .unwrap()
        .file_id();

    catalog
        .replace_aec_metadata(
            file_id,
            &AecMetadataRecord {
                is_standard: true,
                naming_grammar: Some("primary".into()),
                phase_code: Some("CD".into()),
                revision: Some("R3".into()),
                revision_kind: Some("clean".into()),
                ..AecMetadataRecord::default()
            },
        )
        .unwrap();

    // Re-parse with fewer fields must not leave the old revision behind.
    catalog
        .replace_aec_metadata(
            file_id,
            &AecMetadataRecord {
                is_standard: true,
                naming_grammar: Some("legacy".into()),
                phase_code: Some("CD".into()),
                ..AecMetadataRecord::default()
            },
        )
        .unwrap();

    let record = catalog.get_aec_metadata(file_id).unwrap().unwrap();
    assert_eq!(record.naming_grammar.as_deref(), Some("legacy"));
    assert_eq!(record.revision, None);
}

#[test]
fn metadata_payload_is_replaced_wholesale() {
    let catalog = Catalog::open_in_memory().unwrap();
    let project_id = catalog.upsert_project("PROJ123", None, None).unwrap();
    let file_id = catalog
        .upsert_file(&observation(project_id, "/p/a.pdf", "a.pdf", 10))
        .unwrap()
        .file_id();

    catalog
        .replace_metadata_payload(
            file_id,
            "pdf",
            "1",
            &json!({"pdf_version": "1.4", "encrypted": true}),
        )
        .unwrap();
    catalog
        .replace_metadata_payload(file_id, "general", "1", &json!({"file_category": "document"}))
        .unwrap();
    // Re-extraction with fewer keys must not leave the old ones behind.
    catalog
        .replace_metadata_payload(file_id, "pdf", "1", &json!({"pdf_version": "1.7"}))
        .unwrap();

    let payloads = catalog.metadata_payloads(file_id).unwrap();
    assert_eq!(payloads.len(), 2);
    let pdf = payloads.iter().find(|p| p.extractor == "pdf").unwrap();
    assert_eq!(pdf.payload["pdf_version"], json!("1.7"));
    assert_eq!(pdf.payload.get("encrypted"), None);
    assert_eq!(pdf.extractor_version, "1");
}

#[test]
fn project_status_flips_without_deleting() {
    let catalog = Catalog::open_in_memory().unwrap();
    catalog.upsert_project("PROJ123", None, None).unwrap();
    assert_eq!(catalog.get_project("PROJ123").unwrap().unwrap().status, "active");

    catalog.set_project_status("PROJ123", "archived").unwrap();
    let project = catalog.get_project("PROJ123").unwrap().unwrap();
    assert_eq!(project.status, "archived");
    assert_eq!(catalog.list_projects().unwrap().len(), 1);

    assert!(catalog.set_project_status("PROJ123", "deleted").is_err());
    assert!(catalog.set_project_status("NOPE", "archived").is_err());
}

#[test]
fn same_directory_path_is_distinct_per_project() {
    let catalog = Catalog::open_in_memory().unwrap();
    let a = catalog.upsert_project("PROJA", None, None).unwrap();
    let b = catalog.upsert_project("PROJB", None, None).unwrap();

    let dir_a = catalog.upsert_directory(a, "/shared/drawings", None, 1).unwrap();
    let dir_b = catalog.upsert_directory(b, "/shared/drawings", None, 1).unwrap();
    assert_ne!(dir_a, dir_b);

    let conn = catalog.connection().unwrap();
    let record =
        aecscan_catalog::queries::directory::get_by_path(&conn, a, "/shared/drawings")
            .unwrap()
            .unwrap();
    assert_eq!(record.id, dir_a);
    assert!(record.last_scanned.is_some());
}

#[test]
fn scan_session_lifecycle() {
    let catalog = Catalog::open_in_memory().unwrap();
    let project_id = catalog.upsert_project("PROJ123", None, None).unwrap();

    let session_id = catalog
        .begin_scan_session(Some(project_id), "full")
        .unwrap();
    let open = catalog.get_scan_session(session_id).unwrap().unwrap();
    assert_eq!(open.status, "running");
    assert!(open.completed_at.is_none());

    catalog
        .complete_scan_session(
            session_id,
            "completed",
            &SessionTotals {
                files_scanned: 5,
                files_added: 3,
                files_updated: 2,
                files_removed: 1,
                errors_count: 0,
            },
            None,
        )
        .unwrap();

    let closed = catalog.get_scan_session(session_id).unwrap().unwrap();
    assert_eq!(closed.status, "completed");
    assert_eq!(closed.files_added, 3);
    assert!(closed.completed_at.is_some());

    let listed = catalog.list_scan_sessions(Some(project_id), 10).unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn stats_reflect_catalog_contents() {
    let catalog = Catalog::open_in_memory().unwrap();
    let project_id = catalog.upsert_project("PROJ123", None, None).unwrap();
    catalog
        .upsert_file(&observation(project_id, "/p/a.pdf", "a.pdf", 10))
        .unwrap();
    catalog
        .upsert_file(&observation(project_id, "/p/b.pdf", "b.pdf", 30))
        .unwrap();
    catalog
        .mark_files_inactive(&["/p/b.pdf".to_owned()])
        .unwrap();

    let stats = catalog.stats().unwrap();
    assert_eq!(stats.projects, 1);
    assert_eq!(stats.active_files, 1);
    assert_eq!(stats.inactive_files, 1);
    assert_eq!(stats.total_bytes, 10);
}

#[test]
fn histograms_cover_active_files_only() {
    let catalog = Catalog::open_in_memory().unwrap();
    let project_id = catalog.upsert_project("PROJ123", None, None).unwrap();

    for (path, name, ext) in [
        ("/p/a.pdf", "a.pdf", ".pdf"),
        ("/p/b.pdf", "b.pdf", ".pdf"),
        ("/p/c.dwg", "c.dwg", ".dwg"),
    ] {
        let file_id = catalog
            .upsert_file(&FileObservation {
                extension: ext,
                ..observation(project_id, path, name, 10)
            })
            .unwrap()
            .file_id();
        catalog
            .replace_aec_metadata(
                file_id,
                &AecMetadataRecord {
                    is_standard: true,
                    discipline_code: Some(if name == "c.dwg" { "S" } else { "A" }.into()),
                    ..AecMetadataRecord::default()
                },
            )
            .unwrap();
    }
    catalog.mark_files_inactive(&["/p/b.pdf".to_owned()]).unwrap();

    let histograms = catalog.project_histograms(project_id).unwrap();
    assert_eq!(
        histograms.file_types,
        vec![(".dwg".to_owned(), 1), (".pdf".to_owned(), 1)]
    );
    assert_eq!(
        histograms.disciplines,
        vec![("A".to_owned(), 1), ("S".to_owned(), 1)]
    );
}
