use crate::{Error, Result};
use aecscan_catalog::queries::metadata;
use aecscan_catalog::{Catalog, FileRecord};
use aecscan_extract::ExtractionDispatch;
use aecscan_types::FileDescriptor;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Progress events for the metadata extraction pass.
#[derive(Debug, Clone)]
pub enum ExtractEvent {
    Started { total: usize },
    FileProcessed { index: usize, total: usize, path: PathBuf },
    FileSkipped { path: PathBuf },
    FileFailed { path: PathBuf, message: String },
    Completed { processed: usize, failed: usize },
}

/// Summary returned after an extraction pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExtractSummary {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub fields_written: usize,
    pub failures: Vec<String>,
}

/// Runs content extractors over a project's active files and stores the
/// results. Separate from scanning so a slow PDF cannot stall the
/// inventory pass.
pub struct ExtractService {
    catalog: Catalog,
    dispatch: ExtractionDispatch,
}

impl ExtractService {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            dispatch: ExtractionDispatch::standard(),
        }
    }

    pub fn with_dispatch(catalog: Catalog, dispatch: ExtractionDispatch) -> Self {
        Self { catalog, dispatch }
    }

    /// Extract metadata for every active file of `project_number`. Files
    /// that already carry extracted fields are skipped unless `force`.
    pub fn run<F>(&self, project_number: &str, force: bool, mut on_event: F) -> Result<ExtractSummary>
    where
        F: FnMut(ExtractEvent),
    {
        let project = self
            .catalog
            .get_project(project_number)?
            .ok_or_else(|| Error::NotInitialized(project_number.to_owned()))?;
        let files = self.catalog.list_files(project.id, true)?;

        let total = files.len();
        on_event(ExtractEvent::Started { total });

        let mut summary = ExtractSummary {
            files_processed: 0,
            files_skipped: 0,
            files_failed: 0,
            fields_written: 0,
            failures: Vec::new(),
        };

        for (index, record) in files.iter().enumerate() {
            let path = PathBuf::from(&record.file_path);
            if !force && self.already_extracted(record.id)? {
                summary.files_skipped += 1;
                on_event(ExtractEvent::FileSkipped { path });
                continue;
            }
            match self.extract_one(record) {
                Ok(fields_written) => {
                    summary.files_processed += 1;
                    summary.fields_written += fields_written;
                    on_event(ExtractEvent::FileProcessed {
                        index: index + 1,
                        total,
                        path,
                    });
                }
                Err(err) => {
                    summary.files_failed += 1;
                    summary.failures.push(format!("{}: {}", record.file_path, err));
                    on_event(ExtractEvent::FileFailed {
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }

        on_event(ExtractEvent::Completed {
            processed: summary.files_processed,
            failed: summary.files_failed,
        });
        Ok(summary)
    }

    fn already_extracted(&self, file_id: i64) -> Result<bool> {
        let conn = self.catalog.connection()?;
        Ok(!metadata::payloads_for_file(&conn, file_id)?.is_empty())
    }

    /// Store one payload row per extractor, replacing everything the file
    /// had before so a re-extraction can never leave stale rows behind.
    fn extract_one(&self, record: &FileRecord) -> Result<usize> {
        let descriptor = descriptor_from_record(record);
        let extraction = self.dispatch.extract(&descriptor);
        if !extraction.success {
            return Err(Error::InvalidOperation(format!(
                "no extractor produced output ({})",
                extraction.errors.join("; ")
            )));
        }

        let mut conn = self.catalog.connection()?;
        let tx = conn.transaction().map_err(aecscan_catalog::Error::from)?;
        metadata::clear_payloads(&tx, record.id)?;

        let mut written = 0usize;
        for output in &extraction.outputs {
            let payload = serde_json::Value::Object(
                output.fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            );
            metadata::replace_payload(&tx, record.id, output.extractor, output.version, &payload)?;
            written += output.fields.len();
        }
        if let Some(summary) = &extraction.summary {
            metadata::replace_payload(
                &tx,
                record.id,
                "summary",
                "1",
                &serde_json::json!({ "content_summary": summary }),
            )?;
            written += 1;
        }
        if !extraction.errors.is_empty() {
            metadata::replace_payload(
                &tx,
                record.id,
                "extraction_errors",
                "1",
                &serde_json::json!(extraction.errors),
            )?;
        }
        tx.commit().map_err(aecscan_catalog::Error::from)?;
        Ok(written)
    }
}

fn parse_ts(value: &Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn descriptor_from_record(record: &FileRecord) -> FileDescriptor {
    let path = PathBuf::from(&record.file_path);
    FileDescriptor {
        name: record.file_name.clone(),
        extension: record.extension.clone(),
        size: record.size_bytes.max(0) as u64,
        created: parse_ts(&record.created_time),
        modified: parse_ts(&record.modified_time),
        accessed: parse_ts(&record.accessed_time),
        parent: path.parent().map(|p| p.to_path_buf()).unwrap_or_default(),
        depth: 0,
        content_hash: record.content_hash.clone(),
        path,
    }
}
