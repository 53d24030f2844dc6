use crate::config::{Config, ScanStrategy};
use crate::policy::PathPolicy;
use crate::{Error, Result};
use aecscan_catalog::queries::{directory, file, metadata};
use aecscan_catalog::{AecMetadataRecord, Catalog, FileObservation, FileUpsert, SessionTotals};
use aecscan_naming::NamingResult;
use aecscan_scanner::{ConcurrentScanner, ScanProgress, StopFlag, ThreadedScanner};
use aecscan_types::{FileDescriptor, ScanKind, ScanOutcome, ScanStatus};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Progress events delivered while the service drives a scan.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Started {
        project_number: String,
        scan_kind: ScanKind,
    },
    Counted {
        total: usize,
    },
    FileScanned {
        scanned: usize,
        total: usize,
    },
    FileSkipped {
        path: PathBuf,
        reason: String,
    },
    FileError {
        path: PathBuf,
        message: String,
    },
    Reconciling {
        files: usize,
        batches: usize,
    },
    BatchCommitted {
        batch: usize,
        batches: usize,
    },
    RemovalCheck {
        candidates: usize,
    },
    FilesRemoved {
        count: usize,
    },
    SessionRecorded {
        session_id: i64,
    },
}

/// One scan invocation.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub project_number: String,
    pub project_name: Option<String>,
    pub root: PathBuf,
    pub kind: ScanKind,
    /// When false, only files directly under the root are inventoried.
    pub recursive: bool,
    /// Incremental cutoff override; defaults to the start of the last
    /// completed scan of the project.
    pub since: Option<DateTime<Utc>>,
}

// Projects with a scan running through one service (and its clones). One
// scan per project at a time; a second request fails fast instead of
// racing reconciliation.
type ActiveScans = Arc<Mutex<HashSet<String>>>;

struct ScanLock {
    registry: ActiveScans,
    project_number: String,
}

impl ScanLock {
    fn acquire(registry: &ActiveScans, project_number: &str) -> Result<Self> {
        let mut active = registry
            .lock()
            .map_err(|_| Error::InvalidOperation("scan registry poisoned".into()))?;
        if !active.insert(project_number.to_owned()) {
            return Err(Error::ScanInProgress(project_number.to_owned()));
        }
        Ok(Self {
            registry: Arc::clone(registry),
            project_number: project_number.to_owned(),
        })
    }
}

impl Drop for ScanLock {
    fn drop(&mut self) {
        if let Ok(mut active) = self.registry.lock() {
            active.remove(&self.project_number);
        }
    }
}

/// Drives a scan end to end: inventory the tree, reconcile it into the
/// catalog in batches, detect removals, and record the session.
#[derive(Clone)]
pub struct ScanService {
    catalog: Catalog,
    config: Config,
    active_scans: ActiveScans,
}

impl ScanService {
    pub fn new(catalog: Catalog, config: Config) -> Self {
        Self {
            catalog,
            config,
            active_scans: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run one scan. Pre-flight failures (bad configuration, a scan
    /// already running on the project) return `Err`; once the session row
    /// exists every later failure, path rejection included, is captured
    /// in the session and the returned outcome instead.
    pub fn run<F>(
        &self,
        request: &ScanRequest,
        stop: &StopFlag,
        mut on_event: F,
    ) -> Result<ScanOutcome>
    where
        F: FnMut(ScanEvent),
    {
        self.config.validate()?;
        let _lock = ScanLock::acquire(&self.active_scans, &request.project_number)?;

        let started = Instant::now();
        let project_id = self.catalog.upsert_project(
            &request.project_number,
            request.project_name.as_deref(),
            request.root.to_str(),
        )?;
        let session_id = self
            .catalog
            .begin_scan_session(Some(project_id), request.kind.as_str())?;
        on_event(ScanEvent::Started {
            project_number: request.project_number.clone(),
            scan_kind: request.kind,
        });

        let mut errors: Vec<String> = Vec::new();
        let policy = PathPolicy::new(&self.config.paths.allowed_base_paths);
        let executed = policy.validate(&request.root).and_then(|root| {
            self.execute(&root, project_id, request, stop, &mut on_event, &mut errors)
        });

        let outcome = match executed {
            Ok(counters) => {
                let status = if errors.is_empty() {
                    ScanStatus::Completed
                } else {
                    ScanStatus::CompletedWithErrors
                };
                self.close_session(session_id, status, &counters, &errors)?;
                on_event(ScanEvent::SessionRecorded { session_id });
                ScanOutcome {
                    success: true,
                    scan_session_id: Some(session_id),
                    scan_kind: request.kind,
                    status,
                    files_scanned: counters.files_scanned as usize,
                    files_added: counters.files_added as usize,
                    files_updated: counters.files_updated as usize,
                    files_removed: counters.files_removed as usize,
                    errors_encountered: errors.len(),
                    errors,
                    scan_time_seconds: started.elapsed().as_secs_f64(),
                }
            }
            Err(err) => {
                errors.push(err.to_string());
                self.close_session(session_id, ScanStatus::Failed, &SessionTotals::default(), &errors)?;
                on_event(ScanEvent::SessionRecorded { session_id });
                ScanOutcome {
                    success: false,
                    scan_session_id: Some(session_id),
                    scan_kind: request.kind,
                    status: ScanStatus::Failed,
                    files_scanned: 0,
                    files_added: 0,
                    files_updated: 0,
                    files_removed: 0,
                    errors_encountered: errors.len(),
                    errors,
                    scan_time_seconds: started.elapsed().as_secs_f64(),
                }
            }
        };
        Ok(outcome)
    }

    fn close_session(
        &self,
        session_id: i64,
        status: ScanStatus,
        totals: &SessionTotals,
        errors: &[String],
    ) -> Result<()> {
        let summary = if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        };
        let mut totals = *totals;
        totals.errors_count = errors.len() as i64;
        self.catalog
            .complete_scan_session(session_id, status.as_str(), &totals, summary.as_deref())?;
        Ok(())
    }

    fn execute<F>(
        &self,
        root: &Path,
        project_id: i64,
        request: &ScanRequest,
        stop: &StopFlag,
        on_event: &mut F,
        errors: &mut Vec<String>,
    ) -> Result<SessionTotals>
    where
        F: FnMut(ScanEvent),
    {
        let descriptors = self.inventory(root, request.recursive, stop, on_event, errors)?;

        if request.kind == ScanKind::Validation {
            return self.validate_only(project_id, &descriptors, errors);
        }

        let cutoff = match request.kind {
            ScanKind::Incremental => match request.since {
                Some(since) => Some(since),
                None => self.last_scan_start(project_id)?,
            },
            _ => None,
        };
        let selected: Vec<&FileDescriptor> = match cutoff {
            Some(cutoff) => descriptors
                .iter()
                .filter(|d| d.changed_since(cutoff))
                .collect(),
            None => descriptors.iter().collect(),
        };

        let mut totals = SessionTotals {
            files_scanned: descriptors.len() as i64,
            ..SessionTotals::default()
        };
        self.reconcile(project_id, root, &selected, &mut totals, on_event, errors)?;

        // Removal detection needs the complete picture, so only full
        // scans do it.
        if request.kind == ScanKind::Full {
            totals.files_removed = self.detect_removals(project_id, &descriptors, on_event)? as i64;
        }

        Ok(totals)
    }

    fn inventory<F>(
        &self,
        root: &Path,
        recursive: bool,
        stop: &StopFlag,
        on_event: &mut F,
        errors: &mut Vec<String>,
    ) -> Result<Vec<FileDescriptor>>
    where
        F: FnMut(ScanEvent),
    {
        let filter = self.config.scan_filter();
        let workers = self.config.effective_workers();
        let compute_hashes = self.config.scanner.compute_hashes;

        let mut relay = |progress: ScanProgress| match progress {
            ScanProgress::Counting | ScanProgress::Stopped { .. } => {}
            ScanProgress::Counted { total } => on_event(ScanEvent::Counted { total }),
            ScanProgress::FileScanned { scanned, total } => {
                on_event(ScanEvent::FileScanned { scanned, total })
            }
            ScanProgress::FileSkipped { path, reason } => on_event(ScanEvent::FileSkipped {
                path,
                reason: format!("{reason:?}"),
            }),
            // Oversize files are a policy violation worth surfacing, not
            // a quiet skip.
            ScanProgress::FileTooLarge { path, size } => {
                let message = format!("exceeds size limit ({size} bytes)");
                errors.push(format!("{}: {}", path.display(), message));
                on_event(ScanEvent::FileError { path, message });
            }
            ScanProgress::EntryError { path, message } => {
                errors.push(format!("{}: {}", path.display(), message));
                on_event(ScanEvent::FileError { path, message });
            }
        };

        let descriptors = match self.config.scanner.strategy {
            ScanStrategy::Threaded => ThreadedScanner::new(filter, workers)
                .with_hashing(compute_hashes)
                .with_recursion(recursive)
                .scan(root, stop, &mut relay)?,
            ScanStrategy::Concurrent => {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(workers)
                    .enable_all()
                    .build()
                    .map_err(Error::Io)?;
                runtime.block_on(
                    ConcurrentScanner::new(filter, workers)
                        .with_hashing(compute_hashes)
                        .with_recursion(recursive)
                        .scan(root, stop, &mut relay),
                )?
            }
        };
        Ok(descriptors)
    }

    /// Write the inventory through in transactions of batch_size files.
    fn reconcile<F>(
        &self,
        project_id: i64,
        root: &Path,
        selected: &[&FileDescriptor],
        totals: &mut SessionTotals,
        on_event: &mut F,
        errors: &mut Vec<String>,
    ) -> Result<()>
    where
        F: FnMut(ScanEvent),
    {
        let batch_size = self.config.effective_batch_size();
        let batches = selected.len().div_ceil(batch_size).max(1);
        on_event(ScanEvent::Reconciling {
            files: selected.len(),
            batches,
        });

        let mut directory_ids: HashMap<String, i64> = HashMap::new();
        for (index, batch) in selected.chunks(batch_size).enumerate() {
            let mut conn = self.catalog.connection()?;
            let tx = conn
                .transaction()
                .map_err(aecscan_catalog::Error::from)?;

            for descriptor in batch {
                let file_path = descriptor.path.to_string_lossy().into_owned();
                let parent = descriptor.parent.to_string_lossy().into_owned();

                let directory_id = match directory_ids.get(&parent) {
                    Some(id) => *id,
                    None => {
                        let grandparent = descriptor
                            .parent
                            .parent()
                            .filter(|p| p.starts_with(root))
                            .map(|p| p.to_string_lossy().into_owned());
                        let id = directory::insert_or_update(
                            &tx,
                            project_id,
                            &parent,
                            grandparent.as_deref(),
                            descriptor.depth as i64,
                        )?;
                        directory_ids.insert(parent.clone(), id);
                        id
                    }
                };

                let upsert = file::insert_or_update(
                    &tx,
                    &FileObservation {
                        project_id,
                        directory_id: Some(directory_id),
                        file_path: &file_path,
                        file_name: &descriptor.name,
                        extension: &descriptor.extension,
                        size_bytes: descriptor.size as i64,
                        created_time: descriptor.created.map(|t| t.to_rfc3339()),
                        modified_time: descriptor.modified.map(|t| t.to_rfc3339()),
                        accessed_time: descriptor.accessed.map(|t| t.to_rfc3339()),
                        content_hash: descriptor.content_hash.as_deref(),
                    },
                );
                let file_id = match upsert {
                    Ok(FileUpsert::Added(id)) => {
                        totals.files_added += 1;
                        id
                    }
                    Ok(FileUpsert::Updated(id)) => {
                        totals.files_updated += 1;
                        id
                    }
                    Err(err) => {
                        errors.push(format!("{}: {}", file_path, err));
                        continue;
                    }
                };

                let naming = aecscan_naming::parse(&descriptor.name);
                metadata::replace_aec(&tx, file_id, &aec_record(&naming))?;
            }

            tx.commit().map_err(aecscan_catalog::Error::from)?;
            on_event(ScanEvent::BatchCommitted {
                batch: index + 1,
                batches,
            });
        }
        Ok(())
    }

    /// A catalogued file counts as removed only when this scan did not
    /// see it AND it is gone from disk; an excluded or unreadable file
    /// must not be deactivated.
    fn detect_removals<F>(
        &self,
        project_id: i64,
        descriptors: &[FileDescriptor],
        on_event: &mut F,
    ) -> Result<usize>
    where
        F: FnMut(ScanEvent),
    {
        let seen: HashSet<String> = descriptors
            .iter()
            .map(|d| d.path.to_string_lossy().into_owned())
            .collect();
        let candidates: Vec<String> = self
            .catalog
            .active_file_paths(project_id)?
            .into_iter()
            .filter(|path| !seen.contains(path) && !Path::new(path).exists())
            .collect();
        on_event(ScanEvent::RemovalCheck {
            candidates: candidates.len(),
        });

        let removed = if candidates.is_empty() {
            0
        } else {
            self.catalog.mark_files_inactive(&candidates)?
        };
        on_event(ScanEvent::FilesRemoved { count: removed });
        Ok(removed)
    }

    /// Validation scans compare disk and catalog without writing to the
    /// file tables; discrepancies are reported as errors.
    fn validate_only(
        &self,
        project_id: i64,
        descriptors: &[FileDescriptor],
        errors: &mut Vec<String>,
    ) -> Result<SessionTotals> {
        let active: HashSet<String> = self
            .catalog
            .active_file_paths(project_id)?
            .into_iter()
            .collect();
        let on_disk: HashSet<String> = descriptors
            .iter()
            .map(|d| d.path.to_string_lossy().into_owned())
            .collect();

        for path in active.difference(&on_disk) {
            if !Path::new(path).exists() {
                errors.push(format!("catalogued but missing from disk: {path}"));
            }
        }
        for path in on_disk.difference(&active) {
            errors.push(format!("on disk but not catalogued: {path}"));
        }

        Ok(SessionTotals {
            files_scanned: descriptors.len() as i64,
            ..SessionTotals::default()
        })
    }

    /// Start time of the project's most recent completed scan, used as
    /// the default incremental cutoff.
    fn last_scan_start(&self, project_id: i64) -> Result<Option<DateTime<Utc>>> {
        let sessions = self.catalog.list_scan_sessions(Some(project_id), 50)?;
        for session in sessions {
            let completed = session.status == ScanStatus::Completed.as_str()
                || session.status == ScanStatus::CompletedWithErrors.as_str();
            if completed && session.scan_kind != ScanKind::Validation.as_str() {
                if let Ok(ts) = DateTime::parse_from_rfc3339(&session.started_at) {
                    return Ok(Some(ts.with_timezone(&Utc)));
                }
            }
        }
        Ok(None)
    }
}

fn aec_record(naming: &NamingResult) -> AecMetadataRecord {
    AecMetadataRecord {
        is_standard: naming.is_standard,
        naming_grammar: naming.grammar.map(|g| g.as_str().to_owned()),
        project_number: naming.project_number.clone(),
        phase_code: naming.phase_code.clone(),
        discipline_code: naming.discipline_code.clone(),
        document_type: naming.document_type.clone(),
        sheet_number: naming.sheet_number.clone(),
        revision: naming.revision.clone(),
        revision_kind: naming.revision_kind.map(|k| k.as_str().to_owned()),
        issue_code: naming.issue_code.clone(),
        date_issued: naming.date_issued.clone(),
        csi_division: naming.csi_division.clone(),
        csi_section: naming.csi_section.clone(),
        keywords: if naming.keywords.is_empty() {
            None
        } else {
            serde_json::to_string(&naming.keywords).ok()
        },
        special_identifiers: if naming.special_identifiers.is_empty() {
            None
        } else {
            serde_json::to_string(&naming.special_identifiers).ok()
        },
    }
}
