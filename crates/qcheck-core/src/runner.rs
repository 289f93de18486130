//! Parallel run over a work list.
//!
//! Builds the item list (raw inputs or manifest entries), spawns a fixed
//! pool of named scoped threads that drain it through a `DispatchCursor`,
//! and reports each item through a `ReportSink`. All state lives for one
//! call and is dropped after the workers join.

use std::path::{Path, PathBuf};
use std::thread;

use crate::checksum::{ChecksumReader, ReadStrategy};
use crate::dispatch::DispatchCursor;
use crate::error::{ManifestError, RunError};
use crate::manifest::{parse_manifests, ManifestEntry};
use crate::report::{Report, ReportSink, Verdict};
use crate::settings::{Mode, Settings};

/// One unit of work. Immutable once the list is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    /// Checksum mode target.
    File(PathBuf),
    /// Verify mode entry.
    Entry(ManifestEntry),
}

/// Counts by verdict; `total` is the number of items reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub ok: usize,
    pub mismatched: usize,
    pub unreadable: usize,
}

impl RunSummary {
    fn record(&mut self, verdict: Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Ok => self.ok += 1,
            Verdict::Mismatch => self.mismatched += 1,
            Verdict::Unreadable => self.unreadable += 1,
        }
    }

    fn merge(&mut self, other: RunSummary) {
        self.total += other.total;
        self.ok += other.ok;
        self.mismatched += other.mismatched;
        self.unreadable += other.unreadable;
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} items, {} ok, {} failed, {} unreadable",
            self.total, self.ok, self.mismatched, self.unreadable
        )
    }
}

/// Item list for `settings.mode`. Only manifest loading can fail.
pub fn build_work_list(settings: &Settings) -> Result<Vec<WorkItem>, ManifestError> {
    match settings.mode {
        Mode::Checksum => Ok(settings
            .input_files
            .iter()
            .cloned()
            .map(WorkItem::File)
            .collect()),
        Mode::Verify => Ok(parse_manifests(&settings.input_files)?
            .into_iter()
            .map(WorkItem::Entry)
            .collect()),
    }
}

/// Full run: build the list, then check every item.
pub fn run(settings: &Settings, sink: &dyn ReportSink) -> Result<RunSummary, RunError> {
    let items = build_work_list(settings)?;
    let reader = ChecksumReader::from_mmap_enabled(settings.use_mmap);
    tracing::info!(
        mode = ?settings.mode,
        threads = settings.worker_count(),
        items = items.len(),
        "run started"
    );
    let summary = run_items(&items, settings.worker_count(), &reader, sink)?;
    tracing::info!(%summary, "run finished");
    Ok(summary)
}

/// Check `items` on `threads` workers (at least one). Returns once all
/// workers have joined.
pub fn run_items(
    items: &[WorkItem],
    threads: usize,
    reader: &ChecksumReader,
    sink: &dyn ReportSink,
) -> Result<RunSummary, RunError> {
    let threads = threads.max(1);
    let cursor = DispatchCursor::new(items.len());

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(threads);
        for worker in 0..threads {
            let cursor = &cursor;
            let spawned = thread::Builder::new()
                .name(format!("qcheck-wkr-{worker}"))
                .spawn_scoped(s, move || worker_loop(worker, items, cursor, reader, sink));
            match spawned {
                Ok(handle) => handles.push(handle),
                // Workers already running still drain the whole list.
                Err(e) if !handles.is_empty() => {
                    tracing::warn!(worker, error = %e, "could not spawn worker; continuing");
                    break;
                }
                Err(e) => return Err(RunError::Spawn(e)),
            }
        }

        let mut summary = RunSummary::default();
        for handle in handles {
            let tally = handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            summary.merge(tally);
        }
        Ok(summary)
    })
}

fn worker_loop(
    worker: usize,
    items: &[WorkItem],
    cursor: &DispatchCursor,
    reader: &ChecksumReader,
    sink: &dyn ReportSink,
) -> RunSummary {
    let mut tally = RunSummary::default();
    while let Some(index) = cursor.claim() {
        let (report, strategy) = check_item(&items[index], reader);
        tracing::debug!(
            worker,
            index,
            path = %report.path().display(),
            ?strategy,
            verdict = ?report.verdict(),
            "item checked"
        );
        tally.record(report.verdict());
        sink.emit(&report);
    }
    tally
}

/// Checksum one item and turn the result into a report, along with the read
/// strategy used (`None` when the file could not be read). Read failures are
/// contained here.
pub fn check_item(item: &WorkItem, reader: &ChecksumReader) -> (Report, Option<ReadStrategy>) {
    match item {
        WorkItem::File(path) => match checksum_logged(reader, path) {
            Some((checksum, strategy)) => (
                Report::Computed {
                    path: path.clone(),
                    checksum,
                },
                Some(strategy),
            ),
            None => (Report::ComputeFailed { path: path.clone() }, None),
        },
        WorkItem::Entry(entry) => match checksum_logged(reader, &entry.path) {
            Some((actual, strategy)) => (
                Report::Verified {
                    path: entry.path.clone(),
                    expected: entry.expected,
                    actual,
                },
                Some(strategy),
            ),
            None => (
                Report::Unreadable {
                    path: entry.path.clone(),
                    expected: entry.expected,
                },
                None,
            ),
        },
    }
}

fn checksum_logged(reader: &ChecksumReader, path: &Path) -> Option<(u32, ReadStrategy)> {
    match reader.checksum_file(path) {
        Ok(checked) => Some(checked),
        Err(e) => {
            tracing::debug!(
                path = %e.path().display(),
                error = %e,
                kind = ?e.kind(),
                "checksum failed"
            );
            None
        }
    }
}
