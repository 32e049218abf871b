//! Parallel load orchestration
//!
//! Workers pull whole files from a shared queue; no file is split across
//! workers. Each worker owns its own pipeline and sink instances, so the
//! only shared state is the queue and the merged load summary. Cancellation
//! is coarse: it is checked between files, and a worker finishes or fails
//! its current file wholesale.
//!
//! ## Architecture
//!
//! - [`discovery`] - Recursive input discovery and load-set purging
//! - [`pipeline`] - Per-file parse/transform/sink pipeline
//! - `LoadSummary` - Merged per-run statistics

pub mod discovery;
pub mod pipeline;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use discovery::{build_work_queue, discover_files};
pub use pipeline::{FileOutcome, FilePipeline};

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use indicatif::ProgressBar;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::app::models::DataFileInfo;
use crate::app::services::line_parser::ParseStats;
use crate::app::services::sink_writer::{
    CsvStagingSink, DocumentSink, JsonlDocumentSink, TableSink,
};
use crate::config::Config;
use crate::constants::{DEQUEUE_RETRY_DELAY_MS, MAX_DEQUEUE_RETRIES};
use crate::{Error, Result};

/// Merged statistics for one load run
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    /// Files loaded without a file-level failure
    pub files_processed: usize,

    /// Files that failed wholesale
    pub files_failed: usize,

    /// Canonical records written to the sinks
    pub records_loaded: usize,

    /// Records dropped by the line-type load filters
    pub records_filtered: usize,

    /// Records dropped by failed canonical derivation
    pub records_failed: usize,

    /// Aggregate documents written
    pub documents_written: usize,

    /// Object records written
    pub object_records: usize,

    /// Header snapshot disagreements observed during aggregation
    pub header_disagreements: usize,

    /// Merged line-level parsing statistics
    pub stats: ParseStats,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl LoadSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's outcome into the run summary
    pub fn absorb(&mut self, outcome: &FileOutcome) {
        self.files_processed += 1;
        self.records_loaded += outcome.records_loaded;
        self.records_filtered += outcome.records_filtered;
        self.records_failed += outcome.records_failed;
        self.documents_written += outcome.documents_written;
        self.object_records += outcome.object_records;
        self.header_disagreements += outcome.header_disagreements;
        self.stats.merge(&outcome.stats);
    }

    /// Files loaded per second over the run
    pub fn files_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.files_processed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Run the parallel load over a discovered load set
///
/// An empty load set is the one fatal condition in this subsystem; every
/// file-, line-, and record-level failure is logged and absorbed into the
/// summary instead.
pub async fn run_load(
    config: &Config,
    files: Vec<DataFileInfo>,
    cancellation_token: CancellationToken,
    progress: Option<ProgressBar>,
) -> Result<LoadSummary> {
    if files.is_empty() {
        return Err(Error::configuration(
            "No loadable input files were found".to_string(),
        ));
    }

    let start = std::time::Instant::now();
    let worker_count = config
        .performance
        .parallel_workers
        .min(files.len())
        .max(1);

    info!(
        "Loading {} files with {} workers",
        files.len(),
        worker_count
    );

    let queue = Arc::new(Mutex::new(build_work_queue(files)));
    let summary = Arc::new(Mutex::new(LoadSummary::new()));

    let mut workers = JoinSet::new();
    for worker_id in 0..worker_count {
        workers.spawn(worker_loop(
            worker_id,
            config.clone(),
            queue.clone(),
            summary.clone(),
            cancellation_token.clone(),
            progress.clone(),
        ));
    }

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Worker failed: {}", e),
            Err(e) => error!("Worker panicked: {}", e),
        }
    }

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    if cancellation_token.is_cancelled() {
        return Err(Error::processing_interrupted(
            "Load cancelled before completion".to_string(),
        ));
    }

    let mut merged = summary.lock().await.clone();
    merged.duration = start.elapsed();

    info!(
        "Load complete: {} files in {:.2}s ({} records, {} documents, {} failures)",
        merged.files_processed,
        merged.duration.as_secs_f64(),
        merged.records_loaded,
        merged.documents_written,
        merged.files_failed
    );

    Ok(merged)
}

/// One worker: dequeue files until the queue stays empty or cancellation is
/// requested, then flush the worker's sinks
async fn worker_loop(
    worker_id: usize,
    config: Config,
    queue: Arc<Mutex<VecDeque<DataFileInfo>>>,
    summary: Arc<Mutex<LoadSummary>>,
    cancellation_token: CancellationToken,
    progress: Option<ProgressBar>,
) -> Result<()> {
    let mut pipeline = FilePipeline::new(config.flags.clone());

    let mut table_sink = if config.sink_mode.writes_tables() {
        Some(CsvStagingSink::new(&config.staging_dir, worker_id))
    } else {
        None
    };
    let mut document_sink = if config.sink_mode.writes_documents() {
        Some(JsonlDocumentSink::new(&config.document_dir, worker_id)?)
    } else {
        None
    };

    let mut retries = 0;
    loop {
        if cancellation_token.is_cancelled() {
            warn!("Worker {} stopping: cancellation requested", worker_id);
            break;
        }

        let next = queue.lock().await.pop_front();
        let Some(file) = next else {
            if retries == MAX_DEQUEUE_RETRIES {
                debug!("Worker {} exiting: work queue empty", worker_id);
                break;
            }
            retries += 1;
            tokio::time::sleep(Duration::from_millis(DEQUEUE_RETRY_DELAY_MS)).await;
            continue;
        };
        retries = 0;

        debug!("Worker {} processing {}", worker_id, file.path.display());

        let result = pipeline
            .process_file(
                &file,
                table_sink.as_mut().map(|s| s as &mut dyn TableSink),
                document_sink.as_mut().map(|s| s as &mut dyn DocumentSink),
            )
            .await;

        {
            let mut summary = summary.lock().await;
            match result {
                Ok(outcome) => summary.absorb(&outcome),
                Err(e) => {
                    summary.files_failed += 1;
                    warn!("Failed to load '{}': {}", file.path.display(), e);
                }
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
            pb.set_message(file.file_name());
        }
    }

    if let Some(sink) = table_sink.as_mut() {
        sink.flush()?;
    }
    if let Some(sink) = document_sink.as_mut() {
        sink.flush()?;
    }

    Ok(())
}
