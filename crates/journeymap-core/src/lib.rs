pub mod builder;
pub mod coords;
pub mod date;
pub mod exif;
pub mod geo;
pub mod ingest;
pub mod journey;
pub mod metadata;
pub mod plot;
pub mod stats;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use crate::builder::{AcceptancePolicy, SkipReason};
pub use crate::exif::{ExifExtractor, MetadataExtractor};
pub use crate::geo::GeoPoint;
pub use crate::journey::{BatchReport, BatchTicket, Journey, JourneyPoint, JourneyStore};
pub use crate::metadata::RawMetadataRecord;
pub use crate::stats::JourneyStatistics;

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub files: Vec<PathBuf>,
    pub policy: AcceptancePolicy,
}

/// Progress sink: percent complete in [0, 100] plus a status line, invoked
/// after every batch item whether it succeeded or not.
pub type ProgressCallback = dyn Fn(f32, &str) + Send + Sync;

/// Token for cooperative cancellation of a running batch.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns Ok(()) to continue, Err if cancelled.
    pub fn check(&self) -> Result<(), CancelledError> {
        if self.is_cancelled() {
            return Err(CancelledError);
        }
        Ok(())
    }
}

/// Error indicating the batch was cancelled.
#[derive(Debug, Clone)]
pub struct CancelledError;

impl std::fmt::Display for CancelledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operation cancelled")
    }
}

impl std::error::Error for CancelledError {}

/// Result of a whole-batch run: the assembled journey plus its report.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub journey: Journey,
    pub report: BatchReport,
}

/// Run the full pipeline over a batch of photo files: extract metadata
/// sequentially (reporting progress after each item), build and filter
/// journey points, and assemble the chronologically ordered journey.
///
/// A single file's extraction failure never aborts the batch; it is
/// recorded in the report and processing continues. The only hard error is
/// cancellation. Committing the resulting journey (and discarding stale
/// batches) is the caller's job via [`JourneyStore`].
pub fn process_photos(
    extractor: &dyn MetadataExtractor,
    options: &ProcessOptions,
    cancel: Option<&CancellationToken>,
    progress: &(dyn Fn(f32, &str) + Send + Sync),
) -> anyhow::Result<ProcessOutcome> {
    let total = options.files.len();
    let mut items = Vec::with_capacity(total);
    let mut failed = 0u64;
    let mut warnings = Vec::new();

    for (index, path) in options.files.iter().enumerate() {
        if let Some(token) = cancel {
            token.check()?;
        }

        let extracted = extractor.extract(path).and_then(|record| {
            let modified = extractor.modified_time(path)?;
            Ok(journey::BatchItem {
                record,
                modified,
                source_ref: path.display().to_string(),
            })
        });
        match extracted {
            Ok(item) => items.push(item),
            Err(err) => {
                failed += 1;
                warnings.push(format!("{}: {:#}", path.display(), err));
            }
        }

        let done = index + 1;
        let percent = done as f32 / total.max(1) as f32 * 100.0;
        progress(percent, &format!("Processed {} of {}", done, total));
    }

    let (journey, mut report) = journey::assemble(items, &options.policy);
    report.total += failed;
    report.failed = failed;
    report.warnings = warnings;

    Ok(ProcessOutcome { journey, report })
}

/// Derived statistics for the current journey; see [`stats::compute`].
pub fn statistics(journey: &Journey) -> JourneyStatistics {
    stats::compute(journey)
}
