use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::builder::{build_point, AcceptancePolicy, BuildOutcome, SkipReason};
use crate::geo::GeoPoint;
use crate::metadata::RawMetadataRecord;

/// One accepted photo location. Immutable once constructed; owned by the
/// journey it was accepted into.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyPoint {
    pub point: GeoPoint,
    pub captured_at: DateTime<Utc>,
    /// Opaque reference to the originating photo (path or filename).
    pub source_ref: String,
}

/// The chronologically ordered path of one upload batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Journey {
    points: Vec<JourneyPoint>,
}

impl Journey {
    /// Points sorted ascending by capture time; equal timestamps keep their
    /// batch submission order.
    pub fn points(&self) -> &[JourneyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The ordered path as bare coordinates.
    pub fn path(&self) -> Vec<GeoPoint> {
        self.points.iter().map(|p| p.point).collect()
    }

    fn from_unsorted(mut points: Vec<JourneyPoint>) -> Self {
        // Vec::sort_by_key is stable, which is what keeps same-instant
        // captures in submission order.
        points.sort_by_key(|p| p.captured_at);
        Self { points }
    }
}

/// One batch entry: a photo's extracted metadata plus its fallback
/// modification time and an opaque source reference.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub record: RawMetadataRecord,
    pub modified: DateTime<Utc>,
    pub source_ref: String,
}

/// Per-batch accounting, observable by the caller for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: u64,
    pub accepted: u64,
    pub skipped_no_location: u64,
    pub skipped_year: u64,
    pub failed: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl BatchReport {
    pub fn skipped(&self) -> u64 {
        self.skipped_no_location + self.skipped_year + self.failed
    }

    /// The batch ran to completion but produced no points; a user-visible
    /// outcome distinct from a hard failure.
    pub fn is_empty_result(&self) -> bool {
        self.total > 0 && self.accepted == 0
    }
}

/// Process a batch of pre-extracted records into a sorted journey. Items
/// are independent: no entry's acceptance depends on another's.
pub fn assemble(items: Vec<BatchItem>, policy: &AcceptancePolicy) -> (Journey, BatchReport) {
    let mut report = BatchReport {
        total: items.len() as u64,
        ..Default::default()
    };
    let mut points = Vec::new();

    for item in items {
        match build_point(&item.record, item.modified, &item.source_ref, policy) {
            BuildOutcome::Accepted(point) => {
                report.accepted += 1;
                points.push(point);
            }
            BuildOutcome::Skipped(SkipReason::NoLocation) => report.skipped_no_location += 1,
            BuildOutcome::Skipped(SkipReason::OutsideYears) => report.skipped_year += 1,
        }
    }

    (Journey::from_unsorted(points), report)
}

/// Ticket identifying one started batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket(u64);

/// Holds the current journey and serializes batch replacement. A new upload
/// fully supersedes the old journey; a batch started earlier than the latest
/// one can no longer commit, so a stale batch finishing late never
/// overwrites a newer batch's result. Readers only ever observe a fully
/// committed journey.
#[derive(Debug, Default)]
pub struct JourneyStore {
    latest_started: AtomicU64,
    current: Mutex<Option<Journey>>,
}

impl JourneyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the start of a new batch, invalidating all earlier tickets.
    pub fn begin(&self) -> BatchTicket {
        BatchTicket(self.latest_started.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the journey wholesale. Returns false (and discards the
    /// journey) when a newer batch has started since this ticket was issued.
    pub fn commit(&self, ticket: BatchTicket, journey: Journey) -> bool {
        if ticket.0 != self.latest_started.load(Ordering::SeqCst) {
            return false;
        }
        *self.current.lock().unwrap() = Some(journey);
        true
    }

    pub fn snapshot(&self) -> Option<Journey> {
        self.current.lock().unwrap().clone()
    }
}
