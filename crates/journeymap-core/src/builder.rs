use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Utc};

use crate::journey::JourneyPoint;
use crate::metadata::RawMetadataRecord;
use crate::{coords, date};

/// Which capture years qualify a photo for the journey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptancePolicy {
    years: Option<BTreeSet<i32>>,
}

impl AcceptancePolicy {
    /// Accept every capture year.
    pub fn any() -> Self {
        Self { years: None }
    }

    /// Accept only the given years.
    pub fn years<I: IntoIterator<Item = i32>>(years: I) -> Self {
        Self {
            years: Some(years.into_iter().collect()),
        }
    }

    /// Accept only the current UTC year.
    pub fn current_year() -> Self {
        Self::years([Utc::now().year()])
    }

    pub fn accepts(&self, captured_at: DateTime<Utc>) -> bool {
        match &self.years {
            Some(years) => years.contains(&captured_at.year()),
            None => true,
        }
    }
}

/// Why a photo did not contribute a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No usable location data in any supported representation.
    NoLocation,
    /// Capture year outside the acceptance policy.
    OutsideYears,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Accepted(JourneyPoint),
    Skipped(SkipReason),
}

/// Combine coordinate and capture-time resolution with the acceptance
/// policy. A photo without a resolvable location never reaches the time
/// resolver; the time resolver itself always succeeds.
pub fn build_point(
    record: &RawMetadataRecord,
    fallback_modified: DateTime<Utc>,
    source_ref: &str,
    policy: &AcceptancePolicy,
) -> BuildOutcome {
    let Some(point) = coords::resolve(record) else {
        return BuildOutcome::Skipped(SkipReason::NoLocation);
    };

    let captured_at = date::resolve_capture_time(record, fallback_modified);
    if !policy.accepts(captured_at) {
        return BuildOutcome::Skipped(SkipReason::OutsideYears);
    }

    BuildOutcome::Accepted(JourneyPoint {
        point,
        captured_at,
        source_ref: source_ref.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fallback() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_accepts_direct_fields_in_target_year() {
        let record = RawMetadataRecord::from_value(json!({
            "latitude": 48.8566,
            "longitude": 2.3522,
            "DateTimeOriginal": "2024-06-01T10:00:00Z",
        }));
        let policy = AcceptancePolicy::years([2024]);

        match build_point(&record, fallback(), "paris.jpg", &policy) {
            BuildOutcome::Accepted(p) => {
                assert_eq!(p.point.latitude, 48.8566);
                assert_eq!(p.captured_at.year(), 2024);
                assert_eq!(p.source_ref, "paris.jpg");
            }
            BuildOutcome::Skipped(reason) => panic!("skipped: {:?}", reason),
        }
    }

    #[test]
    fn test_rejects_without_location() {
        let record = RawMetadataRecord::from_value(json!({
            "DateTimeOriginal": "2024-06-01T10:00:00Z",
        }));
        let policy = AcceptancePolicy::years([2024]);

        assert!(matches!(
            build_point(&record, fallback(), "x.jpg", &policy),
            BuildOutcome::Skipped(SkipReason::NoLocation)
        ));
    }

    #[test]
    fn test_rejects_outside_year_set() {
        let record = RawMetadataRecord::from_value(json!({
            "latitude": 1.0,
            "longitude": 2.0,
            "DateTimeOriginal": "2019:05:01 08:00:00",
        }));
        let policy = AcceptancePolicy::years([2024]);

        assert!(matches!(
            build_point(&record, fallback(), "x.jpg", &policy),
            BuildOutcome::Skipped(SkipReason::OutsideYears)
        ));
    }

    #[test]
    fn test_any_year_policy() {
        let record = RawMetadataRecord::from_value(json!({
            "latitude": 1.0,
            "longitude": 2.0,
            "DateTimeOriginal": "1999:12:31 23:59:59",
        }));

        assert!(matches!(
            build_point(&record, fallback(), "x.jpg", &AcceptancePolicy::any()),
            BuildOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_multi_year_set() {
        let policy = AcceptancePolicy::years([2023, 2024]);
        assert!(policy.accepts(Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap()));
        assert!(policy.accepts(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        assert!(!policy.accepts(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
    }
}
