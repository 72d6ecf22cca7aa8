pub mod parse;

use chrono::{DateTime, Utc};

use crate::metadata::RawMetadataRecord;

/// Date fields in preference order: original capture time first, the
/// digitization time last.
const DATE_FIELDS: &[&str] = &[
    "DateTimeOriginal",
    "DateTime",
    "CreateDate",
    "DateTimeDigitized",
];

/// Resolve the capture time for one photo. Total: an unparseable or missing
/// field is skipped, and when no field yields a timestamp the file's
/// last-modified time is used.
pub fn resolve_capture_time(
    record: &RawMetadataRecord,
    fallback_modified: DateTime<Utc>,
) -> DateTime<Utc> {
    DATE_FIELDS
        .iter()
        .filter_map(|field| record.text(field))
        .find_map(parse::parse_timestamp)
        .unwrap_or(fallback_modified)
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
    fn test_original_capture_preferred() {
        let record = RawMetadataRecord::from_value(json!({
            "DateTimeOriginal": "2024:06:01 10:00:00",
            "DateTime": "2024:07:01 10:00:00",
            "CreateDate": "2024:08:01 10:00:00",
        }));
        let dt = resolve_capture_time(&record, fallback());
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_unparseable_field_skipped() {
        let record = RawMetadataRecord::from_value(json!({
            "DateTimeOriginal": "garbage",
            "DateTime": "2024:07:01 10:00:00",
        }));
        let dt = resolve_capture_time(&record, fallback());
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_fallback_to_modified_time() {
        let record = RawMetadataRecord::from_value(json!({ "latitude": 1.0 }));
        assert_eq!(resolve_capture_time(&record, fallback()), fallback());

        let record = RawMetadataRecord::from_value(json!({ "DateTime": "???" }));
        assert_eq!(resolve_capture_time(&record, fallback()), fallback());
    }
}
