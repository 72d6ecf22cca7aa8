use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Human-readable encoding: "Jun 1, 2024 at 10:00 AM".
static HUMAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<mon>[A-Za-z]{3,9}) (?P<day>\d{1,2}), (?P<year>\d{4}) at (?P<hour>\d{1,2}):(?P<min>\d{2}) ?(?P<ap>[AaPp][Mm])$",
    )
    .unwrap()
});

/// Parse one textual timestamp. Accepts RFC 3339 (offset honored), the
/// human-readable "Mon D, YYYY at H:MM AM/PM" form, and EXIF-style machine
/// formats with any of `:-/\.` as separators. Encodings without an offset
/// are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_human(s) {
        return Some(dt);
    }
    parse_machine(s)
}

fn parse_human(s: &str) -> Option<DateTime<Utc>> {
    let caps = HUMAN_RE.captures(s)?;
    let normalized = format!(
        "{} {} {} {}:{} {}",
        &caps["mon"],
        &caps["day"],
        &caps["year"],
        &caps["hour"],
        &caps["min"],
        caps["ap"].to_ascii_uppercase(),
    );
    // %B accepts both full and abbreviated month names when parsing.
    NaiveDateTime::parse_from_str(&normalized, "%B %d %Y %I:%M %p")
        .ok()
        .map(|dt| dt.and_utc())
}

/// EXIF datetimes are `YYYY:MM:DD HH:MM:SS` but appear in the wild with
/// mixed separators; normalize them all to `:` before parsing.
fn parse_machine(s: &str) -> Option<DateTime<Utc>> {
    let cleaned = s
        .replace('-', ":")
        .replace('/', ":")
        .replace('\\', ":")
        .replace('.', ":")
        .replace('T', " ");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    // Date-only fields get midnight.
    let date_part = cleaned.split(' ').next()?;
    NaiveDate::parse_from_str(date_part, "%Y:%m:%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_exif_machine_format() {
        let dt = parse_timestamp("2024:06:01 10:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_mixed_separators() {
        let dt = parse_timestamp("2024-06-01 10:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_offset_converted_to_utc() {
        let dt = parse_timestamp("2024-06-01T12:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());

        let dt = parse_timestamp("2024-06-01T10:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_human_readable_format() {
        let dt = parse_timestamp("Jun 1, 2024 at 10:00 AM").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());

        let dt = parse_timestamp("Mar 15, 2024 at 1:05 PM").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 13, 5, 0).unwrap());

        let dt = parse_timestamp("December 31, 2024 at 11:59 PM").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap());
    }

    #[test]
    fn test_date_only() {
        let dt = parse_timestamp("2023:11:20").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 11, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_unparseable() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("2024:13:40 99:99:99").is_none());
    }
}
