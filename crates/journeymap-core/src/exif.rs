use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use exif::{In, Reader, Tag};
use serde_json::{json, Map, Value};

use crate::metadata::RawMetadataRecord;

/// Collaborator contract for metadata extraction. Extraction may fail per
/// file; the batch driver catches and records those failures.
pub trait MetadataExtractor {
    fn extract(&self, path: &Path) -> anyhow::Result<RawMetadataRecord>;
    fn modified_time(&self, path: &Path) -> anyhow::Result<DateTime<Utc>>;
}

/// EXIF date tags and the record fields they populate.
const DATE_TAGS: &[(Tag, &str)] = &[
    (Tag::DateTimeOriginal, "DateTimeOriginal"),
    (Tag::DateTime, "DateTime"),
    (Tag::DateTimeDigitized, "DateTimeDigitized"),
];

/// Reads photo files with kamadak-exif and shapes the result into a
/// `RawMetadataRecord`: date tags as textual fields, GPS rationals as DMS
/// triples with their hemisphere reference letters under `gps`.
#[derive(Debug, Default)]
pub struct ExifExtractor;

impl MetadataExtractor for ExifExtractor {
    fn extract(&self, path: &Path) -> anyhow::Result<RawMetadataRecord> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let exif = Reader::new()
            .read_from_container(&mut BufReader::new(file))
            .with_context(|| format!("read EXIF from {}", path.display()))?;

        let mut record = RawMetadataRecord::new();

        for (tag, field) in DATE_TAGS {
            if let Some(f) = exif.get_field(*tag, In::PRIMARY) {
                record.insert(field, json!(f.display_value().to_string()));
            }
        }

        let mut gps = Map::new();
        let pairs = [
            (Tag::GPSLatitude, Tag::GPSLatitudeRef, "GPSLatitude", "GPSLatitudeRef"),
            (Tag::GPSLongitude, Tag::GPSLongitudeRef, "GPSLongitude", "GPSLongitudeRef"),
        ];
        for (value_tag, ref_tag, value_key, ref_key) in pairs {
            let triple = exif
                .get_field(value_tag, In::PRIMARY)
                .and_then(|f| rational_triple(&f.value));
            let reference = exif
                .get_field(ref_tag, In::PRIMARY)
                .and_then(|f| ascii_text(&f.value));
            if let (Some(triple), Some(reference)) = (triple, reference) {
                gps.insert(value_key.to_string(), json!(triple));
                gps.insert(ref_key.to_string(), json!(reference));
            }
        }
        if !gps.is_empty() {
            record.insert("gps", Value::Object(gps));
        }

        Ok(record)
    }

    fn modified_time(&self, path: &Path) -> anyhow::Result<DateTime<Utc>> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("stat {}", path.display()))?;
        Ok(DateTime::<Utc>::from(modified))
    }
}

/// GPS coordinates are stored as three rationals: degrees, minutes, seconds.
fn rational_triple(value: &exif::Value) -> Option<Vec<f64>> {
    match value {
        exif::Value::Rational(parts) if parts.len() == 3 => {
            Some(parts.iter().map(|r| r.to_f64()).collect())
        }
        _ => None,
    }
}

fn ascii_text(value: &exif::Value) -> Option<String> {
    match value {
        exif::Value::Ascii(items) => items
            .first()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}
