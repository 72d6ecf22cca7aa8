use serde_json::{Map, Value};

use crate::geo::{dms_to_decimal, GeoPoint};
use crate::metadata::{number_of, RawMetadataRecord};

type Strategy = fn(&RawMetadataRecord) -> Option<GeoPoint>;

/// Resolution strategies in priority order; the first success wins.
/// Supporting a new metadata shape is a new entry here, not a new branch.
const STRATEGIES: &[Strategy] = &[direct_decimal, nested_decimal, nested_dms];

/// Resolve a photo's location from whatever coordinate representation its
/// metadata carries. All results are bounds-checked by `GeoPoint::new`;
/// out-of-range coordinates read as no location at all.
pub fn resolve(record: &RawMetadataRecord) -> Option<GeoPoint> {
    STRATEGIES.iter().find_map(|strategy| strategy(record))
}

/// Top-level decimal `latitude`/`longitude` fields.
fn direct_decimal(record: &RawMetadataRecord) -> Option<GeoPoint> {
    GeoPoint::new(record.number("latitude")?, record.number("longitude")?)
}

/// Decimal `latitude`/`longitude` inside a nested `gps` object.
fn nested_decimal(record: &RawMetadataRecord) -> Option<GeoPoint> {
    let gps = record.object("gps")?;
    GeoPoint::new(
        number_of(gps.get("latitude")?)?,
        number_of(gps.get("longitude")?)?,
    )
}

/// DMS triples plus hemisphere reference letters inside the `gps` object.
fn nested_dms(record: &RawMetadataRecord) -> Option<GeoPoint> {
    let gps = record.object("gps")?;
    let latitude = dms_coordinate(gps, "GPSLatitude", "GPSLatitudeRef")?;
    let longitude = dms_coordinate(gps, "GPSLongitude", "GPSLongitudeRef")?;
    GeoPoint::new(latitude, longitude)
}

fn dms_coordinate(gps: &Map<String, Value>, value_key: &str, ref_key: &str) -> Option<f64> {
    let triple = dms_triple(gps.get(value_key)?)?;
    let reference = reference_letter(gps.get(ref_key)?)?;
    dms_to_decimal(&triple, reference)
}

/// A DMS value must be exactly three numeric components; anything else
/// resolves to no coordinate, not an error.
fn dms_triple(value: &Value) -> Option<Vec<f64>> {
    let parts = value.as_array()?;
    if parts.len() != 3 {
        return None;
    }
    parts.iter().map(number_of).collect()
}

fn reference_letter(value: &Value) -> Option<char> {
    value.as_str()?.trim().chars().next()
}
