use serde::{Deserialize, Serialize};

const LAT_MAX: f64 = 90.0;
const LNG_MAX: f64 = 180.0;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point if both coordinates are finite and in range
    /// (`|lat| <= 90`, `|lng| <= 180`). Out-of-range pairs are rejected,
    /// never clamped.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        (latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= LAT_MAX
            && longitude.abs() <= LNG_MAX)
            .then_some(Self {
                latitude,
                longitude,
            })
    }
}

/// Convert a degrees/minutes/seconds triple plus hemisphere reference to
/// decimal degrees: `deg + min/60 + sec/3600`, negated for `S`/`W`.
/// Anything but exactly three components or an unknown reference is `None`.
pub fn dms_to_decimal(triple: &[f64], reference: char) -> Option<f64> {
    if triple.len() != 3 {
        return None;
    }
    let value = triple[0] + triple[1] / 60.0 + triple[2] / 3600.0;
    match reference.to_ascii_uppercase() {
        'N' | 'E' => Some(value),
        'S' | 'W' => Some(-value),
        _ => None,
    }
}
