//! Upload ingestion boundary: validates photo-location submissions and
//! forwards them to a persistence backend. Requests carry either a single
//! pre-structured record or three newline-delimited parallel string fields
//! that must zip by index into one row list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date::parse::parse_timestamp;
use crate::geo::GeoPoint;

/// A validated photo-location row ready for the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRow {
    pub username: String,
    pub lat: f64,
    pub long: f64,
    pub date_taken: String,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no body provided")]
    EmptyBody,
    #[error("invalid request body: {0}")]
    MalformedBody(String),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error(
        "parallel field length mismatch: {lats} latitudes, {longs} longitudes, {dates} dates"
    )]
    LengthMismatch {
        lats: usize,
        longs: usize,
        dates: usize,
    },
    #[error("storage backend rejected the write: {0}")]
    Storage(String),
}

impl IngestError {
    /// HTTP status an endpoint wrapper should respond with: validation
    /// failures are the client's fault, storage failures are not.
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::Storage(_) => 500,
            _ => 400,
        }
    }
}

/// Persistence backend seam; the real store lives outside the core.
pub trait PhotoStore {
    fn insert(&mut self, rows: &[PhotoRow]) -> Result<(), IngestError>;
}

/// JSON response envelope for the ingestion endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl IngestResponse {
    fn rejected(error: &IngestError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Request fields arrive as strings or bare numbers depending on the client.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadPayload {
    #[serde(default, alias = "Username")]
    username: Option<FieldValue>,
    #[serde(default, alias = "Lat")]
    lat: Option<FieldValue>,
    #[serde(default, alias = "Long")]
    long: Option<FieldValue>,
    #[serde(default, alias = "Date Taken")]
    date_taken: Option<FieldValue>,
}

/// Handle one upload request body. Shape-level validation failures reject
/// the whole request with nothing inserted; row-level failures only drop
/// the offending rows.
pub fn handle_upload(body: &str, store: &mut dyn PhotoStore) -> IngestResponse {
    match process_upload(body, store) {
        Ok(response) => response,
        Err(error) => IngestResponse::rejected(&error),
    }
}

fn process_upload(body: &str, store: &mut dyn PhotoStore) -> Result<IngestResponse, IngestError> {
    if body.trim().is_empty() {
        return Err(IngestError::EmptyBody);
    }

    let payload: UploadPayload =
        serde_json::from_str(body).map_err(|e| IngestError::MalformedBody(e.to_string()))?;

    let username = field(payload.username, "username")?.into_text();
    let lat = field(payload.lat, "lat")?.into_text();
    let long = field(payload.long, "long")?.into_text();
    let date_taken = field(payload.date_taken, "date_taken")?.into_text();

    let tuples = zip_parallel(&lines(&lat), &lines(&long), &lines(&date_taken))?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for (index, (lat, long, date)) in tuples.iter().enumerate() {
        match validate_row(&username, lat, long, date) {
            Ok(row) => rows.push(row),
            Err(reason) => errors.push(format!("line {}: {}", index + 1, reason)),
        }
    }
    let failed = errors.len() as u64;

    if rows.is_empty() {
        return Ok(IngestResponse {
            success: false,
            error: Some("no valid records in request".to_string()),
            processed: Some(0),
            failed: Some(failed),
            errors: (!errors.is_empty()).then_some(errors),
            ..Default::default()
        });
    }

    store.insert(&rows)?;

    Ok(IngestResponse {
        success: true,
        message: Some("Received!".to_string()),
        processed: Some(rows.len() as u64),
        failed: Some(failed),
        errors: (!errors.is_empty()).then_some(errors),
        ..Default::default()
    })
}

fn field(value: Option<FieldValue>, name: &'static str) -> Result<FieldValue, IngestError> {
    value.ok_or(IngestError::MissingField(name))
}

fn lines(value: &str) -> Vec<&str> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Zip the three parallel fields into one row list, failing fast when the
/// splits disagree in length.
fn zip_parallel<'a>(
    lats: &[&'a str],
    longs: &[&'a str],
    dates: &[&'a str],
) -> Result<Vec<(&'a str, &'a str, &'a str)>, IngestError> {
    if lats.len() != longs.len() || lats.len() != dates.len() {
        return Err(IngestError::LengthMismatch {
            lats: lats.len(),
            longs: longs.len(),
            dates: dates.len(),
        });
    }
    Ok(lats
        .iter()
        .zip(longs)
        .zip(dates)
        .map(|((lat, long), date)| (*lat, *long, *date))
        .collect())
}

fn validate_row(username: &str, lat: &str, long: &str, date: &str) -> Result<PhotoRow, String> {
    let lat: f64 = lat.parse().map_err(|_| format!("latitude `{}` is not a number", lat))?;
    let long: f64 = long
        .parse()
        .map_err(|_| format!("longitude `{}` is not a number", long))?;
    if GeoPoint::new(lat, long).is_none() {
        return Err(format!("coordinate ({}, {}) out of range", lat, long));
    }
    if parse_timestamp(date).is_none() {
        return Err(format!("unparseable date `{}`", date));
    }
    Ok(PhotoRow {
        username: username.to_string(),
        lat,
        long,
        date_taken: date.to_string(),
    })
}
