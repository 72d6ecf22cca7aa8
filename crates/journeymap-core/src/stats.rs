use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::geo::GeoPoint;
use crate::journey::Journey;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Derived trip statistics; always a pure function of the current journey,
/// never stored independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyStatistics {
    pub total_photos: u64,
    pub total_points: u64,
    pub total_distance_km: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Ceiling of the start-to-end span in days; 0 with fewer than two points.
    pub duration_days: i64,
    /// Month-name bucket with the highest point count, if any.
    pub most_active_period: Option<(String, u64)>,
}

impl JourneyStatistics {
    /// Whole-kilometer figure for display.
    pub fn distance_display_km(&self) -> i64 {
        self.total_distance_km.round() as i64
    }

    /// Shareable one-line summary of the trip.
    pub fn share_text(&self) -> String {
        let year = self
            .start_date
            .map(|d| format!("{} ", d.year()))
            .unwrap_or_default();
        format!(
            "My {}Journey: {} photos from {} locations, {} km traveled!",
            year,
            self.total_photos,
            self.total_points,
            self.distance_display_km(),
        )
    }
}

/// Great-circle distance in meters between two points (haversine,
/// spherical Earth of radius 6,371,000 m).
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Compute statistics for a journey. Pure; recomputable at any time.
pub fn compute(journey: &Journey) -> JourneyStatistics {
    let points = journey.points();
    let count = points.len() as u64;

    let total_distance_km = points
        .windows(2)
        .map(|pair| haversine_m(pair[0].point, pair[1].point))
        .sum::<f64>()
        / 1000.0;

    // True min/max; the slice being sorted is not assumed here.
    let start_date = points.iter().map(|p| p.captured_at).min();
    let end_date = points.iter().map(|p| p.captured_at).max();

    let duration_days = match (start_date, end_date) {
        (Some(start), Some(end)) if points.len() > 1 => {
            let seconds = (end - start).num_seconds();
            (seconds as f64 / SECONDS_PER_DAY).ceil() as i64
        }
        _ => 0,
    };

    JourneyStatistics {
        total_photos: count,
        total_points: count,
        total_distance_km,
        start_date,
        end_date,
        duration_days,
        most_active_period: most_active_period(journey),
    }
}

/// Bucket points by calendar month name, in chronological bucket-creation
/// order. The first bucket holding the maximum count wins ties, matching a
/// left-to-right reduce over the accepted points.
fn most_active_period(journey: &Journey) -> Option<(String, u64)> {
    let mut buckets: Vec<(String, u64)> = Vec::new();
    for point in journey.points() {
        let label = point.captured_at.format("%B").to_string();
        match buckets.iter_mut().find(|(name, _)| *name == label) {
            Some((_, count)) => *count += 1,
            None => buckets.push((label, 1)),
        }
    }

    let mut best: Option<(String, u64)> = None;
    for (label, count) in buckets {
        match &best {
            Some((_, best_count)) if count <= *best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AcceptancePolicy;
    use crate::journey::{assemble, BatchItem};
    use crate::metadata::RawMetadataRecord;
    use chrono::TimeZone;
    use serde_json::json;

    fn journey_of(entries: &[(f64, f64, &str)]) -> Journey {
        let items = entries
            .iter()
            .enumerate()
            .map(|(i, (lat, lng, date))| BatchItem {
                record: RawMetadataRecord::from_value(json!({
                    "latitude": lat,
                    "longitude": lng,
                    "DateTimeOriginal": date,
                })),
                modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                source_ref: format!("photo{}.jpg", i),
            })
            .collect();
        let (journey, _) = assemble(items, &AcceptancePolicy::any());
        journey
    }

    #[test]
    fn test_one_degree_of_longitude_on_the_equator() {
        let journey = journey_of(&[
            (0.0, 0.0, "2024:01:01 00:00:00"),
            (0.0, 1.0, "2024:01:02 00:00:00"),
        ]);
        let stats = compute(&journey);
        assert!((stats.total_distance_km - 111.19).abs() < 1.0);
        assert_eq!(stats.distance_display_km(), 111);
    }

    #[test]
    fn test_single_point_distance_zero() {
        let journey = journey_of(&[(48.85, 2.35, "2024:01:01 00:00:00")]);
        let stats = compute(&journey);
        assert_eq!(stats.total_distance_km, 0.0);
        assert_eq!(stats.duration_days, 0);
        assert_eq!(stats.total_photos, 1);
    }

    #[test]
    fn test_empty_journey() {
        let stats = compute(&Journey::default());
        assert_eq!(stats.total_points, 0);
        assert_eq!(stats.total_distance_km, 0.0);
        assert_eq!(stats.start_date, None);
        assert_eq!(stats.end_date, None);
        assert_eq!(stats.most_active_period, None);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(48.8566, 2.3522).unwrap();
        let b = GeoPoint::new(51.5074, -0.1278).unwrap();
        assert!((haversine_m(a, b) - haversine_m(b, a)).abs() < 1e-6);
        assert_eq!(haversine_m(a, a), 0.0);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let journey = journey_of(&[
            (0.0, 0.0, "2024:02:01 08:00:00"),
            (10.0, 10.0, "2024:03:05 09:00:00"),
            (20.0, 20.0, "2024:03:20 10:00:00"),
        ]);
        assert_eq!(compute(&journey), compute(&journey));
    }

    #[test]
    fn test_date_range_and_duration_ceiling() {
        let journey = journey_of(&[
            (0.0, 0.0, "2024:03:01 08:00:00"),
            (1.0, 1.0, "2024:03:03 09:00:00"),
        ]);
        let stats = compute(&journey);
        assert_eq!(
            stats.start_date.unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(
            stats.end_date.unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap()
        );
        // 2 days and 1 hour rounds up to 3.
        assert_eq!(stats.duration_days, 3);
    }

    #[test]
    fn test_same_month_activity() {
        let journey = journey_of(&[
            (0.0, 0.0, "2024:03:01 08:00:00"),
            (1.0, 1.0, "2024:03:10 08:00:00"),
            (2.0, 2.0, "2024:03:20 08:00:00"),
        ]);
        let stats = compute(&journey);
        assert_eq!(
            stats.most_active_period,
            Some(("March".to_string(), 3))
        );
    }

    #[test]
    fn test_activity_tie_goes_to_earliest_bucket() {
        let journey = journey_of(&[
            (0.0, 0.0, "2024:01:05 08:00:00"),
            (1.0, 1.0, "2024:02:05 08:00:00"),
            (2.0, 2.0, "2024:01:20 08:00:00"),
            (3.0, 3.0, "2024:02:20 08:00:00"),
        ]);
        let stats = compute(&journey);
        assert_eq!(
            stats.most_active_period,
            Some(("January".to_string(), 2))
        );
    }

    #[test]
    fn test_share_text() {
        let journey = journey_of(&[
            (0.0, 0.0, "2024:01:01 00:00:00"),
            (0.0, 1.0, "2024:01:02 00:00:00"),
        ]);
        let stats = compute(&journey);
        assert_eq!(
            stats.share_text(),
            "My 2024 Journey: 2 photos from 2 locations, 111 km traveled!"
        );
    }
}
