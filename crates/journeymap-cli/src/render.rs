use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde_json::{json, Value};

use journeymap_core::plot::{MapRenderer, PlottedPoint};
use journeymap_core::GeoPoint;

/// File-backed map renderer: collects markers and the journey path into a
/// GeoJSON FeatureCollection a web map can load directly.
pub struct GeoJsonRenderer {
    path: PathBuf,
    features: Vec<Value>,
    bbox: Option<[f64; 4]>,
}

impl GeoJsonRenderer {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            features: Vec::new(),
            bbox: None,
        }
    }

    /// Write the collected FeatureCollection to disk.
    pub fn finish(self) -> anyhow::Result<()> {
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": self.features,
        });
        if let Some(bbox) = self.bbox {
            collection["bbox"] = json!(bbox);
        }

        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &collection)?;
        Ok(())
    }
}

impl MapRenderer for GeoJsonRenderer {
    fn plot(&mut self, points: &[PlottedPoint]) -> anyhow::Result<()> {
        for p in points {
            self.features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [p.point.longitude, p.point.latitude],
                },
                "properties": {
                    "source": p.source_ref,
                    "caption": p.caption,
                },
            }));
        }
        Ok(())
    }

    fn fit_view(&mut self, points: &[GeoPoint]) -> anyhow::Result<()> {
        if points.len() > 1 {
            let coordinates: Vec<[f64; 2]> = points
                .iter()
                .map(|p| [p.longitude, p.latitude])
                .collect();
            self.features.push(json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coordinates },
                "properties": { "role": "journey-path" },
            }));
        }

        // A bbox member is how a static file expresses "fit view here".
        self.bbox = points.iter().fold(None, |acc, p| {
            let [mut min_lng, mut min_lat, mut max_lng, mut max_lat] =
                acc.unwrap_or([p.longitude, p.latitude, p.longitude, p.latitude]);
            min_lng = min_lng.min(p.longitude);
            min_lat = min_lat.min(p.latitude);
            max_lng = max_lng.max(p.longitude);
            max_lat = max_lat.max(p.latitude);
            Some([min_lng, min_lat, max_lng, max_lat])
        });
        Ok(())
    }
}
