use crate::geo::GeoPoint;
use crate::journey::Journey;

/// One marker's display payload: where, which photo, and a formatted
/// capture date for the popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedPoint {
    pub point: GeoPoint,
    pub source_ref: String,
    pub caption: String,
}

/// Rendering surface contract. The map widget itself lives outside the
/// core; it receives the ordered point set and a fit-view command and is
/// never manipulated beyond that.
pub trait MapRenderer {
    fn plot(&mut self, points: &[PlottedPoint]) -> anyhow::Result<()>;
    fn fit_view(&mut self, points: &[GeoPoint]) -> anyhow::Result<()>;
}

/// Push a journey onto a renderer: every point in chronological order,
/// then a fit-view over the whole set.
pub fn plot_journey(journey: &Journey, renderer: &mut dyn MapRenderer) -> anyhow::Result<()> {
    let plotted: Vec<PlottedPoint> = journey
        .points()
        .iter()
        .map(|p| PlottedPoint {
            point: p.point,
            source_ref: p.source_ref.clone(),
            caption: p.captured_at.format("%b %-d, %Y").to_string(),
        })
        .collect();

    renderer.plot(&plotted)?;
    renderer.fit_view(&journey.path())
}
