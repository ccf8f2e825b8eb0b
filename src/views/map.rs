use serde::Serialize;

use crate::views::filter::Selection;
use crate::views::math::mean;
use crate::views::types::GeoAggregate;

const UTILITY_ZOOM: u8 = 8;
const OVERVIEW_ZOOM: u8 = 3;
const OVERVIEW_COLOR: [u8; 3] = [255, 255, 0];

/// Viewport and marker styling for the enrollment map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// Mean `(latitude, longitude)` of the plotted rows; `None` when empty.
    pub center: Option<(f64, f64)>,
    pub zoom: u8,
    pub fill_color: [u8; 3],
}

impl MapView {
    /// Builds the viewport for already-filtered `rows`.
    pub fn for_rows(rows: &[GeoAggregate], selection: Selection) -> Self {
        let lats: Vec<f64> = rows.iter().map(|r| r.latitude).collect();
        let lons: Vec<f64> = rows.iter().map(|r| r.longitude).collect();
        let center = mean(&lats).zip(mean(&lons));

        let (zoom, fill_color) = match selection.utility() {
            Some(utility) => (UTILITY_ZOOM, utility.fill_color()),
            None => (OVERVIEW_ZOOM, OVERVIEW_COLOR),
        };

        MapView {
            center,
            zoom,
            fill_color,
        }
    }
}
