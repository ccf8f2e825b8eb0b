//! One full rendering pass: every view for a single utility selection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::cache::SourceCache;
use crate::config::DataSources;
use crate::error::LoadError;
use crate::records::{ElectricityRateSample, VehicleEnrollmentSummary};
use crate::views::{
    GeoAggregate, MapView, MonthlyTable, MonthlyTrend, RateComparison, Selection, UtilityTotal,
    aggregate_geo, aggregate_monthly, filter, utility_totals,
};

/// Filtered geo rows plus the viewport to draw them in.
#[derive(Debug, Clone, Serialize)]
pub struct MapPanel {
    pub view: MapView,
    pub points: Vec<GeoAggregate>,
}

impl MapPanel {
    pub fn new(geo: &[GeoAggregate], selection: Selection) -> Self {
        let points = filter(geo, selection);
        let view = MapView::for_rows(&points, selection);
        Self { view, points }
    }
}

/// Everything a front end needs to draw the enrollment page.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub selection: Selection,
    pub selection_query: String,
    pub clean_enrollments: usize,
    pub totals: Vec<UtilityTotal>,
    pub map: MapPanel,
    pub monthly: Vec<MonthlyTrend>,
    pub monthly_table: MonthlyTable,
    pub vehicles: Vec<VehicleEnrollmentSummary>,
    pub rates: Vec<ElectricityRateSample>,
    pub rate_comparison: RateComparison,
}

impl Dashboard {
    /// Loads all sources through `cache` and derives every view.
    ///
    /// # Errors
    ///
    /// Any source failure aborts the whole build; no partial dashboard is
    /// returned.
    #[tracing::instrument(skip(cache, sources, selection), fields(selection = %selection))]
    pub fn build(
        cache: &mut SourceCache,
        sources: &DataSources,
        selection: Selection,
    ) -> Result<Self, LoadError> {
        let enrollments = cache.enrollments(&sources.enrollments)?;
        let vehicles = cache.vehicle_summary(&sources.vehicles)?;
        let rates = cache.electricity_rates(&sources.rates)?;

        let geo = aggregate_geo(&enrollments);
        let totals = utility_totals(&geo);
        let map = MapPanel::new(&geo, selection);
        let monthly = aggregate_monthly(&enrollments);
        let monthly_table = MonthlyTable::pivot(&monthly);
        let rate_comparison = RateComparison::from_samples(&rates);

        info!(
            clean_enrollments = enrollments.len(),
            locations = geo.len(),
            map_points = map.points.len(),
            months = monthly_table.rows.len(),
            "Dashboard built"
        );

        Ok(Dashboard {
            generated_at: Utc::now(),
            selection,
            selection_query: selection.to_query(),
            clean_enrollments: enrollments.len(),
            totals,
            map,
            monthly,
            monthly_table,
            vehicles: vehicles.to_vec(),
            rates: rates.to_vec(),
            rate_comparison,
        })
    }
}
