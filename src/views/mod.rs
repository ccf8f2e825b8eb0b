//! Derived views over the cleaned enrollment data.
//!
//! Each aggregator takes an immutable slice and returns a freshly built
//! table. Row order is deterministic but carries no meaning.

pub mod filter;
pub mod geo;
pub mod map;
pub mod math;
pub mod monthly;
pub mod rates;
pub mod totals;
pub mod types;

pub use filter::{Selection, filter};
pub use geo::aggregate_geo;
pub use map::MapView;
pub use monthly::{MonthlyTable, aggregate_monthly};
pub use rates::RateComparison;
pub use totals::utility_totals;
pub use types::{GeoAggregate, MonthlyTrend, UtilityTotal};
