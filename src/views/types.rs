//! Row types produced by the aggregators.
//!
//! Field names serialize to the public column labels used by the dashboard.

use serde::Serialize;

/// Enrollments at one location for one utility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoAggregate {
    #[serde(rename = "Utility")]
    pub utility: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Enrollments")]
    pub enrollments: u64,
}

/// Total enrolled users for one utility code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtilityTotal {
    #[serde(rename = "Utility")]
    pub utility: String,
    #[serde(rename = "Enrolled Users")]
    pub enrolled_users: u64,
}

/// Enrollments in one calendar month for one utility (display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Utility")]
    pub utility: String,
    #[serde(rename = "Enrollments")]
    pub enrollments: u64,
}
