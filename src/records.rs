//! Typed rows for the three data sources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status literal marking an enrollment that never went through.
pub const FAILED_STATUS: &str = "Failed";

/// Rate-sample status for vehicles in the managed charging program.
pub const ENROLLED_STATUS: &str = "Enrolled";

/// Rate-sample status for vehicles outside the program.
pub const NOT_ENROLLED_STATUS: &str = "Not Enrolled";

/// Columns the enrollment export must carry. Without `utility_status` no row
/// could be recognized as failed.
pub const ENROLLMENT_COLUMNS: &[&str] = &[
    "utility_code",
    "utility_status",
    "utility_status_date",
    "_home_location",
];

pub const VEHICLE_COLUMNS: &[&str] = &[
    "Vehicle Status",
    "Percent of Vehicles",
    "Number of Vehicles",
];

pub const RATE_COLUMNS: &[&str] = &["Hour", "Status", "Rate (¢/kWh)"];

/// A row of the enrollment export as it appears on disk.
///
/// Every field is optional; validation happens in the loader so that a
/// malformed row is dropped rather than failing the whole read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEnrollment {
    #[serde(default)]
    pub utility_code: Option<String>,
    #[serde(default)]
    pub utility_status: Option<String>,
    #[serde(default)]
    pub utility_status_date: Option<String>,
    #[serde(default, rename = "_home_location")]
    pub home_location: Option<String>,
}

/// An enrollment that passed status, location, and date validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanEnrollment {
    pub utility: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status_date: DateTime<Utc>,
}

/// Share of the utilities' vehicles in each enrollment status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleEnrollmentSummary {
    #[serde(rename = "Vehicle Status")]
    pub status: String,
    #[serde(rename = "Percent of Vehicles")]
    pub percent: f64,
    #[serde(rename = "Number of Vehicles")]
    pub vehicles: u64,
}

/// Average hourly electricity rate for one enrollment status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityRateSample {
    #[serde(rename = "Hour")]
    pub hour: u32,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Rate (¢/kWh)")]
    pub rate_cents_per_kwh: f64,
}
