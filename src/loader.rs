//! Record loading and cleaning.
//!
//! The enrollment source is validated row by row: a row that fails any check
//! is dropped and tallied in a [`CleanSummary`], never defaulted. The vehicle
//! and rate sources are passed through as typed rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::fetch::{SourceLocation, open_source};
use crate::records::{
    CleanEnrollment, ENROLLMENT_COLUMNS, ElectricityRateSample, FAILED_STATUS, RATE_COLUMNS,
    RawEnrollment, VEHICLE_COLUMNS, VehicleEnrollmentSummary,
};

/// Textual stand-ins for an absent home location.
const NULL_SENTINELS: &[&str] = &["nan", "none", "null"];

const OFFSET_DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Why an enrollment row was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DropReason {
    Failed,
    MissingUtility,
    MissingLocation,
    BadLocation,
    BadDate,
    Undecodable,
}

/// Per-load tally of kept and dropped enrollment rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub raw_rows: usize,
    pub clean_rows: usize,
    pub failed: usize,
    pub missing_utility: usize,
    pub missing_location: usize,
    pub bad_location: usize,
    pub bad_date: usize,
    pub undecodable: usize,
}

impl CleanSummary {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Failed => self.failed += 1,
            DropReason::MissingUtility => self.missing_utility += 1,
            DropReason::MissingLocation => self.missing_location += 1,
            DropReason::BadLocation => self.bad_location += 1,
            DropReason::BadDate => self.bad_date += 1,
            DropReason::Undecodable => self.undecodable += 1,
        }
    }

    pub fn dropped(&self) -> usize {
        self.raw_rows - self.clean_rows
    }
}

/// Parses a `"(lat,lon)"` home location.
///
/// Exactly one leading and one trailing delimiter character are stripped and
/// the rest is split on the first comma. Both halves must parse as finite
/// floats; anything else yields `None`.
pub fn parse_home_location(raw: &str) -> Option<(f64, f64)> {
    let mut chars = raw.chars();
    chars.next()?;
    chars.next_back()?;
    let (lat, lon) = chars.as_str().split_once(',')?;

    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some((lat, lon))
}

/// Parses an ISO-style status timestamp and normalizes it to UTC.
///
/// Timestamps without an offset are read as UTC; a bare date maps to
/// midnight.
pub fn parse_status_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_DATE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validates one raw enrollment row.
pub(crate) fn clean_record(raw: &RawEnrollment) -> Result<CleanEnrollment, DropReason> {
    if raw.utility_status.as_deref() == Some(FAILED_STATUS) {
        return Err(DropReason::Failed);
    }

    let location = raw
        .home_location
        .as_deref()
        .filter(|s| {
            let s = s.trim();
            !s.is_empty() && !NULL_SENTINELS.iter().any(|n| s.eq_ignore_ascii_case(n))
        })
        .ok_or(DropReason::MissingLocation)?;
    let (latitude, longitude) = parse_home_location(location).ok_or(DropReason::BadLocation)?;

    let utility = non_empty(&raw.utility_code).ok_or(DropReason::MissingUtility)?;

    let status_date = non_empty(&raw.utility_status_date)
        .and_then(parse_status_date)
        .ok_or(DropReason::BadDate)?;

    Ok(CleanEnrollment {
        utility: utility.to_string(),
        // fold -0.0 into 0.0 so both group together
        latitude: latitude + 0.0,
        longitude: longitude + 0.0,
        status_date,
    })
}

/// Cleans a batch of raw rows, keeping input order.
pub fn clean_enrollments<I>(rows: I) -> (Vec<CleanEnrollment>, CleanSummary)
where
    I: IntoIterator<Item = RawEnrollment>,
{
    let mut summary = CleanSummary::default();
    let mut clean = Vec::new();

    for row in rows {
        summary.raw_rows += 1;
        match clean_record(&row) {
            Ok(record) => clean.push(record),
            Err(reason) => summary.record_drop(reason),
        }
    }

    summary.clean_rows = clean.len();
    (clean, summary)
}

/// Rows deserialized from a source plus the count of rows that could not be.
struct ReadOutcome<T> {
    rows: Vec<T>,
    skipped: usize,
}

/// Reads every row of `location`, after checking that the header names each
/// of the `required` columns.
fn read_rows<T: DeserializeOwned>(
    location: &SourceLocation,
    required: &[&str],
) -> Result<ReadOutcome<T>, LoadError> {
    let reader = open_source(location)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|source| LoadError::Csv {
        location: location.clone(),
        source,
    })?;
    if let Some(column) = required
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(LoadError::MissingColumn {
            location: location.clone(),
            column: column.to_string(),
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (idx, result) in rdr.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!(row = idx + 1, error = %e, "Skipping undecodable row");
                skipped += 1;
            }
        }
    }

    Ok(ReadOutcome { rows, skipped })
}

/// Loads and cleans the enrollment source.
///
/// # Errors
///
/// Fails only when the source itself is missing, unreadable, or lacks one of
/// the enrollment columns.
#[tracing::instrument(skip(location), fields(source = %location))]
pub fn load_enrollments(location: &SourceLocation) -> Result<Vec<CleanEnrollment>, LoadError> {
    let outcome = read_rows::<RawEnrollment>(location, ENROLLMENT_COLUMNS)?;
    let (clean, mut summary) = clean_enrollments(outcome.rows);
    summary.raw_rows += outcome.skipped;
    summary.undecodable += outcome.skipped;

    info!(
        raw_rows = summary.raw_rows,
        clean_rows = summary.clean_rows,
        failed = summary.failed,
        missing_utility = summary.missing_utility,
        missing_location = summary.missing_location,
        bad_location = summary.bad_location,
        bad_date = summary.bad_date,
        undecodable = summary.undecodable,
        "Enrollment source loaded"
    );

    Ok(clean)
}

#[tracing::instrument(skip(location), fields(source = %location))]
pub fn load_vehicle_summary(
    location: &SourceLocation,
) -> Result<Vec<VehicleEnrollmentSummary>, LoadError> {
    let outcome = read_rows(location, VEHICLE_COLUMNS)?;
    if outcome.skipped > 0 {
        warn!(skipped = outcome.skipped, "Vehicle summary rows skipped");
    }
    info!(rows = outcome.rows.len(), "Vehicle summary loaded");
    Ok(outcome.rows)
}

#[tracing::instrument(skip(location), fields(source = %location))]
pub fn load_electricity_rates(
    location: &SourceLocation,
) -> Result<Vec<ElectricityRateSample>, LoadError> {
    let outcome = read_rows(location, RATE_COLUMNS)?;
    if outcome.skipped > 0 {
        warn!(skipped = outcome.skipped, "Electricity rate rows skipped");
    }
    info!(rows = outcome.rows.len(), "Electricity rates loaded");
    Ok(outcome.rows)
}
