use std::collections::HashMap;

use crate::records::CleanEnrollment;
use crate::views::types::GeoAggregate;

/// Counts enrollments per `(utility, latitude, longitude)`.
///
/// Coordinates group on exact bit equality; the loader already folds `-0.0`
/// into `0.0`.
pub fn aggregate_geo(records: &[CleanEnrollment]) -> Vec<GeoAggregate> {
    let mut counts: HashMap<(&str, u64, u64), (f64, f64, u64)> = HashMap::new();

    for r in records {
        let key = (r.utility.as_str(), r.latitude.to_bits(), r.longitude.to_bits());
        counts.entry(key).or_insert((r.latitude, r.longitude, 0)).2 += 1;
    }

    let mut rows: Vec<GeoAggregate> = counts
        .into_iter()
        .map(|((utility, _, _), (latitude, longitude, enrollments))| GeoAggregate {
            utility: utility.to_string(),
            latitude,
            longitude,
            enrollments,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.utility
            .cmp(&b.utility)
            .then(a.latitude.total_cmp(&b.latitude))
            .then(a.longitude.total_cmp(&b.longitude))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(utility: &str, latitude: f64, longitude: f64) -> CleanEnrollment {
        CleanEnrollment {
            utility: utility.to_string(),
            latitude,
            longitude,
            status_date: Utc.with_ymd_and_hms(2022, 4, 15, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_identical_locations_collapse() {
        let records = vec![record("dte", 42.33, -83.05), record("dte", 42.33, -83.05)];
        let rows = aggregate_geo(&records);

        assert_eq!(
            rows,
            vec![GeoAggregate {
                utility: "dte".to_string(),
                latitude: 42.33,
                longitude: -83.05,
                enrollments: 2,
            }]
        );
    }

    #[test]
    fn test_same_location_different_utility_stays_separate() {
        let records = vec![record("dte", 42.33, -83.05), record("xcel", 42.33, -83.05)];
        let rows = aggregate_geo(&records);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.enrollments == 1));
    }

    #[test]
    fn test_counts_sum_to_record_count() {
        let records = vec![
            record("dte", 42.33, -83.05),
            record("dte", 42.40, -83.10),
            record("dte", 42.33, -83.05),
            record("nationalgrid", 42.65, -73.75),
            record("xcel", 44.9, -93.2),
        ];
        let rows = aggregate_geo(&records);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().map(|r| r.enrollments).sum::<u64>(), records.len() as u64);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_geo(&[]).is_empty());
    }
}
