use std::collections::BTreeMap;

use crate::views::types::{GeoAggregate, UtilityTotal};

/// Sums geo enrollment counts per utility code.
///
/// Only utilities present in `rows` get an entry; there are no zero rows.
pub fn utility_totals(rows: &[GeoAggregate]) -> Vec<UtilityTotal> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.utility.as_str()).or_default() += row.enrollments;
    }

    totals
        .into_iter()
        .map(|(utility, enrolled_users)| UtilityTotal {
            utility: utility.to_string(),
            enrolled_users,
        })
        .collect()
}
