use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::records::CleanEnrollment;
use crate::utility::display_name_for_code;
use crate::views::types::MonthlyTrend;

/// `YYYY-MM` label of the record's UTC status date.
pub fn month_label(record: &CleanEnrollment) -> String {
    record.status_date.format("%Y-%m").to_string()
}

/// Counts enrollments per `(month, utility code)` and labels each row with the
/// code's display name.
///
/// Grouping happens on the raw code, so two codes sharing a display name stay
/// separate rows. The output is sparse: a month/utility pair with no
/// enrollments has no row.
pub fn aggregate_monthly(records: &[CleanEnrollment]) -> Vec<MonthlyTrend> {
    let mut counts: BTreeMap<(String, &str), u64> = BTreeMap::new();
    for r in records {
        *counts.entry((month_label(r), r.utility.as_str())).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((month, code), enrollments)| MonthlyTrend {
            month,
            utility: display_name_for_code(code),
            enrollments,
        })
        .collect()
}

/// Month-by-utility table with absent combinations filled with zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTable {
    pub utilities: Vec<String>,
    pub rows: Vec<MonthlyTableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTableRow {
    pub month: String,
    /// One count per entry of [`MonthlyTable::utilities`], same order.
    pub counts: Vec<u64>,
}

impl MonthlyTable {
    /// Pivots sparse trend rows into a dense table (sorted months and utilities).
    pub fn pivot(trends: &[MonthlyTrend]) -> Self {
        let columns: BTreeMap<&str, usize> = trends
            .iter()
            .map(|t| t.utility.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(col, utility)| (utility, col))
            .collect();

        let mut by_month: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
        for t in trends {
            let counts = by_month
                .entry(t.month.as_str())
                .or_insert_with(|| vec![0; columns.len()]);
            // every trend's utility is a key of `columns`
            counts[columns[t.utility.as_str()]] += t.enrollments;
        }
        let utilities = columns.into_keys().map(str::to_string).collect();

        let rows = by_month
            .into_iter()
            .map(|(month, counts)| MonthlyTableRow {
                month: month.to_string(),
                counts,
            })
            .collect();

        MonthlyTable { utilities, rows }
    }

    pub fn get(&self, month: &str, utility: &str) -> Option<u64> {
        let col = self.utilities.iter().position(|u| u == utility)?;
        self.rows
            .iter()
            .find(|r| r.month == month)
            .map(|r| r.counts[col])
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().flat_map(|r| r.counts.iter()).sum()
    }
}
