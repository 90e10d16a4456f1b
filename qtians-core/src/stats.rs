//! Per-day participation table, chapel x village.

use serde::Serialize;

use crate::date::{normalize_date, same_day};
use crate::models::DevotionalRecord;
use crate::settings::GroupCatalog;

/// One chapel's row of village counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRow {
    pub chapel: String,
    pub counts: Vec<usize>,
    pub total: usize,
}

/// Count table for one date.
///
/// `total` counts every record on the date, including those whose chapel or
/// village is not in the catalog, so it can exceed `cell_sum()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsTable {
    pub date: String,
    pub villages: Vec<String>,
    pub rows: Vec<StatsRow>,
    pub total: usize,
}

impl StatsTable {
    /// Count for a single cell, or `None` if either group is not in the table.
    pub fn count(&self, chapel: &str, village: &str) -> Option<usize> {
        let col = self.villages.iter().position(|v| v == village)?;
        self.rows
            .iter()
            .find(|row| row.chapel == chapel)
            .map(|row| row.counts[col])
    }

    /// Sum of one village column across chapels.
    pub fn village_total(&self, village: &str) -> Option<usize> {
        let col = self.villages.iter().position(|v| v == village)?;
        Some(self.rows.iter().map(|row| row.counts[col]).sum())
    }

    pub fn cell_sum(&self) -> usize {
        self.rows.iter().map(|row| row.total).sum()
    }

    /// Records on this date whose groups are outside the catalog.
    pub fn unrecognized(&self) -> usize {
        self.total - self.cell_sum()
    }
}

/// Builds the table for `selected_date` from `history`.
pub fn aggregate(
    history: &[DevotionalRecord],
    selected_date: &str,
    catalog: &GroupCatalog,
) -> StatsTable {
    let date = normalize_date(selected_date);
    let mut counts = vec![vec![0usize; catalog.villages.len()]; catalog.chapels.len()];
    let mut total = 0;

    for record in history.iter().filter(|r| same_day(&r.date, &date)) {
        total += 1;

        let row = catalog.chapels.iter().position(|c| *c == record.chapel);
        let col = catalog.villages.iter().position(|v| *v == record.village);
        if let (Some(row), Some(col)) = (row, col) {
            counts[row][col] += 1;
        }
    }

    let rows = catalog
        .chapels
        .iter()
        .zip(counts)
        .map(|(chapel, counts)| StatsRow {
            chapel: chapel.clone(),
            total: counts.iter().sum(),
            counts,
        })
        .collect();

    StatsTable {
        date,
        villages: catalog.villages.clone(),
        rows,
        total,
    }
}
