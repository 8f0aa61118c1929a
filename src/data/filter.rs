//! Year Filter Module

use crate::data::joiner::JoinedTable;
use crate::data::model::TownRecord;

/// The records of a single year, in table order. A fresh copy, independent
/// of the table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSubset {
    year: i32,
    records: Vec<TownRecord>,
}

impl YearSubset {
    pub fn new(year: i32, records: Vec<TownRecord>) -> Self {
        Self { year, records }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn records(&self) -> &[TownRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TownRecord> {
        self.records.iter()
    }
}

/// All records whose year equals `year`, order preserved. Unknown years give
/// an empty subset.
pub fn filter_by_year(table: &JoinedTable, year: i32) -> YearSubset {
    let records: Vec<TownRecord> = table
        .records()
        .iter()
        .filter(|r| r.year == Some(year))
        .cloned()
        .collect();
    log::debug!("Year {year}: {} of {} records", records.len(), table.len());
    YearSubset::new(year, records)
}
