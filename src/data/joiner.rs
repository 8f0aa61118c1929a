//! Joiner Module
//! Merges town boundaries with town scores on the town name and fixes the
//! canonical (year, town code) ordering.

use crate::data::model::{TownBoundary, TownRecord, TownScores};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// The session's canonical record set. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct JoinedTable {
    records: Vec<TownRecord>,
    boundaries: Arc<[TownBoundary]>,
}

impl JoinedTable {
    /// Records in ascending (year, town code) order, nulls last.
    pub fn records(&self) -> &[TownRecord] {
        &self.records
    }

    /// Every boundary from the geometry source, matched or not.
    pub fn boundaries(&self) -> &Arc<[TownBoundary]> {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .filter_map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Towns that have score rows but no boundary, sorted.
    pub fn towns_without_geometry(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.year.is_some() && !r.has_geometry())
            .map(|r| r.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Towns that have a boundary but no score rows, in table order.
    pub fn towns_without_data(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.year.is_none())
            .map(|r| r.name.clone())
            .collect()
    }
}

/// Joins the geometry and tabular sources.
pub struct Joiner;

impl Joiner {
    /// Outer join on exact, case-sensitive town name.
    ///
    /// Every score row becomes a record carrying the matching boundary, if
    /// any. Every boundary no score row matched becomes a record with null
    /// data fields. Duplicate (town, year) rows and duplicate boundary names
    /// keep their first occurrence.
    pub fn join(boundaries: &[TownBoundary], rows: &[TownScores]) -> JoinedTable {
        let mut by_name: HashMap<&str, &TownBoundary> = HashMap::with_capacity(boundaries.len());
        let mut unique_boundaries = Vec::with_capacity(boundaries.len());
        for boundary in boundaries {
            if by_name.contains_key(boundary.name.as_str()) {
                log::warn!("Duplicate boundary for '{}', keeping the first", boundary.name);
                continue;
            }
            by_name.insert(boundary.name.as_str(), boundary);
            unique_boundaries.push(boundary.clone());
        }

        let mut seen: HashSet<(&str, i32)> = HashSet::with_capacity(rows.len());
        let mut matched: HashSet<&str> = HashSet::new();
        let mut records = Vec::with_capacity(rows.len() + boundaries.len());

        for row in rows {
            if !seen.insert((row.town.as_str(), row.year)) {
                log::warn!("Duplicate row for '{}' in {}, keeping the first", row.town, row.year);
                continue;
            }
            let geometry = by_name.get(row.town.as_str()).copied().map(|b| {
                matched.insert(b.name.as_str());
                Arc::clone(&b.geometry)
            });
            records.push(TownRecord::from_scores(row, geometry));
        }

        let without_geometry = records.iter().filter(|r| !r.has_geometry()).count();

        let mut geometry_only = 0usize;
        for boundary in &unique_boundaries {
            if !matched.contains(boundary.name.as_str()) {
                records.push(TownRecord::geometry_only(boundary));
                geometry_only += 1;
            }
        }

        Self::sort_canonical(&mut records);

        log::info!(
            "Joined {} records ({} without geometry, {} without data)",
            records.len(),
            without_geometry,
            geometry_only
        );

        JoinedTable {
            records,
            boundaries: unique_boundaries.into(),
        }
    }

    /// Stable ascending sort on (year, town code) with nulls last.
    pub fn sort_canonical(records: &mut [TownRecord]) {
        records.sort_by_key(|r| (r.year.is_none(), r.year, r.town_code.is_none(), r.town_code));
    }
}
