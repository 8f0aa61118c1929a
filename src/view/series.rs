//! Derived-Field Computer
//! Builds the per-county bubble series for the comparison chart: hover text,
//! square-root bubble sizes and one size reference shared by every county.

use crate::data::{County, TownRecord, YearSubset};
use crate::view::PipelineError;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Largest marker diameter, in pixels, the size reference aims for.
pub const MAX_MARKER_SIZE: f64 = 100.0;

/// Bubble size used when the returns count is missing, zero or negative.
pub const MIN_BUBBLE_SIZE: f64 = 1.0;

/// One town on the comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BubblePoint {
    pub town: String,
    pub affordability_score: Option<f64>,
    pub inequality_score: Option<f64>,
    pub hover_text: String,
    pub bubble_size: f64,
}

impl BubblePoint {
    /// Plot position, if both scores are present.
    pub fn position(&self) -> Option<[f64; 2]> {
        Some([self.affordability_score?, self.inequality_score?])
    }
}

/// The towns of one county.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub county: County,
    pub points: Vec<BubblePoint>,
}

/// All county series for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    pub year: i32,
    /// Every county of the fixed partition, possibly with no points.
    pub per_county: BTreeMap<County, DerivedSeries>,
    /// Computed over the whole subset, not per county.
    pub size_reference: f64,
    /// Records left out because their county is missing or unknown.
    pub dropped: usize,
}

impl ComparisonSeries {
    pub fn point_count(&self) -> usize {
        self.per_county.values().map(|s| s.points.len()).sum()
    }
}

/// Hover label: town, inequality score, percent affordable, returns filed, year.
pub fn hover_text(record: &TownRecord) -> String {
    fn or_na<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
    }

    format!(
        "Town: {}\nInequality Score: {}\nPercent of Housing Affordable: {}\nReturns Filed: {}\nYear: {}",
        record.name,
        or_na(record.inequality_score),
        or_na(record.percent_affordable),
        or_na(record.number_of_returns),
        or_na(record.year),
    )
}

/// `sqrt(number_of_returns)`, clamped to [`MIN_BUBBLE_SIZE`] for missing or
/// non-positive counts.
pub fn bubble_size(number_of_returns: Option<i64>) -> f64 {
    match number_of_returns {
        Some(n) if n > 0 => (n as f64).sqrt(),
        _ => MIN_BUBBLE_SIZE,
    }
}

/// `2 * max(size) / MAX_MARKER_SIZE^2`, for area-proportional markers.
pub fn size_reference(sizes: impl IntoIterator<Item = f64>) -> f64 {
    let max = sizes.into_iter().fold(MIN_BUBBLE_SIZE, f64::max);
    2.0 * max / MAX_MARKER_SIZE.powi(2)
}

/// Marker diameter in pixels. Area, not radius, tracks the bubble size.
pub fn marker_diameter(bubble_size: f64, size_reference: f64) -> f32 {
    if size_reference <= 0.0 {
        return 0.0;
    }
    (bubble_size / size_reference).sqrt() as f32
}

/// Build the comparison chart series for a year subset.
pub fn compute_series(subset: &YearSubset) -> Result<ComparisonSeries, PipelineError> {
    if subset.is_empty() {
        return Err(PipelineError::EmptySeries {
            year: subset.year(),
        });
    }

    let points: Vec<(Option<County>, BubblePoint)> = subset
        .iter()
        .map(|record| {
            let point = BubblePoint {
                town: record.name.clone(),
                affordability_score: record.affordability_score,
                inequality_score: record.inequality_score,
                hover_text: hover_text(record),
                bubble_size: bubble_size(record.number_of_returns),
            };
            (record.county(), point)
        })
        .collect();

    let size_reference = size_reference(points.iter().map(|(_, p)| p.bubble_size));

    let mut per_county: BTreeMap<County, DerivedSeries> = County::iter()
        .map(|county| {
            (
                county,
                DerivedSeries {
                    county,
                    points: Vec::new(),
                },
            )
        })
        .collect();

    let mut dropped = 0usize;
    for (county, point) in points {
        match county.and_then(|c| per_county.get_mut(&c)) {
            Some(series) => series.points.push(point),
            None => {
                log::warn!("'{}' has no known county, left off the chart", point.town);
                dropped += 1;
            }
        }
    }

    Ok(ComparisonSeries {
        year: subset.year(),
        per_county,
        size_reference,
        dropped,
    })
}
