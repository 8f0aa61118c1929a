//! Record Types
//! Town-level rows from the tabular source, boundaries from the geometry
//! source, and the joined record both views are built from.

use geo::MultiPolygon;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};

/// First year covered by the dataset (inclusive).
pub const FIRST_YEAR: i32 = 2011;
/// Last year covered by the dataset (inclusive).
pub const LAST_YEAR: i32 = 2020;

/// Whether `year` is one the year selector can produce.
pub fn is_supported_year(year: i32) -> bool {
    (FIRST_YEAR..=LAST_YEAR).contains(&year)
}

/// The eight Connecticut counties. Declaration order is legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum County {
    Fairfield,
    Hartford,
    Litchfield,
    Middlesex,
    #[strum(serialize = "New Haven")]
    NewHaven,
    #[strum(serialize = "New London")]
    NewLondon,
    Tolland,
    Windham,
}

/// Numeric score columns a choropleth can be colored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreColumn {
    /// Higher is better, roughly 0..100.
    Affordability,
    /// Unscaled, lower is better.
    Inequality,
}

impl ScoreColumn {
    /// Header of the column in the tabular source, also used as legend label.
    pub fn column_name(self) -> &'static str {
        match self {
            ScoreColumn::Affordability => "Affordability Score",
            ScoreColumn::Inequality => "IIE Score",
        }
    }
}

/// One row of the tabular source.
#[derive(Debug, Clone, PartialEq)]
pub struct TownScores {
    pub town: String,
    pub year: i32,
    pub town_code: Option<i64>,
    pub county: Option<String>,
    pub affordability_score: Option<f64>,
    pub inequality_score: Option<f64>,
    pub percent_affordable: Option<f64>,
    pub number_of_returns: Option<i64>,
}

/// One feature of the geometry source.
#[derive(Debug, Clone, PartialEq)]
pub struct TownBoundary {
    pub name: String,
    pub geometry: Arc<MultiPolygon<f64>>,
}

/// A joined row: one per town per year, or one per town for boundaries
/// with no tabular match (all data fields null).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TownRecord {
    pub name: String,
    pub year: Option<i32>,
    pub town_code: Option<i64>,
    pub county: Option<String>,
    pub affordability_score: Option<f64>,
    pub inequality_score: Option<f64>,
    pub percent_affordable: Option<f64>,
    pub number_of_returns: Option<i64>,
    pub geometry: Option<Arc<MultiPolygon<f64>>>,
}

impl TownRecord {
    /// Record for a tabular row, with whatever boundary matched its name.
    pub fn from_scores(row: &TownScores, geometry: Option<Arc<MultiPolygon<f64>>>) -> Self {
        Self {
            name: row.town.clone(),
            year: Some(row.year),
            town_code: row.town_code,
            county: row.county.clone(),
            affordability_score: row.affordability_score,
            inequality_score: row.inequality_score,
            percent_affordable: row.percent_affordable,
            number_of_returns: row.number_of_returns,
            geometry,
        }
    }

    /// Record for a boundary nothing in the tabular source matched.
    pub fn geometry_only(boundary: &TownBoundary) -> Self {
        Self {
            name: boundary.name.clone(),
            geometry: Some(Arc::clone(&boundary.geometry)),
            ..Self::default()
        }
    }

    /// Records without a boundary cannot be drawn on the map.
    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn score(&self, column: ScoreColumn) -> Option<f64> {
        match column {
            ScoreColumn::Affordability => self.affordability_score,
            ScoreColumn::Inequality => self.inequality_score,
        }
    }

    /// County parsed into the fixed partition, `None` if absent or unknown.
    pub fn county(&self) -> Option<County> {
        self.county.as_deref().and_then(|c| c.trim().parse().ok())
    }
}
