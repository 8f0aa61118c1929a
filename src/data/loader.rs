//! Dataset Loader Module
//! Fetches the town score CSV and the town boundary GeoJSON, from a URL or a
//! local file, and parses them into typed rows.

use crate::data::model::{TownBoundary, TownScores};
use geo::MultiPolygon;
use geojson::GeoJson;
use polars::prelude::*;
use reqwest::blocking::Client;
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Source unavailable: {location}: {reason}")]
    SourceUnavailable { location: String, reason: String },
}

impl LoaderError {
    fn unavailable(location: impl fmt::Display, reason: impl fmt::Display) -> Self {
        LoaderError::SourceUnavailable {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Where a dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl From<&str> for DataSource {
    fn from(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Tabular column headers, in source order.
pub const TOWN_COL: &str = "Town";
pub const YEAR_COL: &str = "Year";
pub const TOWN_CODE_COL: &str = "Town Code";
pub const COUNTY_COL: &str = "County";
pub const AFFORDABILITY_COL: &str = "Affordability Score";
pub const INEQUALITY_COL: &str = "IIE Score";
pub const PERCENT_AFFORDABLE_COL: &str = "Percent Affordable";
pub const RETURNS_COL: &str = "Number of Returns";

/// GeoJSON feature property holding the town name.
pub const NAME_PROPERTY: &str = "name";

/// Both datasets, parsed. Loaded once per session.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The tabular source as read, for the raw data view.
    pub raw: DataFrame,
    pub rows: Vec<TownScores>,
    pub boundaries: Vec<TownBoundary>,
}

/// Loads the two dataset sources.
pub struct DataLoader {
    client: Client,
}

impl DataLoader {
    pub fn new(timeout: Duration) -> Result<Self, LoaderError> {
        let client = Client::builder()
            .user_agent(concat!("ct-housing-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| LoaderError::unavailable("http client", e))?;
        Ok(Self { client })
    }

    /// Load and parse both sources. Either one failing fails the whole load.
    pub fn load(
        &self,
        tabular: &DataSource,
        geometry: &DataSource,
    ) -> Result<Dataset, LoaderError> {
        let csv_bytes = self.fetch(tabular)?;
        let (raw, rows) = Self::parse_tabular(csv_bytes, tabular)?;
        log::info!(
            "Loaded {} rows ({} columns) from {}",
            raw.height(),
            raw.width(),
            tabular
        );

        let geo_bytes = self.fetch(geometry)?;
        let boundaries = Self::parse_geometry(&geo_bytes, geometry)?;
        log::info!("Loaded {} town boundaries from {}", boundaries.len(), geometry);

        Ok(Dataset {
            raw,
            rows,
            boundaries,
        })
    }

    /// Read the raw bytes of a source.
    pub fn fetch(&self, source: &DataSource) -> Result<Vec<u8>, LoaderError> {
        match source {
            DataSource::File(path) => {
                std::fs::read(path).map_err(|e| LoaderError::unavailable(source, e))
            }
            DataSource::Url(url) => {
                log::debug!("GET {url}");
                let response = self
                    .client
                    .get(url)
                    .send()
                    .map_err(|e| LoaderError::unavailable(source, e))?;
                if !response.status().is_success() {
                    let status = response.status();
                    return Err(LoaderError::unavailable(source, format!("HTTP {status}")));
                }
                let bytes = response
                    .bytes()
                    .map_err(|e| LoaderError::unavailable(source, e))?;
                Ok(bytes.to_vec())
            }
        }
    }

    /// Parse the score CSV. Rows without a town name or year are skipped.
    /// Town names are kept exactly as written; they are the join key.
    pub fn parse_tabular(
        bytes: Vec<u8>,
        source: &DataSource,
    ) -> Result<(DataFrame, Vec<TownScores>), LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| LoaderError::unavailable(source, e))?;

        let column_err = |e: PolarsError| LoaderError::unavailable(source, e);
        let towns = Self::string_column(&df, TOWN_COL).map_err(column_err)?;
        let years = Self::integer_column(&df, YEAR_COL).map_err(column_err)?;
        let codes = Self::integer_column(&df, TOWN_CODE_COL).map_err(column_err)?;
        let counties = Self::string_column(&df, COUNTY_COL).map_err(column_err)?;
        let affordability = Self::float_column(&df, AFFORDABILITY_COL).map_err(column_err)?;
        let inequality = Self::float_column(&df, INEQUALITY_COL).map_err(column_err)?;
        let percent = Self::float_column(&df, PERCENT_AFFORDABLE_COL).map_err(column_err)?;
        let returns = Self::integer_column(&df, RETURNS_COL).map_err(column_err)?;

        let mut rows = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        for i in 0..df.height() {
            let (Some(town), Some(year)) = (towns[i].clone(), years[i]) else {
                skipped += 1;
                continue;
            };
            let Ok(year) = i32::try_from(year) else {
                skipped += 1;
                continue;
            };

            rows.push(TownScores {
                town,
                year,
                town_code: codes[i],
                county: counties[i].clone(),
                affordability_score: affordability[i],
                inequality_score: inequality[i],
                percent_affordable: percent[i],
                number_of_returns: returns[i],
            });
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} rows without a town name or year in {source}");
        }

        Ok((df, rows))
    }

    /// Parse the boundary GeoJSON. Features without a `name` or without an
    /// areal geometry are skipped.
    pub fn parse_geometry(
        bytes: &[u8],
        source: &DataSource,
    ) -> Result<Vec<TownBoundary>, LoaderError> {
        let text = std::str::from_utf8(bytes).map_err(|e| LoaderError::unavailable(source, e))?;
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| LoaderError::unavailable(source, e))?;

        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(LoaderError::unavailable(
                    source,
                    "expected a Feature or FeatureCollection",
                ));
            }
        };

        let mut boundaries = Vec::with_capacity(features.len());
        for (idx, feature) in features.into_iter().enumerate() {
            let Some(name) = feature
                .property(NAME_PROPERTY)
                .and_then(|v| v.as_str())
                .filter(|n| !n.trim().is_empty())
                .map(str::to_string)
            else {
                log::warn!("Feature {idx} in {source} has no name, skipping");
                continue;
            };

            let Some(geometry) = feature.geometry.and_then(to_multipolygon) else {
                log::warn!("Feature '{name}' in {source} has no polygon geometry, skipping");
                continue;
            };

            boundaries.push(TownBoundary {
                name,
                geometry: Arc::new(geometry),
            });
        }

        Ok(boundaries)
    }

    /// Blank cells are missing; everything else is returned untouched.
    fn string_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
        let column = df.column(name)?.cast(&DataType::String)?;
        let values = column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.filter(|s| !s.trim().is_empty()).map(str::to_string))
            .collect();
        Ok(values)
    }

    fn float_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        let values = column
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Integer columns go through Float64 so "2015.0" style cells survive.
    fn integer_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
        Ok(Self::float_column(df, name)?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()).map(|x| x.round() as i64))
            .collect())
    }
}

/// Polygons are promoted to single-member multipolygons; anything else is
/// not a town boundary.
fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
