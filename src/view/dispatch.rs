//! View Dispatcher
//! Turns a year subset into the request one of the renderers consumes.

use crate::charts::ColorScale;
use crate::data::{County, ScoreColumn, TownBoundary, YearSubset};
use crate::view::mode::{ChartKind, DashboardMode, MetricSelector, ScoreSelection};
use crate::view::series::{compute_series, ComparisonSeries, DerivedSeries};
use crate::view::PipelineError;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const X_AXIS_LABEL: &str = "Affordability Score (Higher Better)";
pub const Y_AXIS_LABEL: &str = "Income Inequality Score (Lower is Better)";

/// Map request: every boundary, plus the year's values keyed by town name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethRequest {
    pub year: i32,
    pub column: ScoreColumn,
    pub color_scale: ColorScale,
    pub legend_label: String,
    pub boundaries: Arc<[TownBoundary]>,
    /// Towns with both a boundary and a value this year.
    pub values: BTreeMap<String, f64>,
    /// Towns with a value this year but no boundary to draw it on.
    pub unmapped: Vec<String>,
}

impl ChoroplethRequest {
    pub fn value_for(&self, town: &str) -> Option<f64> {
        self.values.get(town).copied()
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }
}

/// One county overlay on the bubble chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSeriesRequest {
    pub county: County,
    pub series: DerivedSeries,
    /// Same value on every county of a request.
    pub size_reference: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    pub year: i32,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<BubbleSeriesRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderRequest {
    Choropleth(ChoroplethRequest),
    Comparison(ComparisonRequest),
}

impl RenderRequest {
    pub fn year(&self) -> i32 {
        match self {
            RenderRequest::Choropleth(req) => req.year,
            RenderRequest::Comparison(req) => req.year,
        }
    }
}

/// Stateless routing from mode and data to a render request.
pub struct ViewDispatcher;

impl ViewDispatcher {
    /// Build the request for `mode`. The comparison chart uses `series` when
    /// given and derives it from `subset` otherwise.
    pub fn dispatch(
        mode: DashboardMode,
        subset: &YearSubset,
        boundaries: &Arc<[TownBoundary]>,
        series: Option<&ComparisonSeries>,
    ) -> Result<RenderRequest, PipelineError> {
        let view = MetricSelector::resolve(mode);

        match (view.chart_kind, view.scores, view.color_scale) {
            (ChartKind::Choropleth, ScoreSelection::Single(column), Some(color_scale)) => Ok(
                RenderRequest::Choropleth(Self::choropleth(subset, boundaries, column, color_scale)),
            ),
            (ChartKind::BubbleScatter, ScoreSelection::Both { .. }, _) => {
                let request = match series {
                    Some(series) => Self::comparison(series),
                    None => Self::comparison(&compute_series(subset)?),
                };
                Ok(RenderRequest::Comparison(request))
            }
            _ => Err(PipelineError::UnknownSelection(mode.as_ref().to_string())),
        }
    }

    fn choropleth(
        subset: &YearSubset,
        boundaries: &Arc<[TownBoundary]>,
        column: ScoreColumn,
        color_scale: ColorScale,
    ) -> ChoroplethRequest {
        let mut values = BTreeMap::new();
        let mut unmapped = Vec::new();

        for record in subset.iter() {
            let Some(value) = record.score(column) else {
                continue;
            };
            if record.has_geometry() {
                values.insert(record.name.clone(), value);
            } else {
                unmapped.push(record.name.clone());
            }
        }

        if !unmapped.is_empty() {
            log::warn!(
                "{} towns have {} values for {} but no boundary: {}",
                unmapped.len(),
                column.column_name(),
                subset.year(),
                unmapped.join(", ")
            );
        }

        ChoroplethRequest {
            year: subset.year(),
            column,
            color_scale,
            legend_label: column.column_name().to_string(),
            boundaries: Arc::clone(boundaries),
            values,
            unmapped,
        }
    }

    fn comparison(series: &ComparisonSeries) -> ComparisonRequest {
        ComparisonRequest {
            year: series.year,
            title: format!("Income Inequality vs Housing Affordability, {}", series.year),
            x_label: X_AXIS_LABEL,
            y_label: Y_AXIS_LABEL,
            series: series
                .per_county
                .values()
                .map(|s| BubbleSeriesRequest {
                    county: s.county,
                    series: s.clone(),
                    size_reference: series.size_reference,
                })
                .collect(),
        }
    }
}
