//! Session Controller
//! Owns the joined table for the lifetime of a session and reruns the
//! year/mode pipeline for each interaction.

use crate::data::{filter_by_year, Dataset, JoinedTable, Joiner, YearSubset};
use crate::view::{
    compute_series, ChartKind, DashboardMode, MetricSelector, PipelineError, RenderRequest,
    ViewDispatcher,
};
use polars::prelude::DataFrame;

/// One user selection: a pipeline run is a pure function of this and the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mode: DashboardMode,
    pub year: i32,
}

/// The loaded dataset, joined once and read-only afterwards.
pub struct Session {
    joined: JoinedTable,
    raw: DataFrame,
}

impl Session {
    pub fn new(dataset: Dataset) -> Self {
        let joined = Joiner::join(&dataset.boundaries, &dataset.rows);
        Self {
            joined,
            raw: dataset.raw,
        }
    }

    pub fn joined(&self) -> &JoinedTable {
        &self.joined
    }

    /// The tabular source exactly as loaded.
    pub fn raw_data(&self) -> &DataFrame {
        &self.raw
    }

    pub fn year_subset(&self, year: i32) -> YearSubset {
        filter_by_year(&self.joined, year)
    }

    /// Run filter, derivation and dispatch for one selection.
    pub fn render(&self, selection: Selection) -> Result<RenderRequest, PipelineError> {
        log::debug!("Rendering {:?} for {}", selection.mode, selection.year);
        let subset = self.year_subset(selection.year);

        let series = match MetricSelector::resolve(selection.mode).chart_kind {
            ChartKind::BubbleScatter => Some(compute_series(&subset)?),
            ChartKind::Choropleth => None,
        };

        ViewDispatcher::dispatch(
            selection.mode,
            &subset,
            self.joined.boundaries(),
            series.as_ref(),
        )
    }
}
