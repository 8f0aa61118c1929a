//! Metric Selector Module
//! Resolves a dashboard mode into the score column(s), color scale and chart
//! kind it is drawn with.

use crate::charts::ColorScale;
use crate::data::ScoreColumn;
use crate::view::PipelineError;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// The three dashboard modes. The same type backs the UI radio buttons and
/// the resolution table, so no mode can be offered but not resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum DashboardMode {
    #[default]
    AffordableHousingMap,
    IncomeInequalityMap,
    ComparisonChart,
}

impl DashboardMode {
    /// Radio button label.
    pub fn label(self) -> &'static str {
        match self {
            DashboardMode::AffordableHousingMap => "Affordable Housing Score Map",
            DashboardMode::IncomeInequalityMap => "Income Inequality Score Map",
            DashboardMode::ComparisonChart => "Affordable Housing vs Income Inequality",
        }
    }

    /// Section heading shown above the view.
    pub fn heading(self) -> &'static str {
        match self {
            DashboardMode::AffordableHousingMap => "Mapping Affordable Housing",
            DashboardMode::IncomeInequalityMap => "Mapping Income Inequality",
            DashboardMode::ComparisonChart => "Affordable Housing vs Income Inequality",
        }
    }

    /// Parse a mode from its kebab-case id or its UI label.
    pub fn parse(selection: &str) -> Result<Self, PipelineError> {
        let selection = selection.trim();
        Self::from_str(selection)
            .ok()
            .or_else(|| Self::iter().find(|mode| mode.label() == selection))
            .ok_or_else(|| PipelineError::UnknownSelection(selection.to_string()))
    }
}

/// Which score columns a view reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSelection {
    Single(ScoreColumn),
    /// Both scores, one per axis.
    Both { x: ScoreColumn, y: ScoreColumn },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Choropleth,
    BubbleScatter,
}

/// Everything the dispatcher needs to know about a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricView {
    pub mode: DashboardMode,
    pub scores: ScoreSelection,
    pub color_scale: Option<ColorScale>,
    pub chart_kind: ChartKind,
}

/// Static mode resolution table.
pub struct MetricSelector;

impl MetricSelector {
    pub fn resolve(mode: DashboardMode) -> MetricView {
        match mode {
            DashboardMode::AffordableHousingMap => MetricView {
                mode,
                scores: ScoreSelection::Single(ScoreColumn::Affordability),
                color_scale: Some(ColorScale::RedYellowGreen),
                chart_kind: ChartKind::Choropleth,
            },
            DashboardMode::IncomeInequalityMap => MetricView {
                mode,
                scores: ScoreSelection::Single(ScoreColumn::Inequality),
                color_scale: Some(ColorScale::RedBlue),
                chart_kind: ChartKind::Choropleth,
            },
            DashboardMode::ComparisonChart => MetricView {
                mode,
                scores: ScoreSelection::Both {
                    x: ScoreColumn::Affordability,
                    y: ScoreColumn::Inequality,
                },
                color_scale: None,
                chart_kind: ChartKind::BubbleScatter,
            },
        }
    }

    /// Resolve an untyped selection, rejecting anything outside the three modes.
    pub fn resolve_str(selection: &str) -> Result<MetricView, PipelineError> {
        DashboardMode::parse(selection).map(Self::resolve)
    }
}
