//! View module - mode resolution, derived chart fields and render dispatch

mod dispatch;
mod error;
mod mode;
mod series;

pub use dispatch::{
    BubbleSeriesRequest, ChoroplethRequest, ComparisonRequest, RenderRequest, ViewDispatcher,
    X_AXIS_LABEL, Y_AXIS_LABEL,
};
pub use error::PipelineError;
pub use mode::{ChartKind, DashboardMode, MetricSelector, MetricView, ScoreSelection};
pub use series::{
    bubble_size, compute_series, hover_text, marker_diameter, size_reference, BubblePoint,
    ComparisonSeries, DerivedSeries, MAX_MARKER_SIZE, MIN_BUBBLE_SIZE,
};
