//! Charts module - Color scales, map geometry and chart rendering

mod color;
mod map;
mod plotter;
mod renderer;

pub use color::{
    county_color, ColorBins, ColorScale, Rgb, CHOROPLETH_CLASSES, NO_DATA, OUTLINE,
};
pub use map::{combined_bounds, MapProjection, TownShape, TownShapes};
pub use plotter::{nearest_marker, to_color32, ChartPlotter};
pub use renderer::{fit_ranges, padded_range, paint_order, RenderError, StaticChartRenderer};
