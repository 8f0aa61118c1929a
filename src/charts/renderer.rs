//! Static Chart Renderer
//! Writes the current view to a PNG with plotters.
//!
//! Layout:
//! 1. Title centered on top
//! 2. Choropleth: town polygons on the left, class legend on the right
//! 3. Comparison: bubble scatter with axis titles and a county legend

use crate::charts::color::{county_color, ColorBins, Rgb, CHOROPLETH_CLASSES, NO_DATA, OUTLINE};
use crate::charts::map::combined_bounds;
use crate::data::TownBoundary;
use crate::view::{marker_diameter, ChoroplethRequest, ComparisonRequest, RenderRequest};
use geo::Rect;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

const LEGEND_WIDTH: u32 = 220;
const BUBBLE_ALPHA: f64 = 0.7;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Nothing to export for {year}")]
    Empty { year: i32 },
    #[error("Town boundaries have no extent")]
    NoBounds,
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `request` into a `width` x `height` PNG at `path`.
    pub fn render_png(
        request: &RenderRequest,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        match request {
            RenderRequest::Choropleth(req) => Self::render_choropleth(req, path, width, height),
            RenderRequest::Comparison(req) => Self::render_comparison(req, path, width, height),
        }?;
        log::info!("Exported {} chart to {}", request.year(), path.display());
        Ok(())
    }

    fn render_choropleth(
        req: &ChoroplethRequest,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if !req.has_values() {
            return Err(RenderError::Empty { year: req.year });
        }
        let bounds = combined_bounds(req.boundaries.iter().map(|b| b.geometry.as_ref()))
            .ok_or(RenderError::NoBounds)?;
        let bins = ColorBins::from_values(req.values.values().copied(), CHOROPLETH_CLASSES)
            .ok_or(RenderError::Empty { year: req.year })?;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let title = format!("{}, {}", req.legend_label, req.year);
        let body = root
            .titled(&title, ("sans-serif", 28).into_font())
            .map_err(draw_err)?;

        let (map_w, map_h) = body.dim_in_pixel();
        let (map_area, legend_area) = body.split_horizontally(map_w.saturating_sub(LEGEND_WIDTH));
        let (x_range, y_range) = fit_ranges(bounds, map_w.saturating_sub(LEGEND_WIDTH), map_h);

        let mut chart = ChartBuilder::on(&map_area)
            .margin(10)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        for boundary in paint_order(&req.boundaries) {
            let fill = match req.value_for(&boundary.name) {
                Some(value) => rgb(req.color_scale.class_color(bins.class_of(value))),
                None => rgb(NO_DATA),
            };
            for polygon in &boundary.geometry.0 {
                let exterior: Vec<(f64, f64)> =
                    polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
                chart
                    .draw_series(std::iter::once(Polygon::new(exterior.clone(), fill.filled())))
                    .map_err(draw_err)?;
                chart
                    .draw_series(std::iter::once(PathElement::new(exterior, rgb(OUTLINE))))
                    .map_err(draw_err)?;

                // Holes are cut back to the background; enclosed towns come later.
                for interior in polygon.interiors() {
                    let ring: Vec<(f64, f64)> = interior.coords().map(|c| (c.x, c.y)).collect();
                    chart
                        .draw_series(std::iter::once(Polygon::new(ring.clone(), WHITE.filled())))
                        .map_err(draw_err)?;
                    chart
                        .draw_series(std::iter::once(PathElement::new(ring, rgb(OUTLINE))))
                        .map_err(draw_err)?;
                }
            }
        }

        Self::draw_class_legend(&legend_area, req, &bins)?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_class_legend<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        req: &ChoroplethRequest,
        bins: &ColorBins,
    ) -> Result<(), RenderError> {
        let font = ("sans-serif", 16).into_font();
        area.draw(&Text::new(req.legend_label.clone(), (10, 20), font.clone()))
            .map_err(draw_err)?;

        let thresholds = bins.thresholds();
        let mut y = 50;
        for (idx, color) in req.color_scale.colors().iter().enumerate() {
            let lower = thresholds.get(idx).copied().unwrap_or(bins.min);
            let upper = thresholds.get(idx + 1).copied().unwrap_or(bins.max);
            area.draw(&Rectangle::new([(10, y), (34, y + 18)], rgb(*color).filled()))
                .map_err(draw_err)?;
            area.draw(&Text::new(
                format!("{lower:.1} - {upper:.1}"),
                (42, y + 2),
                font.clone(),
            ))
            .map_err(draw_err)?;
            y += 26;
        }

        area.draw(&Rectangle::new([(10, y), (34, y + 18)], rgb(NO_DATA).filled()))
            .map_err(draw_err)?;
        area.draw(&Text::new("No data", (42, y + 2), font))
            .map_err(draw_err)?;
        Ok(())
    }

    fn render_comparison(
        req: &ComparisonRequest,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let positions: Vec<[f64; 2]> = req
            .series
            .iter()
            .flat_map(|s| s.series.points.iter().filter_map(|p| p.position()))
            .collect();
        if positions.is_empty() {
            return Err(RenderError::Empty { year: req.year });
        }

        let x_range = padded_range(positions.iter().map(|p| p[0]));
        let y_range = padded_range(positions.iter().map(|p| p[1]));

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(25)
            .caption(&req.title, ("sans-serif", 28).into_font())
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(req.x_label)
            .y_desc(req.y_label)
            .x_label_formatter(&|v| format!("{v:.0}"))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .draw()
            .map_err(draw_err)?;

        for overlay in &req.series {
            let color = rgb(county_color(overlay.county));
            let size_reference = overlay.size_reference;
            chart
                .draw_series(overlay.series.points.iter().filter_map(|point| {
                    let [x, y] = point.position()?;
                    let radius = marker_diameter(point.bubble_size, size_reference) / 2.0;
                    Some(Circle::new(
                        (x, y),
                        radius.round().max(1.0) as i32,
                        color.mix(BUBBLE_ALPHA).filled(),
                    ))
                }))
                .map_err(draw_err)?
                .label(overlay.county.to_string())
                .legend(move |(x, y)| Circle::new((x + 10, y), 6, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

/// Towns with holes first, so a town sitting in a hole is painted over it.
/// Order is otherwise unchanged.
pub fn paint_order(boundaries: &[TownBoundary]) -> Vec<&TownBoundary> {
    let mut ordered: Vec<&TownBoundary> = boundaries.iter().collect();
    ordered.sort_by_key(|b| b.geometry.0.iter().all(|p| p.interiors().is_empty()));
    ordered
}

/// Lon/lat ranges covering `bounds` with the viewport's aspect, so towns keep
/// their shape once longitude is shrunk by cos(mid latitude).
pub fn fit_ranges(bounds: Rect<f64>, width: u32, height: u32) -> (Range<f64>, Range<f64>) {
    let mid_lat = (bounds.min().y + bounds.max().y) / 2.0;
    let lon_scale = mid_lat.to_radians().cos().abs().max(1e-6);
    let aspect = width.max(1) as f64 / height.max(1) as f64;

    let mut geo_w = bounds.width().max(f64::EPSILON) * lon_scale;
    let mut geo_h = bounds.height().max(f64::EPSILON);
    if geo_w / geo_h < aspect {
        geo_w = geo_h * aspect;
    } else {
        geo_h = geo_w / aspect;
    }

    let center = bounds.center();
    let half_lon = geo_w / lon_scale / 2.0;
    let half_lat = geo_h / 2.0;
    (
        (center.x - half_lon)..(center.x + half_lon),
        (center.y - half_lat)..(center.y + half_lat),
    )
}

/// Data extent with 5% padding each side.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ColorScale;
    use crate::data::ScoreColumn;
    use geo::{polygon, MultiPolygon};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(Vec::new()), 0.0..1.0);
        assert_eq!(padded_range(vec![5.0, 5.0]), 4.0..6.0);

        let range = padded_range(vec![0.0, 100.0, f64::NAN]);
        assert!((range.start + 5.0).abs() < 1e-9);
        assert!((range.end - 105.0).abs() < 1e-9);
    }

    #[test]
    fn fitted_ranges_contain_bounds() {
        let bounds = Rect::new((-73.7, 41.0), (-71.8, 42.05));
        let (x, y) = fit_ranges(bounds, 800, 600);
        assert!(x.start <= -73.7 && x.end >= -71.8);
        assert!(y.start <= 41.0 && y.end >= 42.05);

        // one axis is tight
        let tight_x = (x.start + 73.7).abs() < 1e-9;
        let tight_y = (y.start - 41.0).abs() < 1e-9;
        assert!(tight_x || tight_y);
    }

    #[test]
    fn holed_towns_are_painted_before_enclosed_ones() {
        let inner = TownBoundary {
            name: "Inner".to_string(),
            geometry: Arc::new(MultiPolygon(vec![polygon![
                (x: 1.0, y: 1.0),
                (x: 2.0, y: 1.0),
                (x: 2.0, y: 2.0),
                (x: 1.0, y: 2.0),
            ]])),
        };
        let ring = TownBoundary {
            name: "Ring".to_string(),
            geometry: Arc::new(MultiPolygon(vec![polygon!(
                exterior: [
                    (x: 0.0, y: 0.0),
                    (x: 3.0, y: 0.0),
                    (x: 3.0, y: 3.0),
                    (x: 0.0, y: 3.0),
                ],
                interiors: [[
                    (x: 1.0, y: 1.0),
                    (x: 2.0, y: 1.0),
                    (x: 2.0, y: 2.0),
                    (x: 1.0, y: 2.0),
                ]],
            )])),
        };
        let other = TownBoundary {
            name: "Other".to_string(),
            geometry: Arc::clone(&inner.geometry),
        };

        let boundaries = vec![inner, ring, other];
        let names: Vec<&str> = paint_order(&boundaries)
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ring", "Inner", "Other"]);
    }

    #[test]
    fn refuses_to_export_empty_map() {
        let request = RenderRequest::Choropleth(ChoroplethRequest {
            year: 2005,
            column: ScoreColumn::Affordability,
            color_scale: ColorScale::RedYellowGreen,
            legend_label: "Affordability Score".to_string(),
            boundaries: Arc::from(Vec::new()),
            values: BTreeMap::new(),
            unmapped: Vec::new(),
        });
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let result = StaticChartRenderer::render_png(&request, &path, 640, 480);
        assert!(matches!(result, Err(RenderError::Empty { year: 2005 })));
        assert!(!path.exists());
    }
}
