//! Chart Plotter Module
//! Interactive views: the town choropleth painted directly, the county
//! bubble chart with egui_plot.

use crate::charts::color::{county_color, ColorBins, Rgb, CHOROPLETH_CLASSES, NO_DATA, OUTLINE};
use crate::charts::map::{MapProjection, TownShapes};
use crate::view::{marker_diameter, ChoroplethRequest, ComparisonRequest};
use egui::{Align2, Color32, FontId, Mesh, Pos2, RichText, Sense, Shape, Stroke};
use egui_plot::{Legend, Plot, PlotPoint, Points};

const LEGEND_WIDTH: f32 = 170.0;
const BUBBLE_ALPHA: u8 = 180;

pub fn to_color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

/// Index of the marker under `pointer`: the closest center within its radius.
pub fn nearest_marker(pointer: Pos2, markers: &[(Pos2, f32)]) -> Option<usize> {
    markers
        .iter()
        .enumerate()
        .filter_map(|(idx, (center, radius))| {
            let distance = center.distance(pointer);
            (distance <= radius.max(3.0)).then_some((idx, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(idx, _)| idx)
}

pub struct ChartPlotter;

impl ChartPlotter {
    /// Map of every town boundary, filled by class, with a legend on the right.
    pub fn draw_choropleth(ui: &mut egui::Ui, req: &ChoroplethRequest, shapes: &TownShapes) {
        let bins = ColorBins::from_values(req.values.values().copied(), CHOROPLETH_CLASSES);
        let height = (ui.available_height() - 30.0).max(300.0);

        ui.horizontal_top(|ui| {
            let width = (ui.available_width() - LEGEND_WIDTH).max(200.0);
            Self::paint_map(ui, egui::vec2(width, height), req, shapes, bins.as_ref());
            Self::draw_legend(ui, req, bins.as_ref());
        });

        if !req.unmapped.is_empty() {
            ui.label(
                RichText::new(format!("No boundary for: {}", req.unmapped.join(", ")))
                    .size(11.0)
                    .weak(),
            );
        }
    }

    fn fill_color(req: &ChoroplethRequest, bins: Option<&ColorBins>, town: &str) -> Color32 {
        match (req.value_for(town), bins) {
            (Some(value), Some(bins)) => {
                to_color32(req.color_scale.class_color(bins.class_of(value)))
            }
            _ => to_color32(NO_DATA),
        }
    }

    fn paint_map(
        ui: &mut egui::Ui,
        size: egui::Vec2,
        req: &ChoroplethRequest,
        shapes: &TownShapes,
        bins: Option<&ColorBins>,
    ) {
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);

        let Some(bounds) = shapes.bounds() else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No town boundaries loaded",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            return;
        };

        let projection = MapProjection::fit(bounds, rect.width() as f64, rect.height() as f64);
        let to_pos = |[lon, lat]: [f64; 2]| {
            let [x, y] = projection.to_screen(lon, lat);
            Pos2::new(rect.min.x + x as f32, rect.min.y + y as f32)
        };

        let mut mesh = Mesh::default();
        for shape in shapes.shapes() {
            let color = Self::fill_color(req, bins, &shape.name);
            for triangle in &shape.triangles {
                let base = mesh.vertices.len() as u32;
                for corner in triangle {
                    mesh.colored_vertex(to_pos(*corner), color);
                }
                mesh.add_triangle(base, base + 1, base + 2);
            }
        }
        painter.add(Shape::mesh(mesh));

        let outline = Stroke::new(0.5, to_color32(OUTLINE));
        for shape in shapes.shapes() {
            for ring in &shape.rings {
                painter.add(Shape::closed_line(
                    ring.iter().map(|c| to_pos(*c)).collect(),
                    outline,
                ));
            }
        }

        let Some(pointer) = response.hover_pos() else {
            return;
        };
        let [lon, lat] = projection.to_geo(
            (pointer.x - rect.min.x) as f64,
            (pointer.y - rect.min.y) as f64,
        );
        if let Some(shape) = shapes.town_at(lon, lat) {
            let highlight = Stroke::new(2.0, Color32::BLACK);
            for ring in &shape.rings {
                painter.add(Shape::closed_line(
                    ring.iter().map(|c| to_pos(*c)).collect(),
                    highlight,
                ));
            }
            let value = req
                .value_for(&shape.name)
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "n/a".to_string());
            response.on_hover_text_at_pointer(format!(
                "Town: {}\n{}: {}",
                shape.name, req.legend_label, value
            ));
        }
    }

    fn draw_legend(ui: &mut egui::Ui, req: &ChoroplethRequest, bins: Option<&ColorBins>) {
        ui.vertical(|ui| {
            ui.set_width(LEGEND_WIDTH - 10.0);
            ui.label(RichText::new(&req.legend_label).strong());
            ui.label(RichText::new(req.color_scale.name()).size(10.0).weak());
            ui.add_space(4.0);

            if let Some(bins) = bins {
                let thresholds = bins.thresholds();
                for (idx, color) in req.color_scale.colors().iter().enumerate() {
                    let lower = thresholds.get(idx).copied().unwrap_or(bins.min);
                    let upper = thresholds.get(idx + 1).copied().unwrap_or(bins.max);
                    Self::legend_swatch(ui, to_color32(*color), &format!("{lower:.1} - {upper:.1}"));
                }
            }
            Self::legend_swatch(ui, to_color32(NO_DATA), "No data");
        });
    }

    fn legend_swatch(ui: &mut egui::Ui, color: Color32, text: &str) {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, color);
            ui.label(RichText::new(text).size(11.0));
        });
    }

    /// Bubble scatter, one overlay per county.
    pub fn draw_bubble_chart(ui: &mut egui::Ui, req: &ComparisonRequest) {
        ui.label(RichText::new(&req.title).size(14.0).strong());

        let response = Plot::new(format!("comparison_{}", req.year))
            .legend(Legend::default())
            .x_axis_label(req.x_label)
            .y_axis_label(req.y_label)
            .show_x(false)
            .show_y(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                let pointer = plot_ui
                    .pointer_coordinate()
                    .map(|coordinate| plot_ui.screen_from_plot(coordinate));
                let mut markers: Vec<(Pos2, f32)> = Vec::new();
                let mut hover_texts: Vec<&str> = Vec::new();

                for overlay in &req.series {
                    let color = to_color32(county_color(overlay.county));
                    let fill = Color32::from_rgba_unmultiplied(
                        color.r(),
                        color.g(),
                        color.b(),
                        BUBBLE_ALPHA,
                    );
                    let name = overlay.county.to_string();

                    if overlay.series.points.is_empty() {
                        // keeps the county in the legend
                        plot_ui.points(Points::new(Vec::<[f64; 2]>::new()).color(color).name(&name));
                        continue;
                    }

                    for point in &overlay.series.points {
                        let Some([x, y]) = point.position() else {
                            continue;
                        };
                        let radius = marker_diameter(point.bubble_size, overlay.size_reference) / 2.0;
                        plot_ui.points(
                            Points::new(vec![[x, y]])
                                .radius(radius)
                                .color(fill)
                                .filled(true)
                                .name(&name),
                        );
                        markers.push((plot_ui.screen_from_plot(PlotPoint::new(x, y)), radius));
                        hover_texts.push(&point.hover_text);
                    }
                }

                pointer
                    .and_then(|pointer| nearest_marker(pointer, &markers))
                    .map(|idx| hover_texts[idx].to_string())
            });

        if let Some(text) = response.inner {
            response.response.on_hover_text_at_pointer(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_marker_prefers_closest_hit() {
        let markers = vec![
            (Pos2::new(0.0, 0.0), 10.0),
            (Pos2::new(8.0, 0.0), 10.0),
            (Pos2::new(100.0, 100.0), 5.0),
        ];
        assert_eq!(nearest_marker(Pos2::new(6.0, 0.0), &markers), Some(1));
        assert_eq!(nearest_marker(Pos2::new(1.0, 1.0), &markers), Some(0));
        assert_eq!(nearest_marker(Pos2::new(50.0, 50.0), &markers), None);
    }

    #[test]
    fn tiny_markers_still_hoverable() {
        let markers = vec![(Pos2::new(10.0, 10.0), 0.5)];
        assert_eq!(nearest_marker(Pos2::new(12.0, 10.0), &markers), Some(0));
    }
}
