//! Chart Viewer Widget
//! Central panel showing the current map or bubble chart, or the loading,
//! empty and error states around it.

use crate::charts::{ChartPlotter, TownShapes};
use crate::view::{PipelineError, RenderRequest};
use egui::{Color32, RichText};

enum ViewState {
    Loading(String),
    Failed(String),
    Empty(String),
    Ready(RenderRequest),
}

/// Actions triggered by the chart viewer
#[derive(Debug, Clone, PartialEq)]
pub enum ChartViewerAction {
    None,
    Retry,
}

pub struct ChartViewer {
    heading: &'static str,
    state: ViewState,
    /// Triangulated boundaries, rebuilt only when the boundary set changes.
    shapes: Option<TownShapes>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self {
            heading: "",
            state: ViewState::Loading("Loading data...".to_string()),
            shapes: None,
        }
    }

    pub fn set_loading(&mut self, message: &str) {
        self.state = ViewState::Loading(message.to_string());
    }

    /// The session could not be loaded; the chart area becomes an error with Retry.
    pub fn set_failed(&mut self, error: &str) {
        self.state = ViewState::Failed(error.to_string());
    }

    pub fn set_view(&mut self, heading: &'static str, result: Result<RenderRequest, PipelineError>) {
        self.heading = heading;
        self.state = match result {
            Ok(request) => {
                if let RenderRequest::Choropleth(req) = &request {
                    let stale = self
                        .shapes
                        .as_ref()
                        .map_or(true, |shapes| !shapes.is_for(&req.boundaries));
                    if stale {
                        self.shapes = Some(TownShapes::build(&req.boundaries));
                    }
                }
                ViewState::Ready(request)
            }
            Err(e) => ViewState::Empty(e.to_string()),
        };
    }

    /// The request on screen, if there is one to export.
    pub fn current_request(&self) -> Option<&RenderRequest> {
        match &self.state {
            ViewState::Ready(request) => Some(request),
            _ => None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ChartViewerAction {
        let mut action = ChartViewerAction::None;

        match &self.state {
            ViewState::Loading(message) => {
                ui.centered_and_justified(|ui| {
                    ui.horizontal_centered(|ui| {
                        ui.spinner();
                        ui.label(RichText::new(message).size(16.0));
                    });
                });
            }
            ViewState::Failed(error) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.label(
                        RichText::new("⚠ Could not load the dashboard data")
                            .size(20.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(error).size(12.0));
                    ui.add_space(12.0);
                    if ui.button(RichText::new("🔄 Retry").size(14.0)).clicked() {
                        action = ChartViewerAction::Retry;
                    }
                });
            }
            ViewState::Empty(message) => {
                Self::draw_heading(ui, self.heading);
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(message).size(20.0));
                });
            }
            ViewState::Ready(RenderRequest::Choropleth(req)) => {
                Self::draw_heading(ui, self.heading);
                if !req.has_values() {
                    ui.label(
                        RichText::new(format!("No data for {}", req.year))
                            .size(12.0)
                            .color(Color32::GRAY),
                    );
                }
                if let Some(shapes) = &self.shapes {
                    ChartPlotter::draw_choropleth(ui, req, shapes);
                }
            }
            ViewState::Ready(RenderRequest::Comparison(req)) => {
                Self::draw_heading(ui, self.heading);
                ChartPlotter::draw_bubble_chart(ui, req);
            }
        }

        action
    }

    fn draw_heading(ui: &mut egui::Ui, heading: &str) {
        ui.label(RichText::new(heading).size(18.0).strong());
        ui.add_space(6.0);
    }
}
