//! Control Panel Widget
//! Left side panel with data sources, mode and year selection, and export.

use crate::data::{DataSource, FIRST_YEAR, LAST_YEAR};
use crate::session::Selection;
use crate::view::DashboardMode;
use egui::{Color32, RichText};
use strum::IntoEnumIterator;

/// How the status line is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// Left side control panel.
pub struct ControlPanel {
    pub selection: Selection,
    pub show_raw_data: bool,
    pub data_source: String,
    pub geometry_source: String,
    pub status: String,
    pub status_level: StatusLevel,
    pub is_loading: bool,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(selection: Selection, data_source: &DataSource, geometry_source: &DataSource) -> Self {
        Self {
            selection,
            show_raw_data: false,
            data_source: source_label(data_source),
            geometry_source: source_label(geometry_source),
            status: "Ready".to_string(),
            status_level: StatusLevel::Info,
            is_loading: false,
            export_enabled: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏠 CT Housing Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new(format!("Connecticut towns, {FIRST_YEAR}-{LAST_YEAR}"))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Sources =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Scores").size(11.0).strong());
                ui.label(RichText::new(&self.data_source).size(11.0).color(Color32::GRAY));
                ui.add_space(3.0);
                ui.label(RichText::new("Town boundaries").size(11.0).strong());
                ui.label(RichText::new(&self.geometry_source).size(11.0).color(Color32::GRAY));
                ui.add_space(5.0);

                ui.add_enabled_ui(!self.is_loading, |ui| {
                    if ui.button("🔄 Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Mode =====
        ui.label(RichText::new("🗺 View").size(14.0).strong());
        ui.add_space(5.0);

        for mode in DashboardMode::iter() {
            if ui
                .radio_value(&mut self.selection.mode, mode, mode.label())
                .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year =====
        ui.label(RichText::new("📅 Year").size(14.0).strong());
        ui.add_space(5.0);

        let slider = egui::Slider::new(&mut self.selection.year, FIRST_YEAR..=LAST_YEAR)
            .step_by(1.0)
            .integer();
        if ui.add(slider).changed() {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(10.0);
        ui.checkbox(&mut self.show_raw_data, "Show raw data");

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);

        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));
            });
        } else {
            let status_color = match self.status_level {
                StatusLevel::Error => Color32::from_rgb(220, 53, 69),
                StatusLevel::Success => Color32::from_rgb(40, 167, 69),
                StatusLevel::Info => Color32::GRAY,
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }

    pub fn set_status(&mut self, level: StatusLevel, status: &str) {
        self.status_level = level;
        self.status = status.to_string();
    }
}

/// Last path segment of a source, or the whole thing if it has none.
fn source_label(source: &DataSource) -> String {
    let full = source.to_string();
    full.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or(full)
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    Reload,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_label_keeps_file_name() {
        let url = DataSource::from("https://example.org/data/housing_and_income.csv");
        assert_eq!(source_label(&url), "housing_and_income.csv");

        let file = DataSource::from("fixtures/towns.geojson");
        assert_eq!(source_label(&file), "towns.geojson");
    }
}
