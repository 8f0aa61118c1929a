//! Raw Data Table
//! Tabbed table of the joined records and of the score CSV as loaded.

use crate::data::TownRecord;
use crate::session::Session;
use egui::{RichText, ScrollArea};
use polars::prelude::{AnyValue, DataFrame};

const ROW_HEIGHT: f32 = 18.0;
const COL_WIDTH: f32 = 120.0;

pub const JOINED_HEADERS: [&str; 9] = [
    "Town",
    "Year",
    "Town Code",
    "County",
    "Affordability Score",
    "IIE Score",
    "Percent Affordable",
    "Number of Returns",
    "Has Geometry",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawTab {
    Joined,
    Source,
}

pub struct RawDataTable {
    tab: RawTab,
}

impl RawDataTable {
    pub fn new() -> Self {
        Self { tab: RawTab::Joined }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &Session) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, RawTab::Joined, "Joined records");
            ui.selectable_value(&mut self.tab, RawTab::Source, "Source CSV");
        });
        ui.separator();

        match self.tab {
            RawTab::Joined => Self::show_joined(ui, session.joined().records()),
            RawTab::Source => Self::show_source(ui, session.raw_data()),
        }
    }

    fn show_joined(ui: &mut egui::Ui, records: &[TownRecord]) {
        ui.label(RichText::new(format!("{} records", records.len())).size(11.0));
        scrolling_table(ui, "joined", &JOINED_HEADERS, records.len(), |ui, row| {
            for cell in record_cells(&records[row]) {
                ui.label(RichText::new(cell).size(11.0));
            }
        });
    }

    fn show_source(ui: &mut egui::Ui, df: &DataFrame) {
        ui.label(
            RichText::new(format!("{} rows, {} columns", df.height(), df.width())).size(11.0),
        );
        let headers: Vec<String> = df
            .get_columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        scrolling_table(ui, "source", &headers, df.height(), |ui, row| {
            for column in df.get_columns() {
                let text = column
                    .get(row)
                    .map(|value| cell_text(&value))
                    .unwrap_or_default();
                ui.label(RichText::new(text).size(11.0));
            }
        });
    }
}

impl Default for RawDataTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Header plus virtualized rows. Both sit in one horizontal scroll area so
/// the header follows the body sideways; only the rows scroll vertically.
/// Returns the size of the horizontally scrolled content.
fn scrolling_table(
    ui: &mut egui::Ui,
    id: &str,
    headers: &[impl AsRef<str>],
    row_count: usize,
    mut add_row: impl FnMut(&mut egui::Ui, usize),
) -> egui::Vec2 {
    ScrollArea::horizontal()
        .id_salt((id, "columns"))
        .auto_shrink([false, true])
        .show(ui, |ui| {
            ui.vertical(|ui| {
                egui::Grid::new((id, "header"))
                    .min_col_width(COL_WIDTH)
                    .max_col_width(COL_WIDTH)
                    .show(ui, |ui| {
                        for header in headers {
                            ui.label(RichText::new(header.as_ref()).size(11.0).strong());
                        }
                        ui.end_row();
                    });

                ScrollArea::vertical()
                    .id_salt((id, "rows"))
                    .auto_shrink([true, false])
                    .show_rows(ui, ROW_HEIGHT, row_count, |ui, row_range| {
                        egui::Grid::new((id, "body"))
                            .striped(true)
                            .min_col_width(COL_WIDTH)
                            .max_col_width(COL_WIDTH)
                            .start_row(row_range.start)
                            .show(ui, |ui| {
                                for row in row_range {
                                    add_row(ui, row);
                                    ui.end_row();
                                }
                            });
                    });
            });
        })
        .content_size
}

/// Cells of one joined record; missing fields are blank.
pub fn record_cells(record: &TownRecord) -> [String; 9] {
    fn blank<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    [
        record.name.clone(),
        blank(&record.year),
        blank(&record.town_code),
        blank(&record.county),
        blank(&record.affordability_score),
        blank(&record.inequality_score),
        blank(&record.percent_affordable),
        blank(&record.number_of_returns),
        if record.has_geometry() { "yes" } else { "no" }.to_string(),
    ]
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}
