//! Dashboard Main Application
//! Main window with control panel, chart viewer and raw data table.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::DataLoader;
use crate::gui::{
    ChartViewer, ChartViewerAction, ControlPanel, ControlPanelAction, RawDataTable, StatusLevel,
};
use crate::session::{Selection, Session};
use crate::view::RenderRequest;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 1000;

/// Dataset loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Box<Session>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    raw_table: RawDataTable,
    session: Option<Session>,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self::with_config(config);
        app.start_load();
        app
    }

    /// App state before the first load is started.
    fn with_config(config: DashboardConfig) -> Self {
        let selection = Selection {
            mode: config.default_mode,
            year: config.default_year,
        };
        let control_panel =
            ControlPanel::new(selection, &config.data_source, &config.geometry_source);

        Self {
            config,
            control_panel,
            chart_viewer: ChartViewer::new(),
            raw_table: RawDataTable::new(),
            session: None,
            load_rx: None,
            is_loading: false,
        }
    }

    /// Load both sources in a background thread. Starting a new load drops
    /// the previous receiver, so only the latest load is ever applied.
    fn start_load(&mut self) {
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.is_loading = true;
        self.control_panel.export_enabled = false;
        self.control_panel
            .set_status(StatusLevel::Info, "Loading data sources...");
        self.chart_viewer.set_loading("Loading data sources...");

        let data_source = self.config.data_source.clone();
        let geometry_source = self.config.geometry_source.clone();
        let timeout = self.config.request_timeout;

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!("Fetching {data_source}...")));

            let dataset = DataLoader::new(timeout)
                .and_then(|loader| loader.load(&data_source, &geometry_source));

            match dataset {
                Ok(dataset) => {
                    let _ = tx.send(LoadResult::Progress("Joining towns...".to_string()));
                    let session = Session::new(dataset);
                    let _ = tx.send(LoadResult::Complete(Box::new(session)));
                }
                Err(e) => {
                    log::error!("{e}");
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(StatusLevel::Info, &status);
                    }
                    LoadResult::Complete(session) => {
                        let joined = session.joined();
                        let status = format!(
                            "Loaded {} records, {} town boundaries",
                            joined.len(),
                            joined.boundaries().len()
                        );
                        self.session = Some(*session);
                        self.finish_load();
                        self.control_panel.set_status(StatusLevel::Success, &status);
                        self.refresh_view();
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.session = None;
                        self.finish_load();
                        self.control_panel
                            .set_status(StatusLevel::Error, &format!("Error: {}", error));
                        self.chart_viewer.set_failed(&error);
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn finish_load(&mut self) {
        self.is_loading = false;
        self.control_panel.is_loading = false;
    }

    /// Rerun the pipeline for the current selection.
    fn refresh_view(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let selection = self.control_panel.selection;
        let result = session.render(selection);

        match &result {
            Ok(RenderRequest::Choropleth(req)) if !req.has_values() => {
                self.control_panel
                    .set_status(StatusLevel::Info, &format!("No data for {}", req.year));
            }
            Ok(_) => {
                self.control_panel.set_status(
                    StatusLevel::Success,
                    &format!("{}, {}", selection.mode.label(), selection.year),
                );
            }
            Err(e) => {
                self.control_panel.set_status(StatusLevel::Info, &e.to_string());
            }
        }

        self.control_panel.export_enabled = match &result {
            Ok(RenderRequest::Choropleth(req)) => req.has_values(),
            Ok(RenderRequest::Comparison(_)) => true,
            Err(_) => false,
        };
        self.chart_viewer.set_view(selection.mode.heading(), result);
    }

    /// Handle PNG export of the view on screen
    fn handle_export_png(&mut self) {
        let Some(request) = self.chart_viewer.current_request() else {
            self.control_panel
                .set_status(StatusLevel::Info, "Nothing to export");
            return;
        };

        let file_name = format!(
            "{}-{}.png",
            self.control_panel.selection.mode.as_ref(),
            request.year()
        );
        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&file_name)
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_png(request, &output_path, EXPORT_WIDTH, EXPORT_HEIGHT) {
            Ok(()) => {
                self.control_panel.set_status(
                    StatusLevel::Success,
                    &format!("Exported {}", output_path.display()),
                );
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.control_panel
                    .set_status(StatusLevel::Error, &format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectionChanged => self.refresh_view(),
                        ControlPanelAction::Reload => self.start_load(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - raw data or chart
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.control_panel.show_raw_data {
                if let Some(session) = &self.session {
                    self.raw_table.show(ui, session);
                    return;
                }
            }

            if self.chart_viewer.show(ui) == ChartViewerAction::Retry {
                self.start_load();
            }
        });
    }
}
