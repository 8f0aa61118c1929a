//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod raw_table;

pub use app::DashboardApp;
pub use chart_viewer::{ChartViewer, ChartViewerAction};
pub use control_panel::{ControlPanel, ControlPanelAction, StatusLevel};
pub use raw_table::{record_cells, RawDataTable, JOINED_HEADERS};
