//! CT Housing Dashboard - Housing Affordability & Income Inequality Viewer
//!
//! Desktop dashboard mapping Connecticut town scores by year.

use anyhow::{anyhow, Context};
use ct_housing_dashboard::config::{ConfigLoader, CONFIG_ENV_VAR};
use ct_housing_dashboard::gui::DashboardApp;
use eframe::egui;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let config_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let config = ConfigLoader::resolve(config_path.as_deref())
        .context("Failed to load dashboard configuration")?;
    log::info!(
        "Starting with {} and {}",
        config.data_source,
        config.geometry_source
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("CT Housing Affordability & Income Inequality"),
        ..Default::default()
    };

    eframe::run_native(
        "CT Housing Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
