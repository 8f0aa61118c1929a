//! Connecticut housing affordability and income inequality dashboard.
//!
//! Loads town scores and town boundaries, joins them once, and turns each
//! (mode, year) selection into a render request for the map or bubble chart.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod session;
pub mod view;
