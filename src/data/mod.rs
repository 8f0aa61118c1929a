//! Data module - source loading, joining and year projection

mod filter;
mod joiner;
mod loader;
mod model;

pub use filter::{filter_by_year, YearSubset};
pub use joiner::{JoinedTable, Joiner};
pub use loader::{DataLoader, DataSource, Dataset, LoaderError};
pub use model::{
    is_supported_year, County, ScoreColumn, TownBoundary, TownRecord, TownScores, FIRST_YEAR,
    LAST_YEAR,
};
