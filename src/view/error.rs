use thiserror::Error;

/// Conditions raised between the joined table and a render request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A mode selection outside the three dashboard modes.
    #[error("Unknown selection: '{0}'")]
    UnknownSelection(String),
    /// Nothing to chart for the year. Recoverable: show a "no data" state.
    #[error("No data for {year}")]
    EmptySeries { year: i32 },
}
