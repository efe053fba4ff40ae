use thiserror::Error;

/// Structural problems with an input file that make cleaning impossible.
///
/// Cell-level problems never surface here; they become missing values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("expected {expected} columns but the header has {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("input has no header row")]
    EmptyInput,
}
