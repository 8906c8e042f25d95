use thiserror::Error;

/// Validation and contract errors exposed by `tickdash-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character {ch:?} at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("company profile is incomplete: missing {}", .missing.join(", "))]
    IncompleteProfile { missing: Vec<&'static str> },

    #[error("invalid period selection '{value}', expected Quarterly or Annual")]
    InvalidPeriod { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] crate::provider::SourceError),
}
