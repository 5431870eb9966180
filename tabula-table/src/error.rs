use arrow::error::ArrowError;
use tabula_range::RangeError;
use thiserror::Error;

/// A name that is not registered with an id type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unresolved identifier: `{0}`")]
pub struct UnresolvedIdentifier(pub String);

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    #[error("{0}")]
    UnresolvedIdentifier(#[from] UnresolvedIdentifier),

    #[error("Column not found: `{0}`")]
    ColumnNotFound(String),

    #[error("Type mismatch in column `{column}`: expected {expected}, found {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Source failure: `{0}`")]
    SourceFailure(#[from] ArrowError),

    #[error("Serialization error: `{0}`")]
    SerializationError(#[from] serde_json::Error),
}

pub trait DuplicateResult {
    fn duplicate(&self) -> Self;
}

impl<T: Clone> DuplicateResult for Result<T, TableError> {
    fn duplicate(&self) -> Self {
        match self {
            Ok(v) => Ok(v.clone()),
            Err(err) => Err(err.duplicate()),
        }
    }
}

impl TableError {
    /// Duplicate an error, returning the same error type if possible
    /// For wrapped error types that don't support cloning, the error is
    /// converted to a generic internal error
    pub fn duplicate(&self) -> Self {
        match self {
            Self::InternalError(e) => Self::InternalError(e.clone()),
            Self::Range(e) => Self::Range(e.clone()),
            Self::UnresolvedIdentifier(e) => Self::UnresolvedIdentifier(e.clone()),
            Self::ColumnNotFound(e) => Self::ColumnNotFound(e.clone()),
            Self::TypeMismatch {
                column,
                expected,
                actual,
            } => Self::TypeMismatch {
                column: column.clone(),
                expected: expected.clone(),
                actual: actual.clone(),
            },
            Self::InvalidTable(e) => Self::InvalidTable(e.clone()),
            Self::SourceFailure(e) => Self::InternalError(e.to_string()),
            Self::SerializationError(e) => Self::InternalError(e.to_string()),
        }
    }
}
