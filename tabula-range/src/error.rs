use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Index {index} out of range for dimension of size {size}")]
    OutOfRange { index: usize, size: usize },

    #[error("Malformed range: {0}")]
    MalformedRange(String),
}

impl RangeError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRange(msg.into())
    }
}
