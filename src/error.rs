use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeasonalError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Misaligned sequences: expected length {expected}, got {actual}")]
    MisalignedSequences { expected: usize, actual: usize },
}
