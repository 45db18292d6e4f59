//! Error types.
//!
//! The highlight path itself never fails; these cover the edges where
//! callers hand us tuning parameters.

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("Invalid config: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HighlightError>;
