//! Error types for strain-field

use thiserror::Error;

/// Strain-field error type.
///
/// Only configuration can fail. The numeric core (`classify`, `step`, `run`)
/// is total and clamps instead of erroring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrainError {
    /// A float parameter was NaN or infinite
    #[error("Parameter `{name}` must be finite")]
    NonFiniteParameter { name: &'static str },

    /// A parameter that must be >= 0 was negative
    #[error("Parameter `{name}` must be >= 0, got {value}")]
    NegativeParameter { name: &'static str, value: f64 },

    /// Decay is not slower than accumulation
    #[error("decay_per_ms ({decay}) must be < accumulate_per_ms ({accumulate})")]
    InvertedRates { accumulate: f64, decay: f64 },
}

pub type Result<T> = std::result::Result<T, StrainError>;
