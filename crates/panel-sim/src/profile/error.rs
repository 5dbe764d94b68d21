//! Error types for colour parsing and profile validation

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing hex colour strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,

    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error type for caller-supplied display profiles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("gamma must be positive and finite, got {0}")]
    InvalidGamma(f64),

    #[error("effective gamma (gamma + offset) must be positive, got {0}")]
    InvalidGammaOffset(f64),

    #[error("foreground opacity must be within 0.0..=1.0, got {0}")]
    InvalidOpacity(f64),

    #[error("coefficient `{name}` is not finite")]
    NonFinite { name: &'static str },
}
