//! Unified error type for the panel-sim public API.
//!
//! [`EmulateError`] wraps every failure the crate can report so application
//! code can use `?` throughout.

use thiserror::Error;

use crate::profile::{ParseColorError, ProfileError};

/// Unified error type for the panel-sim public API.
///
/// # Example
///
/// ```
/// use panel_sim::{EmulateError, OutputScale};
///
/// fn pick_scale(s: u32) -> Result<OutputScale, EmulateError> {
///     let scale = OutputScale::new(s)?;
///     Ok(scale)
/// }
///
/// assert!(pick_scale(9).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmulateError {
    /// The projected output exceeds the fixed pixel budget.
    #[error("expected output image size is too large: {pixels} pixels (max {max})")]
    OutputTooLarge { pixels: usize, max: usize },

    #[error("pixel buffer of {actual} bytes does not match {width}x{height} RGBA (expected {expected})")]
    InvalidImage {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("source image has no pixels")]
    EmptyImage,

    #[error("mode {0} is not available in this build")]
    UnsupportedMode(usize),

    #[error("output scale must be within 1..=8, got {0}")]
    InvalidScale(u32),

    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
}
