//! Colour types and conversion utilities
//!
//! Filters never do arithmetic on gamma-encoded values. Pixels enter through
//! a [`LinearizationTable`], are processed as [`LinearColor`], and leave
//! through [`to_gamma`] and [`to_byte`].
//!
//! # Example
//!
//! ```
//! use panel_sim::{LinearColor, LinearizationTable, Srgb};
//!
//! let lut = LinearizationTable::new();
//! let px: LinearColor = lut.load_rgba([128, 64, 32, 255]);
//!
//! let out = Srgb::from(px * 0.5);
//! assert!(out.r < 128.0 / 255.0);
//! ```

mod linear_color;
mod lut;
mod srgb;

pub use linear_color::LinearColor;
pub use lut::LinearizationTable;
pub use srgb::{clamp, clamp01, lerp, to_byte, to_gamma, to_linear, Srgb};
