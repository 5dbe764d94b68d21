//! Public API for the panel-sim crate.
//!
//! This module provides the high-level API: [`ScreenEmulator`] builder and
//! [`EmulateError`] unified error type.

mod builder;
mod error;

pub use builder::{ScreenEmulator, MAX_OUTPUT_PIXELS};
pub use error::EmulateError;
