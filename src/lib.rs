//! Pocketshot - turn handheld console screenshots into photos of the real screen
//!
//! PNG in, PNG out around the `panel_sim` emulation core.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
