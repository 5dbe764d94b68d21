//! panel-sim: Handheld screen emulation for console screenshots
//!
//! This library takes a raw screenshot captured from a handheld console
//! (or an emulator exporting at an integer multiple of the native
//! resolution) and renders what the picture would have looked like on the
//! physical screen: a reflective monochrome LCD, a colour LCD with visible
//! sub-pixels, or a CRT television.
//!
//! # Quick Start
//!
//! The [`ScreenEmulator`] builder is the primary entry point:
//!
//! ```
//! use panel_sim::{ColorMode, MonoPalette, MonoPreset, RgbaImage, ScreenEmulator};
//!
//! let emulator = ScreenEmulator::new()
//!     .mode(ColorMode::Mono(MonoPalette::Preset(MonoPreset::Pocket)));
//!
//! let screenshot = RgbaImage::from_fn(160, 144, |x, _| {
//!     let v = (x * 255 / 159) as u8;
//!     [v, v, v, 255]
//! });
//! let out = emulator.emulate(&screenshot).unwrap();
//!
//! // 5x grid plus a 25 pixel border on every side
//! assert_eq!(out.width(), 160 * 5 + 50);
//! ```
//!
//! # Modes
//!
//! Modes are addressed by index or by name, in the order of [`MODE_NAMES`]:
//!
//! | Index | Name | Filter |
//! |-------|------|--------|
//! | 0 | `dmg` | mono LCD, original pea-green panel |
//! | 1 | `pocket` | mono LCD, grey panel |
//! | 2 | `light` | mono LCD, backlit teal panel |
//! | 3 | `custom` | mono LCD, caller-supplied colours |
//! | 4 | `gbc` | LCD grid, colour handheld panel |
//! | 5 | `gba` | LCD grid, first widescreen panel |
//! | 6 | `gba-sp` | LCD grid, front-lit panel |
//! | 7 | `gba-sp-white` | LCD grid, backlit panel |
//! | 8 | `crt` | CRT (feature `crt`) |
//!
//! The LCD grid modes take a [`GridAlgorithm`]: the analytic smear, the
//! six-band sub-pixel layout, or no grid at all.
//!
//! # Pipeline
//!
//! ```text
//! RGBA screenshot (sRGB, possibly an integer multiple of native size)
//!     |
//!     v
//! detect_device()          (aspect ratio -> stride)
//!     |
//!     v
//! Downsampler              (every stride-th pixel, optional black frame)
//!     |
//!     v
//! LinearizationTable       (16-bit premultiply, 256-entry sRGB decode)
//!     |
//!     v
//! MonoFilter | LcdGridFilter | CrtFilter   (all maths in linear light)
//!     |
//!     v
//! to_gamma() / to_byte()   (floor(v * 256), opaque output)
//! ```
//!
//! # Linear Light
//!
//! Every blend, blur and colour matrix runs on [`LinearColor`]. The only
//! exception is the CRT filter, whose final curve already bakes the display
//! gamma in and therefore skips the sRGB encode.

pub mod api;
pub mod color;
pub mod filter;
pub mod preprocess;
pub mod profile;
pub mod raster;


pub use api::{EmulateError, ScreenEmulator, MAX_OUTPUT_PIXELS};
pub use color::{LinearColor, LinearizationTable, Srgb};
#[cfg(feature = "crt")]
pub use filter::CrtFilter;
pub use filter::{
    ColorMode, FilterConfig, FilterKind, GridAlgorithm, LcdGridFilter, MonoFilter, MonoPalette,
    OutputScale, PanelProfile, ScreenFilter, MODE_NAMES,
};
pub use preprocess::{detect_device, DeviceDetection, DeviceKind, Downsampler};
pub use profile::{
    DisplayProfile, GridPreset, MonoAdjustment, MonoDisplayProfile, MonoPreset, ParseColorError,
    ProfileError,
};
pub use raster::{PixelGrid, RgbaImage};
