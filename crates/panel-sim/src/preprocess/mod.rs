//! Preprocessing shared by every filter.
//!
//! 1. [`detect_device`] recovers the console and the integer export scale
//!    from the screenshot's aspect ratio.
//! 2. [`Downsampler`] decimates the screenshot back to device resolution,
//!    optionally through a black-padded [`Frame`].

mod device;
mod downsample;

pub use device::{detect_device, DeviceDetection, DeviceKind};
pub use downsample::{Downsampler, Frame, CRT_FRAME_MARGIN};
