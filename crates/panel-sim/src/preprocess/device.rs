//! Source device detection from screenshot aspect ratio.
//!
//! Screenshot tools often export at an integer multiple of the console's
//! native resolution. The aspect ratio tells which console it was, and the
//! width divided by the native width recovers the multiple.

use std::fmt;

const RATIO_TOLERANCE: f64 = 0.001;

/// Handheld whose native resolution a screenshot was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// 240x160, 3:2.
    GameBoyAdvance,
    /// 160x144, 10:9.
    GameBoy,
    Unknown,
}

impl DeviceKind {
    pub const fn native_width(self) -> Option<usize> {
        match self {
            Self::GameBoyAdvance => Some(240),
            Self::GameBoy => Some(160),
            Self::Unknown => None,
        }
    }

    const fn aspect_ratio(self) -> Option<f64> {
        match self {
            Self::GameBoyAdvance => Some(1.5),
            Self::GameBoy => Some(160.0 / 144.0),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameBoyAdvance => write!(f, "GBA"),
            Self::GameBoy => write!(f, "GB"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of [`detect_device`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDetection {
    pub kind: DeviceKind,
    /// Source pixels per device pixel, always at least 1.
    pub stride: usize,
}

/// Classify a screenshot by aspect ratio and recover its downsample stride.
///
/// Ratios within 0.001 of 3:2 divide the width by 240, ratios within 0.001
/// of 10:9 divide it by 160. Anything else keeps stride 1.
pub fn detect_device(width: usize, height: usize) -> DeviceDetection {
    let ratio = width as f64 / height as f64;

    for kind in [DeviceKind::GameBoy, DeviceKind::GameBoyAdvance] {
        let (Some(expected), Some(native)) = (kind.aspect_ratio(), kind.native_width()) else {
            continue;
        };
        if (ratio - expected).abs() < RATIO_TOLERANCE {
            let stride = (width / native).max(1);
            tracing::debug!(device = %kind, width, height, stride, "Detected source device");
            return DeviceDetection { kind, stride };
        }
    }

    tracing::debug!(width, height, "No known aspect ratio, using stride 1");
    DeviceDetection {
        kind: DeviceKind::Unknown,
        stride: 1,
    }
}
