//! ScreenEmulator builder -- the primary entry point for the crate.
//!
//! [`ScreenEmulator`] owns the linearization table, resolves the filter
//! configuration for each image (device detection, size guard, profile
//! validation) and dispatches to the selected filter.

use crate::api::EmulateError;
use crate::color::LinearizationTable;
use crate::filter::{
    ColorMode, FilterConfig, GridAlgorithm, LcdGridFilter, MonoFilter, MonoPalette, OutputScale,
    PanelProfile, ScreenFilter,
};
use crate::preprocess::{detect_device, DeviceDetection, DeviceKind, Downsampler};
use crate::profile::{MonoAdjustment, MonoDisplayProfile};
use crate::raster::RgbaImage;

#[cfg(feature = "crt")]
use crate::filter::CrtFilter;

/// Largest output accepted: full GBA resolution at the maximum scale.
pub const MAX_OUTPUT_PIXELS: usize = 240 * 160 * 8 * 8;

/// High-level screen emulation builder.
///
/// # Design
///
/// - The linearization table is built once in [`new()`](Self::new) and
///   shared by reference with every filter call
/// - Configuration methods consume and return `self`
/// - [`emulate()`](Self::emulate) takes `&self`, so one emulator can
///   process any number of images
///
/// # Example
///
/// ```
/// use panel_sim::{ColorMode, GridAlgorithm, OutputScale, RgbaImage, ScreenEmulator};
///
/// let emulator = ScreenEmulator::new()
///     .mode_index(4, Default::default(), GridAlgorithm::Subpixel)
///     .unwrap()
///     .scale(OutputScale::new(2).unwrap());
///
/// let src = RgbaImage::from_fn(240, 160, |_, _| [40, 80, 120, 255]);
/// let out = emulator.emulate(&src).unwrap();
///
/// assert_eq!(out.width(), 480);
/// assert_eq!(out.height(), 320);
/// ```
#[derive(Debug, Clone)]
pub struct ScreenEmulator {
    lut: LinearizationTable,
    mode: ColorMode,
    scale: OutputScale,
    adjustment: MonoAdjustment,
    /// Skips aspect-ratio detection when set.
    stride: Option<usize>,
}

impl Default for ScreenEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenEmulator {
    /// Emulator for the default mode (`dmg`) at scale 1.
    pub fn new() -> Self {
        Self {
            lut: LinearizationTable::new(),
            mode: ColorMode::default(),
            scale: OutputScale::default(),
            adjustment: MonoAdjustment::default(),
            stride: None,
        }
    }

    #[inline]
    pub fn mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Select a mode by index; see [`ColorMode::from_index`].
    ///
    /// `custom` is used by mode 3, `algorithm` by modes 4..=7.
    pub fn mode_index(
        mut self,
        index: usize,
        custom: MonoDisplayProfile,
        algorithm: GridAlgorithm,
    ) -> Result<Self, EmulateError> {
        self.mode = ColorMode::from_index(index, custom, algorithm)?;
        Ok(self)
    }

    #[inline]
    pub fn scale(mut self, scale: OutputScale) -> Self {
        self.scale = scale;
        self
    }

    /// Tone adjustment for the mono filter.
    #[inline]
    pub fn mono_adjustment(mut self, adjustment: MonoAdjustment) -> Self {
        self.adjustment = adjustment;
        self
    }

    /// Force the downsample stride instead of detecting it.
    #[inline]
    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride.max(1));
        self
    }

    #[inline]
    pub fn color_mode(&self) -> &ColorMode {
        &self.mode
    }

    /// Detect the source device, unless a stride was forced.
    pub fn detect(&self, width: usize, height: usize) -> DeviceDetection {
        match self.stride {
            Some(stride) => DeviceDetection {
                kind: DeviceKind::Unknown,
                stride,
            },
            None => detect_device(width, height),
        }
    }

    /// Resolve everything about one invocation before touching pixels.
    ///
    /// Fails if the projected output `(w / stride * scale) * (h / stride *
    /// scale)` exceeds [`MAX_OUTPUT_PIXELS`] or a custom profile is invalid.
    pub fn plan(&self, width: usize, height: usize) -> Result<FilterConfig, EmulateError> {
        if width == 0 || height == 0 {
            return Err(EmulateError::EmptyImage);
        }

        let DeviceDetection { stride, .. } = self.detect(width, height);
        let scale = self.scale.get();

        // Mono output is really (w * 5 + 50) x (h * 5 + 50), but every mode is
        // held to the projection with the requested scale.
        let pixels = (width / stride)
            .saturating_mul(scale)
            .saturating_mul((height / stride).saturating_mul(scale));
        if pixels > MAX_OUTPUT_PIXELS {
            tracing::warn!(
                width,
                height,
                stride,
                scale,
                pixels,
                "Rejecting oversized output"
            );
            return Err(EmulateError::OutputTooLarge {
                pixels,
                max: MAX_OUTPUT_PIXELS,
            });
        }

        match &self.mode {
            ColorMode::Mono(MonoPalette::Custom(p)) => p.validate()?,
            ColorMode::Grid {
                profile: PanelProfile::Custom(p),
                ..
            } => p.validate()?,
            _ => {}
        }

        Ok(FilterConfig {
            mode: self.mode,
            scale: self.scale,
            stride,
            mono_adjustment: self.adjustment,
        })
    }

    /// Run the configured filter over `src`.
    pub fn emulate(&self, src: &RgbaImage) -> Result<RgbaImage, EmulateError> {
        let config = self.plan(src.width(), src.height())?;
        let filter = Self::filter_for(&config)?;

        tracing::debug!(
            filter = %config.mode.kind(),
            stride = config.stride,
            scale = config.scale.get(),
            "Applying screen filter"
        );

        let downsampler = Downsampler::new(config.stride);
        Ok(filter.apply(src, &downsampler, &self.lut))
    }

    fn filter_for(config: &FilterConfig) -> Result<Box<dyn ScreenFilter>, EmulateError> {
        let filter: Box<dyn ScreenFilter> = match config.mode {
            ColorMode::Mono(palette) => Box::new(
                MonoFilter::new(palette.profile()).with_adjustment(config.mono_adjustment),
            ),
            ColorMode::Grid { profile, algorithm } => Box::new(LcdGridFilter::new(
                profile.profile(),
                algorithm,
                config.scale,
            )),
            #[cfg(feature = "crt")]
            ColorMode::Crt => Box::new(CrtFilter::new(config.scale)),
            #[cfg(not(feature = "crt"))]
            ColorMode::Crt => {
                return Err(EmulateError::UnsupportedMode(
                    crate::filter::FIRST_CRT_MODE,
                ))
            }
        };
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DisplayProfile, MonoPreset};
    use pretty_assertions::assert_eq;

    fn solid(width: usize, height: usize) -> RgbaImage {
        RgbaImage::from_fn(width, height, |_, _| [128, 128, 128, 255])
    }

    #[test]
    fn test_plan_detects_stride() {
        let emu = ScreenEmulator::new();
        assert_eq!(emu.plan(480, 320).unwrap().stride, 2);
        assert_eq!(emu.plan(160, 144).unwrap().stride, 1);
        assert_eq!(emu.plan(300, 100).unwrap().stride, 1);
    }

    #[test]
    fn test_forced_stride_skips_detection() {
        let emu = ScreenEmulator::new().stride(3);
        assert_eq!(emu.plan(480, 320).unwrap().stride, 3);
        assert_eq!(ScreenEmulator::new().stride(0).plan(10, 10).unwrap().stride, 1);
    }

    #[test]
    fn test_size_guard_boundary() {
        let emu = ScreenEmulator::new().scale(OutputScale::new(8).unwrap());
        // exactly 1920 x 1280
        assert!(emu.plan(240, 160).is_ok());

        // 241 / 1 * 8 * 160 * 8 is past the limit
        let err = emu.plan(241, 160).unwrap_err();
        assert_eq!(
            err,
            EmulateError::OutputTooLarge {
                pixels: 241 * 8 * 160 * 8,
                max: MAX_OUTPUT_PIXELS,
            }
        );
    }

    #[test]
    fn test_size_guard_projects_mono_with_requested_scale() {
        let mono = ScreenEmulator::new()
            .mode(ColorMode::Mono(MonoPalette::Preset(MonoPreset::Dmg)))
            .scale(OutputScale::new(8).unwrap());
        // the mono picture itself would be 1255 x 850, well under the limit
        assert!(matches!(
            mono.plan(241, 160),
            Err(EmulateError::OutputTooLarge { .. })
        ));
        assert!(mono.scale(OutputScale::new(1).unwrap()).plan(241, 160).is_ok());
    }

    #[test]
    fn test_size_guard_uses_detected_stride() {
        let emu = ScreenEmulator::new().scale(OutputScale::new(8).unwrap());
        // 4x export of a GBA screen is fine at scale 8
        assert!(emu.plan(960, 640).is_ok());
    }

    #[test]
    fn test_empty_image_rejected() {
        let emu = ScreenEmulator::new();
        assert_eq!(emu.emulate(&RgbaImage::new(0, 4)), Err(EmulateError::EmptyImage));
    }

    #[test]
    fn test_invalid_custom_profiles_rejected() {
        let bad_mono = MonoDisplayProfile {
            foreground_opacity: -0.1,
            ..MonoDisplayProfile::DMG
        };
        let emu = ScreenEmulator::new().mode(ColorMode::Mono(MonoPalette::Custom(bad_mono)));
        assert!(matches!(emu.plan(2, 2), Err(EmulateError::Profile(_))));

        let bad_panel = DisplayProfile {
            gamma: -2.0,
            ..DisplayProfile::GBC
        };
        let emu = ScreenEmulator::new().mode(ColorMode::Grid {
            profile: PanelProfile::Custom(bad_panel),
            algorithm: GridAlgorithm::Smear,
        });
        assert!(matches!(emu.plan(2, 2), Err(EmulateError::Profile(_))));
    }

    #[test]
    fn test_dispatch_output_sizes() {
        let src = solid(8, 6);
        let scale = OutputScale::new(2).unwrap();

        let mono = ScreenEmulator::new()
            .mode(ColorMode::Mono(MonoPalette::Preset(MonoPreset::Light)))
            .scale(scale);
        let out = mono.emulate(&src).unwrap();
        assert_eq!((out.width(), out.height()), (8 * 5 + 50, 6 * 5 + 50));

        let grid = ScreenEmulator::new()
            .mode_index(5, MonoDisplayProfile::DMG, GridAlgorithm::Smear)
            .unwrap()
            .scale(scale);
        let out = grid.emulate(&src).unwrap();
        assert_eq!((out.width(), out.height()), (16, 12));
    }

    #[cfg(feature = "crt")]
    #[test]
    fn test_crt_dispatch() {
        let emu = ScreenEmulator::new()
            .mode_index(8, MonoDisplayProfile::DMG, GridAlgorithm::Subpixel)
            .unwrap()
            .scale(OutputScale::new(2).unwrap());
        let out = emu.emulate(&solid(8, 6)).unwrap();
        assert_eq!((out.width(), out.height()), ((8 + 8) * 2, (6 + 8) * 2));
    }

    #[test]
    fn test_emulator_is_reusable() {
        let emu = ScreenEmulator::new();
        let a = emu.emulate(&solid(4, 4)).unwrap();
        let b = emu.emulate(&solid(4, 4)).unwrap();
        assert_eq!(a, b);
    }
}
