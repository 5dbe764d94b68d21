use panel_sim::{
    ColorMode, DeviceDetection, GridAlgorithm, MonoAdjustment, MonoDisplayProfile, MonoPalette,
    OutputScale, PanelProfile, ScreenEmulator, Srgb,
};
use std::path::Path;

use crate::error::ConvertError;
use crate::models::AppConfig;
use crate::rendering::{decode_png, encode_png};

/// Per-invocation choices; anything left `None` falls back to the config.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub mode: Option<String>,
    pub mode_index: Option<usize>,
    pub grid: Option<String>,
    pub scale: Option<u32>,
    /// Custom mono foreground, hex
    pub foreground: Option<String>,
    /// Custom mono background, hex
    pub background: Option<String>,
    /// Custom mono opacity in percent
    pub foreground_opacity: Option<f64>,
    /// Named profile from the config, forces a colour LCD mode
    pub profile: Option<String>,
    /// Named palette from the config, forces a mono mode
    pub palette: Option<String>,
    pub adjustment: MonoAdjustment,
    pub optimize: Option<bool>,
}

/// Result of one conversion
#[derive(Debug, Clone)]
pub struct Converted {
    pub png: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub mode: ColorMode,
}

/// Turns screenshot PNGs into emulated-screen PNGs
pub struct Converter {
    config: AppConfig,
}

impl Converter {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Resolve the colour mode: palette, then profile, then mode index or name.
    pub fn resolve_mode(&self, opts: &ConvertOptions) -> Result<ColorMode, ConvertError> {
        let algorithm = self.resolve_grid(opts)?;

        if let Some(name) = &opts.palette {
            let palette = self
                .config
                .get_palette(name)
                .ok_or_else(|| unknown("palette", name))?;
            return Ok(ColorMode::Mono(MonoPalette::Custom(palette.to_profile()?)));
        }

        if let Some(name) = &opts.profile {
            let profile = self
                .config
                .get_profile(name)
                .ok_or_else(|| unknown("profile", name))?;
            return Ok(ColorMode::Grid {
                profile: PanelProfile::Custom(profile.to_profile()?),
                algorithm,
            });
        }

        let index = match (opts.mode_index, &opts.mode) {
            (Some(index), _) => index,
            (None, Some(name)) => ColorMode::index_of(name).ok_or_else(|| unknown("mode", name))?,
            (None, None) => ColorMode::index_of(&self.config.mode)
                .ok_or_else(|| unknown("mode", &self.config.mode))?,
        };

        Ok(ColorMode::from_index(
            index,
            custom_mono(opts)?,
            algorithm,
        )?)
    }

    fn resolve_grid(&self, opts: &ConvertOptions) -> Result<GridAlgorithm, ConvertError> {
        let name = opts.grid.as_deref().unwrap_or(&self.config.grid);
        GridAlgorithm::from_name(name).ok_or_else(|| unknown("grid algorithm", name))
    }

    /// Build the emulator for `opts`.
    pub fn emulator(&self, opts: &ConvertOptions) -> Result<ScreenEmulator, ConvertError> {
        let mode = self.resolve_mode(opts)?;
        let scale = OutputScale::new(opts.scale.unwrap_or(self.config.scale))?;
        Ok(ScreenEmulator::new()
            .mode(mode)
            .scale(scale)
            .mono_adjustment(opts.adjustment))
    }

    /// Convert PNG bytes to PNG bytes.
    pub fn convert(&self, input: &[u8], opts: &ConvertOptions) -> Result<Converted, ConvertError> {
        let emulator = self.emulator(opts)?;
        let source = decode_png(input)?;
        let image = emulator.emulate(&source)?;
        let optimize = opts.optimize.unwrap_or(self.config.optimize);
        let png = encode_png(&image, optimize)?;

        tracing::info!(
            src_width = source.width(),
            src_height = source.height(),
            width = image.width(),
            height = image.height(),
            filter = %emulator.color_mode().kind(),
            bytes = png.len(),
            "Converted screenshot"
        );

        Ok(Converted {
            png,
            width: image.width(),
            height: image.height(),
            mode: *emulator.color_mode(),
        })
    }

    /// Read `input`, convert, write `output`.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        opts: &ConvertOptions,
    ) -> Result<Converted, ConvertError> {
        let bytes = std::fs::read(input)?;
        let converted = self.convert(&bytes, opts)?;
        std::fs::write(output, &converted.png)?;
        Ok(converted)
    }

    /// Device detection for a PNG file, without converting it.
    pub fn detect_file(&self, input: &Path) -> Result<(usize, usize, DeviceDetection), ConvertError> {
        let image = decode_png(&std::fs::read(input)?)?;
        let detection = panel_sim::detect_device(image.width(), image.height());
        Ok((image.width(), image.height(), detection))
    }
}

/// The mono profile for the custom mode, from the foreground/background flags.
fn custom_mono(opts: &ConvertOptions) -> Result<MonoDisplayProfile, ConvertError> {
    let defaults = MonoDisplayProfile::DMG;
    let parse = |hex: &Option<String>, fallback: Srgb| -> Result<Srgb, ConvertError> {
        match hex {
            Some(s) => Ok(s.parse::<Srgb>().map_err(panel_sim::EmulateError::from)?),
            None => Ok(fallback),
        }
    };

    let profile = MonoDisplayProfile::new(
        parse(&opts.foreground, defaults.foreground)?,
        opts.foreground_opacity
            .map_or(defaults.foreground_opacity, |p| p / 100.0),
        parse(&opts.background, defaults.background)?,
    );
    profile.validate().map_err(panel_sim::EmulateError::from)?;
    Ok(profile)
}

fn unknown(kind: &'static str, name: &str) -> ConvertError {
    ConvertError::UnknownName {
        kind,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaletteConfig, ProfileConfig};
    use panel_sim::{GridPreset, MonoPreset};
    use pretty_assertions::assert_eq;

    fn converter() -> Converter {
        let mut config = AppConfig::default();
        config.palettes.insert(
            "mint".to_string(),
            PaletteConfig {
                foreground: "#0f380f".to_string(),
                background: "#9bbc0f".to_string(),
                opacity: 100.0,
            },
        );
        config
            .profiles
            .insert("flat".to_string(), ProfileConfig::default());
        Converter::new(config)
    }

    #[test]
    fn test_default_mode_is_dmg() {
        let mode = converter().resolve_mode(&ConvertOptions::default()).unwrap();
        assert_eq!(mode, ColorMode::Mono(MonoPalette::Preset(MonoPreset::Dmg)));
    }

    #[test]
    fn test_mode_by_name_and_grid() {
        let opts = ConvertOptions {
            mode: Some("GBA-SP".to_string()),
            grid: Some("smear".to_string()),
            ..Default::default()
        };
        assert_eq!(
            converter().resolve_mode(&opts).unwrap(),
            ColorMode::Grid {
                profile: PanelProfile::Preset(GridPreset::GbaSp),
                algorithm: GridAlgorithm::Smear,
            }
        );
    }

    #[test]
    fn test_mode_index_wins_over_name() {
        let opts = ConvertOptions {
            mode: Some("gbc".to_string()),
            mode_index: Some(1),
            ..Default::default()
        };
        assert_eq!(
            converter().resolve_mode(&opts).unwrap(),
            ColorMode::Mono(MonoPalette::Preset(MonoPreset::Pocket))
        );
    }

    #[test]
    fn test_custom_mode_uses_color_flags() {
        let opts = ConvertOptions {
            mode: Some("custom".to_string()),
            foreground: Some("#000".to_string()),
            background: Some("ffffff".to_string()),
            foreground_opacity: Some(50.0),
            ..Default::default()
        };
        let ColorMode::Mono(MonoPalette::Custom(p)) = converter().resolve_mode(&opts).unwrap()
        else {
            panic!("Expected custom mono mode");
        };
        assert_eq!(p.foreground.to_bytes(), [0, 0, 0]);
        assert_eq!(p.background.to_bytes(), [255, 255, 255]);
        assert_eq!(p.foreground_opacity, 0.5);
    }

    #[test]
    fn test_palette_and_profile_names() {
        let c = converter();
        let mono = c
            .resolve_mode(&ConvertOptions {
                palette: Some("Mint".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(matches!(mono, ColorMode::Mono(MonoPalette::Custom(_))));

        let grid = c
            .resolve_mode(&ConvertOptions {
                profile: Some("flat".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(matches!(
            grid,
            ColorMode::Grid {
                profile: PanelProfile::Custom(_),
                algorithm: GridAlgorithm::Subpixel,
            }
        ));
    }

    #[test]
    fn test_unknown_names() {
        let c = converter();
        for opts in [
            ConvertOptions {
                mode: Some("vectrex".to_string()),
                ..Default::default()
            },
            ConvertOptions {
                palette: Some("nope".to_string()),
                ..Default::default()
            },
            ConvertOptions {
                profile: Some("nope".to_string()),
                ..Default::default()
            },
            ConvertOptions {
                grid: Some("hexagonal".to_string()),
                ..Default::default()
            },
        ] {
            assert!(matches!(
                c.resolve_mode(&opts),
                Err(ConvertError::UnknownName { .. })
            ));
        }
    }

    #[test]
    fn test_bad_opacity_rejected() {
        let opts = ConvertOptions {
            mode_index: Some(3),
            foreground_opacity: Some(150.0),
            ..Default::default()
        };
        assert!(matches!(
            converter().resolve_mode(&opts),
            Err(ConvertError::Emulate(panel_sim::EmulateError::Profile(_)))
        ));
    }

    #[test]
    fn test_scale_out_of_range() {
        let opts = ConvertOptions {
            scale: Some(9),
            ..Default::default()
        };
        assert!(matches!(
            converter().emulator(&opts),
            Err(ConvertError::Emulate(panel_sim::EmulateError::InvalidScale(9)))
        ));
    }
}
