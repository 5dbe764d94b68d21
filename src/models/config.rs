use panel_sim::{DisplayProfile, MonoDisplayProfile, Srgb};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

/// Application configuration loaded from pocketshot.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Mode name used when the command line names none
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Grid algorithm for the colour LCD modes
    #[serde(default = "default_grid")]
    pub grid: String,

    /// Output magnification
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Recompress output PNGs
    #[serde(default)]
    pub optimize: bool,

    /// Named monochrome palettes
    #[serde(default)]
    pub palettes: HashMap<String, PaletteConfig>,

    /// Named colour LCD profiles
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

fn default_mode() -> String {
    "dmg".to_string()
}

fn default_grid() -> String {
    "subpixel".to_string()
}

fn default_scale() -> u32 {
    1
}

/// A custom monochrome palette
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PaletteConfig {
    /// Hex colour of the pixels
    pub foreground: String,

    /// Hex colour of the panel
    pub background: String,

    /// Pixel opacity in percent (0-100)
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    100.0
}

impl PaletteConfig {
    pub fn to_profile(&self) -> Result<MonoDisplayProfile, ConvertError> {
        let foreground: Srgb = self.foreground.parse().map_err(panel_sim::EmulateError::from)?;
        let background: Srgb = self.background.parse().map_err(panel_sim::EmulateError::from)?;
        let profile = MonoDisplayProfile::new(foreground, self.opacity / 100.0, background);
        profile.validate().map_err(panel_sim::EmulateError::from)?;
        Ok(profile)
    }
}

/// A custom colour LCD profile. Omitted fields keep the neutral value.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    pub r: f64,
    pub gr: f64,
    pub br: f64,
    pub rg: f64,
    pub g: f64,
    pub bg: f64,
    pub rb: f64,
    pub gb: f64,
    pub b: f64,
    pub lum: f64,
    pub gamma: f64,
    pub gamma_offset: f64,
    pub bgr: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        DisplayProfile::NEUTRAL.into()
    }
}

impl From<DisplayProfile> for ProfileConfig {
    fn from(p: DisplayProfile) -> Self {
        Self {
            r: p.r,
            gr: p.gr,
            br: p.br,
            rg: p.rg,
            g: p.g,
            bg: p.bg,
            rb: p.rb,
            gb: p.gb,
            b: p.b,
            lum: p.lum,
            gamma: p.gamma,
            gamma_offset: p.gamma_offset,
            bgr: p.bgr,
        }
    }
}

impl ProfileConfig {
    pub fn to_profile(&self) -> Result<DisplayProfile, ConvertError> {
        let profile = DisplayProfile {
            r: self.r,
            gr: self.gr,
            br: self.br,
            rg: self.rg,
            g: self.g,
            bg: self.bg,
            rb: self.rb,
            gb: self.gb,
            b: self.b,
            lum: self.lum,
            gamma: self.gamma,
            gamma_offset: self.gamma_offset,
            bgr: self.bgr,
        };
        profile.validate().map_err(panel_sim::EmulateError::from)?;
        Ok(profile)
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    ///
    /// Without a path, `POCKETSHOT_CONFIG` is consulted; if that is unset
    /// too the built-in defaults are used silently.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match std::env::var_os("POCKETSHOT_CONFIG") {
                Some(p) => PathBuf::from(p),
                None => return Self::default(),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        palettes = config.palettes.len(),
                        profiles = config.profiles.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Look up a named palette; names are case-insensitive
    pub fn get_palette(&self, name: &str) -> Option<&PaletteConfig> {
        lookup(&self.palettes, name)
    }

    /// Look up a named profile; names are case-insensitive
    pub fn get_profile(&self, name: &str) -> Option<&ProfileConfig> {
        lookup(&self.profiles, name)
    }
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, name: &str) -> Option<&'a T> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            grid: default_grid(),
            scale: default_scale(),
            optimize: false,
            palettes: HashMap::new(),
            profiles: HashMap::new(),
        }
    }
}
