//! Tool configuration.
//!
//! Every constant the tools depend on (background color, alpha threshold,
//! target sizes, resource paths) lives here and is passed into each
//! component explicitly. Values come from TOML; missing keys keep defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

pub const CONFIG_FILE_NAME: &str = "apptools.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub iconset: IconSetConfig,
    pub silhouette: SilhouetteConfig,
    pub push: PushConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSetConfig {
    /// Edge length of the square master canvas every icon is derived from.
    pub canvas_size: u32,
    /// Opaque color transparent regions are flattened onto.
    pub background: Rgb,
    pub filter: Resampling,
    /// Relative paths resolve against the project root.
    pub iconset_dir: PathBuf,
    pub manifest_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilhouetteConfig {
    /// Pixels with alpha strictly above this become opaque white.
    pub alpha_threshold: u8,
    pub size: u32,
    pub filter: Resampling,
    /// Tried in order; the first existing file is used.
    pub candidates: Vec<PathBuf>,
    pub drawable_dir: PathBuf,
    pub resource_name: String,
    /// Where the icon goes when the drawable dir is not writable.
    /// Defaults to the directory of the running executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub topic: String,
    pub channel_id: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Raise the level by `steps` (one per `-v`).
    pub fn raised(self, steps: u8) -> Self {
        const ORDER: [LogLevel; 5] =
            [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug, LogLevel::Trace];
        let idx = ORDER.iter().position(|l| *l == self).unwrap_or(2);
        ORDER[(idx + steps as usize).min(ORDER.len() - 1)]
    }
}

/// Resampling filters sharp enough for icon work. Blurring filters
/// (box, bilinear) are deliberately not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Resampling {
    #[default]
    Lanczos3,
    CatmullRom,
}

impl Resampling {
    pub fn filter_type(self) -> FilterType {
        match self {
            Resampling::Lanczos3 => FilterType::Lanczos3,
            Resampling::CatmullRom => FilterType::CatmullRom,
        }
    }
}

/// Opaque color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("expected a #RRGGBB color, got '{}'", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self { c.to_string() }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl Default for IconSetConfig {
    fn default() -> Self {
        Self {
            canvas_size: 1024,
            background: Rgb([0xD9, 0xED, 0xF7]),
            filter: Resampling::Lanczos3,
            iconset_dir: PathBuf::from("ios/Runner/Assets.xcassets/AppIcon.appiconset"),
            manifest_name: "Contents.json".to_string(),
        }
    }
}

impl Default for SilhouetteConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 40,
            size: 96,
            filter: Resampling::Lanczos3,
            candidates: vec![
                PathBuf::from("assets/icon/app_icon_final.png"),
                PathBuf::from("ios/Runner/Assets.xcassets/AppIcon.appiconset/Icon-App-1024x1024@1x.png"),
                PathBuf::from("assets/icon/app_icon_apple.png"),
            ],
            drawable_dir: PathBuf::from("android/app/src/main/res/drawable"),
            resource_name: "ic_notification".to_string(),
            fallback_dir: None,
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            topic: "all_users".to_string(),
            channel_id: "dolar_argentina_channel".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ToolConfig {
    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a file. A missing file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ToolError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| ToolError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let cfg = Self::parse(&content).map_err(|e| ToolError::Config {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        cfg.validate().map_err(|reason| ToolError::Config { path: path.to_path_buf(), reason })?;
        Ok(cfg)
    }

    /// Resolve the configuration: an explicit file (which must exist), then
    /// `apptools.toml` in the project root, then the per-user config file,
    /// then built-in defaults.
    pub fn discover(explicit: Option<&Path>, project_root: &Path) -> Result<Self, ToolError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ToolError::Config {
                    path: path.to_path_buf(),
                    reason: "file does not exist".into(),
                });
            }
            return Self::load_from(path);
        }
        let local = project_root.join(CONFIG_FILE_NAME);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "using project config");
            return Self::load_from(local);
        }
        if let Some(user) = user_config_path().filter(|p| p.is_file()) {
            tracing::debug!(path = %user.display(), "using user config");
            return Self::load_from(user);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<(), String> {
        if self.iconset.canvas_size == 0 {
            return Err("iconset.canvas_size must be positive".into());
        }
        if self.silhouette.size == 0 {
            return Err("silhouette.size must be positive".into());
        }
        if self.silhouette.candidates.is_empty() {
            return Err("silhouette.candidates must not be empty".into());
        }
        if self.silhouette.resource_name.trim().is_empty() {
            return Err("silhouette.resource_name must not be empty".into());
        }
        Ok(())
    }
}

/// `~/.config/apptools/config.toml` on Linux, platform equivalents elsewhere.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "apptools", "apptools")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
