//! `Contents.json` of an Xcode icon set.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ToolError;
use crate::helpers::is_plain_filename;

/// Largest edge length an entry may resolve to.
pub const MAX_PIXEL_SIZE: u32 = 8192;

#[derive(Debug, Clone, PartialEq)]
pub struct IconManifestEntry {
    pub filename: String,
    /// Edge length in points.
    pub logical_size: f64,
    pub scale_factor: u32,
}

impl IconManifestEntry {
    /// Pixel edge length, rounded half away from zero.
    pub fn pixel_size(&self) -> u32 {
        self.rounded_size() as u32
    }

    fn rounded_size(&self) -> f64 {
        (self.logical_size * self.scale_factor as f64).round()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconManifest {
    pub path: PathBuf,
    pub entries: Vec<IconManifestEntry>,
}

#[derive(Deserialize)]
struct Contents {
    images: Vec<RawImage>,
}

#[derive(Deserialize)]
struct RawImage {
    filename: Option<String>,
    size: String,
    #[serde(default = "one_x")]
    scale: String,
}

fn one_x() -> String { "1x".to_string() }

/// `"83.5x83.5"` -> `83.5`. Only the first number is used.
pub fn parse_size(s: &str) -> Option<f64> {
    let first = s.split('x').next()?.trim();
    first.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}

/// `"3x"` -> `3`
pub fn parse_scale(s: &str) -> Option<u32> {
    s.trim().strip_suffix('x')?.parse::<u32>().ok().filter(|v| *v > 0)
}

impl IconManifest {
    pub fn load(path: &Path) -> Result<Self, ToolError> {
        if !path.is_file() {
            return Err(ToolError::ManifestMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| malformed(path, e.to_string()))?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, ToolError> {
        let contents: Contents =
            serde_json::from_str(content).map_err(|e| malformed(path, e.to_string()))?;

        let mut entries = Vec::with_capacity(contents.images.len());
        for (idx, raw) in contents.images.into_iter().enumerate() {
            let filename = raw
                .filename
                .ok_or_else(|| malformed(path, format!("image #{} has no filename", idx)))?;
            if !is_plain_filename(&filename) {
                return Err(malformed(path, format!("'{}' is not a plain file name", filename)));
            }
            let logical_size = parse_size(&raw.size)
                .ok_or_else(|| malformed(path, format!("{}: bad size '{}'", filename, raw.size)))?;
            let scale_factor = parse_scale(&raw.scale)
                .ok_or_else(|| malformed(path, format!("{}: bad scale '{}'", filename, raw.scale)))?;
            let entry = IconManifestEntry { filename, logical_size, scale_factor };
            if entry.pixel_size() == 0 {
                return Err(malformed(path, format!("{}: resolves to zero pixels", entry.filename)));
            }
            if entry.rounded_size() > MAX_PIXEL_SIZE as f64 {
                return Err(malformed(
                    path,
                    format!("{}: resolves to more than {} pixels", entry.filename, MAX_PIXEL_SIZE),
                ));
            }
            entries.push(entry);
        }
        Ok(Self { path: path.to_path_buf(), entries })
    }
}

fn malformed(path: &Path, reason: String) -> ToolError {
    ToolError::ManifestMalformed { path: path.to_path_buf(), reason }
}
