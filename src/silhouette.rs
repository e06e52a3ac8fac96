//! White-on-transparent notification icon for the Android status bar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::SilhouetteConfig;
use crate::error::ToolError;
use crate::icon;
use crate::layout::ProjectLayout;

const OPAQUE_WHITE: [u8; 4] = [255, 255, 255, 255];
const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLocation {
    /// Written into the platform resource directory.
    Primary(PathBuf),
    /// Resource directory was not writable; the icon must be moved manually.
    Fallback { written: PathBuf, intended: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyResource {
    Absent,
    Removed(PathBuf),
    ManualRemovalNeeded(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilhouetteReport {
    pub source: PathBuf,
    pub size: u32,
    pub output: OutputLocation,
    pub legacy: LegacyResource,
}

impl SilhouetteReport {
    /// Manual steps left for the operator after a fallback write.
    pub fn relocation_steps(&self) -> Vec<String> {
        let OutputLocation::Fallback { written, intended } = &self.output else {
            return Vec::new();
        };
        let mut steps = vec![format!("Copy {} to {}", written.display(), intended.display())];
        if let LegacyResource::ManualRemovalNeeded(xml) = &self.legacy {
            steps.push(format!("Delete {}", xml.display()));
        }
        steps.push("Rebuild the app".to_string());
        steps
    }
}

/// First path for which `exists` holds.
pub fn select_first_existing<'a>(
    paths: &'a [PathBuf],
    exists: impl Fn(&Path) -> bool,
) -> Result<&'a Path, ToolError> {
    paths
        .iter()
        .map(PathBuf::as_path)
        .find(|p| exists(p))
        .ok_or_else(|| ToolError::NoSourceFound { candidates: paths.to_vec() })
}

/// Map every pixel to opaque white when its alpha exceeds `threshold`,
/// otherwise to fully transparent black.
pub fn to_silhouette(img: &RgbaImage, threshold: u8) -> RgbaImage {
    let mut out = img.clone();
    out.par_chunks_mut(4).for_each(|px| {
        let value = if px[3] > threshold { OPAQUE_WHITE } else { TRANSPARENT };
        px.copy_from_slice(&value);
    });
    out
}

/// Render the notification icon and install it into the resource directory.
pub fn convert(layout: &ProjectLayout, cfg: &SilhouetteConfig) -> Result<SilhouetteReport, ToolError> {
    let candidates = layout.silhouette_candidates(cfg);
    let source = select_first_existing(&candidates, Path::is_file)?.to_path_buf();
    info!(source = %source.display(), "using source icon");

    let img = icon::load(&source)?.to_rgba8();
    let mask = to_silhouette(&img, cfg.alpha_threshold);
    let resized = icon::resize_square(&mask, cfg.size, cfg.filter);
    // resampling leaves soft edges; status bar icons must stay binary
    let icon = to_silhouette(&resized, cfg.alpha_threshold);

    let output = persist(layout, cfg, &icon)?;
    let legacy = remove_legacy_vector(&layout.legacy_vector(cfg));
    Ok(SilhouetteReport { source, size: cfg.size, output, legacy })
}

fn persist(layout: &ProjectLayout, cfg: &SilhouetteConfig, icon: &RgbaImage) -> Result<OutputLocation, ToolError> {
    let primary = layout.notification_icon(cfg);
    match write_into_place(&primary, icon) {
        Ok(()) => {
            debug!(path = %primary.display(), "notification icon written");
            Ok(OutputLocation::Primary(primary))
        }
        Err(err) => {
            warn!(path = %primary.display(), error = %err, "resource directory not writable, using fallback");
            let fallback = layout.fallback_icon(cfg);
            write_into_place(&fallback, icon).map_err(|e| ToolError::from_write(&fallback, e))?;
            Ok(OutputLocation::Fallback { written: fallback, intended: primary })
        }
    }
}

fn write_into_place(path: &Path, icon: &RgbaImage) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    icon::write_png(path, icon)
}

/// Delete a vector placeholder occupying the same resource slot.
pub fn remove_legacy_vector(path: &Path) -> LegacyResource {
    if !path.is_file() {
        return LegacyResource::Absent;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed legacy vector resource");
            LegacyResource::Removed(path.to_path_buf())
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not remove legacy vector resource");
            LegacyResource::ManualRemovalNeeded(path.to_path_buf())
        }
    }
}
