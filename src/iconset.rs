use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::IconSetConfig;
use crate::error::ToolError;
use crate::icon;
use crate::layout::ProjectLayout;
use crate::manifest::IconManifest;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedIcon {
    pub filename: String,
    pub pixel_size: u32,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Render every icon listed in the icon set's manifest from `source`.
///
/// Inputs are validated before anything is written. Outputs are opaque RGB
/// PNGs; the first failed write aborts the run.
pub fn generate(
    source: &Path,
    layout: &ProjectLayout,
    cfg: &IconSetConfig,
) -> Result<Vec<GeneratedIcon>, ToolError> {
    if !source.is_file() {
        return Err(ToolError::SourceNotFound(source.to_path_buf()));
    }
    let manifest = IconManifest::load(&layout.manifest_path(cfg))?;
    let out_dir = layout.iconset_dir(cfg);
    debug!(manifest = %manifest.path.display(), entries = manifest.entries.len(), "manifest loaded");

    let img = icon::load(source)?;
    let (w, h) = (img.width(), img.height());
    let canvas = icon::master_canvas(&img, cfg);
    info!(source = %source.display(), width = w, height = h, canvas = cfg.canvas_size, "master canvas ready");

    let mut generated = Vec::with_capacity(manifest.entries.len());
    for entry in &manifest.entries {
        let px = entry.pixel_size();
        let out = icon::resize_square(&canvas, px, cfg.filter);
        let path = out_dir.join(&entry.filename);
        icon::write_png(&path, &out).map_err(|e| ToolError::from_write(&path, e))?;
        let bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        debug!(file = %entry.filename, px, bytes, "icon written");
        generated.push(GeneratedIcon { filename: entry.filename.clone(), pixel_size: px, path, bytes });
    }
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const MANIFEST: &str = r#"{"images": [
        {"filename": "Icon-20x20@2x.png", "size": "20x20", "scale": "2x"},
        {"filename": "Icon-60x60@3x.png", "size": "60x60", "scale": "3x"},
        {"filename": "Icon-29x29@1x.png", "size": "29x29"}
    ]}"#;

    fn project(manifest: Option<&str>) -> (tempfile::TempDir, ProjectLayout, IconSetConfig) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = IconSetConfig { canvas_size: 256, ..Default::default() };
        let layout = ProjectLayout::new(dir.path());
        fs::create_dir_all(layout.iconset_dir(&cfg)).unwrap();
        if let Some(m) = manifest {
            fs::write(layout.manifest_path(&cfg), m).unwrap();
        }
        (dir, layout, cfg)
    }

    fn source(dir: &Path) -> PathBuf {
        let path = dir.join("src.png");
        RgbaImage::from_fn(120, 80, |x, _| Rgba([200, 10, 10, if x < 60 { 0 } else { 255 }]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn writes_each_entry_opaque_at_its_size() {
        let (dir, layout, cfg) = project(Some(MANIFEST));
        let icons = generate(&source(dir.path()), &layout, &cfg).unwrap();
        let sizes: Vec<_> = icons.iter().map(|i| (i.filename.as_str(), i.pixel_size)).collect();
        assert_eq!(sizes, vec![("Icon-20x20@2x.png", 40), ("Icon-60x60@3x.png", 180), ("Icon-29x29@1x.png", 29)]);
        for icon in &icons {
            assert!(icon.bytes > 0);
            let img = image::open(&icon.path).unwrap();
            assert_eq!(img.color(), image::ColorType::Rgb8);
            assert_eq!((img.width(), img.height()), (icon.pixel_size, icon.pixel_size));
        }
    }

    #[test]
    fn missing_source_writes_nothing() {
        let (dir, layout, cfg) = project(Some(MANIFEST));
        let err = generate(&dir.path().join("nope.png"), &layout, &cfg).unwrap_err();
        assert!(matches!(err, ToolError::SourceNotFound(_)));
        let written = fs::read_dir(layout.iconset_dir(&cfg)).unwrap().count();
        assert_eq!(written, 1);
    }

    #[test]
    fn missing_or_malformed_manifest_is_fatal() {
        let (dir, layout, cfg) = project(None);
        let src = source(dir.path());
        assert!(matches!(generate(&src, &layout, &cfg), Err(ToolError::ManifestMissing(_))));

        fs::write(layout.manifest_path(&cfg), "{\"images\": 3}").unwrap();
        assert!(matches!(generate(&src, &layout, &cfg), Err(ToolError::ManifestMalformed { .. })));
    }

    #[test]
    fn undecodable_source_is_reported() {
        let (dir, layout, cfg) = project(Some(MANIFEST));
        let bogus = dir.path().join("bogus.png");
        fs::write(&bogus, b"not an image").unwrap();
        assert!(matches!(generate(&bogus, &layout, &cfg), Err(ToolError::ImageDecode { .. })));
    }

    #[test]
    fn write_failure_names_the_entry_and_stops() {
        let (dir, layout, cfg) = project(Some(
            r#"{"images": [
                {"filename": "ok.png", "size": "20x20"},
                {"filename": "blocked.png", "size": "20x20"},
                {"filename": "never.png", "size": "20x20"}
            ]}"#,
        ));
        // a directory where the file should go makes the write fail
        fs::create_dir(layout.iconset_dir(&cfg).join("blocked.png")).unwrap();
        let err = generate(&source(dir.path()), &layout, &cfg).unwrap_err();
        assert!(err.to_string().contains("blocked.png"), "{}", err);
        assert!(layout.iconset_dir(&cfg).join("ok.png").is_file());
        assert!(!layout.iconset_dir(&cfg).join("never.png").exists());
    }
}
