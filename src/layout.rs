use std::path::{Path, PathBuf};

use crate::config::{IconSetConfig, SilhouetteConfig};

/// Resolves the project-relative locations the tools read from and write to.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    /// Absolute paths are kept as-is; relative ones hang off the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() { path.to_path_buf() } else { self.root.join(path) }
    }

    pub fn iconset_dir(&self, cfg: &IconSetConfig) -> PathBuf { self.resolve(&cfg.iconset_dir) }

    pub fn manifest_path(&self, cfg: &IconSetConfig) -> PathBuf {
        self.iconset_dir(cfg).join(&cfg.manifest_name)
    }

    pub fn silhouette_candidates(&self, cfg: &SilhouetteConfig) -> Vec<PathBuf> {
        cfg.candidates.iter().map(|p| self.resolve(p)).collect()
    }

    pub fn drawable_dir(&self, cfg: &SilhouetteConfig) -> PathBuf { self.resolve(&cfg.drawable_dir) }

    pub fn notification_icon(&self, cfg: &SilhouetteConfig) -> PathBuf {
        self.drawable_dir(cfg).join(format!("{}.png", cfg.resource_name))
    }

    /// Vector placeholder that would shadow the generated PNG.
    pub fn legacy_vector(&self, cfg: &SilhouetteConfig) -> PathBuf {
        self.drawable_dir(cfg).join(format!("{}.xml", cfg.resource_name))
    }

    pub fn fallback_icon(&self, cfg: &SilhouetteConfig) -> PathBuf {
        let dir = match &cfg.fallback_dir {
            Some(dir) => self.resolve(dir),
            None => executable_dir().unwrap_or_else(|| self.root.clone()),
        };
        dir.join(format!("{}.png", cfg.resource_name))
    }
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe().ok()?.parent().map(Path::to_path_buf)
}
