use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("no source icon found; looked for:\n{}", list_paths(.candidates))]
    NoSourceFound { candidates: Vec<PathBuf> },
    #[error("could not decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("manifest not found: {}", .0.display())]
    ManifestMissing(PathBuf),
    #[error("malformed manifest {}: {reason}", .path.display())]
    ManifestMalformed { path: PathBuf, reason: String },
    #[error("permission denied writing {}", .0.display())]
    WritePermissionDenied(PathBuf),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl ToolError {
    /// Classify an I/O failure at `path`, singling out permission problems.
    pub fn from_write(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        if err.kind() == io::ErrorKind::PermissionDenied {
            ToolError::WritePermissionDenied(path)
        } else {
            ToolError::Write { path, source: err }
        }
    }
}

fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
