//! Face boxes produced by an out-of-process detector.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use redact_engine::FaceDetector;
use tracing::debug;

use crate::sidecar;

/// Reads `[[x_min, y_min, x_max, y_max], ..]` from `<image>.faces.json`,
/// or from one fixed file.
///
/// A missing sidecar means no faces. A missing fixed file is an error.
#[derive(Debug, Clone, Default)]
pub struct FaceBoxFile {
    path: Option<PathBuf>,
}

impl FaceBoxFile {
    pub fn sidecar() -> Self {
        Self { path: None }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

async fn read_boxes(path: &Path) -> anyhow::Result<Vec<[f64; 4]>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read face boxes {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Face boxes in {} are not [[x1, y1, x2, y2], ..]", path.display()))
}

#[async_trait]
impl FaceDetector for FaceBoxFile {
    async fn detect(&self, image: &Path) -> anyhow::Result<Vec<[f64; 4]>> {
        if let Some(path) = &self.path {
            return read_boxes(path).await;
        }

        let path = sidecar(image, "faces.json");
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("No face sidecar at {}", path.display());
            return Ok(Vec::new());
        }
        read_boxes(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sidecar_boxes() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("team.jpg");
        std::fs::write(
            dir.path().join("team.jpg.faces.json"),
            "[[10, 20, 110, 140], [200.5, 30, 260, 90]]",
        )
        .unwrap();

        let boxes = FaceBoxFile::sidecar().detect(&image).await.unwrap();
        assert_eq!(boxes, vec![[10.0, 20.0, 110.0, 140.0], [200.5, 30.0, 260.0, 90.0]]);
    }

    #[tokio::test]
    async fn test_missing_sidecar_is_empty() {
        let dir = TempDir::new().unwrap();
        let boxes = FaceBoxFile::sidecar()
            .detect(&dir.path().join("nobody.jpg"))
            .await
            .unwrap();
        assert!(boxes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_explicit_file_errors() {
        let dir = TempDir::new().unwrap();
        let detector = FaceBoxFile::at(dir.path().join("faces.json"));
        assert!(detector.detect(Path::new("any.jpg")).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_boxes_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faces.json");
        std::fs::write(&path, "[[1, 2, 3]]").unwrap();

        let err = FaceBoxFile::at(&path)
            .detect(Path::new("any.jpg"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("are not"));
    }
}
