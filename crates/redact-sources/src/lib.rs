//! Adapters for the external collaborators the redaction pipeline drives

pub mod classifier;
pub mod detections;
pub mod ocr;
pub mod safety;
pub mod training;

pub use classifier::HttpClassifier;
pub use detections::FaceBoxFile;
pub use ocr::OcrResultFile;
pub use safety::HttpContentSafety;
pub use training::JsonlTrainingSink;

use std::path::{Path, PathBuf};

/// `scan.png` + `ocr.json` -> `scan.png.ocr.json`
pub(crate) fn sidecar(media: &Path, suffix: &str) -> PathBuf {
    let mut name = media.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar(Path::new("in/scan.png"), "ocr.json"),
            PathBuf::from("in/scan.png.ocr.json")
        );
    }
}
