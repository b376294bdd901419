use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Classification failed: {0}")]
    Classification(#[source] anyhow::Error),

    #[error("OCR extraction failed: {0}")]
    Ocr(#[source] anyhow::Error),

    #[error("Object detection failed: {0}")]
    Detection(#[source] anyhow::Error),

    #[error("Content safety screening failed: {0}")]
    Safety(#[source] anyhow::Error),

    #[error("OCR reported {ocr} pages but {provided} page sizes were provided")]
    PageSizeMismatch { ocr: usize, provided: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
