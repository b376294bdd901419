//! Interfaces to the external services the pipeline drives.
//!
//! Model-backed collaborators are expensive to construct: build them once at
//! start-up and share them behind an `Arc`. Implementations must tolerate
//! concurrent calls from simultaneous requests.

use std::path::Path;

use async_trait::async_trait;
use redact_core::{ClassifiedEntity, OcrDocument, TrainingExample};
use serde::{Deserialize, Serialize};

/// Span/category token classifier.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> anyhow::Result<Vec<ClassifiedEntity>>;
}

/// Object detector filtered to a single class of interest.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// `[x_min, y_min, x_max, y_max]` boxes in image pixels.
    async fn detect(&self, image: &Path) -> anyhow::Result<Vec<[f64; 4]>>;
}

/// Document layout extraction.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn extract(&self, media: &Path) -> anyhow::Result<OcrDocument>;
}

/// Content-safety screening.
#[async_trait]
pub trait ContentSafety: Send + Sync {
    async fn screen_text(&self, text: &str) -> anyhow::Result<SafetyVerdict>;

    async fn screen_image(&self, image: &Path) -> anyhow::Result<SafetyVerdict>;
}

/// Fire-and-forget training-data sink.
#[async_trait]
pub trait TrainingSink: Send + Sync {
    async fn record(&self, examples: &[TrainingExample]) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    Hate,
    SelfHarm,
    Sexual,
    Violence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeverity {
    pub category: HarmCategory,
    pub severity: u8,
}

/// Per-category severities reported by a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub severities: Vec<CategorySeverity>,
}

impl SafetyVerdict {
    /// Categories at or above `threshold`.
    pub fn flagged_categories(&self, threshold: u8) -> Vec<HarmCategory> {
        self.severities
            .iter()
            .filter(|s| s.severity >= threshold)
            .map(|s| s.category)
            .collect()
    }

    pub fn is_flagged(&self, threshold: u8) -> bool {
        self.severities.iter().any(|s| s.severity >= threshold)
    }
}

/// Screen that passes everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScreening;

#[async_trait]
impl ContentSafety for NoScreening {
    async fn screen_text(&self, _text: &str) -> anyhow::Result<SafetyVerdict> {
        Ok(SafetyVerdict::default())
    }

    async fn screen_image(&self, _image: &Path) -> anyhow::Result<SafetyVerdict> {
        Ok(SafetyVerdict::default())
    }
}

/// Detector that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetections;

#[async_trait]
impl FaceDetector for NoDetections {
    async fn detect(&self, _image: &Path) -> anyhow::Result<Vec<[f64; 4]>> {
        Ok(Vec::new())
    }
}

/// Sink that drops every example.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

#[async_trait]
impl TrainingSink for DiscardSink {
    async fn record(&self, _examples: &[TrainingExample]) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_threshold() {
        let verdict = SafetyVerdict {
            severities: vec![
                CategorySeverity {
                    category: HarmCategory::Hate,
                    severity: 2,
                },
                CategorySeverity {
                    category: HarmCategory::Violence,
                    severity: 4,
                },
            ],
        };

        assert!(verdict.is_flagged(4));
        assert!(!verdict.is_flagged(6));
        assert_eq!(verdict.flagged_categories(4), vec![HarmCategory::Violence]);
        assert_eq!(verdict.flagged_categories(2).len(), 2);
    }

    #[tokio::test]
    async fn test_no_screening_passes() {
        let verdict = NoScreening.screen_text("anything").await.unwrap();
        assert!(!verdict.is_flagged(0));
    }
}
