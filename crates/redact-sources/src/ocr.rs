//! Layout extraction results read from disk.
//!
//! Extraction runs out of process; the pipeline consumes its JSON output,
//! either a bare document or the `analyzeResult` envelope a hosted layout
//! service returns.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use redact_core::OcrDocument;
use redact_engine::OcrEngine;
use serde::Deserialize;
use tracing::debug;

use crate::sidecar;

#[derive(Deserialize)]
#[serde(untagged)]
enum OcrPayload {
    Wrapped {
        #[serde(rename = "analyzeResult")]
        analyze_result: OcrDocument,
    },
    Bare(OcrDocument),
}

impl OcrPayload {
    fn into_document(self) -> OcrDocument {
        match self {
            OcrPayload::Wrapped { analyze_result } => analyze_result,
            OcrPayload::Bare(document) => document,
        }
    }
}

/// Reads `<media>.ocr.json` next to the input, or one fixed file.
#[derive(Debug, Clone, Default)]
pub struct OcrResultFile {
    path: Option<PathBuf>,
}

impl OcrResultFile {
    pub fn sidecar() -> Self {
        Self { path: None }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn resolve(&self, media: &Path) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => sidecar(media, "ocr.json"),
        }
    }
}

pub fn parse_document(json: &str) -> anyhow::Result<OcrDocument> {
    let payload: OcrPayload = serde_json::from_str(json)
        .context("Layout result is neither a document nor an analyzeResult envelope")?;
    Ok(payload.into_document())
}

#[async_trait]
impl OcrEngine for OcrResultFile {
    async fn extract(&self, media: &Path) -> anyhow::Result<OcrDocument> {
        let path = self.resolve(media);
        let json = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read layout result {}", path.display()))?;

        let document = parse_document(&json)?;
        debug!(
            "Loaded {} page(s) of layout for {}",
            document.pages.len(),
            media.display()
        );
        Ok(document)
    }
}
