//! Content-safety screening over HTTP.
//!
//! Speaks the `text:analyze` / `image:analyze` API shape: per-category
//! severities under `categoriesAnalysis`.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use redact_engine::{CategorySeverity, ContentSafety, HarmCategory, SafetyVerdict};
use serde::Deserialize;
use serde_json::json;

const API_VERSION: &str = "2023-10-01";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    categories_analysis: Vec<CategoryAnalysis>,
}

#[derive(Debug, Deserialize)]
struct CategoryAnalysis {
    category: String,
    #[serde(default)]
    severity: Option<u8>,
}

impl AnalyzeResponse {
    fn into_verdict(self) -> SafetyVerdict {
        let severities = self
            .categories_analysis
            .into_iter()
            .filter_map(|c| {
                Some(CategorySeverity {
                    category: parse_category(&c.category)?,
                    severity: c.severity.unwrap_or(0),
                })
            })
            .collect();
        SafetyVerdict { severities }
    }
}

fn parse_category(name: &str) -> Option<HarmCategory> {
    match name {
        "Hate" => Some(HarmCategory::Hate),
        "SelfHarm" => Some(HarmCategory::SelfHarm),
        "Sexual" => Some(HarmCategory::Sexual),
        "Violence" => Some(HarmCategory::Violence),
        _ => None,
    }
}

pub struct HttpContentSafety {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl HttpContentSafety {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("redact/0.1 (content safety client)")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            key: key.into(),
        })
    }

    async fn analyze(
        &self,
        operation: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<SafetyVerdict> {
        let url = format!(
            "{}/contentsafety/{}?api-version={}",
            self.endpoint, operation, API_VERSION
        );

        let response: AnalyzeResponse = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach content safety at {}", url))?
            .error_for_status()
            .context("Content safety returned an error status")?
            .json()
            .await
            .context("Content safety returned an unexpected payload")?;

        Ok(response.into_verdict())
    }
}

#[async_trait]
impl ContentSafety for HttpContentSafety {
    async fn screen_text(&self, text: &str) -> anyhow::Result<SafetyVerdict> {
        self.analyze("text:analyze", json!({ "text": text })).await
    }

    async fn screen_image(&self, image: &Path) -> anyhow::Result<SafetyVerdict> {
        let bytes = tokio::fs::read(image)
            .await
            .with_context(|| format!("Failed to read image {}", image.display()))?;
        let content = base64::engine::general_purpose::STANDARD.encode(bytes);
        self.analyze("image:analyze", json!({ "image": { "content": content } }))
            .await
    }
}
