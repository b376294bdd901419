//! Token-classification model served over HTTP.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use redact_core::ClassifiedEntity;
use redact_engine::Classifier;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    parameters: ClassifyParameters,
}

#[derive(Serialize)]
struct ClassifyParameters {
    aggregation_strategy: &'static str,
}

/// Client for an inference endpoint that takes `{"inputs": text}` and
/// returns `[{"entity_group", "word", "score"}, ..]`.
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpClassifier {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("redact/0.1 (token classifier client)")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str) -> anyhow::Result<Vec<ClassifiedEntity>> {
        let body = ClassifyRequest {
            inputs: text,
            parameters: ClassifyParameters {
                aggregation_strategy: "first",
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach classifier at {}", self.endpoint))?
            .error_for_status()
            .context("Classifier returned an error status")?;

        let entities: Vec<ClassifiedEntity> = response
            .json()
            .await
            .context("Classifier returned an unexpected payload")?;

        debug!("Classifier returned {} entities", entities.len());
        Ok(entities)
    }
}
