//! Append-only JSON Lines store for weak training labels.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use redact_core::TrainingExample;
use redact_engine::TrainingSink;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

pub struct JsonlTrainingSink {
    path: PathBuf,
    // One writer at a time so lines from concurrent requests never interleave.
    lock: Mutex<()>,
}

impl JsonlTrainingSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TrainingSink for JsonlTrainingSink {
    async fn record(&self, examples: &[TrainingExample]) -> anyhow::Result<()> {
        if examples.is_empty() {
            return Ok(());
        }

        let mut buf = Vec::new();
        for example in examples {
            serde_json::to_writer(&mut buf, example)?;
            buf.push(b'\n');
        }

        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(&buf).await?;
        file.flush().await?;

        debug!("Recorded {} training labels", examples.len());
        Ok(())
    }
}
