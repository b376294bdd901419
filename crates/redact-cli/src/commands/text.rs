use anyhow::{Context, Result};
use redact_config::Config;
use redact_engine::TextRedactionService;
use std::io::Read;
use std::path::PathBuf;

use crate::cli::PolicyArgs;

pub async fn handle(
    config: &Config,
    input: Option<String>,
    file: Option<PathBuf>,
    args: PolicyArgs,
) -> Result<()> {
    let text = match (input, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let pipeline = super::build_pipeline(config, None, None)?;
    let service = TextRedactionService::new(pipeline.clone(), super::policy(config, &args));
    let outcome = service.redact(&text, &super::custom_targets(&args)).await?;
    pipeline.flush_training().await;

    let Some(report) = super::emit(outcome, args.json)? else {
        return Ok(());
    };

    println!("✓ Redacted {} occurrence(s)", report.artifact.masked_occurrences);
    super::print_summary(&report, args.html);
    println!("\n{}", report.artifact.text);

    Ok(())
}
