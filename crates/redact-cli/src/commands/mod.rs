pub mod categories;
pub mod config;
pub mod image;
pub mod pdf;
pub mod text;

use anyhow::Result;
use redact_config::Config;
use redact_engine::{
    CustomTargets, Pipeline, RedactionOutcome, RedactionPolicy, RedactionReport,
};
use redact_sources::{
    FaceBoxFile, HttpClassifier, HttpContentSafety, JsonlTrainingSink, OcrResultFile,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::cli::PolicyArgs;

/// Wire the configured collaborators into one shared pipeline.
pub fn build_pipeline(
    config: &Config,
    ocr: Option<PathBuf>,
    faces: Option<PathBuf>,
) -> Result<Arc<Pipeline>> {
    let classifier = HttpClassifier::new(
        config.classifier.endpoint.clone(),
        config.classifier.token(),
        config.classifier.timeout(),
    )?;

    let mut pipeline = Pipeline::new(Arc::new(classifier))
        .with_settings(config.settings())
        .with_ocr(Arc::new(ocr_source(ocr)))
        .with_detector(Arc::new(match faces {
            Some(path) => FaceBoxFile::at(path),
            None => FaceBoxFile::sidecar(),
        }));

    if config.safety.enabled {
        let safety = HttpContentSafety::new(
            config.safety.endpoint.clone(),
            config.safety.key()?,
            config.safety.timeout(),
        )?;
        pipeline = pipeline.with_safety(Arc::new(safety));
    } else {
        debug!("Content safety screening disabled");
    }

    if let Some(path) = &config.training.path {
        pipeline = pipeline.with_training_sink(Arc::new(JsonlTrainingSink::new(path)));
    }

    Ok(Arc::new(pipeline))
}

fn ocr_source(ocr: Option<PathBuf>) -> OcrResultFile {
    match ocr {
        Some(path) => OcrResultFile::at(path),
        None => OcrResultFile::sidecar(),
    }
}

pub fn policy(config: &Config, args: &PolicyArgs) -> RedactionPolicy {
    config.policy(args.degree(), args.guardrails())
}

pub fn custom_targets(args: &PolicyArgs) -> CustomTargets {
    let mut custom = CustomTargets::new();
    if let Some(words) = &args.words {
        custom = custom.with_words(words);
    }
    if let Some(regex) = &args.regex {
        custom = custom.with_regex(regex.clone());
    }
    custom
}

/// Print a JSON report, or the flagged notice and hand back the report.
pub fn emit<T: Serialize>(
    outcome: RedactionOutcome<T>,
    json: bool,
) -> Result<Option<RedactionReport<T>>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(None);
    }

    match outcome {
        RedactionOutcome::Flagged { categories } => {
            println!("✗ Content flagged by safety screening; nothing was redacted");
            let names: Vec<String> = categories.iter().map(|c| format!("{:?}", c)).collect();
            println!("  Categories: {}", names.join(", "));
            Ok(None)
        }
        RedactionOutcome::Redacted(report) => Ok(Some(report)),
    }
}

/// Header and decision trace shared by every medium.
pub fn print_summary<T>(report: &RedactionReport<T>, html: bool) {
    println!("  Request: {}", report.request_id);
    println!("  Degree: {}", report.degree);
    println!(
        "  Guardrails: {}",
        if report.guardrails_applied { "applied" } else { "off" }
    );
    println!("  Targets ({}):", report.targets.len());
    for target in report.targets.iter() {
        println!("    {}", target);
    }

    if report.trace.is_empty() {
        return;
    }
    println!("\nTrace:");
    if html {
        for fragment in report.trace.to_html() {
            println!("  {}", fragment);
        }
    } else {
        for entry in report.trace.entries() {
            println!("  {}", entry.heading);
            println!("    {}", entry.detail);
        }
    }
}
