use anyhow::Result;
use redact_config::Config;
use redact_engine::ImageRedactionService;
use std::path::PathBuf;

use crate::cli::PolicyArgs;

pub async fn handle(
    config: &Config,
    image: PathBuf,
    ocr: Option<PathBuf>,
    faces: Option<PathBuf>,
    args: PolicyArgs,
) -> Result<()> {
    let pipeline = super::build_pipeline(config, ocr, faces)?;
    let service = ImageRedactionService::new(pipeline.clone(), super::policy(config, &args));
    let outcome = service.redact(&image, &super::custom_targets(&args)).await?;
    pipeline.flush_training().await;

    let Some(report) = super::emit(outcome, args.json)? else {
        return Ok(());
    };

    println!(
        "✓ Planned {} rectangle(s) for {}",
        report.artifact.rects.len(),
        image.display()
    );
    super::print_summary(&report, args.html);

    if !report.artifact.rects.is_empty() {
        println!("\nRectangles (x_min, y_min, x_max, y_max):");
        for rect in &report.artifact.rects {
            println!(
                "  {:.1}, {:.1}, {:.1}, {:.1}",
                rect.x_min, rect.y_min, rect.x_max, rect.y_max
            );
        }
    }

    Ok(())
}
