use anyhow::Result;
use redact_config::Config;
use redact_core::PageSize;
use redact_engine::PdfRedactionService;
use std::path::PathBuf;

use crate::cli::PolicyArgs;

pub async fn handle(
    config: &Config,
    pdf: PathBuf,
    ocr: Option<PathBuf>,
    page_size: Vec<PageSize>,
    args: PolicyArgs,
) -> Result<()> {
    // The service stretches a single size over every page
    let page_sizes = if page_size.is_empty() {
        vec![config.pdf.page_size]
    } else {
        page_size
    };

    let pipeline = super::build_pipeline(config, ocr, None)?;
    let service = PdfRedactionService::new(pipeline.clone(), super::policy(config, &args));
    let outcome = service
        .redact(&pdf, &page_sizes, &super::custom_targets(&args))
        .await?;
    pipeline.flush_training().await;

    let Some(report) = super::emit(outcome, args.json)? else {
        return Ok(());
    };

    println!(
        "✓ Planned {} rectangle(s) across {} page(s) of {}",
        report.artifact.rect_count(),
        report.artifact.pages.len(),
        pdf.display()
    );
    super::print_summary(&report, args.html);

    for page in &report.artifact.pages {
        println!(
            "\nPage {} ({}x{} pt):",
            page.page_index + 1,
            page.page_size.width,
            page.page_size.height
        );
        for rect in &page.rects {
            println!(
                "  {:.1}, {:.1}, {:.1}, {:.1}",
                rect.x_min, rect.y_min, rect.x_max, rect.y_max
            );
        }
    }

    Ok(())
}
