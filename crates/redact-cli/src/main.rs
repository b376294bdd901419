mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use redact_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let (config, config_path) = match &cli.config {
        Some(path) => (Config::load_from(path)?, path.clone()),
        None => (Config::load()?, Config::config_path()),
    };

    match cli.command {
        cli::Commands::Text {
            input,
            file,
            policy,
        } => commands::text::handle(&config, input, file, policy).await,
        cli::Commands::Image {
            image,
            ocr,
            faces,
            policy,
        } => commands::image::handle(&config, image, ocr, faces, policy).await,
        cli::Commands::Pdf {
            pdf,
            ocr,
            page_size,
            policy,
        } => commands::pdf::handle(&config, pdf, ocr, page_size, policy).await,
        cli::Commands::Categories { json } => commands::categories::handle(json),
        cli::Commands::Config => commands::config::handle(&config, &config_path),
    }
}
