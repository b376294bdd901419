use clap::{ArgAction, Args, Parser, Subcommand};
use redact_core::{Degree, PageSize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redact")]
#[command(about = "Find and mask personal information in text, images and PDFs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact text given as an argument or on stdin
    Text {
        /// Text to redact (reads stdin when neither this nor --file is given)
        #[arg(conflicts_with = "file")]
        input: Option<String>,

        /// Read the text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Plan redaction rectangles for an image
    Image {
        /// Image file
        image: PathBuf,

        /// Layout result JSON (default: <image>.ocr.json)
        #[arg(long)]
        ocr: Option<PathBuf>,

        /// Face boxes JSON (default: <image>.faces.json, if present)
        #[arg(long)]
        faces: Option<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Plan redaction rectangles for a PDF
    Pdf {
        /// PDF file
        pdf: PathBuf,

        /// Layout result JSON (default: <pdf>.ocr.json)
        #[arg(long)]
        ocr: Option<PathBuf>,

        /// PDF page size in points, WIDTHxHEIGHT. Repeat once per page;
        /// a single value applies to every page (default from config: 612x792)
        #[arg(long, action = ArgAction::Append)]
        page_size: Vec<PageSize>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Show which classifier categories each degree redacts
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Show the active configuration
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Redaction degree: 0 (minimal), 1 (moderate), 2 (maximum). Out-of-range values are clamped
    #[arg(long, allow_negative_numbers = true)]
    pub degree: Option<i64>,

    /// Run the proper noun, number, URL and email guardrails
    #[arg(long, overrides_with = "no_guardrails")]
    pub guardrails: bool,

    /// Disable guardrails even if the config enables them
    #[arg(long, overrides_with = "guardrails")]
    pub no_guardrails: bool,

    /// Extra words to redact, comma separated
    #[arg(long)]
    pub words: Option<String>,

    /// Extra regex to redact; capture groups select what is masked
    #[arg(long)]
    pub regex: Option<String>,

    /// Print the full report as JSON
    #[arg(long, conflicts_with = "html")]
    pub json: bool,

    /// Print the decision trace as HTML fragments
    #[arg(long)]
    pub html: bool,
}

impl PolicyArgs {
    pub fn degree(&self) -> Option<Degree> {
        self.degree.map(Degree::from_level)
    }

    pub fn guardrails(&self) -> Option<bool> {
        if self.guardrails {
            Some(true)
        } else if self.no_guardrails {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_text_flags() {
        let cli = Cli::parse_from([
            "redact",
            "text",
            "Jane lives in Paris",
            "--degree",
            "7",
            "--guardrails",
            "--words",
            "Paris, Jane",
        ]);
        let Commands::Text { input, policy, .. } = cli.command else {
            panic!("expected text command");
        };
        assert_eq!(input.as_deref(), Some("Jane lives in Paris"));
        assert_eq!(policy.degree(), Some(Degree::Maximum));
        assert_eq!(policy.guardrails(), Some(true));
        assert_eq!(policy.words.as_deref(), Some("Paris, Jane"));
    }

    #[test]
    fn test_negative_degree_clamps() {
        let cli = Cli::parse_from(["redact", "text", "x", "--degree", "-3"]);
        let Commands::Text { policy, .. } = cli.command else {
            panic!("expected text command");
        };
        assert_eq!(policy.degree(), Some(Degree::Minimal));
        assert_eq!(policy.guardrails(), None);
    }

    #[test]
    fn test_last_guardrail_flag_wins() {
        let cli = Cli::parse_from(["redact", "text", "x", "--guardrails", "--no-guardrails"]);
        let Commands::Text { policy, .. } = cli.command else {
            panic!("expected text command");
        };
        assert_eq!(policy.guardrails(), Some(false));
    }

    #[test]
    fn test_text_input_and_file_conflict() {
        assert!(Cli::try_parse_from(["redact", "text", "x", "--file", "notes.txt"]).is_err());
    }

    #[test]
    fn test_pdf_page_sizes() {
        let cli = Cli::parse_from([
            "redact",
            "pdf",
            "form.pdf",
            "--page-size",
            "612x792",
            "--page-size",
            "595x842",
        ]);
        let Commands::Pdf { page_size, .. } = cli.command else {
            panic!("expected pdf command");
        };
        assert_eq!(
            page_size,
            vec![PageSize::LETTER, PageSize::new(595.0, 842.0)]
        );
    }

    #[test]
    fn test_page_size_leaves_positional_alone() {
        let cli = Cli::parse_from(["redact", "pdf", "--page-size", "612x792", "form.pdf"]);
        let Commands::Pdf { pdf, page_size, .. } = cli.command else {
            panic!("expected pdf command");
        };
        assert_eq!(pdf, PathBuf::from("form.pdf"));
        assert_eq!(page_size, vec![PageSize::LETTER]);
    }

    #[test]
    fn test_html_trace_flag() {
        let cli = Cli::parse_from(["redact", "text", "x", "--html"]);
        let Commands::Text { policy, .. } = cli.command else {
            panic!("expected text command");
        };
        assert!(policy.html);
        assert!(Cli::try_parse_from(["redact", "text", "x", "--html", "--json"]).is_err());
    }

    #[test]
    fn test_bad_page_size_rejected() {
        assert!(Cli::try_parse_from(["redact", "pdf", "f.pdf", "--page-size", "big"]).is_err());
    }
}
