//! Secondary pattern-based detectors layered on top of the classifier
//!
//! Four independent scanners run over the whitespace tokens of the original
//! content:
//! - proper nouns (isolated-token tagging)
//! - numbers
//! - URL hostnames
//! - plain and spelled-out emails

pub mod patterns;
pub mod proper_nouns;

pub use proper_nouns::{HeuristicTagger, ProperNounTagger};

use redact_core::{EntitySpan, SpanSource, Stage, Trace};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Output of one guardrail pass, one list per scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardrailReport {
    pub proper_nouns: Vec<String>,
    pub numbers: Vec<String>,
    pub urls: Vec<String>,
    pub emails: Vec<String>,
}

impl GuardrailReport {
    /// Run every scanner over `tokens`.
    pub fn scan<S: AsRef<str>>(tokens: &[S], tagger: &dyn ProperNounTagger) -> Self {
        let report = Self {
            proper_nouns: proper_nouns::proper_nouns(tokens, tagger),
            numbers: patterns::numbers(tokens),
            urls: patterns::urls(tokens),
            emails: patterns::emails(tokens),
        };

        debug!(
            "Guardrails flagged {} proper nouns, {} numbers, {} urls, {} emails",
            report.proper_nouns.len(),
            report.numbers.len(),
            report.urls.len(),
            report.emails.len()
        );

        report
    }

    /// Every flagged string tagged with the scanner that found it.
    pub fn spans(&self) -> impl Iterator<Item = EntitySpan> + '_ {
        let tagged = [
            (SpanSource::GuardrailProperNoun, &self.proper_nouns),
            (SpanSource::GuardrailNumber, &self.numbers),
            (SpanSource::GuardrailUrl, &self.urls),
            (SpanSource::GuardrailEmail, &self.emails),
        ];
        tagged.into_iter().flat_map(|(source, words)| {
            words.iter().map(move |w| EntitySpan::new(w.clone(), source))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.proper_nouns.is_empty()
            && self.numbers.is_empty()
            && self.urls.is_empty()
            && self.emails.is_empty()
    }

    /// Append one trace entry per scanner, in scan order.
    pub fn record(&self, trace: &mut Trace) {
        trace.record(Stage::GuardrailProperNouns, &self.proper_nouns);
        trace.record(Stage::GuardrailNumbers, &self.numbers);
        trace.record(Stage::GuardrailUrls, &self.urls);
        trace.record(Stage::GuardrailEmails, &self.emails);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_runs_every_guardrail() {
        let text = "Jane paid 250 to shop.example.com, write jane@example.com";
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let report = GuardrailReport::scan(&tokens, &HeuristicTagger);

        assert_eq!(report.proper_nouns, vec!["Jane"]);
        assert_eq!(report.numbers, vec!["250"]);
        assert!(report.urls.contains(&"shop.example.com".to_string()));
        assert_eq!(report.emails, vec!["jane@example.com"]);
    }

    #[test]
    fn test_spans_are_tagged_by_scanner() {
        let report = GuardrailReport {
            proper_nouns: vec!["Jane".to_string()],
            numbers: vec!["42".to_string()],
            urls: vec![],
            emails: vec!["a@b.io".to_string()],
        };

        let spans: Vec<_> = report.spans().collect();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].source, SpanSource::GuardrailProperNoun);
        assert_eq!(spans[1].source, SpanSource::GuardrailNumber);
        assert_eq!(spans[2].source, SpanSource::GuardrailEmail);
        assert!(spans.iter().all(|s| s.category.is_none()));
    }

    #[test]
    fn test_record_appends_four_entries() {
        let mut trace = Trace::new();
        GuardrailReport::default().record(&mut trace);

        let stages: Vec<_> = trace.stages().collect();
        assert_eq!(
            stages,
            vec![
                Stage::GuardrailProperNouns,
                Stage::GuardrailNumbers,
                Stage::GuardrailUrls,
                Stage::GuardrailEmails,
            ]
        );
    }

    #[test]
    fn test_empty_tokens_yield_empty_report() {
        let tokens: Vec<String> = Vec::new();
        let report = GuardrailReport::scan(&tokens, &HeuristicTagger);
        assert!(report.is_empty());
    }
}
