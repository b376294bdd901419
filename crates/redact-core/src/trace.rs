//! Explainable record of which stage flagged what during one request.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Assistant,
    GuardrailProperNouns,
    GuardrailNumbers,
    GuardrailUrls,
    GuardrailEmails,
    Faces,
}

impl Stage {
    pub fn heading(self) -> &'static str {
        match self {
            Stage::Assistant => "assistant",
            Stage::GuardrailProperNouns => "guardrail: redacting proper nouns",
            Stage::GuardrailNumbers => "guardrail: redacting numbers",
            Stage::GuardrailUrls => "guardrail: redacting urls",
            Stage::GuardrailEmails => "guardrail: redacting emails",
            Stage::Faces => "detector: redacting faces",
        }
    }

    fn subject(self) -> &'static str {
        match self {
            Stage::Assistant => "Redacting words",
            Stage::GuardrailProperNouns => "Redacting Proper Nouns",
            Stage::GuardrailNumbers => "Redacting Numbers",
            Stage::GuardrailUrls => "Redacting URLs",
            Stage::GuardrailEmails => "Redacting Emails",
            Stage::Faces => "Redacting face regions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub stage: Stage,
    pub heading: String,
    pub detail: String,
}

/// Append-only, built once per request and returned with the artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the items a stage selected.
    pub fn record<I, S>(&mut self, stage: Stage, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let quoted: Vec<String> = items
            .into_iter()
            .map(|item| format!("'{}'", item.as_ref()))
            .collect();
        self.entries.push(TraceEntry {
            stage,
            heading: stage.heading().to_string(),
            detail: format!("{}: [{}]", stage.subject(), quoted.join(", ")),
        });
    }

    /// Record a free-form note for a stage.
    pub fn note(&mut self, stage: Stage, detail: impl Into<String>) {
        self.entries.push(TraceEntry {
            stage,
            heading: stage.heading().to_string(),
            detail: detail.into(),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.entries.iter().map(|e| e.stage)
    }

    /// `<h4>`/`<p>` pairs as consumed by the web front-end.
    pub fn to_html(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| {
                [
                    format!("<h4>{}</h4>", escape_html(&e.heading)),
                    format!("<p>{}</p>", escape_html(&e.detail)),
                ]
            })
            .collect()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "[{}] {}", entry.heading, entry.detail)?;
        }
        Ok(())
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut trace = Trace::new();
        trace.record(Stage::Assistant, ["Jane", "Paris"]);
        trace.record(Stage::GuardrailNumbers, Vec::<String>::new());

        let stages: Vec<_> = trace.stages().collect();
        assert_eq!(stages, vec![Stage::Assistant, Stage::GuardrailNumbers]);
        assert_eq!(trace.entries()[0].detail, "Redacting words: ['Jane', 'Paris']");
        assert_eq!(trace.entries()[1].detail, "Redacting Numbers: []");
    }

    #[test]
    fn test_html_rendering_escapes() {
        let mut trace = Trace::new();
        trace.record(Stage::GuardrailEmails, ["<a@b.co>"]);

        let html = trace.to_html();
        assert_eq!(html.len(), 2);
        assert_eq!(html[0], "<h4>guardrail: redacting emails</h4>");
        assert_eq!(html[1], "<p>Redacting Emails: ['&lt;a@b.co&gt;']</p>");
    }
}
