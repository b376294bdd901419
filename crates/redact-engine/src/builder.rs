//! Merges every candidate source into one ordered target list.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use redact_core::{EntitySpan, SpanSource};
use redact_guardrails::GuardrailReport;
use serde::{Deserialize, Serialize};

/// Whether a candidate survives the noise rule: longer than one character,
/// or entirely numeric.
pub fn is_redactable(word: &str) -> bool {
    let trimmed = word.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) => c.is_numeric(),
        (Some(_), Some(_)) => true,
    }
}

/// Final, de-duplicated redaction targets.
///
/// Targets are ordered by descending character length so that a shorter
/// target is never applied inside a longer one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedactionTargets {
    targets: Vec<String>,
    provenance: BTreeMap<String, BTreeSet<SpanSource>>,
}

impl RedactionTargets {
    pub fn as_slice(&self) -> &[String] {
        &self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, target: &str) -> bool {
        self.provenance.contains_key(target)
    }

    /// Detectors that proposed `target`.
    pub fn sources(&self, target: &str) -> Option<&BTreeSet<SpanSource>> {
        self.provenance.get(target)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RedactionSetBuilder {
    spans: Vec<EntitySpan>,
}

impl RedactionSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(mut self, spans: impl IntoIterator<Item = EntitySpan>) -> Self {
        self.spans.extend(spans);
        self
    }

    /// Plain words attributed to one source.
    pub fn words<I, S>(mut self, words: I, source: SpanSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spans
            .extend(words.into_iter().map(|w| EntitySpan::new(w, source)));
        self
    }

    /// Guardrail output, when the guardrails ran.
    pub fn guardrails(self, report: Option<&GuardrailReport>) -> Self {
        match report {
            Some(report) => self.spans(report.spans()),
            None => self,
        }
    }

    /// Distinct trimmed candidates before the noise rule, sorted.
    pub fn candidates(&self) -> BTreeSet<&str> {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn build(self) -> RedactionTargets {
        let mut provenance: BTreeMap<String, BTreeSet<SpanSource>> = BTreeMap::new();
        for span in self.spans {
            let text = span.text.trim();
            if !is_redactable(text) {
                continue;
            }
            provenance
                .entry(text.to_string())
                .or_default()
                .insert(span.source);
        }

        let mut targets: Vec<String> = provenance.keys().cloned().collect();
        targets.sort_by_key(|t| Reverse(t.chars().count()));

        RedactionTargets {
            targets,
            provenance,
        }
    }
}
