//! Per-request redaction policy and caller-supplied targets.

use redact_core::{Degree, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// When the guardrail pass runs, applied identically to every medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardrailGate {
    /// Toggle on and degree at maximum.
    #[default]
    MaximumDegree,
    /// Toggle on, any degree.
    ToggleOnly,
}

impl GuardrailGate {
    pub fn allows(self, degree: Degree, toggle: bool) -> bool {
        match self {
            GuardrailGate::MaximumDegree => toggle && degree.is_maximum(),
            GuardrailGate::ToggleOnly => toggle,
        }
    }
}

/// Degree and guardrail configuration captured when a service is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    pub degree: Degree,
    pub guardrails: bool,
    #[serde(default)]
    pub gate: GuardrailGate,
}

impl RedactionPolicy {
    pub fn new(degree: Degree, guardrails: bool) -> Self {
        Self {
            degree,
            guardrails,
            gate: GuardrailGate::default(),
        }
    }

    pub fn with_gate(mut self, gate: GuardrailGate) -> Self {
        self.gate = gate;
        self
    }

    /// Whether the guardrail pass runs under this policy.
    pub fn guardrails_active(&self) -> bool {
        self.gate.allows(self.degree, self.guardrails)
    }
}

/// Literal words and a regex supplied with one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTargets {
    pub words: Vec<String>,
    pub regex: Option<String>,
}

impl CustomTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comma-delimited list; each item is further split on whitespace.
    pub fn with_words(mut self, list: &str) -> Self {
        self.words.extend(parse_word_list(list));
        self
    }

    /// An empty pattern means no regex.
    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.regex = (!pattern.is_empty()).then_some(pattern);
        self
    }

    /// Compile the caller's pattern. An invalid pattern is an input error.
    pub fn compile(&self) -> Result<Option<Regex>> {
        self.regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(Into::into)
    }

    /// Matches of the caller's regex in `text`.
    ///
    /// Without capture groups the whole match is kept; with one group, that
    /// group; with several, their concatenation.
    pub fn regex_matches(&self, text: &str) -> Result<Vec<String>> {
        let Some(regex) = self.compile()? else {
            return Ok(Vec::new());
        };
        Ok(extract_matches(&regex, text))
    }
}

pub fn parse_word_list(list: &str) -> Vec<String> {
    list.split(',')
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

fn extract_matches(regex: &Regex, text: &str) -> Vec<String> {
    let groups = regex.captures_len() - 1;
    regex
        .captures_iter(text)
        .map(|caps| match groups {
            0 => caps[0].to_string(),
            1 => caps.get(1).map_or("", |m| m.as_str()).to_string(),
            _ => caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .collect::<String>(),
        })
        .filter(|m| !m.trim().is_empty())
        .collect()
}
