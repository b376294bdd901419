//! Regex scanners for numbers, URLs and emails.
//!
//! Each scanner joins the token list with single spaces and scans the joined
//! text, never the filtered entity set.

use lazy_static::lazy_static;
use regex::{Match, Regex};

lazy_static! {
    static ref NUMBER_REGEX: Regex = Regex::new(r"\b\d+[\d.,-]*\b").unwrap();

    // Only the hostname group is kept
    static ref URL_REGEX: Regex =
        Regex::new(r"(?:https?://)?(?:www\.)?([\w.-]+\.\w+)").unwrap();

    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap();

    // "jane at example dot org"
    static ref OBFUSCATED_EMAIL_REGEX: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+\s?at\s?[A-Za-z0-9.-]+\s?dot\s?[A-Za-z]{2,}").unwrap();
}

/// Every number-like run, e.g. `123-45-6789` or `1,000.50`.
pub fn numbers<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let text = join(tokens);
    NUMBER_REGEX
        .find_iter(&text)
        .filter_map(|m| non_empty(m.as_str()))
        .collect()
}

/// Hostnames, with any scheme or `www.` prefix stripped.
pub fn urls<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let text = join(tokens);
    URL_REGEX
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| non_empty(m.as_str()))
        .collect()
}

/// Plain and spelled-out email addresses.
///
/// Matches touching a `*` are skipped: those are already-masked tokens.
pub fn emails<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let text = join(tokens);
    [&*EMAIL_REGEX, &*OBFUSCATED_EMAIL_REGEX]
        .into_iter()
        .flat_map(|re| re.find_iter(&text).collect::<Vec<_>>())
        .filter(|m| !touches_mask(&text, m))
        .filter_map(|m| non_empty(m.as_str()))
        .collect()
}

fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn touches_mask(text: &str, m: &Match<'_>) -> bool {
    text[..m.start()].ends_with('*') || text[m.end()..].starts_with('*')
}
