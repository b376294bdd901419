//! Proper-noun guardrail.
//!
//! Tokens are tagged one at a time with no sentence context, which leans
//! toward over-flagging capitalised words.

use std::collections::BTreeSet;

/// Part-of-speech decision for a single isolated token.
pub trait ProperNounTagger: Send + Sync {
    fn is_proper_noun(&self, token: &str) -> bool;
}

/// Capitalisation-based tagger.
///
/// A token is a proper noun when its first letter is uppercase and it is not
/// a closed-class word (determiner, pronoun, preposition, conjunction,
/// auxiliary).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTagger;

const CLOSED_CLASS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "down", "during", "each", "either", "every", "few",
    "for", "from", "had", "has", "have", "he", "her", "here", "hers", "him", "his", "how", "i",
    "if", "in", "into", "is", "it", "its", "just", "many", "may", "me", "might", "mine", "more",
    "most", "must", "my", "neither", "no", "nor", "not", "of", "off", "on", "once", "only", "onto",
    "or", "our", "ours", "out", "over", "shall", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "though", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
    "when", "where", "whether", "which", "while", "who", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours",
];

impl ProperNounTagger for HeuristicTagger {
    fn is_proper_noun(&self, token: &str) -> bool {
        let core = token.trim_matches(|c: char| !c.is_alphanumeric());
        let Some(first) = core.chars().next() else {
            return false;
        };
        if !first.is_uppercase() {
            return false;
        }
        let lowered = core.to_lowercase();
        CLOSED_CLASS.binary_search(&lowered.as_str()).is_err()
    }
}

/// Tokens tagged as proper nouns, deduplicated.
pub fn proper_nouns<S: AsRef<str>>(tokens: &[S], tagger: &dyn ProperNounTagger) -> Vec<String> {
    tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && tagger.is_proper_noun(t))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_class_is_sorted() {
        assert!(CLOSED_CLASS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_heuristic_tagging() {
        let tagger = HeuristicTagger;

        assert!(tagger.is_proper_noun("Paris"));
        assert!(tagger.is_proper_noun("Paris,"));
        assert!(tagger.is_proper_noun("SSN"));
        assert!(!tagger.is_proper_noun("The"));
        assert!(!tagger.is_proper_noun("My"));
        assert!(!tagger.is_proper_noun("I"));
        assert!(!tagger.is_proper_noun("live"));
        assert!(!tagger.is_proper_noun("123"));
        assert!(!tagger.is_proper_noun("--"));
    }

    #[test]
    fn test_proper_nouns_are_deduplicated() {
        let tokens = ["Jane", "met", "Jane", "in", "Paris", "The", ""];
        let found = proper_nouns(&tokens, &HeuristicTagger);

        assert_eq!(found, vec!["Jane", "Paris"]);
    }
}
