//! Resolves targets to positions: masked spans in text, polygons in OCR media.

use redact_core::{OcrDocument, PageSize, Region, WordRecord};
use serde::{Deserialize, Serialize};

use crate::builder::is_redactable;

/// Glyphs used for in-progress text masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    pub marker: char,
    pub delimiter: char,
}

impl Mask {
    /// Delimiter-wrapped marker run with the visible length of `target`.
    pub fn token(&self, target: &str) -> String {
        let len = target.chars().count();
        let mut token = String::with_capacity((len + 2) * self.marker.len_utf8());
        token.push(self.delimiter);
        token.extend(std::iter::repeat_n(self.marker, len));
        token.push(self.delimiter);
        token
    }

    /// Masks only stay out of later target matches when their glyphs cannot
    /// appear in words: distinct, and neither alphanumeric nor whitespace.
    pub fn is_safe(&self) -> bool {
        let glyph_ok = |c: char| !c.is_alphanumeric() && !c.is_whitespace();
        self.marker != self.delimiter && glyph_ok(self.marker) && glyph_ok(self.delimiter)
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self {
            marker: '█',
            delimiter: '*',
        }
    }
}

/// Text after every target occurrence was swapped for a mask token.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedText {
    pub text: String,
    pub occurrences: usize,
}

/// Literal, length-ordered substitution over progressively masked text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLocator {
    mask: Mask,
}

impl TextLocator {
    pub fn new(mask: Mask) -> Self {
        Self { mask }
    }

    /// Mask every occurrence of each target, in the order given.
    ///
    /// Targets must already be sorted longest first; later targets only see
    /// the text left unmasked by earlier ones.
    pub fn locate<S: AsRef<str>>(&self, text: &str, targets: &[S]) -> LocatedText {
        let mut current = text.to_string();
        let mut occurrences = 0;

        for target in targets {
            let target = target.as_ref().trim();
            if !is_redactable(target) {
                continue;
            }
            let count = current.matches(target).count();
            if count > 0 {
                current = current.replace(target, &self.mask.token(target));
                occurrences += count;
            }
        }

        LocatedText {
            text: current,
            occurrences,
        }
    }
}

/// Word-level match rule for OCR media.
///
/// A word matches when the target is a substring of its content or when the
/// trimmed forms are equal.
pub fn word_matches(content: &str, target: &str) -> bool {
    content.contains(target) || content.trim() == target.trim()
}

/// Polygons of every word that matches a target, one per match event.
pub fn locate_regions<'a, I, S>(words: I, targets: &[S]) -> Vec<Region>
where
    I: IntoIterator<Item = WordRecord<'a>>,
    S: AsRef<str>,
{
    let targets: Vec<&str> = targets
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| is_redactable(t))
        .collect();

    let mut regions = Vec::new();
    for word in words {
        for target in &targets {
            if word_matches(word.content, target) {
                regions.push(Region::Polygon {
                    points: word.polygon.to_vec(),
                });
            }
        }
    }
    regions
}

/// Matched regions of one OCR page, in the page's own coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRegions {
    pub page_index: usize,
    pub size: PageSize,
    pub regions: Vec<Region>,
}

/// Per-page variant of [`locate_regions`] for paged documents.
pub fn locate_pages<S: AsRef<str>>(document: &OcrDocument, targets: &[S]) -> Vec<PageRegions> {
    document
        .pages
        .iter()
        .enumerate()
        .map(|(page_index, page)| PageRegions {
            page_index,
            size: page.size(),
            regions: locate_regions(page.word_records(page_index), targets),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::{OcrPage, OcrWord, Point};

    fn word(content: &str, x: f64) -> OcrWord {
        OcrWord {
            content: content.to_string(),
            polygon: vec![
                Point::new(x, 10.0),
                Point::new(x + 30.0, 10.0),
                Point::new(x + 30.0, 20.0),
                Point::new(x, 20.0),
            ],
        }
    }

    #[test]
    fn test_mask_preserves_visible_length() {
        let mask = Mask::default();
        let token = mask.token("123-45-6789");

        assert_eq!(token.chars().count(), 13);
        assert_eq!(token.chars().filter(|c| *c == '█').count(), 11);
        assert!(token.starts_with('*') && token.ends_with('*'));
    }

    #[test]
    fn test_mask_glyph_safety() {
        assert!(Mask::default().is_safe());
        assert!(Mask { marker: '#', delimiter: '|' }.is_safe());
        assert!(!Mask { marker: 'x', delimiter: '*' }.is_safe());
        assert!(!Mask { marker: '7', delimiter: '*' }.is_safe());
        assert!(!Mask { marker: '*', delimiter: '*' }.is_safe());
        assert!(!Mask { marker: '#', delimiter: ' ' }.is_safe());
    }

    #[test]
    fn test_longer_target_masks_first() {
        let locator = TextLocator::default();
        let located = locator.locate("Johnson lives here", &["Johnson", "John"]);

        assert_eq!(located.text, "*███████* lives here");
        assert_eq!(located.occurrences, 1);
    }

    #[test]
    fn test_all_occurrences_masked() {
        let locator = TextLocator::default();
        let located = locator.locate("Paris, Paris and Paris", &["Paris"]);

        assert_eq!(located.occurrences, 3);
        assert!(!located.text.contains("Paris"));
    }

    #[test]
    fn test_relocating_masked_text_is_stable() {
        let locator = TextLocator::default();
        let targets = ["Johnson", "John", "42"];
        let once = locator.locate("Johnson is 42", &targets);
        let twice = locator.locate(&once.text, &targets);

        assert_eq!(once.text, twice.text);
        assert_eq!(twice.occurrences, 0);
    }

    #[test]
    fn test_noise_targets_skipped() {
        let locator = TextLocator::default();
        let located = locator.locate("a b 7", &["a", "7"]);

        assert_eq!(located.text, "a b *█*");
    }

    #[test]
    fn test_word_match_rule() {
        assert!(word_matches("Paris", "Paris"));
        assert!(word_matches("Paris", "Pari"));
        assert!(word_matches("Paris,", "Paris"));
        assert!(word_matches(" Paris ", "Paris"));
        assert!(!word_matches("Paris", "pari"));
        assert!(!word_matches("Par", "Paris"));
    }

    #[test]
    fn test_locate_regions_substring() {
        let page = OcrPage {
            width: 100.0,
            height: 100.0,
            words: vec![word("Paris", 10.0)],
            lines: vec![],
        };

        let exact = locate_regions(page.word_records(0), &["Paris"]);
        let partial = locate_regions(page.word_records(0), &["Pari"]);

        assert_eq!(exact.len(), 1);
        assert_eq!(partial, exact);
        assert_eq!(
            exact[0],
            Region::Polygon {
                points: page.words[0].polygon.clone()
            }
        );
    }

    #[test]
    fn test_word_recorded_per_match_event() {
        let page = OcrPage {
            width: 100.0,
            height: 100.0,
            words: vec![word("Johnson", 0.0), word("here", 40.0)],
            lines: vec![],
        };

        let regions = locate_regions(page.word_records(0), &["Johnson", "John", "x"]);
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_locate_pages_groups_by_page() {
        let document = OcrDocument {
            content: "Jane Paris".to_string(),
            pages: vec![
                OcrPage {
                    width: 8.5,
                    height: 11.0,
                    words: vec![word("Jane", 1.0)],
                    lines: vec![],
                },
                OcrPage {
                    width: 8.5,
                    height: 11.0,
                    words: vec![word("Paris", 1.0)],
                    lines: vec![],
                },
            ],
        };

        let pages = locate_pages(&document, &["Paris"]);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].regions.is_empty());
        assert_eq!(pages[1].regions.len(), 1);
        assert_eq!(pages[1].size, PageSize::new(8.5, 11.0));
    }
}
