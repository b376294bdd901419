//! OCR/layout extraction output, read-only inside the pipeline.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::{PageSize, Point};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrDocument {
    pub content: String,
    #[serde(default)]
    pub pages: Vec<OcrPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrPage {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub words: Vec<OcrWord>,
    #[serde(default)]
    pub lines: Vec<OcrLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrWord {
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_polygon")]
    pub polygon: Vec<Point>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrLine {
    pub content: String,
}

/// A word together with the page it was read from.
#[derive(Debug, Clone, Copy)]
pub struct WordRecord<'a> {
    pub content: &'a str,
    pub polygon: &'a [Point],
    pub page_index: usize,
}

impl OcrDocument {
    /// Whitespace tokens of the full extracted content.
    pub fn tokens(&self) -> Vec<&str> {
        self.content.split_whitespace().collect()
    }

    /// Every word on every page, in reading order.
    pub fn word_records(&self) -> impl Iterator<Item = WordRecord<'_>> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page_index, page)| page.word_records(page_index))
    }

    pub fn page_sizes(&self) -> Vec<PageSize> {
        self.pages.iter().map(OcrPage::size).collect()
    }
}

impl OcrPage {
    pub fn size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }

    /// Line contents joined by single spaces.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn word_records(&self, page_index: usize) -> impl Iterator<Item = WordRecord<'_>> {
        self.words.iter().map(move |word| WordRecord {
            content: &word.content,
            polygon: &word.polygon,
            page_index,
        })
    }
}

/// Accepts both `[{"x":..,"y":..}, ..]` and the flat `[x1, y1, x2, y2, ..]`
/// layout document-analysis services return.
fn deserialize_polygon<'de, D>(deserializer: D) -> std::result::Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Polygon {
        Points(Vec<Point>),
        Flat(Vec<f64>),
    }

    match Polygon::deserialize(deserializer)? {
        Polygon::Points(points) => Ok(points),
        Polygon::Flat(coords) => {
            if coords.len() % 2 != 0 {
                return Err(serde::de::Error::custom(
                    "flat polygon must contain an even number of coordinates",
                ));
            }
            Ok(coords
                .chunks_exact(2)
                .map(|pair| Point::new(pair[0], pair[1]))
                .collect())
        }
    }
}
