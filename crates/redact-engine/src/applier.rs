//! Turns located spans into each medium's mark representation.
//!
//! Painting pixels or PDF content is left to the renderer consuming these
//! mark plans.

use lazy_static::lazy_static;
use redact_core::{Bounds, Error, PageSize, Region, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::locator::{LocatedText, Mask, PageRegions};

/// Pages at or beyond this index are left untouched in PDFs.
pub const DEFAULT_PDF_PAGE_CAP: usize = 2;

lazy_static! {
    static ref DEFAULT_MASK_RUN: Regex = mask_run_regex(&Mask::default());
}

fn mask_run_regex(mask: &Mask) -> Regex {
    let delimiter = regex::escape(&mask.delimiter.to_string());
    let marker = regex::escape(&mask.marker.to_string());
    // Built only from escaped literals
    Regex::new(&format!("{delimiter}({marker}+){delimiter}")).unwrap()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactedText {
    pub text: String,
    pub masked_occurrences: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMarks {
    pub rects: Vec<Bounds>,
}

/// Opaque rectangles for one PDF page in point space, origin bottom-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfPageMarks {
    pub page_index: usize,
    pub page_size: PageSize,
    pub rects: Vec<Bounds>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfMarks {
    pub pages: Vec<PdfPageMarks>,
}

impl PdfMarks {
    pub fn rect_count(&self) -> usize {
        self.pages.iter().map(|p| p.rects.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct RedactionApplier {
    mask_run: Regex,
    pdf_page_cap: usize,
}

impl RedactionApplier {
    pub fn new(mask: Mask, pdf_page_cap: usize) -> Self {
        let mask_run = if mask == Mask::default() {
            DEFAULT_MASK_RUN.clone()
        } else {
            mask_run_regex(&mask)
        };
        Self {
            mask_run,
            pdf_page_cap,
        }
    }

    /// Collapse each delimiter-wrapped marker run into a bare run of the same
    /// length.
    pub fn text(&self, located: LocatedText) -> RedactedText {
        let text = self
            .mask_run
            .replace_all(&located.text, "$1")
            .into_owned();
        RedactedText {
            text,
            masked_occurrences: located.occurrences,
        }
    }

    /// One axis-aligned rectangle per region.
    pub fn image(&self, regions: &[Region]) -> ImageMarks {
        ImageMarks {
            rects: regions.iter().filter_map(Region::bounds).collect(),
        }
    }

    /// Project OCR page regions into PDF point space.
    ///
    /// `pdf_sizes[i]` is the size of page `i` in points. Only pages below the
    /// page cap receive rectangles.
    pub fn pdf(&self, pages: &[PageRegions], pdf_sizes: &[PageSize]) -> Result<PdfMarks> {
        if pages.len() != pdf_sizes.len() {
            return Err(Error::PageSizeMismatch {
                ocr: pages.len(),
                provided: pdf_sizes.len(),
            });
        }

        let pages = pages
            .iter()
            .zip(pdf_sizes)
            .map(|(page, pdf_size)| {
                let rects = if page.page_index < self.pdf_page_cap {
                    project_page(page, *pdf_size)
                } else {
                    Vec::new()
                };
                PdfPageMarks {
                    page_index: page.page_index,
                    page_size: *pdf_size,
                    rects,
                }
            })
            .collect();

        Ok(PdfMarks { pages })
    }
}

impl Default for RedactionApplier {
    fn default() -> Self {
        Self::new(Mask::default(), DEFAULT_PDF_PAGE_CAP)
    }
}

/// Scale from OCR units to points and flip the vertical axis.
fn project_page(page: &PageRegions, pdf: PageSize) -> Vec<Bounds> {
    let ocr = page.size;
    if ocr.width <= 0.0 || ocr.height <= 0.0 {
        warn!(
            "Skipping page {} with degenerate OCR size {}x{}",
            page.page_index, ocr.width, ocr.height
        );
        return Vec::new();
    }

    let sx = pdf.width / ocr.width;
    let sy = pdf.height / ocr.height;

    page.regions
        .iter()
        .filter_map(Region::bounds)
        .map(|b| Bounds {
            x_min: b.x_min * sx,
            x_max: b.x_max * sx,
            y_min: pdf.height - b.y_max * sy,
            y_max: pdf.height - b.y_min * sy,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::Point;

    fn square(x: f64, y: f64, side: f64) -> Region {
        Region::Polygon {
            points: vec![
                Point::new(x, y),
                Point::new(x + side, y),
                Point::new(x + side, y + side),
                Point::new(x, y + side),
            ],
        }
    }

    #[test]
    fn test_text_collapses_delimiters() {
        let applier = RedactionApplier::default();
        let located = LocatedText {
            text: "SSN *███████████* in *█████*".to_string(),
            occurrences: 2,
        };

        let redacted = applier.text(located);
        assert_eq!(redacted.text, "SSN ███████████ in █████");
        assert_eq!(redacted.masked_occurrences, 2);
    }

    #[test]
    fn test_text_keeps_unrelated_asterisks() {
        let applier = RedactionApplier::default();
        let located = LocatedText {
            text: "*bold* and **██**".to_string(),
            occurrences: 1,
        };

        assert_eq!(applier.text(located).text, "*bold* and *██*");
    }

    #[test]
    fn test_custom_mask_glyphs() {
        let mask = Mask {
            marker: '#',
            delimiter: '|',
        };
        let applier = RedactionApplier::new(mask, DEFAULT_PDF_PAGE_CAP);
        let located = LocatedText {
            text: format!("id {}", mask.token("abc")),
            occurrences: 1,
        };

        assert_eq!(applier.text(located).text, "id ###");
    }

    #[test]
    fn test_image_normalizes_polygons_and_boxes() {
        let applier = RedactionApplier::default();
        let marks = applier.image(&[
            square(10.0, 10.0, 5.0),
            Region::from_xyxy([100.0, 50.0, 60.0, 20.0]),
            Region::Polygon { points: vec![] },
        ]);

        assert_eq!(marks.rects.len(), 2);
        assert_eq!(marks.rects[0].x_max, 15.0);
        assert_eq!(marks.rects[1].x_min, 60.0);
        assert_eq!(marks.rects[1].y_max, 50.0);
    }

    #[test]
    fn test_pdf_projection_flips_vertical_axis() {
        let applier = RedactionApplier::default();
        let pages = vec![PageRegions {
            page_index: 0,
            size: PageSize::new(8.5, 11.0),
            regions: vec![square(1.0, 1.0, 1.0)],
        }];

        let marks = applier.pdf(&pages, &[PageSize::LETTER]).unwrap();
        let rect = marks.pages[0].rects[0];

        assert!((rect.x_min - 72.0).abs() < 1e-9);
        assert!((rect.x_max - 144.0).abs() < 1e-9);
        assert!((rect.y_max - 720.0).abs() < 1e-9);
        assert!((rect.y_min - 648.0).abs() < 1e-9);
    }

    #[test]
    fn test_pdf_only_first_two_pages_marked() {
        let applier = RedactionApplier::default();
        let pages: Vec<_> = (0..3)
            .map(|page_index| PageRegions {
                page_index,
                size: PageSize::new(8.5, 11.0),
                regions: vec![square(1.0, 1.0, 1.0)],
            })
            .collect();

        let marks = applier.pdf(&pages, &[PageSize::LETTER; 3]).unwrap();
        assert_eq!(marks.pages.len(), 3);
        assert_eq!(marks.pages[0].rects.len(), 1);
        assert_eq!(marks.pages[1].rects.len(), 1);
        assert!(marks.pages[2].rects.is_empty());
        assert_eq!(marks.rect_count(), 2);
    }

    #[test]
    fn test_pdf_page_size_mismatch() {
        let applier = RedactionApplier::default();
        let pages = vec![PageRegions {
            page_index: 0,
            size: PageSize::new(8.5, 11.0),
            regions: vec![],
        }];

        let err = applier.pdf(&pages, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::PageSizeMismatch {
                ocr: 1,
                provided: 0
            }
        ));
    }
}
