//! Core domain models for redact
//!
//! This crate contains:
//! - Redaction degrees and the category allowlist table
//! - Classifier entities, entity spans and training examples
//! - OCR documents and region geometry
//! - The per-request redaction trace

pub mod degree;
pub mod document;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod trace;

pub use degree::{CategoryTable, Degree};
pub use document::{OcrDocument, OcrLine, OcrPage, OcrWord, WordRecord};
pub use entity::{ClassifiedEntity, EntitySpan, SpanSource, TrainingExample};
pub use error::{Error, Result};
pub use geometry::{Bounds, PageSize, Point, Region};
pub use trace::{Stage, Trace, TraceEntry};
