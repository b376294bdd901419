//! Multi-modal redaction decision pipeline
//!
//! Stages, leaves first:
//! - [`filter`]: degree-based filtering of classifier output
//! - [`builder`]: merge of every candidate source into ordered targets
//! - [`locator`]: targets to masked text spans or OCR word polygons
//! - [`applier`]: located spans to per-medium mark plans
//! - [`service`]: per-medium orchestration and tracing

pub mod applier;
pub mod builder;
pub mod collaborators;
pub mod filter;
pub mod locator;
pub mod policy;
pub mod service;

pub use applier::{ImageMarks, PdfMarks, PdfPageMarks, RedactedText, RedactionApplier};
pub use builder::{RedactionSetBuilder, RedactionTargets, is_redactable};
pub use collaborators::{
    CategorySeverity, Classifier, ContentSafety, DiscardSink, FaceDetector, HarmCategory,
    NoDetections, NoScreening, OcrEngine, SafetyVerdict, TrainingSink,
};
pub use filter::EntityFilter;
pub use locator::{LocatedText, Mask, PageRegions, TextLocator};
pub use policy::{CustomTargets, GuardrailGate, RedactionPolicy};
pub use service::{
    ImageRedactionService, PdfRedactionService, Pipeline, PipelineSettings, RedactionOutcome,
    RedactionReport, TextRedactionService,
};
