//! Per-medium orchestration: screening, classification, filtering,
//! guardrails, merging, locating and applying.

use std::path::Path;
use std::sync::Arc;

use redact_core::{
    CategoryTable, ClassifiedEntity, Degree, Error, OcrDocument, PageSize, Region, Result,
    SpanSource, Stage, Trace,
};
use redact_guardrails::{GuardrailReport, HeuristicTagger, ProperNounTagger};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::applier::{DEFAULT_PDF_PAGE_CAP, ImageMarks, PdfMarks, RedactedText, RedactionApplier};
use crate::builder::{RedactionSetBuilder, RedactionTargets};
use crate::collaborators::{
    Classifier, ContentSafety, DiscardSink, FaceDetector, HarmCategory, NoDetections, NoScreening,
    OcrEngine, SafetyVerdict, TrainingSink,
};
use crate::filter::EntityFilter;
use crate::locator::{self, Mask, TextLocator};
use crate::policy::{CustomTargets, RedactionPolicy};

/// Severity at which any harm category trips the content-safety screen.
pub const DEFAULT_SAFETY_THRESHOLD: u8 = 4;

/// Process-wide settings that do not change between requests.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub table: CategoryTable,
    pub mask: Mask,
    pub pdf_page_cap: usize,
    pub safety_threshold: u8,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            table: CategoryTable::standard(),
            mask: Mask::default(),
            pdf_page_cap: DEFAULT_PDF_PAGE_CAP,
            safety_threshold: DEFAULT_SAFETY_THRESHOLD,
        }
    }
}

/// Shared collaborators and settings, built once at start-up.
pub struct Pipeline {
    classifier: Arc<dyn Classifier>,
    ocr: Option<Arc<dyn OcrEngine>>,
    detector: Arc<dyn FaceDetector>,
    safety: Arc<dyn ContentSafety>,
    training: Arc<dyn TrainingSink>,
    tagger: Arc<dyn ProperNounTagger>,
    settings: PipelineSettings,
    // Detached training-label writes
    pending: Mutex<JoinSet<()>>,
}

impl Pipeline {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            ocr: None,
            detector: Arc::new(NoDetections),
            safety: Arc::new(NoScreening),
            training: Arc::new(DiscardSink),
            tagger: Arc::new(HeuristicTagger),
            settings: PipelineSettings::default(),
            pending: Mutex::new(JoinSet::new()),
        }
    }

    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn with_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_safety(mut self, safety: Arc<dyn ContentSafety>) -> Self {
        self.safety = safety;
        self
    }

    pub fn with_training_sink(mut self, training: Arc<dyn TrainingSink>) -> Self {
        self.training = training;
        self
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn ProperNounTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    fn ocr(&self) -> Result<&Arc<dyn OcrEngine>> {
        self.ocr
            .as_ref()
            .ok_or_else(|| Error::Ocr(anyhow::anyhow!("no OCR engine configured")))
    }

    fn applier(&self) -> RedactionApplier {
        RedactionApplier::new(self.settings.mask, self.settings.pdf_page_cap)
    }

    /// `Some(categories)` when the verdict trips the screen.
    fn flagged(&self, verdict: SafetyVerdict) -> Option<Vec<HarmCategory>> {
        verdict
            .is_flagged(self.settings.safety_threshold)
            .then(|| verdict.flagged_categories(self.settings.safety_threshold))
    }

    async fn classify(&self, text: &str) -> Result<Vec<ClassifiedEntity>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.classifier
            .classify(text)
            .await
            .map_err(Error::Classification)
    }

    /// Hand labels to the sink on a detached task. The request never waits
    /// on the write.
    async fn record_training(&self, entities: &[ClassifiedEntity]) {
        if entities.is_empty() {
            return;
        }
        let examples = EntityFilter::training_examples(entities);
        let sink = Arc::clone(&self.training);
        let write = async move {
            if let Err(e) = sink.record(&examples).await {
                warn!("Failed to record {} training examples: {:#}", examples.len(), e);
            }
        };

        let mut pending = self.pending.lock().await;
        while pending.try_join_next().is_some() {}
        pending.spawn(write.in_current_span());
    }

    /// Wait for detached training writes, e.g. before the process exits.
    pub async fn flush_training(&self) {
        let mut pending = std::mem::take(&mut *self.pending.lock().await);
        while pending.join_next().await.is_some() {}
    }

    /// Filter, merge and trace the redaction targets for one request.
    async fn select_targets(
        &self,
        policy: &RedactionPolicy,
        entities: &[ClassifiedEntity],
        content: &str,
        custom: &CustomTargets,
        trace: &mut Trace,
    ) -> Result<(RedactionTargets, bool)> {
        let filter = EntityFilter::new(self.settings.table);
        let agent_spans = filter.select(entities, policy.degree);
        self.record_training(entities).await;

        let regex_matches = custom.regex_matches(content)?;

        let builder = RedactionSetBuilder::new()
            .spans(agent_spans)
            .words(custom.words.iter().cloned(), SpanSource::UserLiteral)
            .words(regex_matches, SpanSource::UserRegex);
        trace.record(Stage::Assistant, builder.candidates());

        let report = policy.guardrails_active().then(|| {
            let tokens: Vec<&str> = content.split_whitespace().collect();
            GuardrailReport::scan(&tokens, self.tagger.as_ref())
        });
        if let Some(report) = &report {
            report.record(trace);
        }

        let targets = builder.guardrails(report.as_ref()).build();
        debug!("Selected {} redaction targets", targets.len());
        Ok((targets, report.is_some()))
    }
}

/// Either a content-safety rejection or a redacted artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RedactionOutcome<T> {
    Flagged { categories: Vec<HarmCategory> },
    Redacted(RedactionReport<T>),
}

impl<T> RedactionOutcome<T> {
    pub fn is_flagged(&self) -> bool {
        matches!(self, RedactionOutcome::Flagged { .. })
    }

    pub fn into_report(self) -> Option<RedactionReport<T>> {
        match self {
            RedactionOutcome::Redacted(report) => Some(report),
            RedactionOutcome::Flagged { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionReport<T> {
    pub request_id: Uuid,
    /// blake3 of the text decisions were made over: the request text, or the
    /// OCR content for images and PDFs. Media bytes are read by collaborators,
    /// never by the pipeline.
    pub input_digest: String,
    pub degree: Degree,
    pub guardrails_applied: bool,
    pub targets: RedactionTargets,
    pub trace: Trace,
    pub artifact: T,
}

fn digest(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

/// Redacts plain text.
pub struct TextRedactionService {
    pipeline: Arc<Pipeline>,
    policy: RedactionPolicy,
}

impl TextRedactionService {
    pub fn new(pipeline: Arc<Pipeline>, policy: RedactionPolicy) -> Self {
        Self { pipeline, policy }
    }

    pub async fn redact(
        &self,
        text: &str,
        custom: &CustomTargets,
    ) -> Result<RedactionOutcome<RedactedText>> {
        let request_id = Uuid::new_v4();
        let span = info_span!("redact", %request_id, medium = "text");
        self.run(request_id, text, custom).instrument(span).await
    }

    async fn run(
        &self,
        request_id: Uuid,
        text: &str,
        custom: &CustomTargets,
    ) -> Result<RedactionOutcome<RedactedText>> {
        let pipeline = &self.pipeline;

        let verdict = pipeline
            .safety
            .screen_text(text)
            .await
            .map_err(Error::Safety)?;
        if let Some(categories) = pipeline.flagged(verdict) {
            warn!("Text flagged by content safety: {:?}", categories);
            return Ok(RedactionOutcome::Flagged { categories });
        }

        let entities = pipeline.classify(text).await?;
        let mut trace = Trace::new();
        let (targets, guardrails_applied) = pipeline
            .select_targets(&self.policy, &entities, text, custom, &mut trace)
            .await?;

        let located = TextLocator::new(pipeline.settings.mask).locate(text, targets.as_slice());
        let artifact = pipeline.applier().text(located);
        info!("Masked {} occurrences", artifact.masked_occurrences);

        Ok(RedactionOutcome::Redacted(RedactionReport {
            request_id,
            input_digest: digest(text.as_bytes()),
            degree: self.policy.degree,
            guardrails_applied,
            targets,
            trace,
            artifact,
        }))
    }
}

/// Redacts images: OCR words plus detector boxes.
pub struct ImageRedactionService {
    pipeline: Arc<Pipeline>,
    policy: RedactionPolicy,
}

impl ImageRedactionService {
    pub fn new(pipeline: Arc<Pipeline>, policy: RedactionPolicy) -> Self {
        Self { pipeline, policy }
    }

    pub async fn redact(
        &self,
        image: &Path,
        custom: &CustomTargets,
    ) -> Result<RedactionOutcome<ImageMarks>> {
        let request_id = Uuid::new_v4();
        let span = info_span!("redact", %request_id, medium = "image");
        self.run(request_id, image, custom).instrument(span).await
    }

    async fn run(
        &self,
        request_id: Uuid,
        image: &Path,
        custom: &CustomTargets,
    ) -> Result<RedactionOutcome<ImageMarks>> {
        let pipeline = &self.pipeline;

        let verdict = pipeline
            .safety
            .screen_image(image)
            .await
            .map_err(Error::Safety)?;
        if let Some(categories) = pipeline.flagged(verdict) {
            warn!("Image flagged by content safety: {:?}", categories);
            return Ok(RedactionOutcome::Flagged { categories });
        }

        let document = pipeline.ocr()?.extract(image).await.map_err(Error::Ocr)?;
        let entities = pipeline.classify(&document.content).await?;
        let mut trace = Trace::new();
        let (targets, guardrails_applied) = pipeline
            .select_targets(&self.policy, &entities, &document.content, custom, &mut trace)
            .await?;

        let mut regions = locator::locate_regions(document.word_records(), targets.as_slice());

        let boxes = pipeline
            .detector
            .detect(image)
            .await
            .map_err(Error::Detection)?;
        trace.note(
            Stage::Faces,
            format!("Redacting face regions: {}", boxes.len()),
        );
        regions.extend(boxes.into_iter().map(Region::from_xyxy));

        let artifact = pipeline.applier().image(&regions);
        info!("Marked {} image regions", artifact.rects.len());

        Ok(RedactionOutcome::Redacted(RedactionReport {
            request_id,
            input_digest: digest(document.content.as_bytes()),
            degree: self.policy.degree,
            guardrails_applied,
            targets,
            trace,
            artifact,
        }))
    }
}

/// Redacts PDFs page by page.
pub struct PdfRedactionService {
    pipeline: Arc<Pipeline>,
    policy: RedactionPolicy,
}

impl PdfRedactionService {
    pub fn new(pipeline: Arc<Pipeline>, policy: RedactionPolicy) -> Self {
        Self { pipeline, policy }
    }

    /// `page_sizes` are the PDF's own page sizes in points: one per page, or
    /// a single size shared by every page.
    pub async fn redact(
        &self,
        pdf: &Path,
        page_sizes: &[PageSize],
        custom: &CustomTargets,
    ) -> Result<RedactionOutcome<PdfMarks>> {
        let request_id = Uuid::new_v4();
        let span = info_span!("redact", %request_id, medium = "pdf");
        self.run(request_id, pdf, page_sizes, custom)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        request_id: Uuid,
        pdf: &Path,
        page_sizes: &[PageSize],
        custom: &CustomTargets,
    ) -> Result<RedactionOutcome<PdfMarks>> {
        let pipeline = &self.pipeline;

        let document = pipeline.ocr()?.extract(pdf).await.map_err(Error::Ocr)?;
        let page_sizes = fit_page_sizes(document.pages.len(), page_sizes)?;

        let verdict = pipeline
            .safety
            .screen_text(&document.content)
            .await
            .map_err(Error::Safety)?;
        if let Some(categories) = pipeline.flagged(verdict) {
            warn!("PDF flagged by content safety: {:?}", categories);
            return Ok(RedactionOutcome::Flagged { categories });
        }

        let entities = classify_pages(pipeline, &document).await?;
        let mut trace = Trace::new();
        let (targets, guardrails_applied) = pipeline
            .select_targets(&self.policy, &entities, &document.content, custom, &mut trace)
            .await?;

        let pages = locator::locate_pages(&document, targets.as_slice());
        let artifact = pipeline.applier().pdf(&pages, &page_sizes)?;
        info!(
            "Marked {} regions across {} pages",
            artifact.rect_count(),
            artifact.pages.len()
        );

        Ok(RedactionOutcome::Redacted(RedactionReport {
            request_id,
            input_digest: digest(document.content.as_bytes()),
            degree: self.policy.degree,
            guardrails_applied,
            targets,
            trace,
            artifact,
        }))
    }
}

fn fit_page_sizes(pages: usize, provided: &[PageSize]) -> Result<Vec<PageSize>> {
    match provided {
        [size] => Ok(vec![*size; pages]),
        sizes if sizes.len() == pages => Ok(sizes.to_vec()),
        sizes => Err(Error::PageSizeMismatch {
            ocr: pages,
            provided: sizes.len(),
        }),
    }
}

/// One classifier call per page, over the page's lines.
async fn classify_pages(
    pipeline: &Pipeline,
    document: &OcrDocument,
) -> Result<Vec<ClassifiedEntity>> {
    let mut entities = Vec::new();
    for (index, page) in document.pages.iter().enumerate() {
        let found = pipeline.classify(&page.text()).await?;
        debug!("Page {}: {} entities", index, found.len());
        entities.extend(found);
    }
    Ok(entities)
}
