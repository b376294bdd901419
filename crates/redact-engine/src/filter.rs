//! Degree-based filtering of classifier output.

use std::collections::BTreeSet;

use redact_core::{
    CategoryTable, ClassifiedEntity, Degree, EntitySpan, SpanSource, TrainingExample,
};

/// Keeps classifier entities whose category is allowed at a degree.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityFilter {
    table: CategoryTable,
}

impl EntityFilter {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// Accepted entities as single-word agent spans.
    ///
    /// Multi-word entities are split on whitespace, so a two-word name becomes
    /// two independently redactable tokens.
    pub fn select(&self, entities: &[ClassifiedEntity], degree: Degree) -> Vec<EntitySpan> {
        entities
            .iter()
            .filter(|e| self.table.allows(degree, &e.entity_group))
            .flat_map(|e| {
                e.word.split_whitespace().map(move |token| {
                    EntitySpan::new(token, SpanSource::Agent).with_category(e.entity_group.clone())
                })
            })
            .collect()
    }

    /// Distinct accepted tokens.
    pub fn filter(&self, entities: &[ClassifiedEntity], degree: Degree) -> BTreeSet<String> {
        self.select(entities, degree)
            .into_iter()
            .map(|span| span.text)
            .collect()
    }

    /// `B-`/`I-` labelled pairs for every entity, accepted or not.
    pub fn training_examples(entities: &[ClassifiedEntity]) -> Vec<TrainingExample> {
        entities.iter().flat_map(TrainingExample::pair_for).collect()
    }
}
