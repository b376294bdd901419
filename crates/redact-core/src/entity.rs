use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One span reported by the token classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEntity {
    pub word: String,
    pub entity_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl ClassifiedEntity {
    pub fn new(word: impl Into<String>, entity_group: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            entity_group: entity_group.into(),
            score: None,
        }
    }
}

/// Which detector contributed a redaction candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanSource {
    Agent,
    UserLiteral,
    UserRegex,
    GuardrailProperNoun,
    GuardrailNumber,
    GuardrailUrl,
    GuardrailEmail,
}

impl SpanSource {
    pub fn is_guardrail(self) -> bool {
        matches!(
            self,
            SpanSource::GuardrailProperNoun
                | SpanSource::GuardrailNumber
                | SpanSource::GuardrailUrl
                | SpanSource::GuardrailEmail
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpanSource::Agent => "agent",
            SpanSource::UserLiteral => "user_literal",
            SpanSource::UserRegex => "user_regex",
            SpanSource::GuardrailProperNoun => "guardrail_proper_noun",
            SpanSource::GuardrailNumber => "guardrail_number",
            SpanSource::GuardrailUrl => "guardrail_url",
            SpanSource::GuardrailEmail => "guardrail_email",
        }
    }
}

/// A redaction candidate and where it came from.
///
/// The category is only known for classifier spans and is never used after
/// degree filtering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub source: SpanSource,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, source: SpanSource) -> Self {
        Self {
            text: text.into(),
            category: None,
            source,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Labelled word handed to the training-data sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub word: String,
    pub label: String,
    #[serde(with = "time::serde::timestamp")]
    pub recorded_at: OffsetDateTime,
}

impl TrainingExample {
    /// The `B-` and `I-` tagged pair recorded for every classifier entity.
    pub fn pair_for(entity: &ClassifiedEntity) -> [TrainingExample; 2] {
        let recorded_at = OffsetDateTime::now_utc();
        [
            TrainingExample {
                word: entity.word.clone(),
                label: format!("B-{}", entity.entity_group),
                recorded_at,
            },
            TrainingExample {
                word: entity.word.clone(),
                label: format!("I-{}", entity.entity_group),
                recorded_at,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_payload_deserialization() {
        let payload = r#"[{"entity_group":"SSN","score":0.98,"word":"123-45-6789","start":10,"end":21}]"#;
        let entities: Vec<ClassifiedEntity> = serde_json::from_str(payload).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].word, "123-45-6789");
        assert_eq!(entities[0].entity_group, "SSN");
        assert_eq!(entities[0].score, Some(0.98));
    }

    #[test]
    fn test_training_pair_labels() {
        let entity = ClassifiedEntity::new("Jane", "FIRSTNAME");
        let [begin, inside] = TrainingExample::pair_for(&entity);

        assert_eq!(begin.label, "B-FIRSTNAME");
        assert_eq!(inside.label, "I-FIRSTNAME");
        assert_eq!(begin.word, "Jane");
        assert_eq!(inside.word, "Jane");
    }

    #[test]
    fn test_guardrail_sources() {
        assert!(SpanSource::GuardrailEmail.is_guardrail());
        assert!(!SpanSource::Agent.is_guardrail());
        assert!(!SpanSource::UserRegex.is_guardrail());
    }
}
