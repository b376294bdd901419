use anyhow::Context;
use redact_core::{CategoryTable, Degree, PageSize};
use redact_engine::applier::DEFAULT_PDF_PAGE_CAP;
use redact_engine::service::DEFAULT_SAFETY_THRESHOLD;
use redact_engine::{GuardrailGate, Mask, PipelineSettings, RedactionPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for redact (`config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub masking: MaskingConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub training: TrainingConfig,

    #[serde(default)]
    pub pdf: PdfConfig,
}

/// Defaults for requests that don't set degree or guardrails themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub degree: Degree,

    #[serde(default)]
    pub guardrails: bool,

    #[serde(default)]
    pub gate: GuardrailGate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskingConfig {
    #[serde(default = "default_marker")]
    pub marker: char,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the bearer token, if the endpoint needs one.
    #[serde(default = "default_classifier_token_env")]
    pub token_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub endpoint: String,

    /// Environment variable holding the subscription key.
    #[serde(default = "default_safety_key_env")]
    pub key_env: String,

    /// Severity at or above which a request is refused.
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// JSON Lines file for weak labels. Unset disables recording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default = "default_page_size")]
    pub page_size: PageSize,

    /// Pages at or beyond this index are never marked.
    #[serde(default = "default_page_cap")]
    pub page_cap: usize,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            token_env: default_classifier_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            key_env: default_safety_key_env(),
            threshold: default_threshold(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_cap: default_page_cap(),
        }
    }
}

fn default_marker() -> char {
    Mask::default().marker
}

fn default_delimiter() -> char {
    Mask::default().delimiter
}

fn default_classifier_endpoint() -> String {
    "http://127.0.0.1:8080/classify".to_string()
}

fn default_classifier_token_env() -> String {
    "REDACT_CLASSIFIER_TOKEN".to_string()
}

fn default_safety_key_env() -> String {
    "REDACT_SAFETY_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_threshold() -> u8 {
    DEFAULT_SAFETY_THRESHOLD
}

fn default_page_size() -> PageSize {
    PageSize::LETTER
}

fn default_page_cap() -> usize {
    DEFAULT_PDF_PAGE_CAP
}

impl MaskingConfig {
    pub fn mask(&self) -> Mask {
        Mask {
            marker: self.marker,
            delimiter: self.delimiter,
        }
    }

    /// Reject glyphs a later target could match inside an earlier mask.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.mask().is_safe() {
            anyhow::bail!(
                "masking marker {:?} and delimiter {:?} must differ and be neither alphanumeric nor whitespace",
                self.marker,
                self.delimiter
            );
        }
        Ok(())
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token(&self) -> Option<String> {
        read_env(&self.token_env)
    }
}

impl SafetyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Subscription key, required once screening is enabled.
    pub fn key(&self) -> anyhow::Result<String> {
        read_env(&self.key_env)
            .with_context(|| format!("Content safety is enabled but ${} is not set", self.key_env))
    }
}

fn read_env(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config
            .masking
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "redact", "redact") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.redact/config.toml")
        }
    }

    /// Policy with the configured defaults, overridden per request.
    pub fn policy(&self, degree: Option<Degree>, guardrails: Option<bool>) -> RedactionPolicy {
        RedactionPolicy::new(
            degree.unwrap_or(self.policy.degree),
            guardrails.unwrap_or(self.policy.guardrails),
        )
        .with_gate(self.policy.gate)
    }

    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            table: CategoryTable::standard(),
            mask: self.masking.mask(),
            pdf_page_cap: self.pdf.page_cap,
            safety_threshold: self.safety.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.policy.degree, Degree::Minimal);
        assert!(!config.policy.guardrails);
        assert_eq!(config.policy.gate, GuardrailGate::MaximumDegree);
        assert_eq!(config.masking.marker, '█');
        assert_eq!(config.masking.delimiter, '*');
        assert_eq!(config.safety.threshold, 4);
        assert!(!config.safety.enabled);
        assert_eq!(config.pdf.page_size, PageSize::LETTER);
        assert_eq!(config.pdf.page_cap, 2);
        assert!(config.training.path.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[policy]
degree = "maximum"
guardrails = true
gate = "toggle-only"

[safety]
enabled = true
endpoint = "https://cs.example.com"

[training]
path = "labels/train.jsonl"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.policy.degree, Degree::Maximum);
        assert_eq!(config.policy.gate, GuardrailGate::ToggleOnly);
        assert!(config.safety.enabled);
        assert_eq!(config.safety.threshold, 4);
        assert_eq!(config.safety.key_env, "REDACT_SAFETY_KEY");
        assert_eq!(
            config.training.path,
            Some(PathBuf::from("labels/train.jsonl"))
        );
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_policy_overrides() {
        let mut config = Config::default();
        config.policy.gate = GuardrailGate::ToggleOnly;

        let policy = config.policy(None, None);
        assert_eq!(policy.degree, Degree::Minimal);
        assert!(!policy.guardrails_active());

        let policy = config.policy(Some(Degree::Moderate), Some(true));
        assert_eq!(policy.degree, Degree::Moderate);
        assert!(policy.guardrails_active());
        assert_eq!(policy.gate, GuardrailGate::ToggleOnly);
    }

    #[test]
    fn test_settings_follow_config() {
        let mut config = Config::default();
        config.masking.marker = '#';
        config.pdf.page_cap = 5;
        config.safety.threshold = 6;

        let settings = config.settings();
        assert_eq!(settings.mask.token("abc"), "*###*");
        assert_eq!(settings.pdf_page_cap, 5);
        assert_eq!(settings.safety_threshold, 6);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.pdf.page_size = PageSize::new(595.0, 842.0);
        config.training.path = Some(dir.path().join("train.jsonl"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[policy]\ndegree = \"extreme\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_alphanumeric_marker_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[masking]\nmarker = \"x\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("neither alphanumeric"));
    }

    #[test]
    fn test_identical_glyphs_rejected() {
        let masking = MaskingConfig {
            marker: '*',
            delimiter: '*',
        };
        assert!(masking.validate().is_err());
        assert!(MaskingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_env_name_has_no_token() {
        let classifier = ClassifierConfig {
            token_env: String::new(),
            ..ClassifierConfig::default()
        };
        assert!(classifier.token().is_none());
    }
}
