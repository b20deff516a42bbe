use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// How per-class weights are derived when fitting the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassWeightPolicy {
    /// Every class weighs the same.
    Uniform,
    /// Inverse-frequency weighting: `n_samples / (n_classes * count(class))`.
    Balanced,
}

/// Downsampling of the over-represented label class during training.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownsampleConfig {
    pub majority_label: String,
    pub fraction: f64,
    pub seed: u64,
}

impl Default for DownsampleConfig {
    fn default() -> Self {
        Self {
            majority_label: "other".to_string(),
            fraction: 0.4,
            seed: 42,
        }
    }
}

/// Train/test split parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// N-gram bag-of-words vectorizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Inclusive (min, max) n-gram sizes.
    pub ngram_range: (usize, usize),
    /// Upper bound on vocabulary size after fitting.
    pub max_features: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            max_features: 1500,
        }
    }
}

/// Linear classifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Inverse regularization strength, as in the usual C parameterization:
    /// smaller values regularize harder.
    pub regularization_strength: f64,
    pub class_weight_policy: ClassWeightPolicy,
    pub seed: u64,
    /// Number of passes over the training set.
    pub max_epochs: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            regularization_strength: 0.01,
            class_weight_policy: ClassWeightPolicy::Balanced,
            seed: 42,
            max_epochs: 40,
        }
    }
}

/// Full pipeline configuration.
///
/// The defaults are the production settings for the support-post corpus;
/// `from_file` overlays a JSON document on top of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw text-bearing columns joined into the text field.
    pub feature_columns: Vec<String>,
    /// Name of the synthesized text column.
    pub text_column: String,
    /// Name of the label column in training data.
    pub target_column: String,
    /// Closed set of valid target labels.
    pub valid_labels: Vec<String>,
    /// Stop words to keep despite appearing in the built-in list.
    pub stopword_exceptions: Vec<String>,
    pub downsample: DownsampleConfig,
    pub split: SplitConfig,
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feature_columns: vec!["title".to_string(), "body".to_string()],
            text_column: "text".to_string(),
            target_column: "label".to_string(),
            valid_labels: [
                "live convo",
                "bad test",
                "mobile",
                "other",
                "screeners",
                "recorder",
                "ratings",
                "bug",
                "payment",
                "no test",
                "other company",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            stopword_exceptions: [
                "whatever",
                "whenever",
                "about",
                "nothing",
                "empty",
                "none",
                "more",
                "somewhere",
                "most",
                "not",
                "never",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            downsample: DownsampleConfig::default(),
            split: SplitConfig::default(),
            vectorizer: VectorizerConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads a configuration from a JSON file, with defaults for any omitted
    /// field.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PipelineError::Configuration(format!(
                "failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| PipelineError::Configuration(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration before any training or inference work begins.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.feature_columns.is_empty() {
            return Err(PipelineError::Configuration(
                "feature_columns must not be empty".to_string(),
            ));
        }
        if self.text_column.is_empty() || self.target_column.is_empty() {
            return Err(PipelineError::Configuration(
                "text_column and target_column must not be empty".to_string(),
            ));
        }
        if self.valid_labels.is_empty() {
            return Err(PipelineError::Configuration(
                "valid_labels must not be empty".to_string(),
            ));
        }
        if !(self.downsample.fraction > 0.0 && self.downsample.fraction <= 1.0) {
            return Err(PipelineError::Configuration(format!(
                "downsample fraction must be in (0, 1], got {}",
                self.downsample.fraction
            )));
        }
        if !(self.split.test_fraction > 0.0 && self.split.test_fraction < 1.0) {
            return Err(PipelineError::Configuration(format!(
                "split test_fraction must be in (0, 1), got {}",
                self.split.test_fraction
            )));
        }
        let (min_n, max_n) = self.vectorizer.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(PipelineError::Configuration(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({}, {})",
                min_n, max_n
            )));
        }
        if self.vectorizer.max_features == 0 {
            return Err(PipelineError::Configuration(
                "max_features must be at least 1".to_string(),
            ));
        }
        if self.classifier.regularization_strength <= 0.0 {
            return Err(PipelineError::Configuration(format!(
                "regularization_strength must be positive, got {}",
                self.classifier.regularization_strength
            )));
        }
        if self.classifier.max_epochs == 0 {
            return Err(PipelineError::Configuration(
                "max_epochs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured stop-word exceptions as a lookup set.
    pub fn stopword_exception_set(&self) -> HashSet<String> {
        self.stopword_exceptions.iter().cloned().collect()
    }
}
