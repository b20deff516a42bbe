use std::collections::HashSet;

use log::info;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::pipeline::balance::downsample;
use crate::pipeline::concat::concatenate;
use crate::pipeline::normalize::normalize;
use crate::pipeline::svm::LinearSvm;
use crate::pipeline::tokenize::{default_stop_words, tokenize};
use crate::pipeline::vectorize::Vectorizer;
use crate::pipeline::PipelineError;
use crate::table::Table;

/// The unfitted feature pipeline: concatenation, normalization,
/// tokenization, vectorization, classification, in that fixed order.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    config: PipelineConfig,
}

impl FeaturePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Downsamples the majority class per the configuration. Training-side
    /// only; the serving path never rebalances.
    pub fn rebalance(&self, table: &Table) -> Result<Table, PipelineError> {
        downsample(
            table,
            &self.config.target_column,
            &self.config.downsample.majority_label,
            self.config.downsample.fraction,
            self.config.downsample.seed,
        )
    }

    /// Fits the vectorizer and classifier on a labeled table.
    ///
    /// Every row must carry a target label; text construction treats missing
    /// feature cells as empty strings.
    pub fn fit(&self, table: &Table) -> Result<FittedPipeline, PipelineError> {
        if table.is_empty() {
            return Err(PipelineError::Training(
                "cannot fit on an empty table".to_string(),
            ));
        }

        let labels = self.target_labels(table)?;
        let documents = build_text_column(table, &self.config)?;

        let mut vectorizer = Vectorizer::new(
            self.config.vectorizer.ngram_range,
            self.config.vectorizer.max_features,
        );
        vectorizer.fit(&documents)?;
        info!(
            "vectorizer fitted: vocabulary size {}",
            vectorizer.vocabulary_size()
        );

        let matrix = vectorizer.transform(&documents)?;
        let classifier = LinearSvm::fit(&matrix, &labels, &self.config.classifier)?;

        Ok(FittedPipeline {
            vectorizer,
            classifier,
            config: self.config.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Pulls the target column, requiring a label on every row.
    pub fn target_labels(&self, table: &Table) -> Result<Vec<String>, PipelineError> {
        let column = &self.config.target_column;
        if table.column_index(column).is_none() {
            return Err(PipelineError::Configuration(format!(
                "target column '{}' is missing from the input",
                column
            )));
        }
        (0..table.len())
            .map(|row| {
                table
                    .cell(row, column)
                    .map(String::from)
                    .ok_or_else(|| {
                        PipelineError::Training(format!("row {} has no '{}' value", row, column))
                    })
            })
            .collect()
    }
}

/// The immutable artifact produced by fitting: frozen vocabulary, classifier
/// weights, and a snapshot of the configuration that produced them.
///
/// Replaced wholesale on retrain; nothing here mutates during serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipeline {
    vectorizer: Vectorizer,
    classifier: LinearSvm,
    config: PipelineConfig,
    version: String,
}

impl FittedPipeline {
    /// Runs the text-construction steps and vectorizes against the frozen
    /// vocabulary. Never refits anything.
    pub fn transform(&self, table: &Table) -> Result<Array2<f32>, PipelineError> {
        let documents = build_text_column(table, &self.config)?;
        self.vectorizer.transform(&documents)
    }

    /// Transform plus classifier predict, one label per row.
    pub fn predict_labels(&self, table: &Table) -> Result<Vec<String>, PipelineError> {
        let matrix = self.transform(table)?;
        Ok(self.classifier.predict(&matrix))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }
}

/// Concatenate feature columns, normalize, tokenize; returns the finished
/// text column. Shared by fit and transform so both sides see identical
/// preprocessing.
fn build_text_column(table: &Table, config: &PipelineConfig) -> Result<Vec<String>, PipelineError> {
    let stop_words = default_stop_words();
    let exceptions: HashSet<String> = config.stopword_exception_set();

    let mut working = table.clone();
    concatenate(&mut working, &config.feature_columns, &config.text_column)?;
    working.map_column(&config.text_column, normalize)?;
    working.map_column(&config.text_column, |text| {
        tokenize(text, &stop_words, &exceptions)
    })?;
    working.column_values(&config.text_column)
}
