use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use log::info;
use serde::Serialize;
use serde_json::Value;

use crate::pipeline::{FittedPipeline, PipelineError};
use crate::validation::{records_to_table, validate_batch};

/// The serving response: one prediction per surviving row, in the batch's
/// original relative order, plus the per-row validation errors keyed by
/// original index. `predictions` and `errors` together account for every
/// input row exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<String>,
    pub errors: BTreeMap<usize, Vec<String>>,
    pub version: String,
}

/// Synchronous prediction service over a fitted pipeline artifact.
///
/// The artifact is injected at construction and shared read-only; a reload
/// swaps the `Arc` atomically while calls already in flight keep the
/// reference they captured.
pub struct PredictionService {
    artifact: RwLock<Arc<FittedPipeline>>,
}

impl PredictionService {
    pub fn new(artifact: Arc<FittedPipeline>) -> Self {
        Self {
            artifact: RwLock::new(artifact),
        }
    }

    /// The currently loaded artifact.
    pub fn artifact(&self) -> Arc<FittedPipeline> {
        Arc::clone(&*self.artifact.read().expect("artifact lock poisoned"))
    }

    /// Replaces the artifact wholesale. Subsequent calls see the new one.
    pub fn replace_artifact(&self, artifact: Arc<FittedPipeline>) {
        let mut slot = self.artifact.write().expect("artifact lock poisoned");
        *slot = artifact;
    }

    /// Validates the batch, predicts over the surviving rows, and assembles
    /// the response.
    ///
    /// Row-level schema violations never fail the call; they surface in
    /// `errors`. A batch with no valid rows yields empty `predictions`.
    pub fn predict(&self, batch: &[Value]) -> Result<PredictResponse, PipelineError> {
        let artifact = self.artifact();
        let outcome = validate_batch(batch);
        let table = records_to_table(&outcome.kept);
        let predictions = artifact.predict_labels(&table)?;

        info!(
            "predicted {} rows with model version {} ({} rows rejected)",
            predictions.len(),
            artifact.version(),
            outcome.errors.len()
        );

        Ok(PredictResponse {
            predictions,
            errors: outcome.errors,
            version: artifact.version().to_string(),
        })
    }
}
