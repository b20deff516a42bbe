use std::collections::HashMap;

use log::info;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::{ClassWeightPolicy, ClassifierConfig};
use crate::pipeline::PipelineError;

/// One-vs-rest linear SVM over the vectorized features.
///
/// Trained with hinge loss and L2 regularization via a Pegasos-style
/// subgradient descent; `regularization_strength` follows the usual C
/// parameterization (smaller C, stronger regularization). Given a seed,
/// fitting is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvm {
    classes: Vec<String>,
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl LinearSvm {
    /// Fits one binary classifier per distinct label.
    pub fn fit(
        features: &Array2<f32>,
        labels: &[String],
        config: &ClassifierConfig,
    ) -> Result<Self, PipelineError> {
        if labels.is_empty() {
            return Err(PipelineError::Training(
                "cannot fit classifier on an empty training set".to_string(),
            ));
        }
        if features.nrows() != labels.len() {
            return Err(PipelineError::Training(format!(
                "feature matrix has {} rows but {} labels were given",
                features.nrows(),
                labels.len()
            )));
        }

        let mut classes: Vec<String> = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let n_samples = features.nrows();
        let n_features = features.ncols();
        let sample_weights = Self::sample_weights(labels, &classes, config.class_weight_policy);
        let lambda = 1.0 / (config.regularization_strength as f32 * n_samples as f32);

        info!(
            "fitting linear SVM: {} samples, {} features, {} classes",
            n_samples,
            n_features,
            classes.len()
        );

        let mut weights = Array2::zeros((classes.len(), n_features));
        let mut bias = Array1::zeros(classes.len());
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut order: Vec<usize> = (0..n_samples).collect();

        for (c, class) in classes.iter().enumerate() {
            let targets: Vec<f32> = labels
                .iter()
                .map(|label| if label == class { 1.0 } else { -1.0 })
                .collect();

            let mut w = Array1::<f32>::zeros(n_features);
            let mut b = 0.0f32;
            let mut step = 0u64;
            for _ in 0..config.max_epochs {
                order.shuffle(&mut rng);
                for &i in &order {
                    step += 1;
                    let eta = 1.0 / (lambda * step as f32);
                    let x = features.row(i);
                    let margin = targets[i] * (w.dot(&x) + b);

                    // The bias is regularized along with the weights, which
                    // keeps the update rule uniform.
                    let shrink = 1.0 - eta * lambda;
                    w *= shrink;
                    b *= shrink;
                    if margin < 1.0 {
                        let push = eta * targets[i] * sample_weights[i];
                        w.scaled_add(push, &x);
                        b += push;
                    }
                }
            }
            weights.row_mut(c).assign(&w);
            bias[c] = b;
        }

        Ok(Self {
            classes,
            weights,
            bias,
        })
    }

    /// Predicts one label per feature row by the highest decision value.
    ///
    /// An empty matrix yields an empty vector. Ties resolve to the
    /// alphabetically first class.
    pub fn predict(&self, features: &Array2<f32>) -> Vec<String> {
        (0..features.nrows())
            .map(|row| {
                let x = features.row(row);
                let mut best = 0;
                let mut best_score = f32::NEG_INFINITY;
                for c in 0..self.classes.len() {
                    let score = self.weights.row(c).dot(&x) + self.bias[c];
                    if score > best_score {
                        best_score = score;
                        best = c;
                    }
                }
                self.classes[best].clone()
            })
            .collect()
    }

    /// The distinct labels seen at fit time, in sorted order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn sample_weights(
        labels: &[String],
        classes: &[String],
        policy: ClassWeightPolicy,
    ) -> Vec<f32> {
        match policy {
            ClassWeightPolicy::Uniform => vec![1.0; labels.len()],
            ClassWeightPolicy::Balanced => {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for label in labels {
                    *counts.entry(label.as_str()).or_insert(0) += 1;
                }
                let scale = labels.len() as f32 / classes.len() as f32;
                labels
                    .iter()
                    .map(|label| scale / counts[label.as_str()] as f32)
                    .collect()
            }
        }
    }
}
