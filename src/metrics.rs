use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Precision/recall/F1 for one label.
#[derive(Debug, Clone, Serialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Held-out evaluation summary.
#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub macro_f1: f64,
    pub per_label: BTreeMap<String, LabelMetrics>,
}

/// Computes accuracy and per-label precision/recall/F1.
///
/// Labels that appear in either sequence get an entry; undefined ratios
/// (zero denominators) report as 0.0.
pub fn evaluate(actual: &[String], predicted: &[String]) -> Metrics {
    debug_assert_eq!(actual.len(), predicted.len());

    let total = actual.len();
    let correct = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| a == p)
        .count();
    let accuracy = if total > 0 {
        correct as f64 / total as f64
    } else {
        0.0
    };

    let labels: BTreeSet<&String> = actual.iter().chain(predicted.iter()).collect();
    let mut per_label = BTreeMap::new();
    for label in labels {
        let true_positives = actual
            .iter()
            .zip(predicted)
            .filter(|(a, p)| *a == label && *p == label)
            .count() as f64;
        let predicted_positives = predicted.iter().filter(|p| *p == label).count() as f64;
        let support = actual.iter().filter(|a| *a == label).count();

        let precision = if predicted_positives > 0.0 {
            true_positives / predicted_positives
        } else {
            0.0
        };
        let recall = if support > 0 {
            true_positives / support as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        per_label.insert(
            label.clone(),
            LabelMetrics {
                precision,
                recall,
                f1,
                support,
            },
        );
    }

    let macro_f1 = if per_label.is_empty() {
        0.0
    } else {
        per_label.values().map(|m| m.f1).sum::<f64>() / per_label.len() as f64
    };

    Metrics {
        accuracy,
        macro_f1,
        per_label,
    }
}
