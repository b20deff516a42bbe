use std::collections::BTreeMap;

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::PipelineConfig;
use crate::metrics::{evaluate, Metrics};
use crate::pipeline::{FeaturePipeline, FittedPipeline, PipelineError};
use crate::table::Table;

/// The result of an offline training run.
#[derive(Debug)]
pub struct TrainingReport {
    pub artifact: FittedPipeline,
    pub metrics: Metrics,
}

/// Trains a pipeline from a labeled table and evaluates it on a held-out
/// split.
///
/// Flow: stratified seeded split, downsample the training partition only,
/// fit, evaluate. Configuration problems surface before any work begins.
pub fn run_training(data: &Table, config: &PipelineConfig) -> Result<TrainingReport, PipelineError> {
    config.validate()?;
    let pipeline = FeaturePipeline::new(config.clone())?;

    let (train, test) = stratified_split(
        data,
        &config.target_column,
        config.split.test_fraction,
        config.split.seed,
    )?;
    info!(
        "split {} rows into {} train / {} test",
        data.len(),
        train.len(),
        test.len()
    );

    let train = pipeline.rebalance(&train)?;
    info!("training on {} rows after downsampling", train.len());

    let artifact = pipeline.fit(&train)?;

    let actual = pipeline.target_labels(&test)?;
    let predicted = artifact.predict_labels(&test)?;
    let metrics = evaluate(&actual, &predicted);
    info!(
        "held-out accuracy {:.3}, macro F1 {:.3}",
        metrics.accuracy, metrics.macro_f1
    );

    Ok(TrainingReport { artifact, metrics })
}

/// Splits rows into (train, test), stratified by the target column.
///
/// Each label's rows are shuffled with the seeded generator and
/// `round(count * test_fraction)` of them go to the test side, so class
/// proportions carry over. Groups are visited in sorted label order, which
/// makes the split deterministic for a given seed.
pub fn stratified_split(
    table: &Table,
    target_column: &str,
    test_fraction: f64,
    seed: u64,
) -> Result<(Table, Table), PipelineError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::Configuration(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }
    if table.column_index(target_column).is_none() {
        return Err(PipelineError::Configuration(format!(
            "target column '{}' is missing from the input",
            target_column
        )));
    }

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for row in 0..table.len() {
        let label = table
            .cell(row, target_column)
            .map(String::from)
            .ok_or_else(|| {
                PipelineError::Training(format!("row {} has no '{}' value", row, target_column))
            })?;
        groups.entry(label).or_default().push(row);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_rows = Vec::new();
    let mut test_rows = Vec::new();
    for (_, mut rows) in groups {
        rows.shuffle(&mut rng);
        // Never send a label's only rows entirely to the test side.
        let n_test = ((rows.len() as f64 * test_fraction).round() as usize).min(rows.len() - 1);
        test_rows.extend(rows.drain(..n_test));
        train_rows.extend(rows);
    }
    train_rows.sort_unstable();
    test_rows.sort_unstable();

    Ok((table.select_rows(&train_rows), table.select_rows(&test_rows)))
}
