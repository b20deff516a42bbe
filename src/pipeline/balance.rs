use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pipeline::PipelineError;
use crate::table::Table;

/// Downsamples the majority label class, leaving all other rows untouched.
///
/// Keeps `floor(|majority| * fraction)` majority rows, sampled without
/// replacement and reproducible for a given `seed`. The result's row order
/// is sampled-majority first, then the other rows in their original order.
///
/// If `majority_label` never occurs in `target_column` the table is returned
/// unchanged with a warning; an out-of-range `fraction` is a configuration
/// error.
pub fn downsample(
    table: &Table,
    target_column: &str,
    majority_label: &str,
    fraction: f64,
    seed: u64,
) -> Result<Table, PipelineError> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(PipelineError::Configuration(format!(
            "downsample fraction must be in (0, 1], got {}",
            fraction
        )));
    }
    if table.column_index(target_column).is_none() {
        return Err(PipelineError::Configuration(format!(
            "target column '{}' is missing from the input",
            target_column
        )));
    }

    let mut majority: Vec<usize> = Vec::new();
    let mut others: Vec<usize> = Vec::new();
    for row in 0..table.len() {
        if table.cell(row, target_column) == Some(majority_label) {
            majority.push(row);
        } else {
            others.push(row);
        }
    }

    if majority.is_empty() {
        warn!(
            "majority label '{}' not present in column '{}'; skipping downsampling",
            majority_label, target_column
        );
        return Ok(table.clone());
    }

    let sample_size = (majority.len() as f64 * fraction).floor() as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sampled: Vec<usize> = rand::seq::index::sample(&mut rng, majority.len(), sample_size)
        .into_iter()
        .map(|i| majority[i])
        .collect();
    sampled.sort_unstable();
    sampled.extend(others);

    Ok(table.select_rows(&sampled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_table(majority: usize, others: usize) -> Table {
        let mut table = Table::new(vec!["text".to_string(), "label".to_string()]);
        for i in 0..majority {
            table
                .push_row(vec![Some(format!("row {}", i)), Some("other".to_string())])
                .unwrap();
        }
        for i in 0..others {
            table
                .push_row(vec![Some(format!("bug {}", i)), Some("bug".to_string())])
                .unwrap();
        }
        table
    }

    fn count_label(table: &Table, label: &str) -> usize {
        (0..table.len())
            .filter(|&row| table.cell(row, "label") == Some(label))
            .count()
    }

    #[test]
    fn test_majority_is_reduced_others_untouched() -> Result<(), PipelineError> {
        let table = labeled_table(100, 17);
        let result = downsample(&table, "label", "other", 0.4, 42)?;
        assert_eq!(count_label(&result, "other"), 40);
        assert_eq!(count_label(&result, "bug"), 17);
        assert_eq!(result.len(), 57);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_sample() -> Result<(), PipelineError> {
        let table = labeled_table(50, 5);
        let first = downsample(&table, "label", "other", 0.5, 7)?;
        let second = downsample(&table, "label", "other", 0.5, 7)?;
        let rows = |t: &Table| -> Vec<Option<String>> {
            (0..t.len())
                .map(|r| t.cell(r, "text").map(String::from))
                .collect()
        };
        assert_eq!(rows(&first), rows(&second));
        Ok(())
    }

    #[test]
    fn test_absent_majority_label_is_a_noop() -> Result<(), PipelineError> {
        let table = labeled_table(0, 10);
        let result = downsample(&table, "label", "other", 0.4, 42)?;
        assert_eq!(result.len(), 10);
        Ok(())
    }

    #[test]
    fn test_out_of_range_fraction_is_rejected() {
        let table = labeled_table(10, 0);
        assert!(matches!(
            downsample(&table, "label", "other", 0.0, 42),
            Err(PipelineError::Configuration(_))
        ));
        assert!(matches!(
            downsample(&table, "label", "other", 1.1, 42),
            Err(PipelineError::Configuration(_))
        ));
    }
}
