use std::io::Read;
use std::path::Path;

use crate::pipeline::PipelineError;

/// A small column-oriented table of optional string cells.
///
/// This is the shape the whole pipeline works against: training data loaded
/// from CSV, validated inference batches, and every intermediate text column
/// flow through it. A `None` cell is a missing value; transforms that need
/// text coerce it to the empty string.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Loads a table from a CSV file with a header row.
    ///
    /// Empty cells become `None`.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            PipelineError::Dataset(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_csv_reader(file)
    }

    /// Loads a table from any CSV source with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, PipelineError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()
            .map_err(|e| PipelineError::Dataset(format!("failed to read CSV header: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut table = Self::new(columns);
        for record in csv_reader.records() {
            let record =
                record.map_err(|e| PipelineError::Dataset(format!("failed to read CSV row: {}", e)))?;
            let row = record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Appends a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<(), PipelineError> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::Dataset(format!(
                "row has {} cells, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the cell at (row, column name), if the column exists and the
    /// cell is present.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Adds or overwrites a column. The value vector must have one entry per
    /// row.
    pub fn set_column(
        &mut self,
        name: &str,
        values: Vec<Option<String>>,
    ) -> Result<(), PipelineError> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::Dataset(format!(
                "column '{}' has {} values, expected {}",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Returns a column's values with missing cells coerced to the empty
    /// string.
    pub fn column_values(&self, name: &str) -> Result<Vec<String>, PipelineError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PipelineError::Dataset(format!("unknown column '{}'", name)))?;
        Ok(self
            .rows
            .iter()
            .map(|row| row[idx].clone().unwrap_or_default())
            .collect())
    }

    /// Applies `f` to every cell of a column in place. Missing cells are
    /// passed through as the empty string.
    pub fn map_column<F>(&mut self, name: &str, f: F) -> Result<(), PipelineError>
    where
        F: Fn(&str) -> String,
    {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PipelineError::Dataset(format!("unknown column '{}'", name)))?;
        for row in &mut self.rows {
            let value = row[idx].as_deref().unwrap_or("");
            row[idx] = Some(f(value));
        }
        Ok(())
    }

    /// Builds a new table from the given row indices, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}
