use crate::pipeline::PipelineError;
use crate::table::Table;

/// Space-joins the source columns into `target_column`, row by row.
///
/// Missing cells are treated as the empty string. The target column is added
/// if absent and overwritten otherwise; nothing else on the table changes.
pub fn concatenate(
    table: &mut Table,
    source_columns: &[String],
    target_column: &str,
) -> Result<(), PipelineError> {
    for column in source_columns {
        if table.column_index(column).is_none() {
            return Err(PipelineError::Configuration(format!(
                "feature column '{}' is missing from the input",
                column
            )));
        }
    }

    let mut values = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let joined = source_columns
            .iter()
            .map(|column| table.cell(row, column).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");
        values.push(Some(joined));
    }
    table.set_column(target_column, values)
}
