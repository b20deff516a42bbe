use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::table::Table;

/// One validated inference record.
///
/// `title` and `body` may be absent and are treated as empty text
/// downstream; the remaining fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: Option<String>,
    pub body: Option<String>,
    pub score: i64,
    pub num_comments: i64,
    pub created_at: String,
    pub url: String,
}

/// The partition of a batch into valid records and per-row error messages.
///
/// `kept` preserves the relative order of the valid rows; `kept_indices`
/// maps each kept record back to its original batch index. Every original
/// index appears either in `kept_indices` or as an `errors` key, never both.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub kept: Vec<Record>,
    pub kept_indices: Vec<usize>,
    pub errors: BTreeMap<usize, Vec<String>>,
}

/// Checks every record of a batch against the schema.
///
/// Validation is row-granular: an invalid row lands in `errors` under its
/// original index and the rest of the batch continues. A single forward
/// pass builds both containers, so no index shifting ever happens.
pub fn validate_batch(batch: &[Value]) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for (index, row) in batch.iter().enumerate() {
        match validate_row(row) {
            Ok(record) => {
                outcome.kept.push(record);
                outcome.kept_indices.push(index);
            }
            Err(messages) => {
                outcome.errors.insert(index, messages);
            }
        }
    }
    outcome
}

/// Builds a table from validated records, one column per schema field.
///
/// Missing `title`/`body` become missing cells, which the concatenator later
/// coerces to empty strings.
pub fn records_to_table(records: &[Record]) -> Table {
    let mut table = Table::new(
        ["title", "body", "score", "num_comments", "created_at", "url"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    for record in records {
        let row = vec![
            record.title.clone(),
            record.body.clone(),
            Some(record.score.to_string()),
            Some(record.num_comments.to_string()),
            Some(record.created_at.clone()),
            Some(record.url.clone()),
        ];
        // Arity always matches the fixed schema columns.
        table.push_row(row).expect("schema row arity");
    }
    table
}

fn validate_row(row: &Value) -> Result<Record, Vec<String>> {
    let object = match row.as_object() {
        Some(object) => object,
        None => return Err(vec!["record: not a JSON object".to_string()]),
    };

    let mut messages = Vec::new();

    let title = optional_string(object, "title", &mut messages);
    let body = optional_string(object, "body", &mut messages);
    let score = required_integer(object, "score", &mut messages);
    let num_comments = required_integer(object, "num_comments", &mut messages);
    let created_at = required_string(object, "created_at", &mut messages);
    let url = required_string(object, "url", &mut messages);

    if messages.is_empty() {
        Ok(Record {
            title,
            body,
            // A field that failed produced a message, so these defaults are
            // never observable.
            score: score.unwrap_or_default(),
            num_comments: num_comments.unwrap_or_default(),
            created_at: created_at.unwrap_or_default(),
            url: url.unwrap_or_default(),
        })
    } else {
        Err(messages)
    }
}

fn optional_string(
    object: &serde_json::Map<String, Value>,
    field: &str,
    messages: &mut Vec<String>,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            messages.push(format!("{}: not a valid string", field));
            None
        }
    }
}

fn required_string(
    object: &serde_json::Map<String, Value>,
    field: &str,
    messages: &mut Vec<String>,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            messages.push(format!("{}: missing required field", field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            messages.push(format!("{}: not a valid string", field));
            None
        }
    }
}

// Integer-parsable strings are accepted the way the upstream producers send
// them; booleans and floats are violations.
fn required_integer(
    object: &serde_json::Map<String, Value>,
    field: &str,
    messages: &mut Vec<String>,
) -> Option<i64> {
    match object.get(field) {
        None | Some(Value::Null) => {
            messages.push(format!("{}: missing required field", field));
            None
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(value) => Some(value),
            None => {
                messages.push(format!("{}: not a valid integer", field));
                None
            }
        },
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                messages.push(format!("{}: not a valid integer", field));
                None
            }
        },
        Some(_) => {
            messages.push(format!("{}: not a valid integer", field));
            None
        }
    }
}
