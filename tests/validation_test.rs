use serde_json::{json, Value};
use triage::validate_batch;

fn valid_row(title: &str) -> Value {
    json!({
        "title": title,
        "body": "body text",
        "score": 12,
        "num_comments": 4,
        "created_at": "2019-05-02 13:14:15",
        "url": "https://example.com/post"
    })
}

#[test]
fn test_row_granular_filtering() {
    let mut bad = valid_row("bad");
    bad["score"] = json!("not-a-number");
    let batch = vec![
        valid_row("a"),
        valid_row("b"),
        bad,
        valid_row("d"),
        valid_row("e"),
    ];

    let outcome = validate_batch(&batch);
    assert_eq!(outcome.kept.len(), 4);
    assert_eq!(outcome.errors.len(), 1);

    let messages = outcome.errors.get(&2).expect("row 2 should be invalid");
    assert!(!messages.is_empty());
    assert!(messages.iter().any(|m| m.contains("score")));
}

#[test]
fn test_kept_rows_preserve_relative_order() {
    let mut batch: Vec<Value> = (0..6).map(|i| valid_row(&format!("row {}", i))).collect();
    batch[1]["url"] = Value::Null;
    batch[4]["num_comments"] = json!(1.5);

    let outcome = validate_batch(&batch);
    assert_eq!(outcome.kept_indices, vec![0, 2, 3, 5]);

    let titles: Vec<Option<String>> = outcome.kept.iter().map(|r| r.title.clone()).collect();
    assert_eq!(
        titles,
        vec![
            Some("row 0".to_string()),
            Some("row 2".to_string()),
            Some("row 3".to_string()),
            Some("row 5".to_string()),
        ]
    );
}

#[test]
fn test_indices_partition_the_batch() {
    let mut batch: Vec<Value> = (0..10).map(|i| valid_row(&format!("row {}", i))).collect();
    batch[0] = json!([]);
    batch[7]["created_at"] = json!(123);

    let outcome = validate_batch(&batch);
    let mut seen: Vec<usize> = outcome.kept_indices.clone();
    seen.extend(outcome.errors.keys().copied());
    seen.sort_unstable();
    assert_eq!(seen, (0..10).collect::<Vec<usize>>());
}

#[test]
fn test_optional_text_fields_accept_null_and_absence() {
    let mut no_title = valid_row("x");
    no_title.as_object_mut().unwrap().remove("title");
    let mut null_body = valid_row("y");
    null_body["body"] = Value::Null;

    let outcome = validate_batch(&[no_title, null_body]);
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.kept[0].title, None);
    assert_eq!(outcome.kept[1].body, None);
}

#[test]
fn test_error_keys_serialize_as_string_indices() {
    let mut bad = valid_row("bad");
    bad["score"] = json!(true);
    let outcome = validate_batch(&[valid_row("a"), bad]);

    let serialized = serde_json::to_value(&outcome.errors).unwrap();
    assert!(serialized.get("1").is_some());
    assert!(serialized.get("0").is_none());
}

#[test]
fn test_empty_batch() {
    let outcome = validate_batch(&[]);
    assert!(outcome.kept.is_empty());
    assert!(outcome.errors.is_empty());
}
