use std::sync::Arc;

use serde_json::{json, Value};
use triage::{
    run_training, ArtifactError, ArtifactStore, ClassWeightPolicy, PipelineConfig,
    PredictionService, Table,
};

fn training_table() -> Table {
    let mut table = Table::new(vec![
        "title".to_string(),
        "body".to_string(),
        "label".to_string(),
    ]);
    let samples: &[(&str, &str, &str)] = &[
        ("payment failed", "I was charged twice for the same test", "payment"),
        ("missing payout", "my payment never arrived this month", "payment"),
        ("payment question", "when do payments usually go out", "payment"),
        ("no payout yet", "still waiting on the payment from last week", "payment"),
        ("payout delayed", "payment is late again for the second time", "payment"),
        ("recorder crash", "the screen recorder crashed in the middle", "bug"),
        ("app crashed", "the recorder app keeps crashing on launch", "bug"),
        ("crash on upload", "recording crashed during the upload step", "bug"),
        ("screen froze", "the app froze and crashed after the intro", "bug"),
        ("crash report", "another crash while the recorder was running", "bug"),
        ("general feedback", "just wanted to say the platform is nice", "other"),
        ("random thought", "nothing specific happened to report here", "other"),
        ("hello there", "saying hi to the community and the team", "other"),
        ("misc question", "a general question not related to anything", "other"),
        ("weekly chat", "what is everyone working on these days", "other"),
    ];
    for (title, body, label) in samples {
        table
            .push_row(vec![
                Some(title.to_string()),
                Some(body.to_string()),
                Some(label.to_string()),
            ])
            .unwrap();
    }
    table
}

fn test_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.vectorizer.max_features = 200;
    config.classifier.regularization_strength = 1.0;
    config.classifier.class_weight_policy = ClassWeightPolicy::Uniform;
    config.downsample.fraction = 1.0;
    config
}

fn valid_row(title: &str, body: Option<&str>) -> Value {
    json!({
        "title": title,
        "body": body,
        "score": 3,
        "num_comments": 1,
        "created_at": "2019-05-02 13:14:15",
        "url": "https://example.com/post"
    })
}

#[test]
fn test_every_row_is_accounted_for() -> Result<(), Box<dyn std::error::Error>> {
    let report = run_training(&training_table(), &test_config())?;
    let service = PredictionService::new(Arc::new(report.artifact));

    let mut bad_score = valid_row("bad", None);
    bad_score["score"] = json!("oops");
    let mut bad_url = valid_row("worse", None);
    bad_url["url"] = Value::Null;

    let batch = vec![
        valid_row("payment never arrived", Some("charged twice")),
        bad_score,
        valid_row("recorder crashed", Some("crash on upload")),
        bad_url,
        valid_row("general chat", None),
    ];

    let response = service.predict(&batch)?;
    assert_eq!(
        response.predictions.len() + response.errors.len(),
        batch.len()
    );
    assert_eq!(response.predictions.len(), 3);
    assert!(response.errors.contains_key(&1));
    assert!(response.errors.contains_key(&3));

    let valid_labels = &test_config().valid_labels;
    for prediction in &response.predictions {
        assert!(valid_labels.contains(prediction));
    }
    Ok(())
}

#[test]
fn test_response_version_matches_artifact() -> Result<(), Box<dyn std::error::Error>> {
    let report = run_training(&training_table(), &test_config())?;
    let version = report.artifact.version().to_string();
    let service = PredictionService::new(Arc::new(report.artifact));

    let response = service.predict(&[valid_row("anything", None)])?;
    assert_eq!(response.version, version);
    assert_eq!(version, env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[test]
fn test_fully_invalid_batch_returns_empty_predictions() -> Result<(), Box<dyn std::error::Error>> {
    let report = run_training(&training_table(), &test_config())?;
    let service = PredictionService::new(Arc::new(report.artifact));

    let batch = vec![json!({"title": "lonely"}), json!(42)];
    let response = service.predict(&batch)?;
    assert!(response.predictions.is_empty());
    assert_eq!(response.errors.len(), 2);
    Ok(())
}

#[test]
fn test_artifact_roundtrip_through_store() -> Result<(), Box<dyn std::error::Error>> {
    let report = run_training(&training_table(), &test_config())?;
    let dir = tempfile::tempdir()?;
    let store = ArtifactStore::new(dir.path())?;

    store.save("roundtrip", &report.artifact)?;
    assert!(store.exists("roundtrip"));

    let loaded = store.load("roundtrip")?;
    assert_eq!(loaded.version(), report.artifact.version());
    assert_eq!(loaded.vocabulary_size(), report.artifact.vocabulary_size());
    assert_eq!(loaded.classes(), report.artifact.classes());

    // Loaded and in-memory artifacts must agree on predictions.
    let service = PredictionService::new(Arc::new(report.artifact));
    let reloaded = PredictionService::new(Arc::new(loaded));
    let batch = vec![valid_row("payment missing", Some("never got the payout"))];
    assert_eq!(
        service.predict(&batch)?.predictions,
        reloaded.predict(&batch)?.predictions
    );
    Ok(())
}

#[test]
fn test_corrupted_artifact_refuses_to_load() -> Result<(), Box<dyn std::error::Error>> {
    let report = run_training(&training_table(), &test_config())?;
    let dir = tempfile::tempdir()?;
    let store = ArtifactStore::new(dir.path())?;
    store.save("tampered", &report.artifact)?;

    std::fs::write(store.artifact_path("tampered"), b"corrupted data")?;
    assert!(matches!(
        store.load("tampered"),
        Err(ArtifactError::ChecksumMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_replace_artifact_is_atomic_for_new_calls() -> Result<(), Box<dyn std::error::Error>> {
    let first = Arc::new(run_training(&training_table(), &test_config())?.artifact);
    let second = Arc::new(run_training(&training_table(), &test_config())?.artifact);

    let service = PredictionService::new(Arc::clone(&first));
    let captured = service.artifact();
    service.replace_artifact(Arc::clone(&second));

    // The in-flight reference is untouched; new calls see the replacement.
    assert!(Arc::ptr_eq(&captured, &first));
    assert!(Arc::ptr_eq(&service.artifact(), &second));
    Ok(())
}
