//! A text-classification pipeline for routing support posts.
//!
//! Posts (title, body, score, comment count, timestamp, url) are turned
//! into n-gram bag-of-words features through a fixed sequence of transforms
//! (field concatenation, normalization, tokenization) and classified with a
//! linear model. Training is offline from a labeled CSV corpus; serving
//! validates each incoming record individually and never fails a batch for
//! one bad row.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use triage::{FeaturePipeline, PipelineConfig, PredictionService, Table};
//!
//! let csv = "title,body,label\n\
//!     payment failed,charged twice,payment\n\
//!     missing payout,payment never arrived,payment\n\
//!     recorder crash,the recorder crashed,bug\n\
//!     app crashed,keeps crashing on launch,bug";
//! let data = Table::from_csv_reader(csv.as_bytes())?;
//!
//! let mut config = PipelineConfig::default();
//! config.vectorizer.max_features = 50;
//!
//! let pipeline = FeaturePipeline::new(config)?;
//! let fitted = Arc::new(pipeline.fit(&data)?);
//!
//! let service = PredictionService::new(fitted);
//! let batch = serde_json::json!([{
//!     "title": "payment failed again",
//!     "body": null,
//!     "score": 3,
//!     "num_comments": 1,
//!     "created_at": "2019-05-02 13:14:15",
//!     "url": "https://example.com/post"
//! }]);
//! let response = service.predict(batch.as_array().unwrap())?;
//! assert_eq!(response.predictions.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! A fitted pipeline is immutable and shared read-only: wrap it in `Arc`
//! and clone the handle across threads. Retraining produces a whole new
//! artifact; `PredictionService::replace_artifact` swaps it atomically while
//! calls in flight keep the reference they captured.

pub mod artifact;
pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod service;
pub mod table;
pub mod train;
pub mod validation;

pub use artifact::{default_artifact_name, ArtifactError, ArtifactStore};
pub use config::{
    ClassWeightPolicy, ClassifierConfig, DownsampleConfig, PipelineConfig, SplitConfig,
    VectorizerConfig,
};
pub use metrics::{LabelMetrics, Metrics};
pub use pipeline::{
    concatenate, default_stop_words, downsample, normalize, tokenize, FeaturePipeline,
    FittedPipeline, LinearSvm, PipelineError, Vectorizer,
};
pub use service::{PredictResponse, PredictionService};
pub use table::Table;
pub use train::{run_training, stratified_split, TrainingReport};
pub use validation::{records_to_table, validate_batch, Record, ValidationOutcome};

pub fn init_logger() {
    env_logger::init();
}
