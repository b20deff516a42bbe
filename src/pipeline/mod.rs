//! The fit/transform feature pipeline and its component transforms.

pub mod balance;
pub mod concat;
mod error;
pub mod normalize;
pub mod pipeline;
pub mod svm;
pub mod tokenize;
pub mod vectorize;

pub use balance::downsample;
pub use concat::concatenate;
pub use error::PipelineError;
pub use normalize::normalize;
pub use pipeline::{FeaturePipeline, FittedPipeline};
pub use svm::LinearSvm;
pub use tokenize::{default_stop_words, tokenize};
pub use vectorize::Vectorizer;
