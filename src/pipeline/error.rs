use std::fmt;

/// Represents the different types of errors that can occur in the pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Invalid pipeline, balancer, or classifier configuration
    Configuration(String),
    /// Error occurred while loading or interpreting a dataset
    Dataset(String),
    /// Error occurred while fitting the pipeline or classifier
    Training(String),
    /// Error occurred while transforming input or making predictions
    Prediction(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Self::Dataset(msg) => write!(f, "Dataset error: {}", msg),
            Self::Training(msg) => write!(f, "Training error: {}", msg),
            Self::Prediction(msg) => write!(f, "Prediction error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}
