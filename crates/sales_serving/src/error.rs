//! Error types for model serving.

use sales_core::CoreError;
use thiserror::Error;

/// Result type alias for serving operations.
pub type Result<T> = std::result::Result<T, ServingError>;

/// Errors raised while resolving, loading or running a model.
#[derive(Debug, Error)]
pub enum ServingError {
    /// The registry could not be reached or is in a bad state
    #[error("Model registry error: {0}")]
    Registry(String),

    /// No version of the model is in the requested stage
    #[error("No version of model '{name}' in stage '{stage}'")]
    ModelNotFound { name: String, stage: String },

    /// No version with this number exists
    #[error("Model '{name}' has no version {version}")]
    VersionNotFound { name: String, version: u32 },

    /// The training run is unknown to the registry
    #[error("Run not found: {0}")]
    RunNotFound(String),

    /// A training parameter is absent from the run
    #[error("Run '{run_id}' has no parameter '{param}'")]
    MissingParam { run_id: String, param: String },

    /// A training parameter could not be parsed
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParam { param: String, message: String },

    /// The model artifact could not be loaded
    #[error("Failed to load model from {uri}: {message}")]
    ModelLoad { uri: String, message: String },

    /// The model failed to produce a prediction
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Serving configuration is invalid
    #[error(transparent)]
    Config(#[from] CoreError),
}

impl ServingError {
    /// Creates a new registry error.
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry(message.into())
    }

    /// Creates a new model load error.
    pub fn model_load(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Creates a new prediction error.
    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction(message.into())
    }
}
