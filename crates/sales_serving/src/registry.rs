//! Model registry and model loading interfaces.
//!
//! The tracking server and the estimator runtime live outside this workspace.
//! They are reached through [`ModelRegistry`] and [`ModelLoader`]; the
//! [`InMemoryRegistry`] implementation backs local runs and tests.

use crate::{Result, ServingError};
use sales_core::DataRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Stage assigned to a freshly registered version.
pub const STAGE_NONE: &str = "None";

/// One registered version of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Registered model name
    pub name: String,

    /// Version number, starting at 1
    pub version: u32,

    /// Artifact URI the model is loaded from
    pub source: String,

    /// Training run that produced the model
    pub run_id: String,

    /// Current stage (`None`, `Staging`, `Production`, ...)
    pub stage: String,

    /// Free-form tags, training metrics among them
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// What a training run attaches to a version when it registers it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelMetadata {
    /// Training run that produced the model
    pub run_id: String,

    /// Tags stored on the registered version
    pub tags: HashMap<String, String>,
}

impl ModelMetadata {
    /// Metadata for a model produced by `run_id`, without tags.
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            tags: HashMap::new(),
        }
    }

    /// Adds one tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.tags.insert(key.into(), value.to_string());
        self
    }

    /// Adds the evaluation metrics as `mae`, `rmse` and `r2` tags.
    pub fn metrics(self, mae: f64, rmse: f64, r2: f64) -> Self {
        self.tag("mae", mae).tag("rmse", rmse).tag("r2", r2)
    }
}

/// Access to registered models and their training runs.
///
/// # Example
///
/// ```rust
/// use sales_serving::{InMemoryRegistry, ModelMetadata, ModelRegistry};
///
/// let registry = InMemoryRegistry::new();
/// let metadata = ModelMetadata::new("run-1").metrics(41_250.0, 88_400.5, 0.72);
/// let version = registry.register("NYC Rolling Sales", "models:/rf/1", metadata).unwrap();
/// registry.transition_stage("NYC Rolling Sales", version.version, "Production").unwrap();
///
/// let latest = registry.latest("NYC Rolling Sales", "Production").unwrap();
/// assert_eq!(latest.source, "models:/rf/1");
/// ```
pub trait ModelRegistry: Send + Sync {
    /// Registers a new version of `name` from the artifact at `source`.
    fn register(&self, name: &str, source: &str, metadata: ModelMetadata) -> Result<ModelVersion>;

    /// Moves a version to `stage`.
    fn transition_stage(&self, name: &str, version: u32, stage: &str) -> Result<ModelVersion>;

    /// Newest version of `name` currently in `stage`.
    fn latest(&self, name: &str, stage: &str) -> Result<ModelVersion>;

    /// Parameters logged by a training run.
    fn run_params(&self, run_id: &str) -> Result<HashMap<String, String>>;
}

/// A fitted regression model.
pub trait Regressor: Send + Sync {
    /// Predicts one value per feature row.
    fn predict(&self, rows: &[DataRow]) -> Result<Vec<f64>>;
}

/// Loads fitted models from artifact URIs.
pub trait ModelLoader: Send + Sync {
    /// Loads the model stored at `uri`.
    fn load(&self, uri: &str) -> Result<Box<dyn Regressor>>;
}

#[derive(Debug, Default)]
struct RegistryState {
    versions: Vec<ModelVersion>,
    runs: HashMap<String, HashMap<String, String>>,
}

/// Process-local registry.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records parameters of a training run. Later values win.
    pub fn log_params(&self, run_id: &str, params: HashMap<String, String>) -> Result<()> {
        self.lock()?
            .runs
            .entry(run_id.to_string())
            .or_default()
            .extend(params);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RegistryState>> {
        self.state
            .lock()
            .map_err(|_| ServingError::registry("registry state is poisoned"))
    }
}

impl ModelRegistry for InMemoryRegistry {
    fn register(&self, name: &str, source: &str, metadata: ModelMetadata) -> Result<ModelVersion> {
        let mut state = self.lock()?;
        let version = state
            .versions
            .iter()
            .filter(|v| v.name == name)
            .map(|v| v.version)
            .max()
            .unwrap_or(0)
            + 1;

        let model = ModelVersion {
            name: name.to_string(),
            version,
            source: source.to_string(),
            run_id: metadata.run_id,
            stage: STAGE_NONE.to_string(),
            tags: metadata.tags,
        };
        state.versions.push(model.clone());
        debug!(name, version, source, "Registered model version");
        Ok(model)
    }

    fn transition_stage(&self, name: &str, version: u32, stage: &str) -> Result<ModelVersion> {
        let mut state = self.lock()?;
        let model = state
            .versions
            .iter_mut()
            .find(|v| v.name == name && v.version == version)
            .ok_or_else(|| ServingError::VersionNotFound {
                name: name.to_string(),
                version,
            })?;
        model.stage = stage.to_string();
        Ok(model.clone())
    }

    fn latest(&self, name: &str, stage: &str) -> Result<ModelVersion> {
        self.lock()?
            .versions
            .iter()
            .filter(|v| v.name == name && v.stage == stage)
            .max_by_key(|v| v.version)
            .cloned()
            .ok_or_else(|| ServingError::ModelNotFound {
                name: name.to_string(),
                stage: stage.to_string(),
            })
    }

    fn run_params(&self, run_id: &str) -> Result<HashMap<String, String>> {
        self.lock()?
            .runs
            .get(run_id)
            .cloned()
            .ok_or_else(|| ServingError::RunNotFound(run_id.to_string()))
    }
}
