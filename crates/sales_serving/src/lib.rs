//! Model serving for rolling-sales price models.
//!
//! The model registry and the estimator runtime are external collaborators,
//! reached through the [`ModelRegistry`], [`ModelLoader`] and [`Regressor`]
//! traits. [`PredictionService`] ties them to a [`sales_core::ServingConfig`]:
//!
//! - `predict` resolves the newest version in the configured stage and runs
//!   it on one [`PredictionPayload`]
//! - `params` lists the features that version was trained on
//!
//! # Example
//!
//! ```rust
//! use sales_core::ServingConfig;
//! use sales_serving::{FeatureSet, InMemoryRegistry, ModelMetadata, ModelRegistry};
//!
//! let config = ServingConfig::default();
//! let registry = InMemoryRegistry::new();
//! let metadata = ModelMetadata::new("run-3").metrics(39_800.0, 81_250.0, 0.74);
//! let version = registry.register(&config.model_name, "models:/gbr/3", metadata).unwrap();
//! registry.transition_stage(&config.model_name, version.version, &config.stage).unwrap();
//! registry
//!     .log_params("run-3", FeatureSet::nyc_rolling_sales().to_params())
//!     .unwrap();
//!
//! assert_eq!(registry.latest(&config.model_name, "Production").unwrap().version, 1);
//! ```

mod error;
mod features;
mod payload;
mod registry;
mod service;

pub use error::*;
pub use features::*;
pub use payload::*;
pub use registry::*;
pub use service::*;
