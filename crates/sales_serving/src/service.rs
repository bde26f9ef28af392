//! Prediction service.
//!
//! Resolves the newest model version in the configured stage on every call,
//! so promoting a new version takes effect without a restart.

use crate::{FeatureKinds, FeatureSet, ModelLoader, ModelRegistry, PredictionPayload, Result, ServingError};
use sales_core::ServingConfig;
use serde::Serialize;
use tracing::{debug, info};

/// Response of a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted sale prices, one per submitted row
    pub prediction: Vec<f64>,

    /// Model version that produced the prediction
    pub model_version: u32,
}

/// Serves predictions from the model registry.
pub struct PredictionService<R, L> {
    config: ServingConfig,
    registry: R,
    loader: L,
}

impl<R: ModelRegistry, L: ModelLoader> PredictionService<R, L> {
    /// Creates a service. Fails if `config` is invalid.
    pub fn new(config: ServingConfig, registry: R, loader: L) -> Result<Self> {
        config.validate()?;
        info!(
            tracking_uri = %config.tracking_uri,
            model = %config.model_name,
            stage = %config.stage,
            "Prediction service ready"
        );
        Ok(Self {
            config,
            registry,
            loader,
        })
    }

    /// The service configuration.
    pub fn config(&self) -> &ServingConfig {
        &self.config
    }

    /// The registry the service reads from.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Predicts the sale price of one property.
    pub fn predict(&self, payload: PredictionPayload) -> Result<Prediction> {
        let version = self
            .registry
            .latest(&self.config.model_name, &self.config.stage)?;
        debug!(version = version.version, source = %version.source, "Loading model");

        let model = self.loader.load(&version.source)?;
        let rows = [payload.into_feature_row()];
        let prediction = model.predict(&rows)?;

        if prediction.len() != rows.len() {
            return Err(ServingError::prediction(format!(
                "model returned {} values for {} rows",
                prediction.len(),
                rows.len()
            )));
        }

        Ok(Prediction {
            prediction,
            model_version: version.version,
        })
    }

    /// Features the served model was trained on, with their kinds.
    pub fn params(&self) -> Result<FeatureKinds> {
        let version = self
            .registry
            .latest(&self.config.model_name, &self.config.stage)?;
        let params = self.registry.run_params(&version.run_id)?;
        let features = FeatureSet::from_params(&version.run_id, &params)?;
        Ok(features.kinds())
    }
}
