//! Request-to-response flow through the prediction service.

use pretty_assertions::assert_eq;
use sales_core::{DataRow, ServingConfig};
use sales_serving::{
    FeatureSet, InMemoryRegistry, ModelLoader, ModelMetadata, ModelRegistry,
    PredictionPayload, PredictionService, Regressor, Result, ServingError,
};
use std::sync::{Arc, Mutex};

/// Records the rows it was asked to score and answers with a constant.
struct Recording {
    seen: Arc<Mutex<Vec<DataRow>>>,
    answer: f64,
}

impl Regressor for Recording {
    fn predict(&self, rows: &[DataRow]) -> Result<Vec<f64>> {
        self.seen.lock().unwrap().extend(rows.iter().cloned());
        Ok(vec![self.answer; rows.len()])
    }
}

struct Loader {
    seen: Arc<Mutex<Vec<DataRow>>>,
}

impl ModelLoader for Loader {
    fn load(&self, uri: &str) -> Result<Box<dyn Regressor>> {
        let answer = match uri {
            "runs:/v1/model" => 500_000.0,
            "runs:/v2/model" => 750_000.0,
            other => return Err(ServingError::model_load(other, "no such artifact")),
        };
        Ok(Box::new(Recording {
            seen: Arc::clone(&self.seen),
            answer,
        }))
    }
}

fn promote(registry: &InMemoryRegistry, source: &str, run_id: &str) {
    promote_with(registry, source, ModelMetadata::new(run_id));
}

fn promote_with(registry: &InMemoryRegistry, source: &str, metadata: ModelMetadata) {
    let config = ServingConfig::default();
    let version = registry.register(&config.model_name, source, metadata).unwrap();
    registry
        .transition_stage(&config.model_name, version.version, &config.stage)
        .unwrap();
}

#[test]
fn test_json_request_reaches_model_with_column_names() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = InMemoryRegistry::new();
    promote(&registry, "runs:/v1/model", "run-1");

    let service = PredictionService::new(
        ServingConfig::default(),
        registry,
        Loader {
            seen: Arc::clone(&seen),
        },
    )
    .unwrap();

    let payload: PredictionPayload = serde_json::from_str(
        r#"{
            "GROSS_SQUARE_FEET": 6440,
            "LAND_SQUARE_FEET": 1633,
            "YEAR_BUILT": 1900,
            "NEIGHBORHOOD": "ALPHABET CITY",
            "TAX_CLASS_AT_TIME_OF_SALE": "2"
        }"#,
    )
    .unwrap();

    let prediction = service.predict(payload).unwrap();
    assert_eq!(prediction.prediction, vec![500_000.0]);
    assert_eq!(
        serde_json::to_value(&prediction).unwrap()["prediction"][0],
        500_000.0
    );

    let rows = seen.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contains_key("GROSS SQUARE FEET"));
    assert!(rows[0].contains_key("TAX CLASS AT TIME OF SALE"));
}

#[test]
fn test_promotion_switches_served_model() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = InMemoryRegistry::new();
    promote(&registry, "runs:/v1/model", "run-1");

    let service =
        PredictionService::new(ServingConfig::default(), registry, Loader { seen }).unwrap();
    assert_eq!(
        service.predict(PredictionPayload::default()).unwrap().model_version,
        1
    );

    promote(service.registry(), "runs:/v2/model", "run-2");
    let prediction = service.predict(PredictionPayload::default()).unwrap();
    assert_eq!(prediction.model_version, 2);
    assert_eq!(prediction.prediction, vec![750_000.0]);
}

#[test]
fn test_params_reflect_dropped_training_columns() {
    let registry = InMemoryRegistry::new();
    promote(&registry, "runs:/v1/model", "run-1");
    registry
        .log_params(
            "run-1",
            FeatureSet::nyc_rolling_sales()
                .without(&["SALE DATE", "BLOCK"])
                .to_params(),
        )
        .unwrap();

    let service = PredictionService::new(
        ServingConfig::default(),
        registry,
        Loader {
            seen: Arc::default(),
        },
    )
    .unwrap();

    let params = serde_json::to_value(service.params().unwrap()).unwrap();
    let params = params.as_object().unwrap();
    assert_eq!(params.len(), 14);
    assert_eq!(params["YEAR BUILT"], "int");
    assert_eq!(params["NEIGHBORHOOD"], "str");
    assert!(!params.contains_key("SALE DATE"));
}

#[test]
fn test_params_accept_list_literals() {
    let registry = InMemoryRegistry::new();
    promote(&registry, "runs:/v1/model", "run-1");
    registry
        .log_params(
            "run-1",
            [
                ("quantitative_variables", "['GROSS SQUARE FEET']"),
                ("categorical_variables", "['NEIGHBORHOOD', 'ZIP CODE']"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        )
        .unwrap();

    let service = PredictionService::new(
        ServingConfig::default(),
        registry,
        Loader {
            seen: Arc::default(),
        },
    )
    .unwrap();

    let kinds = service.params().unwrap();
    assert_eq!(kinds.len(), 3);
}

#[test]
fn test_served_version_carries_training_metrics() {
    let registry = InMemoryRegistry::new();
    promote_with(
        &registry,
        "runs:/v1/model",
        ModelMetadata::new("run-1").metrics(52_000.0, 97_500.5, 0.61),
    );
    promote_with(
        &registry,
        "runs:/v2/model",
        ModelMetadata::new("run-2").metrics(48_000.0, 90_250.0, 0.68),
    );

    let service = PredictionService::new(
        ServingConfig::default(),
        registry,
        Loader {
            seen: Arc::default(),
        },
    )
    .unwrap();

    let config = service.config().clone();
    let latest = service
        .registry()
        .latest(&config.model_name, &config.stage)
        .unwrap();
    assert_eq!(latest.version, 2);
    assert_eq!(latest.run_id, "run-2");
    assert_eq!(latest.tags["mae"], "48000");
    assert_eq!(latest.tags["rmse"], "90250");
    assert_eq!(latest.tags["r2"], "0.68");
}
