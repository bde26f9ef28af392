//! Training feature lists.
//!
//! A training run logs its quantitative and categorical feature names as run
//! parameters. The prediction service reads them back to tell clients which
//! fields a model expects and whether each one is numeric or text.

use crate::{Result, ServingError};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Run parameter holding the numeric feature names.
pub const QUANTITATIVE_PARAM: &str = "quantitative_variables";

/// Run parameter holding the categorical feature names.
pub const CATEGORICAL_PARAM: &str = "categorical_variables";

/// Numeric features of the NYC rolling-sales model.
pub const QUANTITATIVE_FEATURES: [&str; 3] = ["GROSS SQUARE FEET", "LAND SQUARE FEET", "YEAR BUILT"];

/// Categorical features of the NYC rolling-sales model.
pub const CATEGORICAL_FEATURES: [&str; 13] = [
    "NEIGHBORHOOD",
    "BUILDING CLASS CATEGORY",
    "TAX CLASS AT PRESENT",
    "BLOCK",
    "LOT",
    "BUILDING CLASS AT PRESENT",
    "ZIP CODE",
    "RESIDENTIAL UNITS",
    "COMMERCIAL UNITS",
    "TOTAL UNITS",
    "TAX CLASS AT TIME OF SALE",
    "BUILDING CLASS AT TIME OF SALE",
    "SALE DATE",
];

/// Whether a feature is fed to the model as a number or as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureKind {
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "str")]
    Str,
}

/// The features a model was trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    /// Numeric features
    pub quantitative: Vec<String>,
    /// Categorical features
    pub categorical: Vec<String>,
}

impl FeatureSet {
    /// Feature set of the NYC rolling-sales model.
    pub fn nyc_rolling_sales() -> Self {
        Self {
            quantitative: QUANTITATIVE_FEATURES.iter().map(|s| s.to_string()).collect(),
            categorical: CATEGORICAL_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Removes the named columns from both lists.
    pub fn without<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        let dropped = |name: &String| columns.iter().any(|c| c.as_ref() == name);
        self.quantitative.retain(|name| !dropped(name));
        self.categorical.retain(|name| !dropped(name));
        self
    }

    /// Encodes the lists as run parameters (JSON arrays).
    pub fn to_params(&self) -> HashMap<String, String> {
        HashMap::from([
            (QUANTITATIVE_PARAM.to_string(), encode_list(&self.quantitative)),
            (CATEGORICAL_PARAM.to_string(), encode_list(&self.categorical)),
        ])
    }

    /// Decodes the lists from the parameters of `run_id`.
    pub fn from_params(run_id: &str, params: &HashMap<String, String>) -> Result<Self> {
        let list = |param: &str| -> Result<Vec<String>> {
            let raw = params.get(param).ok_or_else(|| ServingError::MissingParam {
                run_id: run_id.to_string(),
                param: param.to_string(),
            })?;
            parse_list(param, raw)
        };

        Ok(Self {
            quantitative: list(QUANTITATIVE_PARAM)?,
            categorical: list(CATEGORICAL_PARAM)?,
        })
    }

    /// Every feature with its kind, numeric features first.
    pub fn kinds(&self) -> FeatureKinds {
        let mut kinds: Vec<(String, FeatureKind)> = self
            .quantitative
            .iter()
            .map(|name| (name.clone(), FeatureKind::Int))
            .collect();
        for name in &self.categorical {
            if !kinds.iter().any(|(n, _)| n == name) {
                kinds.push((name.clone(), FeatureKind::Str));
            }
        }
        FeatureKinds(kinds)
    }
}

/// Ordered feature-name to kind mapping. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureKinds(pub Vec<(String, FeatureKind)>);

impl FeatureKinds {
    /// Kind of one feature.
    pub fn get(&self, name: &str) -> Option<FeatureKind> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, kind)| *kind)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FeatureKinds {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, kind) in &self.0 {
            map.serialize_entry(name, kind)?;
        }
        map.end()
    }
}

fn encode_list(names: &[String]) -> String {
    serde_json::Value::from(names.to_vec()).to_string()
}

/// Parses a logged name list.
///
/// Accepts JSON arrays and the single-quoted list literals older runs logged
/// (`['GROSS SQUARE FEET', 'YEAR BUILT']`).
fn parse_list(param: &str, raw: &str) -> Result<Vec<String>> {
    if let Ok(names) = serde_json::from_str::<Vec<String>>(raw) {
        return Ok(names);
    }

    let invalid = |message: &str| ServingError::InvalidParam {
        param: param.to_string(),
        message: message.to_string(),
    };

    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| invalid("expected a bracketed list"))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|item| {
            let item = item.trim();
            item.strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .or_else(|| item.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
                .map(str::to_string)
                .ok_or_else(|| invalid("expected quoted names"))
        })
        .collect()
}
