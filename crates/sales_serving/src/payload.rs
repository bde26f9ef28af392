//! Prediction request payload.
//!
//! Request keys use underscores (`GROSS_SQUARE_FEET`); the cleaned dataset and
//! the trained model use spaces (`GROSS SQUARE FEET`). [`PredictionPayload`]
//! converts one into a feature row under the model's names.

use sales_core::{DataRow, DataValue};
use serde::{Deserialize, Serialize};

/// Feature values of one property, as sent by a client. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct PredictionPayload {
    pub gross_square_feet: Option<i64>,
    pub land_square_feet: Option<i64>,
    pub year_built: Option<i64>,
    pub neighborhood: Option<String>,
    pub building_class_category: Option<String>,
    pub tax_class_at_present: Option<String>,
    pub block: Option<String>,
    pub lot: Option<String>,
    pub building_class_at_present: Option<String>,
    pub zip_code: Option<String>,
    pub residential_units: Option<String>,
    pub commercial_units: Option<String>,
    pub total_units: Option<String>,
    pub tax_class_at_time_of_sale: Option<String>,
    pub building_class_at_time_of_sale: Option<String>,
    pub sale_date: Option<String>,
}

/// Maps a payload key to its dataset column name.
pub fn feature_name(key: &str) -> String {
    key.replace('_', " ")
}

impl PredictionPayload {
    /// Payload keys paired with their values, in declaration order.
    pub fn fields(&self) -> [(&'static str, DataValue); 16] {
        [
            ("GROSS_SQUARE_FEET", self.gross_square_feet.into()),
            ("LAND_SQUARE_FEET", self.land_square_feet.into()),
            ("YEAR_BUILT", self.year_built.into()),
            ("NEIGHBORHOOD", self.neighborhood.clone().into()),
            (
                "BUILDING_CLASS_CATEGORY",
                self.building_class_category.clone().into(),
            ),
            ("TAX_CLASS_AT_PRESENT", self.tax_class_at_present.clone().into()),
            ("BLOCK", self.block.clone().into()),
            ("LOT", self.lot.clone().into()),
            (
                "BUILDING_CLASS_AT_PRESENT",
                self.building_class_at_present.clone().into(),
            ),
            ("ZIP_CODE", self.zip_code.clone().into()),
            ("RESIDENTIAL_UNITS", self.residential_units.clone().into()),
            ("COMMERCIAL_UNITS", self.commercial_units.clone().into()),
            ("TOTAL_UNITS", self.total_units.clone().into()),
            (
                "TAX_CLASS_AT_TIME_OF_SALE",
                self.tax_class_at_time_of_sale.clone().into(),
            ),
            (
                "BUILDING_CLASS_AT_TIME_OF_SALE",
                self.building_class_at_time_of_sale.clone().into(),
            ),
            ("SALE_DATE", self.sale_date.clone().into()),
        ]
    }

    /// Builds a feature row keyed by dataset column names. Absent fields are null.
    pub fn into_feature_row(self) -> DataRow {
        self.fields()
            .into_iter()
            .map(|(key, value)| (feature_name(key), value))
            .collect()
    }
}
