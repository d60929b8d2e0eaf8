use serde::{Deserialize, Serialize};

use crate::error::ResponseStatus;

pub const LOCATION_NAMES_PATH: &str = "get_location_names";
pub const PREDICT_HOME_PRICE_PATH: &str = "predict_home_price";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNamesResponse {
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictHomePriceRequest {
    pub total_sqft: f64,
    pub bhk: u8,
    pub bath: u8,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictHomePriceResponse {
    pub estimated_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}
