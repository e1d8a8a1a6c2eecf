use serde::{Deserialize, Serialize};

use crate::dtos::lenient;
use crate::engine::fuel::{cost_for_stop, StopCost};
use crate::models::FuelStop;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStopRequest {
    #[serde(alias = "proNumber")]
    pub trip_number: Option<String>,
    pub date_of_stop: Option<String>,
    pub vendor: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub gallons_diesel_purchased: f64,
    #[serde(default, alias = "pumpPriceDiesel", deserialize_with = "lenient::number")]
    pub diesel_price_per_gallon: f64,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub gallons_def_purchased: Option<f64>,
    #[serde(default, alias = "pumpPriceDef", deserialize_with = "lenient::optional_number")]
    pub def_price_per_gallon: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStopResponse {
    #[serde(flatten)]
    pub stop: FuelStop,
    #[serde(flatten)]
    pub cost: StopCost,
}

impl From<FuelStop> for FuelStopResponse {
    fn from(stop: FuelStop) -> Self {
        Self {
            cost: cost_for_stop(&stop),
            stop,
        }
    }
}
