use serde::{Deserialize, Serialize};

use crate::dtos::lenient;
use crate::models::Trip;

/// Create/edit payload for a trip. Any `calculatedGross`/`projectedNet`
/// sent by the caller is ignored; they are always recomputed.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    #[serde(alias = "proNumber")]
    pub trip_number: Option<String>,
    pub date_dispatched: Option<String>,
    pub date_delivered: Option<String>,
    pub origin_city: Option<String>,
    pub origin_state: Option<String>,
    pub destination_city: Option<String>,
    pub destination_state: Option<String>,
    pub trailer_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub deadhead_miles: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub loaded_miles: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub weight: f64,
    pub pay_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub linehaul: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fsc: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fsc_per_loaded_mile: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub scale_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    #[serde(flatten)]
    pub trip: Trip,
    pub total_miles: f64,
    pub fuel_cost: f64,
    pub status: &'static str,
}

impl TripResponse {
    pub fn new(trip: Trip, fuel_cost: f64) -> Self {
        Self {
            total_miles: trip.total_miles(),
            status: if trip.is_active() { "in_transit" } else { "delivered" },
            fuel_cost,
            trip,
        }
    }
}
