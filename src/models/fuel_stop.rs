use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fuel purchase attributed to exactly one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FuelStop {
    pub id: i64,
    pub trip_number: String,
    pub date_of_stop: Option<NaiveDate>,
    pub vendor: Option<String>,
    pub location: Option<String>,
    pub gallons_diesel_purchased: f64,
    pub diesel_price_per_gallon: f64,
    pub gallons_def_purchased: Option<f64>,
    pub def_price_per_gallon: Option<f64>,
}
