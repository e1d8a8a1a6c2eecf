use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::pay_config::PayType;

/// Raw pay inputs for a trip. The variant is the pay-type snapshot taken when
/// the trip was entered and fixes which gross formula applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "payType", rename_all = "lowercase")]
pub enum PayDetails {
    #[serde(rename_all = "camelCase")]
    Percentage { linehaul: f64, fsc: f64 },
    #[serde(rename_all = "camelCase")]
    Mileage { fsc_per_loaded_mile: f64 },
}

impl PayDetails {
    pub fn pay_type(&self) -> PayType {
        match self {
            PayDetails::Percentage { .. } => PayType::Percentage,
            PayDetails::Mileage { .. } => PayType::Mileage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub trip_number: String,
    pub date_dispatched: NaiveDate,
    pub date_delivered: Option<NaiveDate>,
    pub origin_city: Option<String>,
    pub origin_state: Option<String>,
    pub destination_city: Option<String>,
    pub destination_state: Option<String>,
    pub trailer_number: Option<String>,
    pub deadhead_miles: f64,
    pub loaded_miles: f64,
    pub weight: f64,
    #[serde(flatten)]
    pub pay: PayDetails,
    pub scale_cost: f64,
    // Derived; always overwritten by the engine before a write.
    pub calculated_gross: f64,
    pub projected_net: f64,
}

impl Trip {
    pub fn total_miles(&self) -> f64 {
        self.deadhead_miles + self.loaded_miles
    }

    /// A trip without a delivery date is still in progress.
    pub fn is_active(&self) -> bool {
        self.date_delivered.is_none()
    }

    pub fn pay_type(&self) -> PayType {
        self.pay.pay_type()
    }
}
