use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Rate applied to linehaul when nothing has been configured yet.
pub const DEFAULT_PERCENTAGE_RATE: f64 = 0.68;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayType {
    Percentage,
    Mileage,
}

impl PayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayType::Percentage => "percentage",
            PayType::Mileage => "mileage",
        }
    }
}

impl fmt::Display for PayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" => Ok(PayType::Percentage),
            "mileage" => Ok(PayType::Mileage),
            "" => Err(AppError::invalid_configuration("pay type is missing")),
            other => Err(AppError::invalid_configuration(format!(
                "unknown pay type \"{other}\""
            ))),
        }
    }
}

/// An operator's pay settings. `percentage_rate` is stored as a fraction in
/// `[0.0, 1.0]` and is only set for percentage pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayConfiguration {
    pub driver_pay_type: PayType,
    pub percentage_rate: Option<f64>,
}

impl Default for PayConfiguration {
    fn default() -> Self {
        Self {
            driver_pay_type: PayType::Percentage,
            percentage_rate: Some(DEFAULT_PERCENTAGE_RATE),
        }
    }
}

impl PayConfiguration {
    pub fn percentage(rate: f64) -> Self {
        Self {
            driver_pay_type: PayType::Percentage,
            percentage_rate: Some(rate),
        }
    }

    pub fn mileage() -> Self {
        Self {
            driver_pay_type: PayType::Mileage,
            percentage_rate: None,
        }
    }

    /// The live percentage rate, required whenever a percentage trip is priced.
    pub fn require_percentage_rate(&self) -> Result<f64, AppError> {
        match self.percentage_rate {
            Some(rate) if (0.0..=1.0).contains(&rate) => Ok(rate),
            Some(rate) => Err(AppError::invalid_configuration(format!(
                "percentage rate {rate} is outside 0.0-1.0"
            ))),
            None => Err(AppError::invalid_configuration(
                "percentage pay requires a configured percentage rate",
            )),
        }
    }
}
