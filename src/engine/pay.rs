//! Gross revenue under the two pay models.

use crate::engine::mileage::rate_for_miles;
use crate::error::AppError;
use crate::models::{PayConfiguration, PayDetails, Trip};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MileageRevenue {
    pub total_miles: f64,
    pub rate_per_mile: f64,
    pub mileage_revenue: f64,
    pub fsc_revenue: f64,
}

impl MileageRevenue {
    pub fn gross(&self) -> f64 {
        self.mileage_revenue + self.fsc_revenue
    }
}

/// Every mile of the trip is paid at the tier rate for the trip's total
/// distance; surcharge is paid on loaded miles only.
pub fn mileage_revenue(deadhead_miles: f64, loaded_miles: f64, fsc_per_loaded_mile: f64) -> MileageRevenue {
    let total_miles = deadhead_miles + loaded_miles;
    let rate_per_mile = rate_for_miles(total_miles);

    MileageRevenue {
        total_miles,
        rate_per_mile,
        mileage_revenue: total_miles * rate_per_mile,
        fsc_revenue: loaded_miles * fsc_per_loaded_mile,
    }
}

pub fn percentage_gross(linehaul: f64, percentage_rate: f64, fsc: f64) -> f64 {
    linehaul * percentage_rate + fsc
}

/// Gross revenue for `trip`. The trip's own pay variant picks the formula;
/// for percentage pay the rate comes from the configuration live right now.
pub fn compute_gross(trip: &Trip, config: &PayConfiguration) -> Result<f64, AppError> {
    match trip.pay {
        PayDetails::Percentage { linehaul, fsc } => {
            let rate = config.require_percentage_rate()?;
            Ok(percentage_gross(linehaul, rate, fsc))
        }
        PayDetails::Mileage { fsc_per_loaded_mile } => {
            Ok(mileage_revenue(trip.deadhead_miles, trip.loaded_miles, fsc_per_loaded_mile).gross())
        }
    }
}
