//! Net revenue and the derived-field write-back onto a trip.

use serde::Serialize;

use crate::engine::fuel::total_fuel_cost_for_trip;
use crate::engine::pay::compute_gross;
use crate::error::AppError;
use crate::models::{FuelStop, PayConfiguration, Trip};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFinancials {
    pub calculated_gross: f64,
    pub fuel_cost: f64,
    pub projected_net: f64,
}

fn net_of(gross: f64, fuel_cost: f64, scale_cost: f64) -> f64 {
    gross - fuel_cost - scale_cost
}

/// Gross minus the trip's fuel and scale costs. Negative results are losses,
/// not errors.
pub fn compute_net(trip: &Trip, config: &PayConfiguration, stops: &[FuelStop]) -> Result<f64, AppError> {
    derive_financials(trip, config, stops).map(|f| f.projected_net)
}

pub fn derive_financials(
    trip: &Trip,
    config: &PayConfiguration,
    stops: &[FuelStop],
) -> Result<TripFinancials, AppError> {
    let calculated_gross = compute_gross(trip, config)?;
    let fuel_cost = total_fuel_cost_for_trip(&trip.trip_number, stops);

    Ok(TripFinancials {
        calculated_gross,
        fuel_cost,
        projected_net: net_of(calculated_gross, fuel_cost, trip.scale_cost),
    })
}

/// Recomputes both derived fields and writes them onto `trip`, discarding
/// whatever values it carried before.
pub fn apply_financials(
    trip: &mut Trip,
    config: &PayConfiguration,
    stops: &[FuelStop],
) -> Result<TripFinancials, AppError> {
    let financials = derive_financials(trip, config, stops)?;
    trip.calculated_gross = financials.calculated_gross;
    trip.projected_net = financials.projected_net;
    Ok(financials)
}

/// Re-nets a trip after its fuel stops changed, keeping the stored gross.
pub fn refresh_net(trip: &mut Trip, stops: &[FuelStop]) -> TripFinancials {
    let fuel_cost = total_fuel_cost_for_trip(&trip.trip_number, stops);
    trip.projected_net = net_of(trip.calculated_gross, fuel_cost, trip.scale_cost);

    TripFinancials {
        calculated_gross: trip.calculated_gross,
        fuel_cost,
        projected_net: trip.projected_net,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::models::fuel_stop::fixtures::diesel_stop;
    use crate::models::trip::fixtures::*;
    use proptest::prelude::*;

    fn any_trip() -> impl Strategy<Value = Trip> {
        (
            any::<bool>(),
            0.0..5_000.0f64,
            0.0..5_000.0f64,
            0.0..10_000.0f64,
            0.0..2.0f64,
            0.0..500.0f64,
        )
            .prop_map(|(percentage, deadhead, loaded, linehaul, fsc, scale)| {
                let mut trip = if percentage {
                    percentage_trip("P1", linehaul, fsc * 100.0)
                } else {
                    mileage_trip("P1", deadhead, loaded, fsc)
                };
                trip.scale_cost = scale;
                trip
            })
    }

    proptest! {
        /// Deriving twice from identical inputs yields identical outputs.
        #[test]
        fn derivation_is_idempotent(
            trip in any_trip(),
            rate in 0.0..=1.0f64,
            gallons in prop::collection::vec(0.0..300.0f64, 0..5),
        ) {
            let config = PayConfiguration::percentage(rate);
            let stops: Vec<FuelStop> = gallons
                .iter()
                .enumerate()
                .map(|(i, g)| diesel_stop(i as i64, "P1", *g, 3.89))
                .collect();

            let mut once = trip.clone();
            apply_financials(&mut once, &config, &stops).unwrap();
            let mut twice = once.clone();
            apply_financials(&mut twice, &config, &stops).unwrap();

            prop_assert_eq!(once, twice);
        }
    }
}
