//! Fuel purchase costs, per stop and rolled up per trip.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::{FuelStop, Trip};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopCost {
    pub total_diesel_cost: f64,
    pub total_def_cost: f64,
    pub total_fuel_stop_cost: f64,
}

/// Diesel plus DEF for a single stop. Missing DEF fields contribute nothing.
pub fn cost_for_stop(stop: &FuelStop) -> StopCost {
    let diesel = stop.gallons_diesel_purchased * stop.diesel_price_per_gallon;
    let def = match (stop.gallons_def_purchased, stop.def_price_per_gallon) {
        (Some(gallons), Some(price)) => gallons * price,
        _ => 0.0,
    };

    StopCost {
        total_diesel_cost: diesel,
        total_def_cost: def,
        total_fuel_stop_cost: diesel + def,
    }
}

/// Sum of every stop recorded against `trip_number`; zero when there are none.
pub fn total_fuel_cost_for_trip(trip_number: &str, stops: &[FuelStop]) -> f64 {
    stops
        .iter()
        .filter(|stop| stop.trip_number == trip_number)
        .map(|stop| cost_for_stop(stop).total_fuel_stop_cost)
        .sum()
}

/// Per-trip fuel totals for a whole trip collection.
///
/// Stops whose trip does not exist are kept out of every total and reported
/// as reference errors instead of failing the whole roll-up.
#[derive(Debug, Default)]
pub struct FuelLedger {
    by_trip: HashMap<String, f64>,
    orphans: Vec<AppError>,
}

impl FuelLedger {
    pub fn build(trips: &[Trip], stops: &[FuelStop]) -> Self {
        let known: HashSet<&str> = trips.iter().map(|t| t.trip_number.as_str()).collect();
        let mut ledger = FuelLedger::default();

        for stop in stops {
            if !known.contains(stop.trip_number.as_str()) {
                warn!(
                    stop_id = stop.id,
                    trip_number = %stop.trip_number,
                    "Fuel stop references a missing trip, excluded from totals"
                );
                ledger.orphans.push(AppError::reference(format!(
                    "fuel stop {} references unknown trip {}",
                    stop.id, stop.trip_number
                )));
                continue;
            }

            *ledger.by_trip.entry(stop.trip_number.clone()).or_insert(0.0) +=
                cost_for_stop(stop).total_fuel_stop_cost;
        }

        ledger
    }

    pub fn cost_for(&self, trip_number: &str) -> f64 {
        self.by_trip.get(trip_number).copied().unwrap_or(0.0)
    }

    pub fn orphans(&self) -> &[AppError] {
        &self.orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fuel_stop::fixtures::*;
    use crate::models::trip::fixtures::percentage_trip;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn diesel_only_stop() {
        let cost = cost_for_stop(&diesel_stop(1, "T1", 100.0, 3.50));
        assert!(close(cost.total_diesel_cost, 350.0));
        assert_eq!(cost.total_def_cost, 0.0);
        assert!(close(cost.total_fuel_stop_cost, 350.0));
    }

    #[test]
    fn def_only_stop() {
        let cost = cost_for_stop(&def_stop(2, "T1", 10.0, 2.80));
        assert!(close(cost.total_def_cost, 28.0));
        assert!(close(cost.total_fuel_stop_cost, 28.0));
    }

    #[test]
    fn def_needs_both_gallons_and_price() {
        let mut stop = def_stop(3, "T1", 10.0, 2.80);
        stop.def_price_per_gallon = None;
        assert_eq!(cost_for_stop(&stop).total_def_cost, 0.0);
    }

    #[test]
    fn trip_total_only_counts_its_own_stops() {
        let stops = vec![
            diesel_stop(1, "T1", 100.0, 3.50),
            def_stop(2, "T1", 10.0, 2.80),
            diesel_stop(3, "T2", 50.0, 4.00),
        ];
        assert!(close(total_fuel_cost_for_trip("T1", &stops), 378.0));
        assert_eq!(total_fuel_cost_for_trip("T9", &stops), 0.0);
    }

    #[test]
    fn ledger_excludes_orphaned_stops() {
        let trips = vec![percentage_trip("T1", 0.0, 0.0)];
        let stops = vec![
            diesel_stop(1, "T1", 100.0, 3.50),
            diesel_stop(2, "GONE", 10.0, 3.00),
        ];

        let ledger = FuelLedger::build(&trips, &stops);
        assert!(close(ledger.cost_for("T1"), 350.0));
        assert_eq!(ledger.cost_for("GONE"), 0.0);
        assert_eq!(ledger.orphans().len(), 1);
        assert!(matches!(ledger.orphans()[0], AppError::Reference(_)));
    }
}
