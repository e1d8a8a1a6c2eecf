//! Trip financial calculation and aggregation.
//!
//! Everything here is synchronous and free of I/O: the handlers load records
//! from a store, run them through these functions, and write the derived
//! figures back.

pub mod active_trip;
pub mod buckets;
pub mod fuel;
pub mod mileage;
pub mod net;
pub mod pay;

pub use active_trip::{active_trip, validate_activeness};
pub use buckets::{mileage_totals, monthly_net_revenue, weekly_revenue_per_mile, MileageTotals, MonthlyPoint, WeeklyPoint};
pub use fuel::{cost_for_stop, total_fuel_cost_for_trip, FuelLedger, StopCost};
pub use mileage::rate_for_miles;
pub use net::{apply_financials, compute_net, derive_financials, refresh_net, TripFinancials};
pub use pay::compute_gross;
