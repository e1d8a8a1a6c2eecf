use tracing::{instrument, warn};

use crate::dtos::dashboard::{ActiveTripSummary, DashboardResponse};
use crate::engine::{active_trip, mileage_totals, monthly_net_revenue, weekly_revenue_per_mile, FuelLedger};
use crate::error::AppError;
use crate::store::TripStore;

/// Reporting view over one operator's history. Read-only: nothing it computes
/// is written back.
#[instrument(skip(store))]
pub async fn dashboard(store: &dyn TripStore, operator_id: i64) -> Result<DashboardResponse, AppError> {
    let trips = store.list_trips(operator_id).await?;
    let stops = store.list_fuel_stops(operator_id).await?;

    let ledger = FuelLedger::build(&trips, &stops);
    if !ledger.orphans().is_empty() {
        warn!(
            operator_id,
            excluded = ledger.orphans().len(),
            "Dashboard built with fuel stops that reference missing trips"
        );
    }

    Ok(DashboardResponse {
        active_trip: active_trip(&trips).map(ActiveTripSummary::from),
        monthly_net_revenue: monthly_net_revenue(&trips),
        weekly_revenue_per_mile: weekly_revenue_per_mile(&trips),
        mileage_totals: mileage_totals(&trips),
        excluded_fuel_stops: ledger.orphans().len(),
    })
}
