use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::buckets::{MileageTotals, MonthlyPoint, WeeklyPoint};
use crate::models::Trip;

/// The trip currently in transit, as shown on the dashboard card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTripSummary {
    pub trip_number: String,
    pub date_dispatched: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub trailer_number: Option<String>,
}

fn place(city: &Option<String>, state: &Option<String>) -> String {
    format!(
        "{}, {}",
        city.as_deref().unwrap_or_default(),
        state.as_deref().unwrap_or_default()
    )
}

impl From<&Trip> for ActiveTripSummary {
    fn from(trip: &Trip) -> Self {
        Self {
            trip_number: trip.trip_number.clone(),
            date_dispatched: trip.date_dispatched,
            origin: place(&trip.origin_city, &trip.origin_state),
            destination: place(&trip.destination_city, &trip.destination_state),
            trailer_number: trip.trailer_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub active_trip: Option<ActiveTripSummary>,
    pub monthly_net_revenue: Vec<MonthlyPoint>,
    pub weekly_revenue_per_mile: Vec<WeeklyPoint>,
    pub mileage_totals: MileageTotals,
    /// Fuel stops left out of per-trip costs because their trip is missing.
    pub excluded_fuel_stops: usize,
}
