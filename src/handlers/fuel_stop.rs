use tracing::{info, instrument};

use crate::dtos::fuel_stop::{FuelStopRequest, FuelStopResponse};
use crate::dtos::lenient;
use crate::engine::total_fuel_cost_for_trip;
use crate::error::AppError;
use crate::models::FuelStop;
use crate::store::TripStore;

fn optional_non_negative(field: &str, value: Option<f64>) -> Result<Option<f64>, AppError> {
    value.map(|v| lenient::non_negative(field, v)).transpose()
}

fn stop_from_request(id: i64, req: &FuelStopRequest) -> Result<FuelStop, AppError> {
    let trip_number = req
        .trip_number
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("Fuel stop must reference a trip number"))?;

    Ok(FuelStop {
        id,
        trip_number: trip_number.to_string(),
        date_of_stop: lenient::parse_date("dateOfStop", req.date_of_stop.as_deref())?,
        vendor: req.vendor.clone(),
        location: req.location.clone(),
        gallons_diesel_purchased: lenient::non_negative("Diesel gallons", req.gallons_diesel_purchased)?,
        diesel_price_per_gallon: lenient::non_negative("Diesel price", req.diesel_price_per_gallon)?,
        gallons_def_purchased: optional_non_negative("DEF gallons", req.gallons_def_purchased)?,
        def_price_per_gallon: optional_non_negative("DEF price", req.def_price_per_gallon)?,
    })
}

async fn require_trip(store: &dyn TripStore, operator_id: i64, trip_number: &str) -> Result<(), AppError> {
    match store.get_trip(operator_id, trip_number).await? {
        Some(_) => Ok(()),
        None => Err(AppError::reference(format!(
            "Fuel stop references trip {trip_number}, which does not exist"
        ))),
    }
}

/// Re-nets a trip after its fuel changed. Gross stays as last priced and no
/// other field of the trip is written.
async fn refresh_trip_net(store: &dyn TripStore, operator_id: i64, trip_number: &str) -> Result<(), AppError> {
    let stops = store.list_fuel_stops(operator_id).await?;
    let fuel_cost = total_fuel_cost_for_trip(trip_number, &stops);

    if let Some(net) = store.renet_trip(operator_id, trip_number, fuel_cost).await? {
        info!(operator_id, trip_number, fuel_cost, net, "Trip net refreshed");
    }
    Ok(())
}

#[instrument(skip(store, req))]
pub async fn create_fuel_stop(
    store: &dyn TripStore,
    operator_id: i64,
    req: FuelStopRequest,
) -> Result<FuelStopResponse, AppError> {
    let stop = stop_from_request(0, &req)?;
    require_trip(store, operator_id, &stop.trip_number).await?;

    let stored = store.insert_fuel_stop(operator_id, &stop).await?;
    refresh_trip_net(store, operator_id, &stored.trip_number).await?;

    info!(operator_id, id = stored.id, trip_number = %stored.trip_number, "Fuel stop recorded");
    Ok(FuelStopResponse::from(stored))
}

#[instrument(skip(store, req))]
pub async fn update_fuel_stop(
    store: &dyn TripStore,
    operator_id: i64,
    id: i64,
    req: FuelStopRequest,
) -> Result<FuelStopResponse, AppError> {
    let previous = store
        .get_fuel_stop(operator_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Fuel stop not found"))?;

    let stop = stop_from_request(id, &req)?;
    require_trip(store, operator_id, &stop.trip_number).await?;

    store.update_fuel_stop(operator_id, &stop).await?;
    refresh_trip_net(store, operator_id, &stop.trip_number).await?;
    if previous.trip_number != stop.trip_number {
        refresh_trip_net(store, operator_id, &previous.trip_number).await?;
    }

    Ok(FuelStopResponse::from(stop))
}

#[instrument(skip(store))]
pub async fn delete_fuel_stop(store: &dyn TripStore, operator_id: i64, id: i64) -> Result<(), AppError> {
    let stop = store
        .get_fuel_stop(operator_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Fuel stop not found"))?;

    if !store.delete_fuel_stop(operator_id, id).await? {
        return Err(AppError::not_found("Fuel stop not found"));
    }
    refresh_trip_net(store, operator_id, &stop.trip_number).await?;

    info!(operator_id, id, "Fuel stop deleted");
    Ok(())
}

// List fuel stops, optionally for a single trip
#[instrument(skip(store))]
pub async fn list_fuel_stops(
    store: &dyn TripStore,
    operator_id: i64,
    trip_number: Option<&str>,
) -> Result<Vec<FuelStopResponse>, AppError> {
    let stops = store.list_fuel_stops(operator_id).await?;

    Ok(stops
        .into_iter()
        .filter(|s| trip_number.map_or(true, |t| s.trip_number == t))
        .map(FuelStopResponse::from)
        .collect())
}
