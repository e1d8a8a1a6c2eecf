use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::dtos::lenient;
use crate::dtos::trip::{TripRequest, TripResponse};
use crate::engine::{apply_financials, refresh_net, total_fuel_cost_for_trip, validate_activeness, FuelLedger};
use crate::error::AppError;
use crate::handlers::settings::current_pay_config;
use crate::models::{PayDetails, PayType, Trip};
use crate::store::TripStore;

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Builds the stored trip from form input. Derived fields start at zero and
/// are filled in by the engine.
fn trip_from_request(trip_number: String, pay_type: PayType, req: &TripRequest) -> Result<Trip, AppError> {
    let date_dispatched = lenient::parse_date("dateDispatched", req.date_dispatched.as_deref())?
        .ok_or_else(|| AppError::validation("Date dispatched is required"))?;
    let date_delivered = lenient::parse_date("dateDelivered", req.date_delivered.as_deref())?;

    let pay = match pay_type {
        PayType::Percentage => PayDetails::Percentage {
            linehaul: req.linehaul,
            fsc: req.fsc,
        },
        PayType::Mileage => PayDetails::Mileage {
            fsc_per_loaded_mile: req.fsc_per_loaded_mile,
        },
    };

    Ok(Trip {
        trip_number,
        date_dispatched,
        date_delivered,
        origin_city: text(&req.origin_city),
        origin_state: text(&req.origin_state),
        destination_city: text(&req.destination_city),
        destination_state: text(&req.destination_state),
        trailer_number: text(&req.trailer_number),
        deadhead_miles: lenient::non_negative("Deadhead miles", req.deadhead_miles)?,
        loaded_miles: lenient::non_negative("Loaded miles", req.loaded_miles)?,
        weight: req.weight,
        pay,
        scale_cost: lenient::non_negative("Scale cost", req.scale_cost)?,
        calculated_gross: 0.0,
        projected_net: 0.0,
    })
}

#[derive(Debug, Clone, Copy)]
enum Write {
    Insert,
    Update,
}

/// Prices `trip`, checks the active-trip rule against the current history and
/// writes it. The store re-checks the rule atomically with the write.
async fn price_and_save(
    store: &dyn TripStore,
    operator_id: i64,
    mut trip: Trip,
    write: Write,
) -> Result<TripResponse, AppError> {
    let config = current_pay_config(store, operator_id).await?;
    let stops = store.list_fuel_stops(operator_id).await?;
    let financials = apply_financials(&mut trip, &config, &stops)?;

    let existing = store.list_trips(operator_id).await?;
    validate_activeness(&trip, &existing)?;
    match write {
        Write::Insert => store.insert_trip(operator_id, &trip).await?,
        Write::Update => store.update_trip(operator_id, &trip).await?,
    }

    info!(
        operator_id,
        trip_number = %trip.trip_number,
        gross = financials.calculated_gross,
        net = financials.projected_net,
        active = trip.is_active(),
        "Trip saved"
    );

    Ok(TripResponse::new(trip, financials.fuel_cost))
}

// Create a trip
#[instrument(skip(store, req))]
pub async fn create_trip(store: &dyn TripStore, operator_id: i64, req: TripRequest) -> Result<TripResponse, AppError> {
    let trip_number = text(&req.trip_number).ok_or_else(|| AppError::validation("Trip number is required"))?;

    if store.get_trip(operator_id, &trip_number).await?.is_some() {
        return Err(AppError::conflict(format!("Trip {trip_number} already exists")));
    }

    // Snapshot the pay model in force when the trip is entered.
    let pay_type = match text(&req.pay_type) {
        Some(raw) => raw.parse::<PayType>()?,
        None => current_pay_config(store, operator_id).await?.driver_pay_type,
    };

    let trip = trip_from_request(trip_number, pay_type, &req)?;
    price_and_save(store, operator_id, trip, Write::Insert).await
}

// Edit a trip - trip number and pay type stay as entered
#[instrument(skip(store, req))]
pub async fn update_trip(
    store: &dyn TripStore,
    operator_id: i64,
    trip_number: &str,
    req: TripRequest,
) -> Result<TripResponse, AppError> {
    let existing = store
        .get_trip(operator_id, trip_number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Trip {trip_number} not found")))?;

    if let Some(requested) = text(&req.trip_number) {
        if requested != existing.trip_number {
            return Err(AppError::validation("Trip number cannot be changed"));
        }
    }

    let pay_type = existing.pay_type();
    if let Some(raw) = text(&req.pay_type) {
        if raw.parse::<PayType>()? != pay_type {
            return Err(AppError::validation(format!(
                "Trip {trip_number} was entered as {pay_type} pay and cannot be switched"
            )));
        }
    }

    let trip = trip_from_request(existing.trip_number, pay_type, &req)?;
    price_and_save(store, operator_id, trip, Write::Update).await
}

// Mark the active trip delivered. Gross stays as priced at entry or last edit.
#[instrument(skip(store))]
pub async fn complete_trip(
    store: &dyn TripStore,
    operator_id: i64,
    trip_number: &str,
    delivered_on: NaiveDate,
) -> Result<TripResponse, AppError> {
    let mut trip = store
        .get_trip(operator_id, trip_number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Trip {trip_number} not found")))?;

    if let Some(delivered) = trip.date_delivered {
        return Err(AppError::validation(format!(
            "Trip {trip_number} was already delivered on {delivered}"
        )));
    }

    trip.date_delivered = Some(delivered_on);
    let stops = store.list_fuel_stops(operator_id).await?;
    let financials = refresh_net(&mut trip, &stops);
    store.update_trip(operator_id, &trip).await?;

    info!(
        operator_id,
        trip_number,
        %delivered_on,
        net = financials.projected_net,
        "Trip delivered"
    );
    Ok(TripResponse::new(trip, financials.fuel_cost))
}

#[instrument(skip(store))]
pub async fn delete_trip(store: &dyn TripStore, operator_id: i64, trip_number: &str) -> Result<(), AppError> {
    if !store.delete_trip(operator_id, trip_number).await? {
        return Err(AppError::not_found(format!("Trip {trip_number} not found")));
    }

    info!(operator_id, trip_number, "Trip deleted");
    Ok(())
}

#[instrument(skip(store))]
pub async fn get_trip(store: &dyn TripStore, operator_id: i64, trip_number: &str) -> Result<TripResponse, AppError> {
    let trip = store
        .get_trip(operator_id, trip_number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Trip {trip_number} not found")))?;
    let stops = store.list_fuel_stops(operator_id).await?;

    let fuel_cost = total_fuel_cost_for_trip(&trip.trip_number, &stops);
    Ok(TripResponse::new(trip, fuel_cost))
}

// List trips, most recently dispatched first
#[instrument(skip(store))]
pub async fn list_trips(store: &dyn TripStore, operator_id: i64) -> Result<Vec<TripResponse>, AppError> {
    let mut trips = store.list_trips(operator_id).await?;
    let stops = store.list_fuel_stops(operator_id).await?;
    let ledger = FuelLedger::build(&trips, &stops);

    trips.sort_by(|a, b| {
        b.date_dispatched
            .cmp(&a.date_dispatched)
            .then_with(|| b.trip_number.cmp(&a.trip_number))
    });

    Ok(trips
        .into_iter()
        .map(|trip| {
            let fuel_cost = ledger.cost_for(&trip.trip_number);
            TripResponse::new(trip, fuel_cost)
        })
        .collect())
}
