// src/store/pg.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Error as SqlxError, FromRow, PgPool};
use tracing::{error, instrument, warn};

use crate::error::AppError;
use crate::models::{FuelStop, PayConfiguration, PayDetails, PayType, Trip};
use crate::store::TripStore;

const ACTIVE_TRIP_INDEX: &str = "trips_one_active_per_operator";
const FUEL_STOP_TRIP_FKEY: &str = "fuel_stops_trip_fkey";
const TRIP_PKEY: &str = "trips_pkey";

const TRIP_COLUMNS: &str = "trip_number, date_dispatched, date_delivered,
        origin_city, origin_state, destination_city, destination_state, trailer_number,
        deadhead_miles, loaded_miles, weight, pay_type, linehaul, fsc, fsc_per_loaded_mile,
        scale_cost, calculated_gross, projected_net";

const FUEL_STOP_COLUMNS: &str = "id, trip_number, date_of_stop, vendor, location,
        gallons_diesel_purchased, diesel_price_per_gallon,
        gallons_def_purchased, def_price_per_gallon";

#[derive(Debug, FromRow)]
struct TripRow {
    trip_number: String,
    date_dispatched: NaiveDate,
    date_delivered: Option<NaiveDate>,
    origin_city: Option<String>,
    origin_state: Option<String>,
    destination_city: Option<String>,
    destination_state: Option<String>,
    trailer_number: Option<String>,
    deadhead_miles: f64,
    loaded_miles: f64,
    weight: f64,
    pay_type: String,
    linehaul: Option<f64>,
    fsc: Option<f64>,
    fsc_per_loaded_mile: Option<f64>,
    scale_cost: f64,
    calculated_gross: f64,
    projected_net: f64,
}

impl TryFrom<TripRow> for Trip {
    type Error = AppError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        let pay = match row.pay_type.parse::<PayType>()? {
            PayType::Percentage => PayDetails::Percentage {
                linehaul: row.linehaul.unwrap_or(0.0),
                fsc: row.fsc.unwrap_or(0.0),
            },
            PayType::Mileage => PayDetails::Mileage {
                fsc_per_loaded_mile: row.fsc_per_loaded_mile.unwrap_or(0.0),
            },
        };

        Ok(Trip {
            trip_number: row.trip_number,
            date_dispatched: row.date_dispatched,
            date_delivered: row.date_delivered,
            origin_city: row.origin_city,
            origin_state: row.origin_state,
            destination_city: row.destination_city,
            destination_state: row.destination_state,
            trailer_number: row.trailer_number,
            deadhead_miles: row.deadhead_miles,
            loaded_miles: row.loaded_miles,
            weight: row.weight,
            pay,
            scale_cost: row.scale_cost,
            calculated_gross: row.calculated_gross,
            projected_net: row.projected_net,
        })
    }
}

#[derive(Debug, FromRow)]
struct PayConfigRow {
    driver_pay_type: String,
    percentage_rate: Option<f64>,
}

fn constraint_violation(err: &SqlxError, code: &str, constraint: &str) -> bool {
    match err {
        SqlxError::Database(db_err) => {
            db_err.code().as_deref() == Some(code) && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

fn pay_columns(pay: &PayDetails) -> (Option<f64>, Option<f64>, Option<f64>) {
    match *pay {
        PayDetails::Percentage { linehaul, fsc } => (Some(linehaul), Some(fsc), None),
        PayDetails::Mileage { fsc_per_loaded_mile } => (None, None, Some(fsc_per_loaded_mile)),
    }
}

fn map_reference_violation(err: SqlxError, trip_number: &str) -> AppError {
    if constraint_violation(&err, "23503", FUEL_STOP_TRIP_FKEY) {
        return AppError::reference(format!("trip {trip_number} does not exist"));
    }
    error!(?err, "Fuel stop write failed");
    err.into()
}

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Maps a failed trip write. A hit on the one-active index is reported with
    /// the trip that holds it.
    async fn trip_write_error(&self, err: SqlxError, operator_id: i64, trip_number: &str) -> AppError {
        if !constraint_violation(&err, "23505", ACTIVE_TRIP_INDEX) {
            error!(?err, "Failed to write trip");
            return err.into();
        }

        match self.open_trip_other_than(operator_id, trip_number).await {
            Ok(blocking_trip) => {
                warn!(operator_id, ?blocking_trip, "Database rejected second active trip");
                AppError::ActiveTripConflict { blocking_trip }
            }
            Err(lookup) => lookup,
        }
    }

    async fn open_trip_other_than(&self, operator_id: i64, trip_number: &str) -> Result<Option<String>, AppError> {
        let blocking = sqlx::query_scalar::<_, String>(
            "SELECT trip_number FROM trips
             WHERE operator_id = $1 AND date_delivered IS NULL AND trip_number <> $2
             LIMIT 1",
        )
        .bind(operator_id)
        .bind(trip_number)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(blocking)
    }
}

#[async_trait]
impl TripStore for PgStore {
    #[instrument(skip(self))]
    async fn list_trips(&self, operator_id: i64) -> Result<Vec<Trip>, AppError> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE operator_id = $1 ORDER BY date_dispatched, trip_number"
        ))
        .bind(operator_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| {
            error!(?e, "Failed to fetch trips");
            AppError::db(e)
        })?;

        rows.into_iter().map(Trip::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn get_trip(&self, operator_id: i64, trip_number: &str) -> Result<Option<Trip>, AppError> {
        let row = sqlx::query_as::<_, TripRow>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE operator_id = $1 AND trip_number = $2"
        ))
        .bind(operator_id)
        .bind(trip_number)
        .fetch_optional(&self.db_pool)
        .await?;

        row.map(Trip::try_from).transpose()
    }

    #[instrument(skip(self, trip), fields(trip_number = %trip.trip_number))]
    async fn insert_trip(&self, operator_id: i64, trip: &Trip) -> Result<(), AppError> {
        let (linehaul, fsc, fsc_per_loaded_mile) = pay_columns(&trip.pay);

        let result = sqlx::query(
            "INSERT INTO trips (operator_id, trip_number, date_dispatched, date_delivered,
                origin_city, origin_state, destination_city, destination_state, trailer_number,
                deadhead_miles, loaded_miles, weight, pay_type, linehaul, fsc, fsc_per_loaded_mile,
                scale_cost, calculated_gross, projected_net)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(operator_id)
        .bind(&trip.trip_number)
        .bind(trip.date_dispatched)
        .bind(trip.date_delivered)
        .bind(&trip.origin_city)
        .bind(&trip.origin_state)
        .bind(&trip.destination_city)
        .bind(&trip.destination_state)
        .bind(&trip.trailer_number)
        .bind(trip.deadhead_miles)
        .bind(trip.loaded_miles)
        .bind(trip.weight)
        .bind(trip.pay_type().as_str())
        .bind(linehaul)
        .bind(fsc)
        .bind(fsc_per_loaded_mile)
        .bind(trip.scale_cost)
        .bind(trip.calculated_gross)
        .bind(trip.projected_net)
        .execute(&self.db_pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if constraint_violation(&e, "23505", TRIP_PKEY) => {
                warn!(operator_id, trip_number = %trip.trip_number, "Duplicate trip number rejected");
                Err(AppError::conflict(format!("Trip {} already exists", trip.trip_number)))
            }
            Err(e) => Err(self.trip_write_error(e, operator_id, &trip.trip_number).await),
        }
    }

    #[instrument(skip(self, trip), fields(trip_number = %trip.trip_number))]
    async fn update_trip(&self, operator_id: i64, trip: &Trip) -> Result<(), AppError> {
        let (linehaul, fsc, fsc_per_loaded_mile) = pay_columns(&trip.pay);

        let result = sqlx::query(
            "UPDATE trips SET date_dispatched = $3, date_delivered = $4,
                origin_city = $5, origin_state = $6, destination_city = $7, destination_state = $8,
                trailer_number = $9, deadhead_miles = $10, loaded_miles = $11, weight = $12,
                pay_type = $13, linehaul = $14, fsc = $15, fsc_per_loaded_mile = $16,
                scale_cost = $17, calculated_gross = $18, projected_net = $19, updated_at = NOW()
             WHERE operator_id = $1 AND trip_number = $2",
        )
        .bind(operator_id)
        .bind(&trip.trip_number)
        .bind(trip.date_dispatched)
        .bind(trip.date_delivered)
        .bind(&trip.origin_city)
        .bind(&trip.origin_state)
        .bind(&trip.destination_city)
        .bind(&trip.destination_state)
        .bind(&trip.trailer_number)
        .bind(trip.deadhead_miles)
        .bind(trip.loaded_miles)
        .bind(trip.weight)
        .bind(trip.pay_type().as_str())
        .bind(linehaul)
        .bind(fsc)
        .bind(fsc_per_loaded_mile)
        .bind(trip.scale_cost)
        .bind(trip.calculated_gross)
        .bind(trip.projected_net)
        .execute(&self.db_pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(AppError::not_found(format!("Trip {} not found", trip.trip_number)))
            }
            Ok(_) => Ok(()),
            Err(e) => Err(self.trip_write_error(e, operator_id, &trip.trip_number).await),
        }
    }

    #[instrument(skip(self))]
    async fn renet_trip(&self, operator_id: i64, trip_number: &str, fuel_cost: f64) -> Result<Option<f64>, AppError> {
        let net = sqlx::query_scalar::<_, f64>(
            "UPDATE trips SET projected_net = calculated_gross - $3 - scale_cost, updated_at = NOW()
             WHERE operator_id = $1 AND trip_number = $2
             RETURNING projected_net",
        )
        .bind(operator_id)
        .bind(trip_number)
        .bind(fuel_cost)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(net)
    }

    #[instrument(skip(self))]
    async fn delete_trip(&self, operator_id: i64, trip_number: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE operator_id = $1 AND trip_number = $2")
            .bind(operator_id)
            .bind(trip_number)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_fuel_stops(&self, operator_id: i64) -> Result<Vec<FuelStop>, AppError> {
        let stops = sqlx::query_as::<_, FuelStop>(&format!(
            "SELECT {FUEL_STOP_COLUMNS} FROM fuel_stops WHERE operator_id = $1 ORDER BY date_of_stop, id"
        ))
        .bind(operator_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(stops)
    }

    #[instrument(skip(self))]
    async fn get_fuel_stop(&self, operator_id: i64, id: i64) -> Result<Option<FuelStop>, AppError> {
        let stop = sqlx::query_as::<_, FuelStop>(&format!(
            "SELECT {FUEL_STOP_COLUMNS} FROM fuel_stops WHERE operator_id = $1 AND id = $2"
        ))
        .bind(operator_id)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(stop)
    }

    #[instrument(skip(self, stop), fields(trip_number = %stop.trip_number))]
    async fn insert_fuel_stop(&self, operator_id: i64, stop: &FuelStop) -> Result<FuelStop, AppError> {
        sqlx::query_as::<_, FuelStop>(&format!(
            "INSERT INTO fuel_stops (operator_id, trip_number, date_of_stop, vendor, location,
                gallons_diesel_purchased, diesel_price_per_gallon,
                gallons_def_purchased, def_price_per_gallon)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {FUEL_STOP_COLUMNS}"
        ))
        .bind(operator_id)
        .bind(&stop.trip_number)
        .bind(stop.date_of_stop)
        .bind(&stop.vendor)
        .bind(&stop.location)
        .bind(stop.gallons_diesel_purchased)
        .bind(stop.diesel_price_per_gallon)
        .bind(stop.gallons_def_purchased)
        .bind(stop.def_price_per_gallon)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| map_reference_violation(e, &stop.trip_number))
    }

    #[instrument(skip(self, stop), fields(id = stop.id))]
    async fn update_fuel_stop(&self, operator_id: i64, stop: &FuelStop) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE fuel_stops SET trip_number = $3, date_of_stop = $4, vendor = $5, location = $6,
                gallons_diesel_purchased = $7, diesel_price_per_gallon = $8,
                gallons_def_purchased = $9, def_price_per_gallon = $10
             WHERE operator_id = $1 AND id = $2",
        )
        .bind(operator_id)
        .bind(stop.id)
        .bind(&stop.trip_number)
        .bind(stop.date_of_stop)
        .bind(&stop.vendor)
        .bind(&stop.location)
        .bind(stop.gallons_diesel_purchased)
        .bind(stop.diesel_price_per_gallon)
        .bind(stop.gallons_def_purchased)
        .bind(stop.def_price_per_gallon)
        .execute(&self.db_pool)
        .await
        .map_err(|e| map_reference_violation(e, &stop.trip_number))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Fuel stop not found"));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_fuel_stop(&self, operator_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM fuel_stops WHERE operator_id = $1 AND id = $2")
            .bind(operator_id)
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn get_pay_config(&self, operator_id: i64) -> Result<Option<PayConfiguration>, AppError> {
        let row = sqlx::query_as::<_, PayConfigRow>(
            "SELECT driver_pay_type, percentage_rate FROM pay_configurations WHERE operator_id = $1",
        )
        .bind(operator_id)
        .fetch_optional(&self.db_pool)
        .await?;

        row.map(|r| -> Result<PayConfiguration, AppError> {
            Ok(PayConfiguration {
                driver_pay_type: r.driver_pay_type.parse()?,
                percentage_rate: r.percentage_rate,
            })
        })
        .transpose()
    }

    #[instrument(skip(self))]
    async fn save_pay_config(&self, operator_id: i64, config: &PayConfiguration) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO pay_configurations (operator_id, driver_pay_type, percentage_rate)
             VALUES ($1, $2, $3)
             ON CONFLICT (operator_id) DO UPDATE SET
                driver_pay_type = EXCLUDED.driver_pay_type,
                percentage_rate = EXCLUDED.percentage_rate,
                updated_at = NOW()",
        )
        .bind(operator_id)
        .bind(config.driver_pay_type.as_str())
        .bind(config.percentage_rate)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }
}
