//! Persistence boundary.
//!
//! Handlers only talk to a [`TripStore`]. Implementations must enforce the
//! one-active-trip rule themselves, atomically with the write, and report a
//! violation as [`AppError::ActiveTripConflict`]; the handlers' own check
//! runs first but cannot close the race between two concurrent writers.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{FuelStop, PayConfiguration, Trip};

/// Storage operations for one operator's records, keyed by `operator_id`.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn list_trips(&self, operator_id: i64) -> Result<Vec<Trip>, AppError>;

    async fn get_trip(&self, operator_id: i64, trip_number: &str) -> Result<Option<Trip>, AppError>;

    /// Stores a new trip. A trip number already in use is an
    /// [`AppError::Conflict`], decided atomically with the write.
    async fn insert_trip(&self, operator_id: i64, trip: &Trip) -> Result<(), AppError>;

    /// Replaces an existing trip. [`AppError::NotFound`] if it is gone.
    async fn update_trip(&self, operator_id: i64, trip: &Trip) -> Result<(), AppError>;

    /// Sets the trip's net to its stored gross less `fuel_cost` and its scale
    /// cost, touching no other field. Returns the new net, or `None` if the
    /// trip does not exist.
    async fn renet_trip(&self, operator_id: i64, trip_number: &str, fuel_cost: f64) -> Result<Option<f64>, AppError>;

    /// Deletes the trip and its fuel stops. Returns `false` if nothing matched.
    async fn delete_trip(&self, operator_id: i64, trip_number: &str) -> Result<bool, AppError>;

    async fn list_fuel_stops(&self, operator_id: i64) -> Result<Vec<FuelStop>, AppError>;

    async fn get_fuel_stop(&self, operator_id: i64, id: i64) -> Result<Option<FuelStop>, AppError>;

    /// Stores a new stop and returns it with its assigned id.
    async fn insert_fuel_stop(&self, operator_id: i64, stop: &FuelStop) -> Result<FuelStop, AppError>;

    async fn update_fuel_stop(&self, operator_id: i64, stop: &FuelStop) -> Result<(), AppError>;

    async fn delete_fuel_stop(&self, operator_id: i64, id: i64) -> Result<bool, AppError>;

    async fn get_pay_config(&self, operator_id: i64) -> Result<Option<PayConfiguration>, AppError>;

    async fn save_pay_config(&self, operator_id: i64, config: &PayConfiguration) -> Result<(), AppError>;
}
