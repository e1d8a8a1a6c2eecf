use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use crate::engine::active_trip::find_blocking_trip;
use crate::error::AppError;
use crate::models::{FuelStop, PayConfiguration, Trip};
use crate::store::TripStore;

#[derive(Debug, Default)]
struct OperatorBook {
    trips: BTreeMap<String, Trip>,
    fuel_stops: BTreeMap<i64, FuelStop>,
    pay_config: Option<PayConfiguration>,
}

impl OperatorBook {
    /// Write-time half of the one-active-trip rule.
    fn check_active(&self, operator_id: i64, trip: &Trip) -> Result<(), AppError> {
        if !trip.is_active() {
            return Ok(());
        }

        let others: Vec<Trip> = self.trips.values().cloned().collect();
        match find_blocking_trip(&trip.trip_number, &others) {
            Some(blocking) => {
                warn!(
                    operator_id,
                    trip_number = %trip.trip_number,
                    blocking = %blocking.trip_number,
                    "Rejected second active trip at write time"
                );
                Err(AppError::active_trip(blocking.trip_number.clone()))
            }
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    books: HashMap<i64, OperatorBook>,
    next_stop_id: i64,
}

/// In-process store. The active-trip rule is checked and the trip written
/// under one write lock, which gives it the same atomicity as the database
/// constraint.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripStore for MemoryStore {
    async fn list_trips(&self, operator_id: i64) -> Result<Vec<Trip>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .books
            .get(&operator_id)
            .map(|b| b.trips.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_trip(&self, operator_id: i64, trip_number: &str) -> Result<Option<Trip>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .books
            .get(&operator_id)
            .and_then(|b| b.trips.get(trip_number).cloned()))
    }

    async fn insert_trip(&self, operator_id: i64, trip: &Trip) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let book = inner.books.entry(operator_id).or_default();

        if book.trips.contains_key(&trip.trip_number) {
            warn!(operator_id, trip_number = %trip.trip_number, "Duplicate trip number rejected");
            return Err(AppError::conflict(format!("Trip {} already exists", trip.trip_number)));
        }
        book.check_active(operator_id, trip)?;

        book.trips.insert(trip.trip_number.clone(), trip.clone());
        Ok(())
    }

    async fn update_trip(&self, operator_id: i64, trip: &Trip) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let not_found = || AppError::not_found(format!("Trip {} not found", trip.trip_number));
        let book = inner.books.get_mut(&operator_id).ok_or_else(not_found)?;

        if !book.trips.contains_key(&trip.trip_number) {
            return Err(not_found());
        }
        book.check_active(operator_id, trip)?;

        book.trips.insert(trip.trip_number.clone(), trip.clone());
        Ok(())
    }

    async fn renet_trip(&self, operator_id: i64, trip_number: &str, fuel_cost: f64) -> Result<Option<f64>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .books
            .get_mut(&operator_id)
            .and_then(|b| b.trips.get_mut(trip_number))
            .map(|trip| {
                trip.projected_net = trip.calculated_gross - fuel_cost - trip.scale_cost;
                trip.projected_net
            }))
    }

    async fn delete_trip(&self, operator_id: i64, trip_number: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let Some(book) = inner.books.get_mut(&operator_id) else {
            return Ok(false);
        };

        let removed = book.trips.remove(trip_number).is_some();
        if removed {
            book.fuel_stops.retain(|_, s| s.trip_number != trip_number);
        }
        Ok(removed)
    }

    async fn list_fuel_stops(&self, operator_id: i64) -> Result<Vec<FuelStop>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .books
            .get(&operator_id)
            .map(|b| b.fuel_stops.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_fuel_stop(&self, operator_id: i64, id: i64) -> Result<Option<FuelStop>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .books
            .get(&operator_id)
            .and_then(|b| b.fuel_stops.get(&id).cloned()))
    }

    async fn insert_fuel_stop(&self, operator_id: i64, stop: &FuelStop) -> Result<FuelStop, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_stop_id += 1;
        let id = inner.next_stop_id;

        let book = inner.books.entry(operator_id).or_default();
        if !book.trips.contains_key(&stop.trip_number) {
            return Err(AppError::reference(format!(
                "trip {} does not exist",
                stop.trip_number
            )));
        }

        let stored = FuelStop { id, ..stop.clone() };
        book.fuel_stops.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_fuel_stop(&self, operator_id: i64, stop: &FuelStop) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let book = inner
            .books
            .get_mut(&operator_id)
            .ok_or_else(|| AppError::not_found("Fuel stop not found"))?;

        if !book.trips.contains_key(&stop.trip_number) {
            return Err(AppError::reference(format!(
                "trip {} does not exist",
                stop.trip_number
            )));
        }

        match book.fuel_stops.get_mut(&stop.id) {
            Some(existing) => {
                *existing = stop.clone();
                Ok(())
            }
            None => Err(AppError::not_found("Fuel stop not found")),
        }
    }

    async fn delete_fuel_stop(&self, operator_id: i64, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .books
            .get_mut(&operator_id)
            .map(|b| b.fuel_stops.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn get_pay_config(&self, operator_id: i64) -> Result<Option<PayConfiguration>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .books
            .get(&operator_id)
            .and_then(|b| b.pay_config.clone()))
    }

    async fn save_pay_config(&self, operator_id: i64, config: &PayConfiguration) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.books.entry(operator_id).or_default().pay_config = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::fixtures::*;

    #[tokio::test]
    async fn write_time_constraint_rejects_second_open_trip() {
        let store = MemoryStore::new();
        store.insert_trip(1, &percentage_trip("T1", 0.0, 0.0)).await.unwrap();

        let err = store
            .insert_trip(1, &percentage_trip("T2", 0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ActiveTripConflict { .. }));

        // Other operators are unaffected.
        store.insert_trip(2, &percentage_trip("T2", 0.0, 0.0)).await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_insert_keeps_the_first_trip() {
        let store = MemoryStore::new();
        store.insert_trip(1, &percentage_trip("T1", 1000.0, 0.0)).await.unwrap();

        let err = store
            .insert_trip(1, &delivered(percentage_trip("T1", 2000.0, 0.0), "2024-01-20"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = store.get_trip(1, "T1").await.unwrap().unwrap();
        assert!(stored.is_active());
    }

    #[tokio::test]
    async fn update_of_a_deleted_trip_is_not_found() {
        let store = MemoryStore::new();
        let trip = percentage_trip("T1", 1000.0, 0.0);
        store.insert_trip(1, &trip).await.unwrap();
        store.delete_trip(1, "T1").await.unwrap();

        let err = store.update_trip(1, &trip).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.get_trip(1, "T1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn renet_touches_only_the_net() {
        let store = MemoryStore::new();
        let mut trip = delivered(percentage_trip("T1", 1000.0, 50.0), "2024-01-20");
        trip.calculated_gross = 730.0;
        trip.scale_cost = 28.0;
        store.insert_trip(1, &trip).await.unwrap();

        assert_eq!(store.renet_trip(1, "T1", 400.0).await.unwrap(), Some(302.0));
        let stored = store.get_trip(1, "T1").await.unwrap().unwrap();
        assert_eq!(stored.date_delivered, trip.date_delivered);
        assert_eq!(stored.calculated_gross, 730.0);

        assert_eq!(store.renet_trip(1, "NOPE", 0.0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_a_trip_drops_its_fuel_stops() {
        use crate::models::fuel_stop::fixtures::diesel_stop;

        let store = MemoryStore::new();
        store.insert_trip(1, &percentage_trip("T1", 0.0, 0.0)).await.unwrap();
        store.insert_fuel_stop(1, &diesel_stop(0, "T1", 10.0, 3.0)).await.unwrap();

        assert!(store.delete_trip(1, "T1").await.unwrap());
        assert!(store.list_fuel_stops(1).await.unwrap().is_empty());
        assert!(!store.delete_trip(1, "T1").await.unwrap());
    }

    #[tokio::test]
    async fn fuel_stop_needs_existing_trip() {
        use crate::models::fuel_stop::fixtures::diesel_stop;

        let store = MemoryStore::new();
        let err = store
            .insert_fuel_stop(1, &diesel_stop(0, "NOPE", 10.0, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Reference(_)));
    }
}
