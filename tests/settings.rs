use serde_json::json;

use haulbook_backend::dtos::settings::PayConfigRequest;
use haulbook_backend::dtos::trip::TripRequest;
use haulbook_backend::handlers::{settings, trip};
use haulbook_backend::models::PayType;
use haulbook_backend::store::MemoryStore;
use haulbook_backend::AppError;

const OPERATOR: i64 = 1;

fn pay(pay_type: &str, rate: Option<serde_json::Value>) -> PayConfigRequest {
    PayConfigRequest {
        driver_pay_type: Some(pay_type.to_string()),
        percentage_rate: rate,
    }
}

#[tokio::test]
async fn defaults_to_percentage_pay() {
    let store = MemoryStore::new();
    let config = settings::get_pay_config(&store, OPERATOR).await.unwrap();

    assert_eq!(config.driver_pay_type, PayType::Percentage);
    assert_eq!(config.percentage_rate, Some(0.68));
}

#[tokio::test]
async fn rate_is_entered_as_a_percentage() {
    let store = MemoryStore::new();
    settings::update_pay_config(&store, OPERATOR, pay("percentage", Some(json!("75"))))
        .await
        .unwrap();

    let config = settings::get_pay_config(&store, OPERATOR).await.unwrap();
    assert_eq!(config.percentage_rate, Some(0.75));
}

#[tokio::test]
async fn out_of_range_rate_is_rejected() {
    let store = MemoryStore::new();
    let err = settings::update_pay_config(&store, OPERATOR, pay("percentage", Some(json!(150))))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = settings::update_pay_config(&store, OPERATOR, pay("percentage", None))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn unknown_pay_type_is_a_configuration_error() {
    let store = MemoryStore::new();
    let err = settings::update_pay_config(&store, OPERATOR, pay("hourly", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn mileage_config_clears_the_rate_and_applies_to_new_trips() {
    let store = MemoryStore::new();
    let config = settings::update_pay_config(&store, OPERATOR, pay("Mileage", Some(json!(50))))
        .await
        .unwrap();
    assert_eq!(config.driver_pay_type, PayType::Mileage);
    assert_eq!(config.percentage_rate, None);

    let saved = trip::create_trip(
        &store,
        OPERATOR,
        TripRequest {
            trip_number: Some("T1".to_string()),
            date_dispatched: Some("2024-01-15".to_string()),
            loaded_miles: 150.0,
            fsc_per_loaded_mile: 0.4,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(saved.trip.pay_type(), PayType::Mileage);
    assert!((saved.trip.calculated_gross - (150.0 * 2.0 + 60.0)).abs() < 1e-9);
}
