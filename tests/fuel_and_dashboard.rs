use haulbook_backend::dtos::fuel_stop::FuelStopRequest;
use haulbook_backend::dtos::trip::TripRequest;
use haulbook_backend::handlers::{dashboard, fuel_stop, trip};
use haulbook_backend::store::MemoryStore;
use haulbook_backend::AppError;

const OPERATOR: i64 = 1;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn trip_request(number: &str, dispatched: &str, delivered: Option<&str>, linehaul: f64) -> TripRequest {
    TripRequest {
        trip_number: Some(number.to_string()),
        date_dispatched: Some(dispatched.to_string()),
        date_delivered: delivered.map(str::to_string),
        origin_city: Some("Dallas".to_string()),
        origin_state: Some("TX".to_string()),
        destination_city: Some("Memphis".to_string()),
        destination_state: Some("TN".to_string()),
        trailer_number: Some("53-118".to_string()),
        deadhead_miles: 30.0,
        loaded_miles: 450.0,
        linehaul,
        ..Default::default()
    }
}

fn diesel(trip_number: &str, gallons: f64, price: f64) -> FuelStopRequest {
    FuelStopRequest {
        trip_number: Some(trip_number.to_string()),
        date_of_stop: Some("2024-01-16".to_string()),
        vendor: Some("Pilot".to_string()),
        gallons_diesel_purchased: gallons,
        diesel_price_per_gallon: price,
        ..Default::default()
    }
}

async fn net_of(store: &MemoryStore, trip_number: &str) -> f64 {
    trip::get_trip(store, OPERATOR, trip_number)
        .await
        .unwrap()
        .trip
        .projected_net
}

#[tokio::test]
async fn fuel_stops_refresh_the_trip_net() {
    let store = MemoryStore::new();
    let mut req = trip_request("T1", "2024-01-15", None, 1000.0);
    req.fsc = 50.0;
    req.scale_cost = 28.0;
    trip::create_trip(&store, OPERATOR, req).await.unwrap();
    assert!(close(net_of(&store, "T1").await, 702.0));

    let stop = fuel_stop::create_fuel_stop(&store, OPERATOR, diesel("T1", 100.0, 4.0))
        .await
        .unwrap();
    assert!(close(stop.cost.total_fuel_stop_cost, 400.0));
    assert!(close(net_of(&store, "T1").await, 302.0));

    fuel_stop::update_fuel_stop(&store, OPERATOR, stop.stop.id, diesel("T1", 50.0, 4.0))
        .await
        .unwrap();
    assert!(close(net_of(&store, "T1").await, 502.0));

    fuel_stop::delete_fuel_stop(&store, OPERATOR, stop.stop.id)
        .await
        .unwrap();
    assert!(close(net_of(&store, "T1").await, 702.0));
}

#[tokio::test]
async fn def_adds_to_the_stop_cost() {
    let store = MemoryStore::new();
    trip::create_trip(&store, OPERATOR, trip_request("T1", "2024-01-15", None, 1000.0))
        .await
        .unwrap();

    let mut req = diesel("T1", 100.0, 4.0);
    req.gallons_def_purchased = Some(5.0);
    req.def_price_per_gallon = Some(3.0);
    let stop = fuel_stop::create_fuel_stop(&store, OPERATOR, req).await.unwrap();

    assert!(close(stop.cost.total_def_cost, 15.0));
    assert!(close(stop.cost.total_fuel_stop_cost, 415.0));
}

#[tokio::test]
async fn fuel_stop_for_unknown_trip_is_a_reference_error() {
    let store = MemoryStore::new();
    let err = fuel_stop::create_fuel_stop(&store, OPERATOR, diesel("ghost", 10.0, 4.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Reference(_)));
}

#[tokio::test]
async fn fuel_stops_can_be_listed_per_trip() {
    let store = MemoryStore::new();
    trip::create_trip(&store, OPERATOR, trip_request("T1", "2024-01-15", Some("2024-01-16"), 1000.0))
        .await
        .unwrap();
    trip::create_trip(&store, OPERATOR, trip_request("T2", "2024-01-17", None, 1000.0))
        .await
        .unwrap();
    fuel_stop::create_fuel_stop(&store, OPERATOR, diesel("T1", 10.0, 4.0)).await.unwrap();
    fuel_stop::create_fuel_stop(&store, OPERATOR, diesel("T2", 20.0, 4.0)).await.unwrap();
    fuel_stop::create_fuel_stop(&store, OPERATOR, diesel("T2", 30.0, 4.0)).await.unwrap();

    let all = fuel_stop::list_fuel_stops(&store, OPERATOR, None).await.unwrap();
    let t2 = fuel_stop::list_fuel_stops(&store, OPERATOR, Some("T2")).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(t2.len(), 2);

    // Deleting a trip takes its fuel stops with it.
    trip::delete_trip(&store, OPERATOR, "T2").await.unwrap();
    let remaining = fuel_stop::list_fuel_stops(&store, OPERATOR, None).await.unwrap();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn dashboard_reports_completed_trips_and_the_active_one() {
    let store = MemoryStore::new();

    let mut first = trip_request("T1", "2024-01-15", Some("2024-01-17"), 1000.0);
    first.fsc = 50.0;
    first.scale_cost = 28.0;
    trip::create_trip(&store, OPERATOR, first).await.unwrap();
    fuel_stop::create_fuel_stop(&store, OPERATOR, diesel("T1", 100.0, 4.0))
        .await
        .unwrap();

    trip::create_trip(&store, OPERATOR, trip_request("T2", "2024-01-29", Some("2024-02-02"), 500.0))
        .await
        .unwrap();
    trip::create_trip(&store, OPERATOR, trip_request("T3", "2024-02-05", None, 800.0))
        .await
        .unwrap();

    let report = dashboard::dashboard(&store, OPERATOR).await.unwrap();

    let active = report.active_trip.expect("active trip");
    assert_eq!(active.trip_number, "T3");
    assert_eq!(active.origin, "Dallas, TX");
    assert_eq!(active.destination, "Memphis, TN");

    let months: Vec<_> = report
        .monthly_net_revenue
        .iter()
        .map(|p| (p.label.as_str(), p.net_revenue))
        .collect();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].0, "Jan 2024");
    assert!(close(months[0].1, 302.0));
    assert_eq!(months[1].0, "Feb 2024");
    assert!(close(months[1].1, 340.0));

    let weeks = &report.weekly_revenue_per_mile;
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].label, "01-17");
    assert!(close(weeks[0].value, 302.0 / 480.0));
    assert_eq!(weeks[1].week, "2024-W05");
    assert_eq!(weeks[1].label, "01-31");

    assert!(close(report.mileage_totals.deadhead, 90.0));
    assert!(close(report.mileage_totals.loaded, 1350.0));
    assert_eq!(report.excluded_fuel_stops, 0);
}

#[tokio::test]
async fn empty_history_gives_an_empty_dashboard() {
    let store = MemoryStore::new();
    let report = dashboard::dashboard(&store, OPERATOR).await.unwrap();

    assert!(report.active_trip.is_none());
    assert!(report.monthly_net_revenue.is_empty());
    assert!(report.weekly_revenue_per_mile.is_empty());
    assert!(close(report.mileage_totals.loaded, 0.0));
}
