//! The "one trip in progress" rule.
//!
//! This is an advisory pre-check. Two concurrent writers can both pass it, so
//! every [`TripStore`](crate::store::TripStore) also enforces the rule
//! atomically and reports a violation as the same
//! [`AppError::ActiveTripConflict`].

use crate::error::AppError;
use crate::models::Trip;

/// Rejects `candidate` if it has no delivery date while some other trip in
/// `existing` is also still open. The stored copy of the candidate itself
/// (same trip number) is ignored so edits of the open trip go through.
pub fn validate_activeness(candidate: &Trip, existing: &[Trip]) -> Result<(), AppError> {
    if !candidate.is_active() {
        return Ok(());
    }

    match find_blocking_trip(&candidate.trip_number, existing) {
        Some(blocking) => Err(AppError::active_trip(blocking.trip_number.clone())),
        None => Ok(()),
    }
}

/// The open trip, if any, other than `trip_number`.
pub fn find_blocking_trip<'a>(trip_number: &str, existing: &'a [Trip]) -> Option<&'a Trip> {
    existing
        .iter()
        .find(|t| t.trip_number != trip_number && t.is_active())
}

/// The operator's in-progress trip, if there is one.
pub fn active_trip(trips: &[Trip]) -> Option<&Trip> {
    trips.iter().find(|t| t.is_active())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::fixtures::*;

    #[test]
    fn second_open_trip_is_rejected() {
        let existing = vec![percentage_trip("T1", 0.0, 0.0)];
        let err = validate_activeness(&percentage_trip("T2", 0.0, 0.0), &existing).unwrap_err();
        match err {
            AppError::ActiveTripConflict { blocking_trip } => {
                assert_eq!(blocking_trip.as_deref(), Some("T1"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delivered_candidate_always_passes() {
        let existing = vec![percentage_trip("T1", 0.0, 0.0)];
        let candidate = delivered(percentage_trip("T2", 0.0, 0.0), "2024-01-20");
        assert!(validate_activeness(&candidate, &existing).is_ok());
    }

    #[test]
    fn completing_the_open_trip_frees_the_slot() {
        let existing = vec![delivered(percentage_trip("T1", 0.0, 0.0), "2024-01-18")];
        assert!(validate_activeness(&percentage_trip("T2", 0.0, 0.0), &existing).is_ok());
    }

    #[test]
    fn editing_the_open_trip_itself_passes() {
        let existing = vec![percentage_trip("T1", 0.0, 0.0)];
        assert!(validate_activeness(&percentage_trip("T1", 10.0, 0.0), &existing).is_ok());
    }

    #[test]
    fn reopening_a_completed_trip_is_checked() {
        let existing = vec![
            delivered(percentage_trip("T1", 0.0, 0.0), "2024-01-18"),
            percentage_trip("T2", 0.0, 0.0),
        ];
        // T1 loses its delivery date while T2 is open.
        let reopened = percentage_trip("T1", 0.0, 0.0);
        assert!(matches!(
            validate_activeness(&reopened, &existing),
            Err(AppError::ActiveTripConflict { .. })
        ));
    }

    #[test]
    fn finds_the_active_trip() {
        let trips = vec![
            delivered(percentage_trip("T1", 0.0, 0.0), "2024-01-18"),
            percentage_trip("T2", 0.0, 0.0),
        ];
        assert_eq!(active_trip(&trips).map(|t| t.trip_number.as_str()), Some("T2"));
        assert!(active_trip(&trips[..1]).is_none());
    }
}
