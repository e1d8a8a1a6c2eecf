// src/error.rs
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid pay configuration: {0}")]
    InvalidConfiguration(String),

    /// At most one trip per operator may be in progress. `blocking_trip`
    /// names the trip that is still open when it is known.
    #[error("only one active trip at a time{}", blocker_suffix(.blocking_trip))]
    ActiveTripConflict { blocking_trip: Option<String> },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("reference error: {0}")]
    Reference(String),

    #[error("not found: {0}")]
    NotFound(String),
}

fn blocker_suffix(blocking_trip: &Option<String>) -> String {
    match blocking_trip {
        Some(trip) => format!(": trip {trip} has no delivery date"),
        None => String::new(),
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        AppError::InvalidConfiguration(msg.into())
    }

    pub fn active_trip(blocking_trip: impl Into<String>) -> Self {
        AppError::ActiveTripConflict {
            blocking_trip: Some(blocking_trip.into()),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn reference(msg: impl Into<String>) -> Self {
        AppError::Reference(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn db(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }

    /// Validation-class errors abort the operation before any write.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidConfiguration(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            AppError::ActiveTripConflict { .. } | AppError::Conflict(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            AppError::ActiveTripConflict { .. } | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Reference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidConfiguration(_) => "invalid_configuration",
            AppError::ActiveTripConflict { .. } => "active_trip_conflict",
            AppError::Conflict(_) => "conflict",
            AppError::Reference(_) => "reference_error",
            AppError::NotFound(_) => "not_found",
        }
    }

    /// JSON error body for whatever transport sits in front of the handlers.
    /// Storage details are never leaked to the caller.
    pub fn to_body(&self) -> serde_json::Value {
        let message = match self {
            AppError::Database(_) => "Database error occurred".to_string(),
            other => other.to_string(),
        };

        let mut body = json!({
            "error": message,
            "code": self.code(),
        });

        if let AppError::ActiveTripConflict {
            blocking_trip: Some(trip),
        } = self
        {
            body["blockingTrip"] = json!(trip);
        }

        body
    }
}
