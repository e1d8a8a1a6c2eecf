use tracing::{info, instrument};

use crate::dtos::lenient;
use crate::dtos::settings::PayConfigRequest;
use crate::error::AppError;
use crate::models::{PayConfiguration, PayType};
use crate::store::TripStore;

const RATE_RANGE_MESSAGE: &str = "Percentage Rate must be a number between 0 and 100";

/// The operator's live pay settings, falling back to the defaults when none
/// have been saved.
pub async fn current_pay_config(store: &dyn TripStore, operator_id: i64) -> Result<PayConfiguration, AppError> {
    Ok(store
        .get_pay_config(operator_id)
        .await?
        .unwrap_or_default())
}

// GET settings
#[instrument(skip(store))]
pub async fn get_pay_config(store: &dyn TripStore, operator_id: i64) -> Result<PayConfiguration, AppError> {
    current_pay_config(store, operator_id).await
}

// PUT settings - rate arrives as 0-100 and is stored as a fraction
#[instrument(skip(store, req))]
pub async fn update_pay_config(
    store: &dyn TripStore,
    operator_id: i64,
    req: PayConfigRequest,
) -> Result<PayConfiguration, AppError> {
    let pay_type: PayType = req.driver_pay_type.as_deref().unwrap_or_default().parse()?;

    let config = match pay_type {
        PayType::Percentage => {
            let rate = req
                .percentage_rate
                .as_ref()
                .and_then(lenient::parse_number)
                .ok_or_else(|| AppError::validation(RATE_RANGE_MESSAGE))?;

            if !(0.0..=100.0).contains(&rate) {
                return Err(AppError::validation(RATE_RANGE_MESSAGE));
            }
            PayConfiguration::percentage(rate / 100.0)
        }
        PayType::Mileage => PayConfiguration::mileage(),
    };

    store.save_pay_config(operator_id, &config).await?;
    info!(operator_id, pay_type = %config.driver_pay_type, "Pay configuration saved");

    Ok(config)
}
