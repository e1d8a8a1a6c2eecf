use serde::Deserialize;
use serde_json::Value;

/// Settings form payload. `percentage_rate` is entered as 0-100 and stored
/// as a fraction.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayConfigRequest {
    pub driver_pay_type: Option<String>,
    pub percentage_rate: Option<Value>,
}
