pub mod fuel_stop;
pub mod pay_config;
pub mod trip;

pub use fuel_stop::FuelStop;
pub use pay_config::{PayConfiguration, PayType};
pub use trip::{PayDetails, Trip};
