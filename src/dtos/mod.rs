pub mod dashboard;
pub mod fuel_stop;
pub mod lenient;
pub mod settings;
pub mod trip;
