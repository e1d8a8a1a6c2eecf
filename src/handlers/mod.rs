//! Operations invoked by request-handling code. Each one loads what it needs
//! from a [`TripStore`](crate::store::TripStore), runs the engine and writes
//! derived figures back.

pub mod dashboard;
pub mod fuel_stop;
pub mod settings;
pub mod trip;
