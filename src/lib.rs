//! Trip accounting for an owner-operator trucking business.
//!
//! The [`engine`] turns raw trip and fuel records into gross, fuel cost and
//! net revenue, guards the one-active-trip rule and builds the reporting
//! series. [`handlers`] wire it to a [`store::TripStore`].

pub mod config;
pub mod database;
pub mod dtos;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

pub use error::AppError;
