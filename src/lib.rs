//! Hourly ice-fishing bite forecasts.
//!
//! A 3-hour weather forecast is expanded to 24 hourly samples, annotated with
//! pressure and temperature trends, storm phases, sun and moon positions, and
//! scored per species on a 0 to 100 scale.

pub mod config;
pub mod datasources;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{BiteCastError, Result};
