pub mod astronomy;
pub mod data_sync;
pub mod forecast;
pub mod interpolation;
pub mod scoring;
pub mod seasonal;
pub mod species;
pub mod weather_analysis;

pub use data_sync::{ConnectionStatus, DataSyncService, LoadedSamples, SampleOrigin};
pub use forecast::{BiteForecastService, ForecastRequest};
pub use interpolation::{interpolate, FORECAST_HOURS};
pub use scoring::{best_bite_times, BiteConditions, ScoringEngine};
pub use species::SpeciesCatalog;
