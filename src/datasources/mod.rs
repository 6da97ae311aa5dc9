pub mod openweathermap;

pub use openweathermap::{aggregate_daily, OpenWeatherMapClient};

use crate::error::Result;
use crate::models::HistoricalDay;
use chrono::NaiveDate;

/// Past daily weather for a region, used as the scorer's recent-weather
/// baseline. Callers treat failures as "no history".
pub trait HistoricalWeatherSource {
    /// Up to `days` daily rows dated before `before`, oldest first
    fn recent_days(&self, region_id: &str, before: NaiveDate, days: u32) -> Result<Vec<HistoricalDay>>;
}
