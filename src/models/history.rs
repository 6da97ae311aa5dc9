use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One past daily weather summary for a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalDay {
    pub date: NaiveDate,
    pub high_temp_f: f64,
    pub low_temp_f: f64,
    pub avg_pressure_hpa: f64,
    pub total_precipitation: f64,
    pub avg_wind_speed_mph: f64,
}

impl HistoricalDay {
    pub fn mean_temp_f(&self) -> f64 {
        (self.high_temp_f + self.low_temp_f) / 2.0
    }
}

/// Recent-weather baseline the scorer compares the forecast against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalContext {
    pub days: usize,
    pub mean_temp_f: f64,
    pub pressure_range_hpa: f64,
}

impl HistoricalContext {
    /// Reduce daily rows to a baseline. `None` when there is nothing to compare.
    pub fn from_days(days: &[HistoricalDay]) -> Option<Self> {
        if days.is_empty() {
            return None;
        }

        let mean_temp_f = days.iter().map(|d| d.mean_temp_f()).sum::<f64>() / days.len() as f64;

        let (min_p, max_p) = days.iter().fold((f64::MAX, f64::MIN), |(lo, hi), d| {
            (lo.min(d.avg_pressure_hpa), hi.max(d.avg_pressure_hpa))
        });

        Some(Self {
            days: days.len(),
            mean_temp_f,
            pressure_range_hpa: max_p - min_p,
        })
    }
}
