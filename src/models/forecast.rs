use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMP_F: f64 = 50.0;
pub const DEFAULT_PRESSURE_HPA: f64 = 1013.0;
pub const DEFAULT_HUMIDITY_PERCENT: f64 = 50.0;

/// Lake coordinates in decimal degrees (east and north positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Discrete weather condition: category plus the provider's icon id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionCode {
    pub condition: WeatherCondition,
    pub icon: String,
}

impl ConditionCode {
    pub fn new(condition: WeatherCondition, icon: impl Into<String>) -> Self {
        Self {
            condition,
            icon: icon.into(),
        }
    }
}

/// A single 3-hour forecast point as delivered by the forecast provider.
///
/// Numeric fields are optional because providers omit them freely; the
/// interpolator substitutes defaults instead of propagating gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawForecastSample {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub cloud_percent: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_direction_degrees: Option<f64>,
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
    #[serde(default)]
    pub rain_volume_3h: Option<f64>,
    #[serde(default)]
    pub snow_volume_3h: Option<f64>,
    #[serde(default)]
    pub condition_code: ConditionCode,
}

impl RawForecastSample {
    /// A sample with every numeric field missing
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temperature: None,
            pressure: None,
            humidity: None,
            cloud_percent: None,
            wind_speed: None,
            wind_direction_degrees: None,
            precipitation_probability: None,
            rain_volume_3h: None,
            snow_volume_3h: None,
            condition_code: ConditionCode::default(),
        }
    }
}

/// One interpolated hour. Volumes are per-hour shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub cloud_percent: f64,
    pub wind_speed: f64,
    pub wind_direction_degrees: f64,
    pub precipitation_probability: f64,
    pub rain_volume: f64,
    pub snow_volume: f64,
    pub condition_code: ConditionCode,
}

impl HourlySample {
    /// Rain plus snow for this hour
    pub fn precipitation_volume(&self) -> f64 {
        self.rain_volume + self.snow_volume
    }
}

/// Weather condition categories from OpenWeatherMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other,
}

impl WeatherCondition {
    pub fn from_owm_id(id: u32) -> Self {
        match id {
            200..=232 => WeatherCondition::Thunderstorm,
            300..=321 => WeatherCondition::Drizzle,
            500..=531 => WeatherCondition::Rain,
            600..=622 => WeatherCondition::Snow,
            701 => WeatherCondition::Mist,
            741 => WeatherCondition::Fog,
            800 => WeatherCondition::Clear,
            801..=804 => WeatherCondition::Clouds,
            _ => WeatherCondition::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Cloudy",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Mist => "Mist",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Other => "Other",
        }
    }

    /// Whether this condition involves precipitation
    pub fn has_precipitation(&self) -> bool {
        matches!(
            self,
            WeatherCondition::Rain
                | WeatherCondition::Drizzle
                | WeatherCondition::Thunderstorm
                | WeatherCondition::Snow
        )
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
