use crate::config::OpenWeatherMapConfig;
use crate::error::{BiteCastError, Result};
use crate::logic::astronomy::solar_date;
use crate::models::{
    ConditionCode, HistoricalDay, Location, RawForecastSample, WeatherCondition,
};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
/// 3-hour forecast slots in one day
const SLOTS_PER_DAY: usize = 8;

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
    location: Location,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    pop: Option<f64>, // probability of precipitation, 0..1
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: u32,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: f64, // cloudiness percentage
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig, location: Location) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            location,
        }
    }

    /// Fetch the 5-day/3-hour forecast as raw samples
    pub async fn fetch_forecast(&self) -> Result<Vec<RawForecastSample>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=imperial",
            API_BASE_URL, self.location.latitude, self.location.longitude, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                BiteCastError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BiteCastError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmForecastResponse = response.json().await.map_err(|e| {
            BiteCastError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        let samples = convert_response(owm_response);
        tracing::debug!("Fetched {} forecast samples from OpenWeatherMap", samples.len());
        Ok(samples)
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=imperial",
            API_BASE_URL, self.location.latitude, self.location.longitude, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                BiteCastError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

fn convert_response(response: OwmForecastResponse) -> Vec<RawForecastSample> {
    response
        .list
        .iter()
        .filter_map(convert_forecast_item)
        .collect()
}

fn convert_forecast_item(item: &OwmForecastItem) -> Option<RawForecastSample> {
    let Some(timestamp) = DateTime::from_timestamp(item.dt, 0) else {
        tracing::warn!(dt = item.dt, "Skipping forecast item with invalid timestamp");
        return None;
    };

    let condition_code = item
        .weather
        .first()
        .map(|w| ConditionCode::new(WeatherCondition::from_owm_id(w.id), w.icon.clone()))
        .unwrap_or_default();

    Some(RawForecastSample {
        timestamp,
        temperature: item.main.temp,
        pressure: item.main.pressure,
        humidity: item.main.humidity,
        cloud_percent: item.clouds.as_ref().map(|c| c.all),
        wind_speed: item.wind.as_ref().and_then(|w| w.speed),
        wind_direction_degrees: item.wind.as_ref().and_then(|w| w.deg),
        precipitation_probability: item.pop,
        rain_volume_3h: item.rain.as_ref().map(|r| r.three_hour),
        snow_volume_3h: item.snow.as_ref().map(|s| s.three_hour),
        condition_code,
    })
}

/// Summarise raw samples into one row per local solar date, oldest first.
/// Only dates covered by every 3-hour slot are summarised. Samples missing
/// temperature or pressure are left out of those averages.
pub fn aggregate_daily(samples: &[RawForecastSample], location: Location) -> Vec<HistoricalDay> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&RawForecastSample>> = BTreeMap::new();
    for sample in samples {
        let date = solar_date(sample.timestamp, location.longitude);
        by_date.entry(date).or_default().push(sample);
    }

    by_date
        .into_iter()
        .filter(|(_, points)| covers_full_day(points))
        .filter_map(|(date, points)| aggregate_day(date, &points))
        .collect()
}

fn covers_full_day(points: &[&RawForecastSample]) -> bool {
    let slots: BTreeSet<_> = points.iter().map(|p| p.timestamp).collect();
    slots.len() >= SLOTS_PER_DAY
}

fn aggregate_day(date: NaiveDate, points: &[&RawForecastSample]) -> Option<HistoricalDay> {
    let temps: Vec<f64> = points.iter().filter_map(|p| p.temperature).collect();
    let pressures: Vec<f64> = points.iter().filter_map(|p| p.pressure).collect();
    if temps.is_empty() || pressures.is_empty() {
        return None;
    }

    let high_temp_f = temps.iter().copied().fold(f64::MIN, f64::max);
    let low_temp_f = temps.iter().copied().fold(f64::MAX, f64::min);
    let avg_pressure_hpa = pressures.iter().sum::<f64>() / pressures.len() as f64;

    let total_precipitation: f64 = points
        .iter()
        .map(|p| p.rain_volume_3h.unwrap_or(0.0) + p.snow_volume_3h.unwrap_or(0.0))
        .sum();

    let winds: Vec<f64> = points.iter().filter_map(|p| p.wind_speed).collect();
    let avg_wind_speed_mph = if winds.is_empty() {
        0.0
    } else {
        winds.iter().sum::<f64>() / winds.len() as f64
    };

    Some(HistoricalDay {
        date,
        high_temp_f,
        low_temp_f,
        avg_pressure_hpa,
        total_precipitation,
        avg_wind_speed_mph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const SAMPLE_RESPONSE: &str = r#"{
        "cod": "200",
        "list": [
            {
                "dt": 1768478400,
                "main": {"temp": 12.5, "feels_like": 2.0, "pressure": 1021, "humidity": 78},
                "weather": [{"id": 600, "main": "Snow", "description": "light snow", "icon": "13n"}],
                "clouds": {"all": 90},
                "wind": {"speed": 9.2, "deg": 310, "gust": 15.1},
                "pop": 0.62,
                "snow": {"3h": 0.4}
            },
            {
                "dt": 1768489200,
                "main": {"temp": 10.1, "pressure": 1023},
                "weather": [{"id": 800, "icon": "01n"}],
                "clouds": {"all": 5},
                "wind": {"speed": 6.0}
            }
        ],
        "city": {"name": "Garrison", "country": "US", "coord": {"lat": 46.25, "lon": -93.65}}
    }"#;

    fn sample_config() -> OpenWeatherMapConfig {
        OpenWeatherMapConfig {
            api_key: "test_key".to_string(),
            enabled: true,
        }
    }

    #[test]
    fn client_creation() {
        let client = OpenWeatherMapClient::new(sample_config(), Location::new(46.25, -93.65));
        assert!(client.config.enabled);
    }

    #[test]
    fn converts_forecast_items_to_raw_samples() {
        let response: OwmForecastResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let samples = convert_response(response);
        assert_eq!(samples.len(), 2);

        let first = &samples[0];
        assert_eq!(first.timestamp, Utc.timestamp_opt(1768478400, 0).unwrap());
        assert_eq!(first.temperature, Some(12.5));
        assert_eq!(first.pressure, Some(1021.0));
        assert_eq!(first.wind_direction_degrees, Some(310.0));
        assert_eq!(first.precipitation_probability, Some(0.62));
        assert_eq!(first.snow_volume_3h, Some(0.4));
        assert_eq!(first.rain_volume_3h, None);
        assert_eq!(first.condition_code.condition, WeatherCondition::Snow);
        assert_eq!(first.condition_code.icon, "13n");

        let second = &samples[1];
        assert_eq!(second.humidity, None);
        assert_eq!(second.wind_direction_degrees, None);
        assert_eq!(second.precipitation_probability, None);
        assert_eq!(second.condition_code.condition, WeatherCondition::Clear);
    }

    #[test]
    fn aggregates_by_local_solar_date() {
        let lake = Location::new(46.25, -93.65);
        let day_start = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        let samples: Vec<_> = (0..10)
            .map(|i| RawForecastSample {
                temperature: Some(10.0 + i as f64),
                pressure: Some(1010.0 + i as f64),
                wind_speed: Some(5.0),
                snow_volume_3h: Some(0.5),
                ..RawForecastSample::empty(day_start + chrono::Duration::hours(3 * i))
            })
            .collect();

        // 09:00..=06:00 UTC next day falls on the 15th in local solar time;
        // the two samples left over on the 16th are not a full day
        let days = aggregate_daily(&samples, lake);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert_eq!(days[0].low_temp_f, 10.0);
        assert_eq!(days[0].high_temp_f, 17.0);
        assert!((days[0].total_precipitation - 4.0).abs() < 1e-9);
    }

    #[test]
    fn partial_days_are_not_summarised() {
        let lake = Location::new(46.25, -93.65);
        let t = Utc.with_ymd_and_hms(2026, 1, 15, 18, 0, 0).unwrap();
        let samples: Vec<_> = (0..4)
            .map(|i| RawForecastSample {
                temperature: Some(20.0),
                pressure: Some(1015.0),
                ..RawForecastSample::empty(t + chrono::Duration::hours(3 * i))
            })
            .collect();
        assert!(aggregate_daily(&samples, lake).is_empty());

        // Repeated timestamps do not fill missing slots
        let doubled: Vec<_> = samples.iter().chain(samples.iter()).cloned().collect();
        assert!(aggregate_daily(&doubled, lake).is_empty());
    }

    #[test]
    fn days_without_pressure_are_skipped() {
        let lake = Location::new(46.25, -93.65);
        let t = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        let samples: Vec<_> = (0..8)
            .map(|i| RawForecastSample {
                temperature: Some(20.0),
                ..RawForecastSample::empty(t + chrono::Duration::hours(3 * i))
            })
            .collect();
        assert!(aggregate_daily(&samples, lake).is_empty());
    }
}
