use crate::config::Config;
use crate::datasources::{aggregate_daily, HistoricalWeatherSource, OpenWeatherMapClient};
use crate::db::{CachedForecast, Database};
use crate::error::{BiteCastError, Result};
use crate::models::{HistoricalDay, RawForecastSample};
use chrono::{DateTime, NaiveDate, Utc};

/// Where a set of forecast samples came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOrigin {
    Live,
    Cache,
    /// Cache older than the configured maximum, used because fetching failed
    StaleCache,
}

impl SampleOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleOrigin::Live => "OpenWeatherMap",
            SampleOrigin::Cache => "cache",
            SampleOrigin::StaleCache => "stale cache",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSamples {
    pub samples: Vec<RawForecastSample>,
    pub fetched_at: DateTime<Utc>,
    pub origin: SampleOrigin,
}

impl LoadedSamples {
    fn from_cache(cached: CachedForecast, origin: SampleOrigin) -> Self {
        Self {
            samples: cached.samples,
            fetched_at: cached.fetched_at,
            origin,
        }
    }
}

/// Keeps the local store in step with OpenWeatherMap: caches raw forecasts
/// and records daily aggregates that later serve as recent-weather history.
pub struct DataSyncService {
    config: Config,
    db: Database,
    openweathermap_client: Option<OpenWeatherMapClient>,
}

impl DataSyncService {
    pub fn new(config: Config, db: Database) -> Self {
        let openweathermap_client = config
            .openweathermap
            .as_ref()
            .filter(|c| c.is_usable())
            .map(|c| {
                tracing::info!("OpenWeatherMap client configured for forecast data");
                OpenWeatherMapClient::new(c.clone(), config.lake.location())
            });

        if openweathermap_client.is_none() {
            tracing::info!("OpenWeatherMap not configured - only cached forecasts are available");
        }

        Self {
            config,
            db,
            openweathermap_client,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Forecast samples for the lake: the cache while it is fresh, otherwise
    /// a live fetch, falling back to an expired cache if the fetch fails.
    pub async fn load_samples(&self, now: DateTime<Utc>) -> Result<LoadedSamples> {
        let region = &self.config.lake.region_id;
        let cached = match self.db.latest_cached_forecast(region) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read forecast cache: {}", e);
                None
            }
        };

        if let Some(ref c) = cached {
            if c.age_minutes(now) < self.config.forecast.cache_max_age_minutes {
                tracing::debug!(age = c.age_minutes(now), "Using cached forecast");
                return Ok(LoadedSamples::from_cache(c.clone(), SampleOrigin::Cache));
            }
        }

        match self.fetch_and_store(now).await {
            Ok(samples) => Ok(LoadedSamples {
                samples,
                fetched_at: now,
                origin: SampleOrigin::Live,
            }),
            Err(e) => match cached {
                Some(c) => {
                    tracing::warn!(
                        age = c.age_minutes(now),
                        "Forecast fetch failed ({}), using stale cache",
                        e
                    );
                    Ok(LoadedSamples::from_cache(c, SampleOrigin::StaleCache))
                }
                None => Err(e),
            },
        }
    }

    async fn fetch_and_store(&self, now: DateTime<Utc>) -> Result<Vec<RawForecastSample>> {
        let Some(ref client) = self.openweathermap_client else {
            return Err(BiteCastError::DataSourceUnavailable(
                "OpenWeatherMap is not configured".into(),
            ));
        };

        let samples = client.fetch_forecast().await?;
        self.record_samples(now, &samples);
        Ok(samples)
    }

    /// Cache a fetched forecast and record the days it fully covers as
    /// history. Storage failures are logged; the samples are still usable.
    fn record_samples(&self, now: DateTime<Utc>, samples: &[RawForecastSample]) {
        let region = &self.config.lake.region_id;

        if let Err(e) = self.db.cache_forecast(region, now, samples) {
            tracing::warn!("Failed to cache forecast: {}", e);
        }

        let days = aggregate_daily(samples, self.config.lake.location());
        match self.db.upsert_daily_weather(region, &days) {
            Ok(n) => tracing::debug!("Recorded {} daily weather rows", n),
            Err(e) => tracing::warn!("Failed to record daily weather: {}", e),
        }
    }

    /// Recent daily weather before `before`. Storage problems only cost the
    /// history adjustment, so they are logged and yield an empty list.
    pub fn history(&self, before: NaiveDate) -> Vec<HistoricalDay> {
        let region = &self.config.lake.region_id;
        match self
            .db
            .recent_days(region, before, self.config.forecast.history_days)
        {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!("Failed to load weather history: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus {
            openweathermap_configured: self.openweathermap_client.is_some(),
            ..Default::default()
        };

        if let Some(ref client) = self.openweathermap_client {
            status.openweathermap = client.test_connection().await.unwrap_or(false);
        }

        status.database = self
            .db
            .latest_cached_forecast(&self.config.lake.region_id)
            .is_ok();

        status
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    pub openweathermap_configured: bool,
    pub openweathermap: bool,
    pub database: bool,
}

impl ConnectionStatus {
    pub fn all_connected(&self) -> bool {
        self.openweathermap && self.database
    }
}
