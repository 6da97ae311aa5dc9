use crate::datasources::HistoricalWeatherSource;
use crate::db::Database;
use crate::error::{BiteCastError, Result};
use crate::models::{HistoricalDay, RawForecastSample};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::warn;

/// Raw forecast samples as last fetched for a region
#[derive(Debug, Clone)]
pub struct CachedForecast {
    pub fetched_at: DateTime<Utc>,
    pub samples: Vec<RawForecastSample>,
}

impl CachedForecast {
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.fetched_at).num_minutes()
    }
}

// Daily Weather Queries

impl Database {
    /// Insert or replace daily rows for a region. Returns the number written.
    pub fn upsert_daily_weather(&self, region_id: &str, days: &[HistoricalDay]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT OR REPLACE INTO daily_weather
                        (region_id, date, high_temp_f, low_temp_f, avg_pressure_hpa,
                         total_precipitation, avg_wind_speed_mph, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                )?;
                for day in days {
                    stmt.execute(params![
                        region_id,
                        day.date.to_string(),
                        day.high_temp_f,
                        day.low_temp_f,
                        day.avg_pressure_hpa,
                        day.total_precipitation,
                        day.avg_wind_speed_mph,
                        Utc::now().to_rfc3339(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(days.len())
        })
    }

    /// Up to `days` rows dated strictly before `before`, oldest first
    pub fn recent_daily_weather(
        &self,
        region_id: &str,
        before: NaiveDate,
        days: u32,
    ) -> Result<Vec<HistoricalDay>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT date, high_temp_f, low_temp_f, avg_pressure_hpa,
                       total_precipitation, avg_wind_speed_mph
                FROM daily_weather
                WHERE region_id = ?1 AND date < ?2
                ORDER BY date DESC
                LIMIT ?3
                "#,
            )?;

            let rows = stmt.query_map(
                params![region_id, before.to_string(), days],
                row_to_historical_day,
            )?;

            let mut result = Vec::new();
            for row in rows {
                match row {
                    Ok(Some(day)) => result.push(day),
                    Ok(None) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            result.reverse();
            Ok(result)
        })
    }
}

fn row_to_historical_day(row: &Row) -> rusqlite::Result<Option<HistoricalDay>> {
    let date_str: String = row.get("date")?;
    let Ok(date) = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") else {
        warn!(date = %date_str, "Unparseable date in daily_weather, skipping row");
        return Ok(None);
    };

    Ok(Some(HistoricalDay {
        date,
        high_temp_f: row.get("high_temp_f")?,
        low_temp_f: row.get("low_temp_f")?,
        avg_pressure_hpa: row.get("avg_pressure_hpa")?,
        total_precipitation: row.get("total_precipitation")?,
        avg_wind_speed_mph: row.get("avg_wind_speed_mph")?,
    }))
}

impl HistoricalWeatherSource for Database {
    fn recent_days(&self, region_id: &str, before: NaiveDate, days: u32) -> Result<Vec<HistoricalDay>> {
        self.recent_daily_weather(region_id, before, days)
    }
}

// Forecast Cache Queries

impl Database {
    pub fn cache_forecast(
        &self,
        region_id: &str,
        fetched_at: DateTime<Utc>,
        samples: &[RawForecastSample],
    ) -> Result<()> {
        let json = serde_json::to_string(samples)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO forecast_cache (region_id, fetched_at, samples_json) VALUES (?1, ?2, ?3)",
                params![region_id, fetched_at.to_rfc3339(), json],
            )?;
            // Only the newest entry per region is ever read back
            conn.execute(
                r#"
                DELETE FROM forecast_cache
                WHERE region_id = ?1
                  AND id NOT IN (
                      SELECT id FROM forecast_cache WHERE region_id = ?1
                      ORDER BY fetched_at DESC, id DESC LIMIT 1
                  )
                "#,
                params![region_id],
            )?;
            Ok(())
        })
    }

    pub fn latest_cached_forecast(&self, region_id: &str) -> Result<Option<CachedForecast>> {
        let row = self.with_conn(|conn| {
            conn.query_row(
                r#"
                SELECT fetched_at, samples_json FROM forecast_cache
                WHERE region_id = ?1
                ORDER BY fetched_at DESC, id DESC
                LIMIT 1
                "#,
                params![region_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(Into::into)
        })?;

        let Some((fetched_at_str, json)) = row else {
            return Ok(None);
        };

        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| BiteCastError::InvalidData(format!("Bad cache timestamp: {}", e)))?;
        let samples: Vec<RawForecastSample> = serde_json::from_str(&json)?;

        Ok(Some(CachedForecast {
            fetched_at,
            samples,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(date: NaiveDate, high: f64) -> HistoricalDay {
        HistoricalDay {
            date,
            high_temp_f: high,
            low_temp_f: high - 15.0,
            avg_pressure_hpa: 1015.0,
            total_precipitation: 0.2,
            avg_wind_speed_mph: 7.5,
        }
    }

    #[test]
    fn recent_daily_weather_returns_latest_days_before_cutoff() {
        let db = Database::open_in_memory().unwrap();
        let first = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let rows: Vec<_> = (0..10)
            .map(|i| day(first + Duration::days(i), 20.0 + i as f64))
            .collect();
        assert_eq!(db.upsert_daily_weather("mille-lacs", &rows).unwrap(), 10);

        let cutoff = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
        let recent = db.recent_daily_weather("mille-lacs", cutoff, 3).unwrap();
        let dates: Vec<_> = recent.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2026-01-05", "2026-01-06", "2026-01-07"]);
        assert_eq!(recent[2].high_temp_f, 26.0);

        assert!(db.recent_daily_weather("red-lake", cutoff, 3).unwrap().is_empty());
    }

    #[test]
    fn upsert_replaces_existing_day() {
        let db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        db.upsert_daily_weather("lake", &[day(date, 10.0)]).unwrap();
        db.upsert_daily_weather("lake", &[day(date, 25.0)]).unwrap();

        let cutoff = date + Duration::days(1);
        let rows = db.recent_days("lake", cutoff, 7).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].high_temp_f, 25.0);
    }

    #[test]
    fn forecast_cache_keeps_newest_entry() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.latest_cached_forecast("lake").unwrap().is_none());

        let t0 = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let older = vec![RawForecastSample::empty(t0)];
        let newer = vec![
            RawForecastSample {
                temperature: Some(18.0),
                ..RawForecastSample::empty(t0 + Duration::hours(3))
            },
            RawForecastSample::empty(t0 + Duration::hours(6)),
        ];

        db.cache_forecast("lake", t0, &older).unwrap();
        db.cache_forecast("lake", t0 + Duration::minutes(30), &newer).unwrap();

        let cached = db.latest_cached_forecast("lake").unwrap().unwrap();
        assert_eq!(cached.fetched_at, t0 + Duration::minutes(30));
        assert_eq!(cached.samples.len(), 2);
        assert_eq!(cached.samples[0].temperature, Some(18.0));
        assert_eq!(cached.age_minutes(t0 + Duration::minutes(90)), 60);

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM forecast_cache", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }
}
