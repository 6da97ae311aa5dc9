use super::interpolation::FORECAST_HOURS;
use super::seasonal::{day_length_info, moon_info, season_info};
use super::species::SpeciesCatalog;
use super::weather_analysis::{
    classify_period, detect_storm_events, pressure_trend, strongest_event, sun_times_at,
    temperature_trend,
};
use crate::error::{BiteCastError, Result};
use crate::logic::astronomy::solar_date;
use crate::models::{
    BiteScore, BiteWindow, FactorCategory, HistoricalContext, HourlySample, Location,
    ScoreFactor, SpeciesProfile, StormEvent, SunTimes, TimePeriod, GOOD_SCORE_THRESHOLD,
};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

pub const BASELINE_SCORE: f64 = 50.0;
/// Windows reported per species
pub const MAX_BITE_WINDOWS: usize = 3;

const OVERCAST_PERCENT: f64 = 70.0;
const CLEAR_PERCENT: f64 = 30.0;
const STRONG_WIND_MPH: f64 = 30.0;
const STRONG_WIND_IMPACT: f64 = -5.0;

const COLD_SNAP_DEPARTURE_F: f64 = -10.0;
const WARM_SPELL_DEPARTURE_F: f64 = 8.0;
const COLD_SNAP_IMPACT: f64 = -4.0;
const WARM_SPELL_IMPACT: f64 = 3.0;
const SETTLED_RANGE_HPA: f64 = 4.0;
const UNSETTLED_RANGE_HPA: f64 = 12.0;
const SETTLED_IMPACT: f64 = 2.0;
const UNSETTLED_IMPACT: f64 = -2.0;

/// Everything the scorer needs about one 24-hour forecast, analysed once and
/// shared by every species.
#[derive(Debug, Clone)]
pub struct BiteConditions {
    pub location: Location,
    pub hourly: Vec<HourlySample>,
    pub sun_times: Vec<SunTimes>,
    pub periods: Vec<TimePeriod>,
    pub storm_events: Vec<StormEvent>,
    pub history: Option<HistoricalContext>,
}

impl BiteConditions {
    pub fn analyze(
        location: Location,
        hourly: Vec<HourlySample>,
        history: Option<HistoricalContext>,
    ) -> Result<Self> {
        if hourly.len() != FORECAST_HOURS {
            return Err(BiteCastError::InvalidData(format!(
                "expected {} hourly samples, got {}",
                FORECAST_HOURS,
                hourly.len()
            )));
        }
        if hourly.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(BiteCastError::InvalidData(
                "hourly samples are not in increasing time order".to_string(),
            ));
        }

        let sun_times: Vec<SunTimes> = hourly
            .iter()
            .map(|h| sun_times_at(h.timestamp, location))
            .collect();
        let periods = hourly
            .iter()
            .zip(&sun_times)
            .map(|(h, sun)| classify_period(h.timestamp, sun))
            .collect();
        let storm_events = detect_storm_events(&hourly);

        debug!(
            "Analyzed forecast from {}: {} storm events, history: {}",
            hourly[0].timestamp,
            storm_events.len(),
            history.is_some()
        );

        Ok(Self {
            location,
            hourly,
            sun_times,
            periods,
            storm_events,
            history,
        })
    }

    pub fn len(&self) -> usize {
        self.hourly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }

    /// Timestamp for `hour`, extrapolated hourly past the end of the forecast
    fn timestamp_for(&self, hour: usize) -> DateTime<Utc> {
        if let Some(sample) = self.hourly.get(hour) {
            return sample.timestamp;
        }
        self.hourly
            .first()
            .and_then(|first| {
                i64::try_from(hour)
                    .ok()
                    .and_then(Duration::try_hours)
                    .and_then(|d| first.timestamp.checked_add_signed(d))
            })
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

pub struct ScoringEngine {
    catalog: SpeciesCatalog,
}

impl ScoringEngine {
    pub fn new(catalog: SpeciesCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    /// Score one species for one hour, failing on an unknown species or an
    /// hour outside the forecast
    pub fn evaluate(
        &self,
        species_id: &str,
        hour: usize,
        conditions: &BiteConditions,
    ) -> Result<BiteScore> {
        let profile = self.catalog.require(species_id)?;
        if hour >= conditions.len() {
            return Err(BiteCastError::InvalidHourIndex {
                hour,
                len: conditions.len(),
            });
        }

        let factors = hour_factors(profile, hour, conditions);
        let total = BASELINE_SCORE + factors.iter().map(|f| f.impact).sum::<f64>();
        let score = total.clamp(0.0, 100.0).round() as u8;

        Ok(BiteScore::new(
            species_id,
            hour,
            conditions.hourly[hour].timestamp,
            score,
            factors,
        ))
    }

    /// Like [`evaluate`](Self::evaluate), but failures become a zero score
    /// carrying a single error factor
    pub fn score(&self, species_id: &str, hour: usize, conditions: &BiteConditions) -> BiteScore {
        match self.evaluate(species_id, hour, conditions) {
            Ok(score) => score,
            Err(e) => {
                debug!("Scoring {} hour {} failed: {}", species_id, hour, e);
                BiteScore::failed(species_id, hour, conditions.timestamp_for(hour), e.to_string())
            }
        }
    }

    pub fn daily_scores(&self, species_id: &str, conditions: &BiteConditions) -> Vec<BiteScore> {
        (0..conditions.len())
            .map(|hour| self.score(species_id, hour, conditions))
            .collect()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(SpeciesCatalog::builtin())
    }
}

fn push_factor(factors: &mut Vec<ScoreFactor>, category: FactorCategory, description: String, impact: f64) {
    if impact != 0.0 {
        factors.push(ScoreFactor::new(category, description, impact));
    }
}

/// Every non-zero contribution for one species and hour, in evaluation order
fn hour_factors(profile: &SpeciesProfile, hour: usize, conditions: &BiteConditions) -> Vec<ScoreFactor> {
    let sample = &conditions.hourly[hour];
    let period = conditions.periods[hour];
    let weights = profile.weights;
    let mut factors = Vec::new();

    push_factor(
        &mut factors,
        FactorCategory::TimeOfDay,
        format!("{} feeding period for {}", period, profile.name),
        profile.time_of_day_modifier(period),
    );

    let pressure = pressure_trend(&conditions.hourly, hour);
    push_factor(
        &mut factors,
        FactorCategory::Pressure,
        pressure.description,
        pressure.impact * weights.pressure,
    );

    let temperature = temperature_trend(&conditions.hourly, hour);
    push_factor(
        &mut factors,
        FactorCategory::Temperature,
        temperature.description,
        temperature.impact * weights.temperature,
    );

    if sample.cloud_percent >= OVERCAST_PERCENT {
        push_factor(
            &mut factors,
            FactorCategory::CloudCover,
            format!("Overcast ({:.0}% cloud)", sample.cloud_percent),
            profile.cloud.overcast * weights.cloud_cover,
        );
    } else if sample.cloud_percent <= CLEAR_PERCENT && period == TimePeriod::Midday {
        push_factor(
            &mut factors,
            FactorCategory::CloudCover,
            format!("Clear midday sky ({:.0}% cloud)", sample.cloud_percent),
            profile.cloud.clear * weights.cloud_cover,
        );
    }

    if let Some(event) = strongest_event(&conditions.storm_events, hour) {
        push_factor(
            &mut factors,
            FactorCategory::Storm,
            event.description.clone(),
            event.impact * weights.precipitation,
        );
    }

    if sample.wind_speed > STRONG_WIND_MPH {
        push_factor(
            &mut factors,
            FactorCategory::Wind,
            format!("Strong wind ({:.0} mph)", sample.wind_speed),
            STRONG_WIND_IMPACT * weights.wind,
        );
    }

    let date = solar_date(sample.timestamp, conditions.location.longitude);

    let season = season_info(date, profile);
    if let Some(description) = season.description {
        push_factor(&mut factors, FactorCategory::Season, description, season.modifier);
    }

    let moon = moon_info(sample.timestamp, period, profile);
    if let Some(description) = moon.description {
        push_factor(&mut factors, FactorCategory::Moon, description, moon.modifier);
    }

    let day_length = day_length_info(date, conditions.location, profile);
    if let Some(description) = day_length.description {
        push_factor(&mut factors, FactorCategory::DayLength, description, day_length.modifier);
    }

    if let Some(history) = &conditions.history {
        history_factors(&mut factors, profile, sample, history);
    }

    factors
}

/// Compare the hour against the recent-weather baseline
fn history_factors(
    factors: &mut Vec<ScoreFactor>,
    profile: &SpeciesProfile,
    sample: &HourlySample,
    history: &HistoricalContext,
) {
    if history.days == 0 {
        return;
    }
    let weights = profile.weights;

    let departure = sample.temperature - history.mean_temp_f;
    if departure <= COLD_SNAP_DEPARTURE_F {
        push_factor(
            factors,
            FactorCategory::History,
            format!("Cold snap ({:+.0}°F vs last {} days)", departure, history.days),
            COLD_SNAP_IMPACT * weights.temperature,
        );
    } else if departure >= WARM_SPELL_DEPARTURE_F {
        push_factor(
            factors,
            FactorCategory::History,
            format!("Warm spell ({:+.0}°F vs last {} days)", departure, history.days),
            WARM_SPELL_IMPACT * weights.temperature,
        );
    }

    if history.pressure_range_hpa < SETTLED_RANGE_HPA {
        push_factor(
            factors,
            FactorCategory::History,
            format!("Settled pressure over the last {} days", history.days),
            SETTLED_IMPACT * weights.pressure,
        );
    } else if history.pressure_range_hpa > UNSETTLED_RANGE_HPA {
        push_factor(
            factors,
            FactorCategory::History,
            format!(
                "Unsettled pressure ({:.0} hPa swing) over the last {} days",
                history.pressure_range_hpa, history.days
            ),
            UNSETTLED_IMPACT * weights.pressure,
        );
    }
}

/// Up to three windows of good fishing, best peak first.
///
/// Peaks are local maxima at or above the good threshold; a run of equal
/// scores counts once, at its first hour. Each window grows outward while the
/// neighbouring hour is still good. Windows may overlap.
pub fn best_bite_times(scores: &[BiteScore]) -> Vec<BiteWindow> {
    let values: Vec<u8> = scores.iter().map(|s| s.score).collect();
    let n = values.len();

    let mut peaks = Vec::new();
    let mut i = 0;
    while i < n {
        let mut run_end = i;
        while run_end + 1 < n && values[run_end + 1] == values[i] {
            run_end += 1;
        }

        let rises_in = i == 0 || values[i - 1] < values[i];
        let falls_out = run_end + 1 == n || values[run_end + 1] < values[i];
        if values[i] >= GOOD_SCORE_THRESHOLD && rises_in && falls_out {
            peaks.push(i);
        }

        i = run_end + 1;
    }

    peaks.sort_by(|&a, &b| values[b].cmp(&values[a]).then(a.cmp(&b)));
    peaks.truncate(MAX_BITE_WINDOWS);

    peaks
        .into_iter()
        .map(|peak| {
            let mut start = peak;
            while start > 0 && values[start - 1] >= GOOD_SCORE_THRESHOLD {
                start -= 1;
            }
            let mut end = peak;
            while end + 1 < n && values[end + 1] >= GOOD_SCORE_THRESHOLD {
                end += 1;
            }

            BiteWindow {
                start: scores[start].timestamp,
                end: scores[end].timestamp,
                start_hour: start,
                end_hour: end,
                peak_score: values[peak],
                peak_time: scores[peak].timestamp,
                duration_hours: end - start + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::interpolation::interpolate;
    use crate::models::{BiteQuality, ConditionCode, HistoricalDay, RawForecastSample};
    use chrono::{NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn lake() -> Location {
        Location::new(46.5, -94.0)
    }

    fn raw(ts: DateTime<Utc>, temp: f64, pressure: f64, cloud: f64, prob: f64) -> RawForecastSample {
        RawForecastSample {
            temperature: Some(temp),
            pressure: Some(pressure),
            humidity: Some(70.0),
            cloud_percent: Some(cloud),
            wind_speed: Some(8.0),
            wind_direction_degrees: Some(200.0),
            precipitation_probability: Some(prob),
            ..RawForecastSample::empty(ts)
        }
    }

    fn flat_conditions(start: DateTime<Utc>, temp: f64, pressure: f64, cloud: f64) -> BiteConditions {
        let samples: Vec<_> = (0..9)
            .map(|i| raw(start + Duration::hours(3 * i), temp, pressure, cloud, 0.0))
            .collect();
        let hourly = interpolate(&samples, start).unwrap();
        BiteConditions::analyze(lake(), hourly, None).unwrap()
    }

    fn score_at(hour: usize, timestamp: DateTime<Utc>, score: u8) -> BiteScore {
        BiteScore::new("walleye", hour, timestamp, score, Vec::new())
    }

    fn scores_from(values: &[u8]) -> Vec<BiteScore> {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(h, &v)| score_at(h, start + Duration::hours(h as i64), v))
            .collect()
    }

    #[test]
    fn walleye_dawn_with_falling_pressure_is_excellent() {
        // Midsummer keeps season and day-length neutral; pressure drops ~2.7 hPa/3h into dawn
        let start = Utc.with_ymd_and_hms(2026, 6, 21, 3, 0, 0).unwrap();
        let pressures = [1013.0, 1010.33, 1007.67, 1005.0, 1005.0, 1005.0, 1005.0, 1005.0, 1005.0];
        let samples: Vec<_> = pressures
            .iter()
            .enumerate()
            .map(|(i, &p)| raw(start + Duration::hours(3 * i as i64), 40.0, p, 80.0, 0.1))
            .collect();
        let hourly = interpolate(&samples, start).unwrap();
        let conditions = BiteConditions::analyze(lake(), hourly, None).unwrap();

        let engine = ScoringEngine::default();
        // 10:00 UTC, about 25 minutes before sunrise
        let score = engine.evaluate("walleye", 7, &conditions).unwrap();

        assert_eq!(conditions.periods[7], TimePeriod::Dawn);
        assert!(score.score >= 80, "score {} factors {:?}", score.score, score.all_factors);
        assert_eq!(score.quality, BiteQuality::Excellent);
        assert_eq!(score.factors[0].category, FactorCategory::TimeOfDay);
        assert_eq!(score.factors[1].category, FactorCategory::Pressure);
        assert!(score.factors.iter().any(|f| f.category == FactorCategory::CloudCover));
    }

    #[test]
    fn channel_catfish_struggles_in_mid_winter() {
        // Steady pressure and flat temperatures: no warming trend anywhere in the day
        let start = Utc.with_ymd_and_hms(2026, 1, 12, 6, 0, 0).unwrap();
        let engine = ScoringEngine::default();

        for temp in [5.0, 15.0, 20.0, 25.0, 28.0, 32.0, 35.0, 38.0] {
            for cloud in [10.0, 50.0, 85.0] {
                for pressure in [1015.0, 1024.0] {
                    let conditions = flat_conditions(start, temp, pressure, cloud);
                    let scores = engine.daily_scores("channelCatfish", &conditions);
                    assert_eq!(scores.len(), 24);
                    for score in &scores {
                        assert!(
                            score.score < 50,
                            "{}°F {}% cloud {} hPa hour {}: {} {:?}",
                            temp,
                            cloud,
                            pressure,
                            score.hour,
                            score.score,
                            score.all_factors
                        );
                        assert!(score
                            .all_factors
                            .iter()
                            .any(|f| f.category == FactorCategory::Season));
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_species_soft_fails() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let conditions = flat_conditions(start, 20.0, 1013.0, 50.0);
        let engine = ScoringEngine::default();

        let score = engine.score("kraken", 4, &conditions);
        assert_eq!(score.score, 0);
        assert_eq!(score.factors.len(), 1);
        assert_eq!(score.factors[0].category, FactorCategory::Error);
        assert_eq!(score.timestamp, conditions.hourly[4].timestamp);

        assert!(matches!(
            engine.evaluate("kraken", 4, &conditions),
            Err(BiteCastError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn out_of_range_hour_soft_fails() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let conditions = flat_conditions(start, 20.0, 1013.0, 50.0);
        let engine = ScoringEngine::default();

        assert!(matches!(
            engine.evaluate("walleye", 24, &conditions),
            Err(BiteCastError::InvalidHourIndex { hour: 24, len: 24 })
        ));
        let score = engine.score("walleye", 30, &conditions);
        assert!(score.is_error());
        assert_eq!(score.timestamp, start + Duration::hours(30));
    }

    #[test]
    fn analyze_rejects_short_forecasts() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let conditions = flat_conditions(start, 20.0, 1013.0, 50.0);
        let short = conditions.hourly[..12].to_vec();
        assert!(matches!(
            BiteConditions::analyze(lake(), short, None),
            Err(BiteCastError::InvalidData(_))
        ));
    }

    #[test]
    fn empty_history_matches_no_history() {
        let start = Utc.with_ymd_and_hms(2026, 2, 20, 0, 0, 0).unwrap();
        let without = flat_conditions(start, 28.0, 1008.0, 80.0);
        let mut with_empty = without.clone();
        with_empty.history = HistoricalContext::from_days(&[]);

        let engine = ScoringEngine::default();
        for id in engine.catalog().ids() {
            assert_eq!(
                engine.daily_scores(id, &without),
                engine.daily_scores(id, &with_empty)
            );
        }
    }

    #[test]
    fn cold_snap_and_unsettled_history_lower_scores() {
        let start = Utc.with_ymd_and_hms(2026, 2, 20, 0, 0, 0).unwrap();
        let base = flat_conditions(start, 10.0, 1013.0, 50.0);

        let days: Vec<HistoricalDay> = (1..=5)
            .map(|d| HistoricalDay {
                date: NaiveDate::from_ymd_opt(2026, 2, 14 + d).unwrap(),
                high_temp_f: 32.0,
                low_temp_f: 18.0,
                avg_pressure_hpa: if d % 2 == 0 { 1000.0 } else { 1020.0 },
                total_precipitation: 0.0,
                avg_wind_speed_mph: 10.0,
            })
            .collect();
        let mut with_history = base.clone();
        with_history.history = HistoricalContext::from_days(&days);

        let engine = ScoringEngine::default();
        let plain = engine.evaluate("yellowPerch", 12, &base).unwrap();
        let snap = engine.evaluate("yellowPerch", 12, &with_history).unwrap();

        let history: Vec<_> = snap
            .all_factors
            .iter()
            .filter(|f| f.category == FactorCategory::History)
            .collect();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|f| f.impact < 0.0));
        assert!(snap.score < plain.score);
    }

    #[test]
    fn daily_scores_are_deterministic() {
        let start = Utc.with_ymd_and_hms(2026, 12, 28, 12, 0, 0).unwrap();
        let conditions = flat_conditions(start, 18.0, 1021.0, 20.0);
        let engine = ScoringEngine::default();
        assert_eq!(
            engine.daily_scores("burbot", &conditions),
            engine.daily_scores("burbot", &conditions)
        );
    }

    #[test]
    fn windows_take_peaks_in_score_order() {
        let mut values = [40u8; 24];
        values[2] = 62;
        values[3] = 70;
        values[4] = 65;
        values[10] = 85;
        values[11] = 61;
        values[18] = 70;
        values[20] = 75;
        let windows = best_bite_times(&scores_from(&values));

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].peak_score, 85);
        assert_eq!((windows[0].start_hour, windows[0].end_hour), (10, 11));
        assert_eq!(windows[0].duration_hours, 2);
        assert_eq!(windows[1].peak_score, 75);
        // Tie at 70 goes to the earlier hour
        assert_eq!(windows[2].peak_score, 70);
        assert_eq!((windows[2].start_hour, windows[2].end_hour), (2, 4));
        assert_eq!(windows[2].peak_time, windows[2].start + Duration::hours(1));
    }

    #[test]
    fn plateau_counts_once() {
        let mut values = [30u8; 24];
        values[5] = 72;
        values[6] = 72;
        values[7] = 72;
        let windows = best_bite_times(&scores_from(&values));
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start_hour, 5);
        assert_eq!(windows[0].end_hour, 7);
        assert_eq!(windows[0].peak_time, windows[0].start);
    }

    #[test]
    fn edges_can_be_peaks() {
        let mut values = [50u8; 24];
        values[0] = 66;
        values[23] = 64;
        let windows = best_bite_times(&scores_from(&values));
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start_hour, 0);
        assert_eq!(windows[1].end_hour, 23);
    }

    #[test]
    fn no_windows_below_threshold() {
        assert!(best_bite_times(&scores_from(&[59u8; 24])).is_empty());
        assert!(best_bite_times(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn windows_are_good_and_sorted(values in proptest::collection::vec(0u8..=100, 24)) {
            let scores = scores_from(&values);
            let windows = best_bite_times(&scores);

            prop_assert!(windows.len() <= MAX_BITE_WINDOWS);
            for w in &windows {
                prop_assert!(w.peak_score >= GOOD_SCORE_THRESHOLD);
                prop_assert!(w.start_hour <= w.end_hour && w.end_hour < 24);
                prop_assert!(values[w.start_hour..=w.end_hour].iter().all(|&v| v >= GOOD_SCORE_THRESHOLD));
                prop_assert_eq!(w.duration_hours, w.end_hour - w.start_hour + 1);
            }
            for pair in windows.windows(2) {
                prop_assert!(pair[0].peak_score >= pair[1].peak_score);
            }
        }

        #[test]
        fn scores_stay_in_bounds(
            temp in -30.0f64..60.0,
            pressure_swing in -15.0f64..15.0,
            cloud in 0.0f64..100.0,
            wind in 0.0f64..50.0,
            prob in 0.0f64..1.0,
            rain in 0.0f64..30.0,
            day in 0i64..365,
            species in proptest::sample::select(SpeciesCatalog::builtin().ids().collect::<Vec<_>>()),
        ) {
            let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
            let samples: Vec<_> = (0..9)
                .map(|i| RawForecastSample {
                    wind_speed: Some(wind),
                    rain_volume_3h: Some(if i % 2 == 0 { rain } else { 0.0 }),
                    condition_code: ConditionCode::default(),
                    ..raw(
                        start + Duration::hours(3 * i),
                        temp - i as f64 * 2.0,
                        1013.0 + pressure_swing * (i % 3) as f64,
                        cloud,
                        prob,
                    )
                })
                .collect();
            let hourly = interpolate(&samples, start).unwrap();
            let conditions = BiteConditions::analyze(lake(), hourly, None).unwrap();
            let engine = ScoringEngine::default();

            let scores = engine.daily_scores(species, &conditions);
            prop_assert_eq!(scores.len(), 24);
            for score in scores {
                prop_assert!(score.score <= 100);
                prop_assert!(score.factors.len() <= 5);
                prop_assert!(!score.is_error());
            }
        }
    }
}
