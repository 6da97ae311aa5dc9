//! Expansion of 3-hour forecast samples into a dense hourly series.

use crate::error::{BiteCastError, Result};
use crate::models::{
    HourlySample, RawForecastSample, DEFAULT_HUMIDITY_PERCENT, DEFAULT_PRESSURE_HPA,
    DEFAULT_TEMP_F,
};
use chrono::{DateTime, Duration, Utc};

/// Hours produced for every forecast
pub const FORECAST_HOURS: usize = 24;

/// Fewest raw samples that still bracket an interval
pub const MIN_RAW_SAMPLES: usize = 2;

/// How far before `start` a sample may lie and still bracket the first hour
const BRACKET_LOOKBACK_HOURS: i64 = 3;

/// Produce exactly [`FORECAST_HOURS`] hourly samples starting at `start`.
///
/// Samples are sorted and de-duplicated by timestamp first. Hours before the
/// first sample hold its values; hours after the last sample hold the last
/// sample's values. Fails unless at least one sample lies inside the 24-hour
/// window and two samples cover it, counting one sample up to three hours
/// before `start`.
pub fn interpolate(samples: &[RawForecastSample], start: DateTime<Utc>) -> Result<Vec<HourlySample>> {
    let mut ordered: Vec<&RawForecastSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);
    ordered.dedup_by_key(|s| s.timestamp);

    let usable = usable_samples(&ordered, start);
    if usable < MIN_RAW_SAMPLES {
        return Err(BiteCastError::InsufficientForecastData {
            required: MIN_RAW_SAMPLES,
            available: usable,
        });
    }

    let first = ordered[0];
    let last = ordered[ordered.len() - 1];

    let hourly = (0..FORECAST_HOURS)
        .map(|h| {
            let t = start + Duration::hours(h as i64);

            if t < first.timestamp {
                return hold(first, segment_hours(ordered[0], ordered[1]), t);
            }
            if t >= last.timestamp {
                let prev = ordered[ordered.len() - 2];
                return hold(last, segment_hours(prev, last), t);
            }

            // `t` lies in [first, last), so some segment brackets it
            let idx = ordered
                .windows(2)
                .position(|w| w[0].timestamp <= t && t < w[1].timestamp)
                .unwrap_or(0);
            blend(ordered[idx], ordered[idx + 1], t)
        })
        .collect();

    Ok(hourly)
}

/// Samples that describe the window: those inside it, plus one bracketing
/// sample just before `start`. Zero when nothing falls inside the window.
fn usable_samples(ordered: &[&RawForecastSample], start: DateTime<Utc>) -> usize {
    let end = start + Duration::hours(FORECAST_HOURS as i64 - 1);
    let inside = ordered
        .iter()
        .filter(|s| s.timestamp >= start && s.timestamp <= end)
        .count();
    if inside == 0 {
        return 0;
    }

    let lookback = start - Duration::hours(BRACKET_LOOKBACK_HOURS);
    let bracketing = ordered
        .iter()
        .any(|s| s.timestamp < start && s.timestamp >= lookback);
    inside + usize::from(bracketing)
}

fn segment_hours(a: &RawForecastSample, b: &RawForecastSample) -> f64 {
    let hours = (b.timestamp - a.timestamp).num_seconds() as f64 / 3600.0;
    if hours > 0.0 {
        hours
    } else {
        3.0
    }
}

fn lerp(a: f64, b: f64, frac: f64) -> f64 {
    a + (b - a) * frac
}

/// Interpolate along the shorter arc, result in [0, 360)
pub fn lerp_degrees(a: f64, b: f64, frac: f64) -> f64 {
    let mut delta = (b - a).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    let value = (a + delta * frac).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if value >= 360.0 {
        0.0
    } else {
        value
    }
}

/// One hourly share of a volume accumulated over `span_hours`
fn volume_share(volume: Option<f64>, span_hours: f64) -> f64 {
    match volume {
        Some(v) if v > 0.0 => v / span_hours,
        _ => 0.0,
    }
}

fn blend(a: &RawForecastSample, b: &RawForecastSample, t: DateTime<Utc>) -> HourlySample {
    let span = segment_hours(a, b);
    let frac = (t - a.timestamp).num_seconds() as f64 / 3600.0 / span;

    let condition_code = if frac < 0.5 {
        a.condition_code.clone()
    } else {
        b.condition_code.clone()
    };

    HourlySample {
        timestamp: t,
        temperature: lerp(temperature(a), temperature(b), frac),
        pressure: lerp(pressure(a), pressure(b), frac),
        humidity: lerp(humidity(a), humidity(b), frac),
        cloud_percent: lerp(cloud(a), cloud(b), frac),
        wind_speed: lerp(wind_speed(a), wind_speed(b), frac),
        wind_direction_degrees: lerp_degrees(wind_direction(a), wind_direction(b), frac),
        precipitation_probability: lerp(precip_prob(a), precip_prob(b), frac),
        rain_volume: volume_share(a.rain_volume_3h, span),
        snow_volume: volume_share(a.snow_volume_3h, span),
        condition_code,
    }
}

fn hold(sample: &RawForecastSample, span: f64, t: DateTime<Utc>) -> HourlySample {
    HourlySample {
        timestamp: t,
        temperature: temperature(sample),
        pressure: pressure(sample),
        humidity: humidity(sample),
        cloud_percent: cloud(sample),
        wind_speed: wind_speed(sample),
        wind_direction_degrees: wind_direction(sample).rem_euclid(360.0),
        precipitation_probability: precip_prob(sample),
        rain_volume: volume_share(sample.rain_volume_3h, span),
        snow_volume: volume_share(sample.snow_volume_3h, span),
        condition_code: sample.condition_code.clone(),
    }
}

// Field accessors with documented fallbacks for missing values

fn temperature(s: &RawForecastSample) -> f64 {
    s.temperature.unwrap_or(DEFAULT_TEMP_F)
}

fn pressure(s: &RawForecastSample) -> f64 {
    s.pressure.unwrap_or(DEFAULT_PRESSURE_HPA)
}

fn humidity(s: &RawForecastSample) -> f64 {
    s.humidity.unwrap_or(DEFAULT_HUMIDITY_PERCENT)
}

fn cloud(s: &RawForecastSample) -> f64 {
    s.cloud_percent.unwrap_or(0.0)
}

fn wind_speed(s: &RawForecastSample) -> f64 {
    s.wind_speed.unwrap_or(0.0)
}

fn wind_direction(s: &RawForecastSample) -> f64 {
    s.wind_direction_degrees.unwrap_or(0.0)
}

fn precip_prob(s: &RawForecastSample) -> f64 {
    s.precipitation_probability.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConditionCode, WeatherCondition};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap()
    }

    fn sample(hours: i64, temp: f64, pressure: f64) -> RawForecastSample {
        RawForecastSample {
            temperature: Some(temp),
            pressure: Some(pressure),
            humidity: Some(70.0),
            cloud_percent: Some(40.0),
            wind_speed: Some(8.0),
            wind_direction_degrees: Some(180.0),
            precipitation_probability: Some(0.1),
            rain_volume_3h: None,
            snow_volume_3h: None,
            ..RawForecastSample::empty(start() + Duration::hours(hours))
        }
    }

    fn eight_samples() -> Vec<RawForecastSample> {
        (0..8)
            .map(|i| sample(i * 3, 20.0 + i as f64 * 3.0, 1015.0 - i as f64))
            .collect()
    }

    #[test]
    fn fewer_than_two_samples_fails() {
        let err = interpolate(&[sample(0, 20.0, 1015.0)], start()).unwrap_err();
        assert!(matches!(
            err,
            BiteCastError::InsufficientForecastData {
                required: 2,
                available: 1
            }
        ));
        assert!(interpolate(&[], start()).is_err());
    }

    #[test]
    fn samples_entirely_before_start_are_rejected() {
        let samples = vec![sample(-240, 7.0, 1015.0), sample(-237, 7.0, 1014.0)];
        let err = interpolate(&samples, start()).unwrap_err();
        assert!(matches!(
            err,
            BiteCastError::InsufficientForecastData {
                required: 2,
                available: 0
            }
        ));
    }

    #[test]
    fn samples_entirely_after_window_are_rejected() {
        let samples = vec![sample(30, 20.0, 1015.0), sample(33, 20.0, 1014.0)];
        assert!(interpolate(&samples, start()).is_err());
    }

    #[test]
    fn recent_sample_before_start_brackets_the_window() {
        let samples = vec![sample(-2, 18.0, 1016.0), sample(1, 21.0, 1013.0)];
        let hourly = interpolate(&samples, start()).unwrap();
        assert!((hourly[0].temperature - 20.0).abs() < 1e-9);

        // Too old to bracket, leaving only one sample in the window
        let stale = vec![sample(-6, 18.0, 1016.0), sample(1, 21.0, 1013.0)];
        assert!(matches!(
            interpolate(&stale, start()).unwrap_err(),
            BiteCastError::InsufficientForecastData { available: 1, .. }
        ));
    }

    #[test]
    fn duplicate_timestamps_do_not_count_twice() {
        let samples = vec![sample(0, 20.0, 1015.0), sample(0, 22.0, 1012.0)];
        assert!(interpolate(&samples, start()).is_err());
    }

    #[test]
    fn produces_24_increasing_hours() {
        let hourly = interpolate(&eight_samples(), start()).unwrap();
        assert_eq!(hourly.len(), FORECAST_HOURS);
        for pair in hourly.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
        assert_eq!(hourly[0].timestamp, start());
    }

    #[test]
    fn linear_fields_are_endpoint_exact() {
        let samples = eight_samples();
        let hourly = interpolate(&samples, start()).unwrap();
        for (i, raw) in samples.iter().enumerate() {
            let h = &hourly[i * 3];
            assert_eq!(h.temperature, raw.temperature.unwrap());
            assert_eq!(h.pressure, raw.pressure.unwrap());
        }
        // Midpoints step evenly
        assert!((hourly[1].temperature - 21.0).abs() < 1e-9);
        assert!((hourly[2].temperature - 22.0).abs() < 1e-9);
        assert!((hourly[4].pressure - (1014.0 - 1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn wind_direction_takes_short_arc_through_north() {
        let mut a = sample(0, 20.0, 1015.0);
        let mut b = sample(3, 20.0, 1015.0);
        a.wind_direction_degrees = Some(350.0);
        b.wind_direction_degrees = Some(10.0);

        let hourly = interpolate(&[a, b], start()).unwrap();
        let dirs: Vec<f64> = hourly[..4].iter().map(|h| h.wind_direction_degrees).collect();

        assert!((dirs[0] - 350.0).abs() < 1e-9);
        assert!((dirs[1] - (350.0 + 20.0 / 3.0)).abs() < 1e-9);
        assert!((dirs[2] - 10.0 / 3.0).abs() < 1e-9);
        assert!((dirs[3] - 10.0).abs() < 1e-9);
        for d in dirs {
            assert!((0.0..360.0).contains(&d));
            // never swings through the south
            assert!(!(90.0..270.0).contains(&d));
        }
    }

    #[test]
    fn lerp_degrees_handles_reverse_wrap() {
        let mid = lerp_degrees(10.0, 350.0, 0.5);
        assert!(mid.abs() < 1e-9 || (mid - 360.0).abs() < 1e-9);
        assert!((lerp_degrees(90.0, 270.0, 0.5) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn condition_code_switches_at_half_span() {
        let mut a = sample(0, 20.0, 1015.0);
        let mut b = sample(3, 20.0, 1015.0);
        a.condition_code = ConditionCode::new(WeatherCondition::Clear, "01n");
        b.condition_code = ConditionCode::new(WeatherCondition::Snow, "13n");

        let hourly = interpolate(&[a, b], start()).unwrap();
        assert_eq!(hourly[0].condition_code.condition, WeatherCondition::Clear);
        assert_eq!(hourly[1].condition_code.condition, WeatherCondition::Clear);
        assert_eq!(hourly[2].condition_code.condition, WeatherCondition::Snow);
        assert_eq!(hourly[3].condition_code.icon, "13n");
    }

    #[test]
    fn volume_splits_into_equal_hourly_shares() {
        let mut samples = eight_samples();
        samples[1].snow_volume_3h = Some(2.4);
        samples[2].rain_volume_3h = Some(0.0);

        let hourly = interpolate(&samples, start()).unwrap();
        let snow: f64 = hourly[3..6].iter().map(|h| h.snow_volume).sum();
        assert!((snow - 2.4).abs() < 1e-9);
        assert!((hourly[3].snow_volume - 0.8).abs() < 1e-9);
        assert!(hourly[6..9].iter().all(|h| h.rain_volume == 0.0));
        assert!(hourly[0..3].iter().all(|h| h.snow_volume == 0.0));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let a = RawForecastSample::empty(start());
        let b = RawForecastSample::empty(start() + Duration::hours(3));
        let hourly = interpolate(&[a, b], start()).unwrap();
        assert_eq!(hourly[1].pressure, DEFAULT_PRESSURE_HPA);
        assert_eq!(hourly[1].temperature, DEFAULT_TEMP_F);
        assert_eq!(hourly[1].humidity, DEFAULT_HUMIDITY_PERCENT);
        assert_eq!(hourly[1].precipitation_probability, 0.0);
    }

    #[test]
    fn pads_with_last_sample_when_short() {
        let samples = vec![sample(0, 20.0, 1015.0), sample(3, 26.0, 1012.0)];
        let hourly = interpolate(&samples, start()).unwrap();
        assert_eq!(hourly.len(), FORECAST_HOURS);
        assert!(hourly[3..].iter().all(|h| h.temperature == 26.0));
        assert_eq!(hourly[23].timestamp, start() + Duration::hours(23));
    }

    #[test]
    fn hours_before_first_sample_hold_first_values() {
        let samples: Vec<_> = (0..8).map(|i| sample(2 + i * 3, 30.0, 1010.0)).collect();
        let hourly = interpolate(&samples, start()).unwrap();
        assert_eq!(hourly[0].temperature, 30.0);
        assert_eq!(hourly[1].pressure, 1010.0);
    }

    #[test]
    fn unordered_input_is_sorted() {
        let mut samples = eight_samples();
        samples.reverse();
        let hourly = interpolate(&samples, start()).unwrap();
        assert_eq!(hourly[0].temperature, 20.0);
        assert_eq!(hourly[3].temperature, 23.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_always_24_strictly_increasing(
            count in 8usize..40,
            offset in 0i64..6,
            temps in proptest::collection::vec(-30.0f64..60.0, 40),
        ) {
            let samples: Vec<_> = (0..count)
                .map(|i| sample(i as i64 * 3, temps[i], 1013.0))
                .collect();
            let hourly = interpolate(&samples, start() + Duration::hours(offset)).unwrap();
            prop_assert_eq!(hourly.len(), FORECAST_HOURS);
            for pair in hourly.windows(2) {
                prop_assert!(pair[0].timestamp < pair[1].timestamp);
            }
        }

        #[test]
        fn prop_wind_direction_in_range(a in 0.0f64..360.0, b in 0.0f64..360.0, frac in 0.0f64..=1.0) {
            let d = lerp_degrees(a, b, frac);
            prop_assert!((0.0..360.0).contains(&d));
        }

        #[test]
        fn prop_volume_shares_sum_to_total(volume in 0.0f64..50.0) {
            let mut samples = eight_samples();
            samples[0].rain_volume_3h = Some(volume);
            let hourly = interpolate(&samples, start()).unwrap();
            let total: f64 = hourly[0..3].iter().map(|h| h.rain_volume).sum();
            prop_assert!((total - volume).abs() < 1e-9);
        }
    }
}
