use super::astronomy::{solar_date, sun_times};
use crate::models::{
    HourlySample, Location, PressureTrend, StormEvent, StormPhase, SunTimes, TemperatureTrend,
    TimePeriod, TrendResult,
};
use chrono::{DateTime, Duration, Utc};

/// Backward window for pressure trends, in hours
pub const PRESSURE_WINDOW_HOURS: usize = 3;
/// Backward window for temperature trends, in hours
pub const TEMPERATURE_WINDOW_HOURS: usize = 6;

// Pressure thresholds (hPa change over the window)
const FAST_FALL_HPA: f64 = -1.5;
const FALL_HPA: f64 = -0.5;
const RISE_HPA: f64 = 0.5;
const FAST_RISE_HPA: f64 = 1.5;
const LOW_PRESSURE_HPA: f64 = 1010.0;
const HIGH_PRESSURE_HPA: f64 = 1033.0;

// Temperature thresholds (°F)
const EXTREME_COLD_F: f64 = 10.0;
const WARMING_DELTA_F: f64 = 5.0;
const COLD_FRONT_DELTA_F: f64 = -15.0;
const MILD_RANGE_F: std::ops::RangeInclusive<f64> = 15.0..=32.0;

// Storm thresholds
const PRE_STORM_PROBABILITY: f64 = 0.5;
const HEAVY_PRECIP_VOLUME: f64 = 5.0;
const DRY_PROBABILITY: f64 = 0.2;
const DRY_VOLUME: f64 = 0.1;

const DAWN_BEFORE_MIN: i64 = 90;
const DAWN_AFTER_MIN: i64 = 45;
const DUSK_BEFORE_MIN: i64 = 45;
const DUSK_AFTER_MIN: i64 = 90;
const MIDDAY_HALF_WIDTH_MIN: i64 = 120;
const LATE_AFTERNOON_MIN: i64 = 120;

fn lookback(hour: usize, window: usize) -> usize {
    hour.saturating_sub(window)
}

/// Pressure change over the trailing window ending at `hour`
pub fn pressure_delta(hourly: &[HourlySample], hour: usize) -> f64 {
    match (hourly.get(hour), hourly.get(lookback(hour, PRESSURE_WINDOW_HOURS))) {
        (Some(now), Some(then)) => now.pressure - then.pressure,
        _ => 0.0,
    }
}

pub fn pressure_trend(hourly: &[HourlySample], hour: usize) -> TrendResult<PressureTrend> {
    let delta = pressure_delta(hourly, hour);
    let pressure = hourly.get(hour).map(|h| h.pressure).unwrap_or(1013.0);

    let (kind, impact, description) = if delta < FAST_FALL_HPA {
        (
            PressureTrend::FallingFast,
            12.0,
            format!("Pressure falling fast ({:+.1} mb/3h), fish feed ahead of the front", delta),
        )
    } else if delta < FALL_HPA {
        (
            PressureTrend::Falling,
            8.0,
            format!("Pressure falling ({:+.1} mb/3h)", delta),
        )
    } else if delta > FAST_RISE_HPA {
        (
            PressureTrend::RisingFast,
            -10.0,
            format!("Pressure rising fast ({:+.1} mb/3h), post-front slowdown", delta),
        )
    } else if delta > RISE_HPA {
        (
            PressureTrend::Rising,
            -5.0,
            format!("Pressure rising ({:+.1} mb/3h)", delta),
        )
    } else if pressure < LOW_PRESSURE_HPA {
        (
            PressureTrend::StableLow,
            3.0,
            format!("Stable low pressure ({:.0} hPa) is favorable", pressure),
        )
    } else if pressure > HIGH_PRESSURE_HPA {
        (
            PressureTrend::StableHigh,
            -5.0,
            format!("Stable high pressure ({:.0} hPa) slows feeding", pressure),
        )
    } else {
        (
            PressureTrend::Stable,
            0.0,
            format!("Stable pressure ({:.0} hPa)", pressure),
        )
    };

    TrendResult {
        kind,
        impact,
        description,
    }
}

pub fn temperature_trend(hourly: &[HourlySample], hour: usize) -> TrendResult<TemperatureTrend> {
    let temp = hourly.get(hour).map(|h| h.temperature).unwrap_or(50.0);

    if temp < EXTREME_COLD_F {
        return TrendResult {
            kind: TemperatureTrend::ExtremeCold,
            impact: -10.0,
            description: format!("Extreme cold ({:.0}°F) slows metabolism", temp),
        };
    }

    let earlier = hourly
        .get(lookback(hour, TEMPERATURE_WINDOW_HOURS))
        .map(|h| h.temperature)
        .unwrap_or(temp);
    let delta = temp - earlier;

    let (kind, impact, description) = if delta >= WARMING_DELTA_F {
        (
            TemperatureTrend::Warming,
            6.0,
            format!("Warming trend ({:+.0}°F over 6h)", delta),
        )
    } else if delta <= COLD_FRONT_DELTA_F {
        (
            TemperatureTrend::ColdFront,
            -8.0,
            format!("Cold front ({:+.0}°F over 6h)", delta),
        )
    } else if MILD_RANGE_F.contains(&temp) {
        (
            TemperatureTrend::Mild,
            3.0,
            format!("Mild winter temperature ({:.0}°F)", temp),
        )
    } else {
        (
            TemperatureTrend::Neutral,
            0.0,
            format!("Steady temperature ({:.0}°F)", temp),
        )
    };

    TrendResult {
        kind,
        impact,
        description,
    }
}

/// Forward scan tagging pre-storm, active and post-storm hours.
///
/// Post-storm lockjaw is tagged on the transition hour only.
pub fn detect_storm_events(hourly: &[HourlySample]) -> Vec<StormEvent> {
    let mut events = Vec::new();
    let mut precipitation_seen = false;

    for (hour, sample) in hourly.iter().enumerate() {
        let volume = sample.precipitation_volume();
        let delta = pressure_delta(hourly, hour);

        if volume > 0.0 {
            precipitation_seen = true;
        }

        if !precipitation_seen
            && sample.precipitation_probability > PRE_STORM_PROBABILITY
            && delta < FALL_HPA
        {
            events.push(StormEvent {
                hour,
                phase: StormPhase::PreStorm,
                impact: 8.0,
                description: format!(
                    "Storm approaching ({:.0}% chance, pressure dropping), pre-storm feeding",
                    sample.precipitation_probability * 100.0
                ),
            });
        }

        if volume > HEAVY_PRECIP_VOLUME {
            events.push(StormEvent {
                hour,
                phase: StormPhase::Active,
                impact: -8.0,
                description: format!("Heavy precipitation ({:.1}/h)", volume),
            });
        } else if volume > 0.0 {
            events.push(StormEvent {
                hour,
                phase: StormPhase::Active,
                impact: 3.0,
                description: "Light precipitation lowers light levels".to_string(),
            });
        }

        if hour > 0 {
            let prev = &hourly[hour - 1];
            let was_wet = prev.precipitation_probability >= PRE_STORM_PROBABILITY
                || prev.precipitation_volume() > 0.0;
            let is_dry =
                sample.precipitation_probability < DRY_PROBABILITY && volume < DRY_VOLUME;

            if was_wet && is_dry && delta > RISE_HPA {
                events.push(StormEvent {
                    hour,
                    phase: StormPhase::PostStorm,
                    impact: -12.0,
                    description: "Post-front clearing with rising pressure, expect lockjaw"
                        .to_string(),
                });
            }
        }
    }

    events
}

/// Strongest event tagged on `hour`, by absolute impact
pub fn strongest_event(events: &[StormEvent], hour: usize) -> Option<&StormEvent> {
    events
        .iter()
        .filter(|e| e.hour == hour)
        .fold(None, |best: Option<&StormEvent>, e| match best {
            Some(b) if b.impact.abs() >= e.impact.abs() => Some(b),
            _ => Some(e),
        })
}

/// Sun times for the local solar date that contains `time`
pub fn sun_times_at(time: DateTime<Utc>, location: Location) -> SunTimes {
    sun_times(solar_date(time, location.longitude), location)
}

/// Classify an instant against the sun times of its solar date
pub fn classify_period(time: DateTime<Utc>, sun: &SunTimes) -> TimePeriod {
    let dawn_start = sun.sunrise - Duration::minutes(DAWN_BEFORE_MIN);
    let dawn_end = sun.sunrise + Duration::minutes(DAWN_AFTER_MIN);
    let dusk_start = sun.sunset - Duration::minutes(DUSK_BEFORE_MIN);
    let dusk_end = sun.sunset + Duration::minutes(DUSK_AFTER_MIN);

    if time < dawn_start {
        return TimePeriod::LateNight;
    }
    if time < dawn_end {
        return TimePeriod::Dawn;
    }
    if time >= dusk_end {
        return TimePeriod::EarlyNight;
    }
    if time >= dusk_start {
        return TimePeriod::Dusk;
    }

    let midday_start = sun.solar_noon - Duration::minutes(MIDDAY_HALF_WIDTH_MIN);
    let midday_end = sun.solar_noon + Duration::minutes(MIDDAY_HALF_WIDTH_MIN);
    let late_afternoon_start = dusk_start - Duration::minutes(LATE_AFTERNOON_MIN);

    if time < midday_start {
        TimePeriod::Morning
    } else if time < midday_end {
        TimePeriod::Midday
    } else if time < late_afternoon_start {
        TimePeriod::Afternoon
    } else {
        TimePeriod::LateAfternoon
    }
}
