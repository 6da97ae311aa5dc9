//! Closed-form solar and lunar calculations.
//!
//! Sun times follow the Julian-day sunrise equation (mean anomaly, equation
//! of centre, ecliptic longitude, declination, hour angle). Moon phase uses
//! the mean synodic month from a reference new moon, which is accurate to
//! well under a day and entirely deterministic.

use crate::models::{Location, SunTimes};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::f64::consts::PI;

const J2000: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;
const EARTH_OBLIQUITY_DEG: f64 = 23.4397;
/// Apparent sunrise altitude: refraction plus solar disc radius
const SUNRISE_ALTITUDE_DEG: f64 = -0.833;

/// New moon of 2000-01-06 18:14 UTC
const REFERENCE_NEW_MOON_JD: f64 = 2_451_550.26;
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

fn to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

fn to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

pub fn julian_day(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0 / SECONDS_PER_DAY + UNIX_EPOCH_JD
}

pub fn from_julian_day(jd: f64) -> DateTime<Utc> {
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Calendar date in local mean solar time (UTC shifted by longitude)
pub fn solar_date(time: DateTime<Utc>, longitude: f64) -> NaiveDate {
    let offset = Duration::seconds((longitude / 15.0 * 3600.0).round() as i64);
    (time + offset).date_naive()
}

/// Sunrise, solar noon and sunset for a calendar date.
///
/// Inside the polar circles the hour angle is clamped, so a polar day reports
/// 24 hours of daylight centred on solar noon and a polar night reports none.
pub fn sun_times(date: NaiveDate, location: Location) -> SunTimes {
    let days_since_epoch = date
        .signed_duration_since(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default())
        .num_days() as f64;

    // Mean solar time at the location, in days since J2000
    let mean_solar = days_since_epoch - location.longitude / 360.0;

    let mean_anomaly = (357.5291 + 0.985_600_28 * mean_solar).rem_euclid(360.0);
    let m = to_rad(mean_anomaly);
    let center = 1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin();
    let ecliptic_longitude = (mean_anomaly + center + 180.0 + 102.9372).rem_euclid(360.0);
    let lambda = to_rad(ecliptic_longitude);

    let transit = J2000 + mean_solar + 0.0053 * m.sin() - 0.0069 * (2.0 * lambda).sin();

    let declination = (lambda.sin() * to_rad(EARTH_OBLIQUITY_DEG).sin()).asin();
    let latitude = to_rad(location.latitude);
    let cos_hour_angle = (to_rad(SUNRISE_ALTITUDE_DEG).sin() - latitude.sin() * declination.sin())
        / (latitude.cos() * declination.cos());
    let hour_angle = to_deg(cos_hour_angle.clamp(-1.0, 1.0).acos());

    SunTimes {
        sunrise: from_julian_day(transit - hour_angle / 360.0),
        solar_noon: from_julian_day(transit),
        sunset: from_julian_day(transit + hour_angle / 360.0),
    }
}

/// Position in the synodic cycle at `time`: 0 new, 0.25 first quarter, 0.5 full
pub fn moon_phase_fraction(time: DateTime<Utc>) -> f64 {
    ((julian_day(time) - REFERENCE_NEW_MOON_JD) / SYNODIC_MONTH_DAYS).rem_euclid(1.0)
}

/// Lit fraction of the lunar disc for a phase fraction
pub fn moon_illumination(phase_fraction: f64) -> f64 {
    (1.0 - (2.0 * PI * phase_fraction).cos()) / 2.0
}
