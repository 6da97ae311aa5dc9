use super::astronomy::{moon_illumination, moon_phase_fraction, sun_times};
use crate::models::{
    DayLengthInfo, DayLengthTrend, Location, MoonInfo, MoonPhase, SeasonInfo, SeasonStage,
    SpeciesProfile, TimePeriod,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Day-over-day daylight change treated as a trend, in minutes
const DAY_LENGTH_TREND_MIN: f64 = 1.0;
/// Days shorter than this count as short even without a trend
const SHORT_DAY_MINUTES: f64 = 540.0;

const LENGTHENING_MODIFIER: f64 = 3.0;
const SHORTENING_MODIFIER: f64 = -3.0;
const SHORT_DAY_MODIFIER: f64 = -2.0;

/// Ice-season stage for a calendar date
pub fn season_stage(date: NaiveDate) -> SeasonStage {
    match (date.month(), date.day()) {
        (11, d) if d >= 20 => SeasonStage::EarlyIce,
        (12, _) => SeasonStage::EarlyIce,
        (1, _) => SeasonStage::MidWinter,
        (2, d) if d <= 10 => SeasonStage::MidWinter,
        (2, _) | (3, _) => SeasonStage::LateIce,
        _ => SeasonStage::OffSeason,
    }
}

pub fn season_info(date: NaiveDate, profile: &SpeciesProfile) -> SeasonInfo {
    let stage = season_stage(date);
    let modifier = profile.seasonal.for_stage(stage);

    let description = match stage {
        SeasonStage::OffSeason => None,
        _ if modifier > 0.0 => Some(format!("{} is a strong period for {}", stage, profile.name)),
        _ if modifier < 0.0 => Some(format!("{} slows {} activity", stage, profile.name)),
        _ => Some(format!("{} has little effect on {}", stage, profile.name)),
    };

    SeasonInfo {
        stage,
        modifier,
        description,
    }
}

/// Bucket a phase fraction (0 new, 0.5 full)
pub fn moon_phase(phase_fraction: f64) -> MoonPhase {
    let p = phase_fraction.rem_euclid(1.0);
    if !(0.05..0.95).contains(&p) {
        MoonPhase::New
    } else if (0.20..0.30).contains(&p) {
        MoonPhase::FirstQuarter
    } else if (0.30..0.45).contains(&p) {
        MoonPhase::WaxingGibbous
    } else if (0.45..0.55).contains(&p) {
        MoonPhase::Full
    } else if (0.55..0.70).contains(&p) {
        MoonPhase::WaningGibbous
    } else if (0.70..0.80).contains(&p) {
        MoonPhase::LastQuarter
    } else {
        MoonPhase::Neutral
    }
}

pub fn moon_base_modifier(phase: MoonPhase) -> f64 {
    match phase {
        MoonPhase::Full => 8.0,
        MoonPhase::WaxingGibbous | MoonPhase::WaningGibbous => 5.0,
        MoonPhase::FirstQuarter | MoonPhase::LastQuarter => 3.0,
        MoonPhase::New => 3.0,
        MoonPhase::Neutral => 0.0,
    }
}

/// Moon annotation. The modifier is zero unless the species feeds at night
/// and `period` is a night period.
pub fn moon_info(time: DateTime<Utc>, period: TimePeriod, profile: &SpeciesProfile) -> MoonInfo {
    let phase_fraction = moon_phase_fraction(time);
    let phase = moon_phase(phase_fraction);
    let illumination = moon_illumination(phase_fraction);

    let applies = profile.night_feeder && period.is_night();
    let modifier = if applies {
        moon_base_modifier(phase) * profile.moon_sensitivity
    } else {
        0.0
    };

    let description = (modifier != 0.0).then(|| {
        format!(
            "{} ({:.0}% lit) boosts night feeding",
            phase.as_str(),
            illumination * 100.0
        )
    });

    MoonInfo {
        phase,
        phase_fraction,
        illumination,
        modifier,
        description,
    }
}

/// Daylight trend at the lake, comparing `date` with the day before
pub fn day_length_info(date: NaiveDate, location: Location, profile: &SpeciesProfile) -> DayLengthInfo {
    let today = sun_times(date, location).day_length_minutes();
    let yesterday = sun_times(date - Duration::days(1), location).day_length_minutes();
    let change = today - yesterday;

    let (trend, base, description) = if change > DAY_LENGTH_TREND_MIN {
        (
            DayLengthTrend::Lengthening,
            LENGTHENING_MODIFIER,
            Some(format!("Days lengthening ({:+.1} min/day)", change)),
        )
    } else if change < -DAY_LENGTH_TREND_MIN {
        (
            DayLengthTrend::Shortening,
            SHORTENING_MODIFIER,
            Some(format!("Days shortening ({:+.1} min/day)", change)),
        )
    } else if today < SHORT_DAY_MINUTES {
        (
            DayLengthTrend::ShortDays,
            SHORT_DAY_MODIFIER,
            Some(format!("Short days ({:.0} min of daylight)", today)),
        )
    } else {
        (DayLengthTrend::Stable, 0.0, None)
    };

    DayLengthInfo {
        trend,
        day_length_minutes: today,
        change_minutes: change,
        modifier: base * profile.day_length_sensitivity,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::species::SpeciesCatalog;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn season_stage_boundaries() {
        assert_eq!(season_stage(date(2026, 11, 19)), SeasonStage::OffSeason);
        assert_eq!(season_stage(date(2026, 11, 20)), SeasonStage::EarlyIce);
        assert_eq!(season_stage(date(2026, 12, 31)), SeasonStage::EarlyIce);
        assert_eq!(season_stage(date(2027, 1, 1)), SeasonStage::MidWinter);
        assert_eq!(season_stage(date(2027, 2, 10)), SeasonStage::MidWinter);
        assert_eq!(season_stage(date(2027, 2, 11)), SeasonStage::LateIce);
        assert_eq!(season_stage(date(2028, 2, 29)), SeasonStage::LateIce);
        assert_eq!(season_stage(date(2027, 3, 31)), SeasonStage::LateIce);
        assert_eq!(season_stage(date(2027, 4, 1)), SeasonStage::OffSeason);
        assert_eq!(season_stage(date(2027, 7, 4)), SeasonStage::OffSeason);
    }

    #[test]
    fn off_season_contributes_nothing() {
        let catalog = SpeciesCatalog::builtin();
        let walleye = catalog.get("walleye").unwrap();
        let info = season_info(date(2026, 7, 1), walleye);
        assert_eq!(info.modifier, 0.0);
        assert!(info.description.is_none());
    }

    #[test]
    fn moon_phase_buckets() {
        assert_eq!(moon_phase(0.0), MoonPhase::New);
        assert_eq!(moon_phase(0.97), MoonPhase::New);
        assert_eq!(moon_phase(0.1), MoonPhase::Neutral);
        assert_eq!(moon_phase(0.25), MoonPhase::FirstQuarter);
        assert_eq!(moon_phase(0.4), MoonPhase::WaxingGibbous);
        assert_eq!(moon_phase(0.5), MoonPhase::Full);
        assert_eq!(moon_phase(0.6), MoonPhase::WaningGibbous);
        assert_eq!(moon_phase(0.75), MoonPhase::LastQuarter);
        assert_eq!(moon_phase(0.85), MoonPhase::Neutral);
    }

    #[test]
    fn moon_only_applies_to_night_feeders_at_night() {
        let catalog = SpeciesCatalog::builtin();
        let burbot = catalog.get("burbot").unwrap();
        let bluegill = catalog.get("bluegill").unwrap();
        // Full moon 2024-01-25
        let full = Utc.with_ymd_and_hms(2024, 1, 26, 4, 0, 0).unwrap();

        let night = moon_info(full, TimePeriod::EarlyNight, burbot);
        assert_eq!(night.phase, MoonPhase::Full);
        assert!((night.modifier - 8.0 * burbot.moon_sensitivity).abs() < 1e-9);
        assert!(night.description.is_some());

        let day = moon_info(full, TimePeriod::Midday, burbot);
        assert_eq!(day.modifier, 0.0);

        assert!(!bluegill.night_feeder);
        assert_eq!(moon_info(full, TimePeriod::LateNight, bluegill).modifier, 0.0);
    }

    #[test]
    fn day_length_trends_follow_the_calendar() {
        let catalog = SpeciesCatalog::builtin();
        let perch = catalog.get("yellowPerch").unwrap();
        let lake = Location::new(46.5, -94.0);

        let february = day_length_info(date(2026, 2, 20), lake, perch);
        assert_eq!(february.trend, DayLengthTrend::Lengthening);
        assert!(february.modifier > 0.0);

        let november = day_length_info(date(2026, 11, 25), lake, perch);
        assert_eq!(november.trend, DayLengthTrend::Shortening);
        assert!(november.modifier < 0.0);

        let solstice = day_length_info(date(2026, 12, 21), lake, perch);
        assert_eq!(solstice.trend, DayLengthTrend::ShortDays);
        assert!((solstice.modifier - SHORT_DAY_MODIFIER * perch.day_length_sensitivity).abs() < 1e-9);

        let summer = day_length_info(date(2026, 6, 21), lake, perch);
        assert_eq!(summer.trend, DayLengthTrend::Stable);
        assert_eq!(summer.modifier, 0.0);
    }

    #[test]
    fn day_length_uses_the_lake_location() {
        let catalog = SpeciesCatalog::builtin();
        let perch = catalog.get("yellowPerch").unwrap();
        let north = day_length_info(date(2026, 12, 1), Location::new(60.0, -150.0), perch);
        let south = day_length_info(date(2026, 12, 1), Location::new(35.0, -85.0), perch);
        assert!(north.day_length_minutes < south.day_length_minutes - 120.0);
    }
}
