use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sunrise, solar noon and sunset for one date at one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub solar_noon: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SunTimes {
    pub fn day_length_minutes(&self) -> f64 {
        (self.sunset - self.sunrise).num_seconds() as f64 / 60.0
    }
}

/// Position of an instant within the solar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    Dawn,
    Morning,
    Midday,
    Afternoon,
    LateAfternoon,
    Dusk,
    EarlyNight,
    LateNight,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Dawn => "Dawn",
            TimePeriod::Morning => "Morning",
            TimePeriod::Midday => "Midday",
            TimePeriod::Afternoon => "Afternoon",
            TimePeriod::LateAfternoon => "Late Afternoon",
            TimePeriod::Dusk => "Dusk",
            TimePeriod::EarlyNight => "Early Night",
            TimePeriod::LateNight => "Late Night",
        }
    }

    pub fn is_night(&self) -> bool {
        matches!(self, TimePeriod::EarlyNight | TimePeriod::LateNight)
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureTrend {
    FallingFast,
    Falling,
    StableLow,
    Stable,
    StableHigh,
    Rising,
    RisingFast,
}

impl PressureTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            PressureTrend::FallingFast => "falling_fast",
            PressureTrend::Falling => "falling",
            PressureTrend::StableLow => "stable_low",
            PressureTrend::Stable => "stable",
            PressureTrend::StableHigh => "stable_high",
            PressureTrend::Rising => "rising",
            PressureTrend::RisingFast => "rising_fast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureTrend {
    ExtremeCold,
    Warming,
    ColdFront,
    Mild,
    Neutral,
}

impl TemperatureTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureTrend::ExtremeCold => "extreme_cold",
            TemperatureTrend::Warming => "warming",
            TemperatureTrend::ColdFront => "cold_front",
            TemperatureTrend::Mild => "mild",
            TemperatureTrend::Neutral => "neutral",
        }
    }
}

/// Classified short-window trend with its signed impact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult<K> {
    pub kind: K,
    pub impact: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StormPhase {
    PreStorm,
    Active,
    PostStorm,
}

impl StormPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            StormPhase::PreStorm => "Pre-storm",
            StormPhase::Active => "Active storm",
            StormPhase::PostStorm => "Post-storm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StormEvent {
    pub hour: usize,
    pub phase: StormPhase,
    pub impact: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStage {
    EarlyIce,
    MidWinter,
    LateIce,
    OffSeason,
}

impl SeasonStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonStage::EarlyIce => "Early Ice",
            SeasonStage::MidWinter => "Mid-Winter",
            SeasonStage::LateIce => "Late Ice",
            SeasonStage::OffSeason => "Off Season",
        }
    }
}

impl std::fmt::Display for SeasonStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub stage: SeasonStage,
    pub modifier: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    Neutral,
}

impl MoonPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::Neutral => "Crescent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonInfo {
    pub phase: MoonPhase,
    /// Position in the synodic cycle: 0 new, 0.5 full
    pub phase_fraction: f64,
    /// Lit fraction of the disc, 0..=1
    pub illumination: f64,
    pub modifier: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayLengthTrend {
    Lengthening,
    Shortening,
    Stable,
    ShortDays,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLengthInfo {
    pub trend: DayLengthTrend,
    pub day_length_minutes: f64,
    pub change_minutes: f64,
    pub modifier: f64,
    pub description: Option<String>,
}
