use super::annotations::{SeasonStage, TimePeriod};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeciesGroup {
    Walleye,
    Pike,
    Panfish,
    Bass,
    Catfish,
    Trout,
    Whitefish,
    Other,
}

impl SpeciesGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesGroup::Walleye => "Walleye & Sauger",
            SpeciesGroup::Pike => "Pike & Muskie",
            SpeciesGroup::Panfish => "Panfish",
            SpeciesGroup::Bass => "Bass",
            SpeciesGroup::Catfish => "Catfish",
            SpeciesGroup::Trout => "Trout & Char",
            SpeciesGroup::Whitefish => "Whitefish",
            SpeciesGroup::Other => "Other",
        }
    }
}

/// Multipliers applied to trend and event impacts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherWeights {
    pub pressure: f64,
    pub temperature: f64,
    pub cloud_cover: f64,
    pub precipitation: f64,
    pub wind: f64,
}

/// Score deltas for overcast and clear skies, before the cloud weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CloudPreference {
    pub overcast: f64,
    pub clear: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonalModifiers {
    pub early_ice: f64,
    pub mid_winter: f64,
    pub late_ice: f64,
}

impl SeasonalModifiers {
    pub fn for_stage(&self, stage: SeasonStage) -> f64 {
        match stage {
            SeasonStage::EarlyIce => self.early_ice,
            SeasonStage::MidWinter => self.mid_winter,
            SeasonStage::LateIce => self.late_ice,
            SeasonStage::OffSeason => 0.0,
        }
    }
}

/// Static behavioural parameters for one species
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub scientific_name: &'static str,
    pub group: SpeciesGroup,
    pub description: &'static str,
    pub ice_tip: &'static str,
    pub time_of_day: &'static [(TimePeriod, f64)],
    pub weights: WeatherWeights,
    pub cloud: CloudPreference,
    pub seasonal: SeasonalModifiers,
    pub night_feeder: bool,
    pub moon_sensitivity: f64,
    pub day_length_sensitivity: f64,
}

impl SpeciesProfile {
    /// Modifier for a period; periods the species does not list are neutral
    pub fn time_of_day_modifier(&self, period: TimePeriod) -> f64 {
        self.time_of_day
            .iter()
            .find(|(p, _)| *p == period)
            .map(|(_, m)| *m)
            .unwrap_or(0.0)
    }
}
