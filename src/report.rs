use crate::ui::Theme;
use bitecast::logic::SpeciesCatalog;
use bitecast::models::{
    BiteForecast, BiteScore, BiteWindow, HourlySample, Location, SpeciesForecast, StormEvent,
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fmt::Write;

/// JSON shape of a forecast: the engine output with a display colour per score
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport<'a> {
    pub start: DateTime<Utc>,
    pub location: Location,
    pub hourly: &'a [HourlySample],
    pub storm_events: &'a [StormEvent],
    pub species: Vec<SpeciesReport<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesReport<'a> {
    pub species_id: &'a str,
    pub name: &'a str,
    pub scores: Vec<ScoreReport<'a>>,
    pub best_windows: &'a [BiteWindow],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport<'a> {
    #[serde(flatten)]
    pub score: &'a BiteScore,
    pub quality_color: &'static str,
}

impl<'a> ForecastReport<'a> {
    pub fn new(forecast: &'a BiteForecast) -> Self {
        Self {
            start: forecast.start,
            location: forecast.location,
            hourly: &forecast.hourly,
            storm_events: &forecast.storm_events,
            species: forecast.species.iter().map(SpeciesReport::new).collect(),
        }
    }
}

impl<'a> SpeciesReport<'a> {
    fn new(species: &'a SpeciesForecast) -> Self {
        Self {
            species_id: &species.species_id,
            name: &species.name,
            scores: species
                .scores
                .iter()
                .map(|score| ScoreReport {
                    score,
                    quality_color: Theme::quality_hex(score.quality),
                })
                .collect(),
            best_windows: &species.best_windows,
        }
    }
}

fn hhmm(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M").to_string()
}

/// Plain-text summary: one line per species plus its best windows
pub fn text_summary(lake_name: &str, forecast: &BiteForecast) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} - 24h from {}",
        lake_name,
        forecast.start.with_timezone(&Local).format("%a %b %d %H:%M")
    );

    for event in &forecast.storm_events {
        if let Some(hour) = forecast.hourly.get(event.hour) {
            let _ = writeln!(
                out,
                "  storm: {} at {} ({:+.0})",
                event.phase.as_str(),
                hhmm(hour.timestamp),
                event.impact
            );
        }
    }
    let _ = writeln!(out);

    for species in &forecast.species {
        match species.peak() {
            Some(peak) if !peak.is_error() => {
                let _ = writeln!(
                    out,
                    "{:<20} peak {:>3} {:<10} at {}",
                    species.name,
                    peak.score,
                    peak.quality.as_str(),
                    hhmm(peak.timestamp)
                );
                for factor in peak.factors.iter().take(3) {
                    let _ = writeln!(out, "    {:+5.1} {}", factor.impact, factor.description);
                }
            }
            _ => {
                let reason = species
                    .scores
                    .first()
                    .and_then(|s| s.factors.first())
                    .map(|f| f.description.as_str())
                    .unwrap_or("no scores");
                let _ = writeln!(out, "{:<20} unavailable: {}", species.name, reason);
            }
        }
        for window in &species.best_windows {
            let _ = writeln!(
                out,
                "    window {}-{} peak {} ({}h)",
                hhmm(window.start),
                hhmm(window.end),
                window.peak_score,
                window.duration_hours
            );
        }
    }

    out
}

pub fn species_table(catalog: &SpeciesCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<18} {:<24} {:<10} {}", "ID", "NAME", "GROUP", "NIGHT");
    for profile in catalog.all() {
        let _ = writeln!(
            out,
            "{:<18} {:<24} {:<10} {}",
            profile.id,
            profile.name,
            profile.group.as_str(),
            if profile.night_feeder { "yes" } else { "no" }
        );
    }
    out
}
