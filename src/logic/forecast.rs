use super::interpolation::interpolate;
use super::scoring::{best_bite_times, BiteConditions, ScoringEngine};
use super::species::SpeciesCatalog;
use crate::error::Result;
use crate::models::{
    BiteForecast, HistoricalContext, HistoricalDay, Location, RawForecastSample, SpeciesForecast,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Inputs for one forecast run. `start` is explicit so identical requests
/// always produce identical forecasts.
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub location: Location,
    pub start: DateTime<Utc>,
    pub samples: Vec<RawForecastSample>,
    /// Species ids to score; empty means the whole catalog
    pub species: Vec<String>,
    pub history: Vec<HistoricalDay>,
}

impl ForecastRequest {
    pub fn new(location: Location, start: DateTime<Utc>, samples: Vec<RawForecastSample>) -> Self {
        Self {
            location,
            start,
            samples,
            species: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn with_species(mut self, species: Vec<String>) -> Self {
        self.species = species;
        self
    }

    pub fn with_history(mut self, history: Vec<HistoricalDay>) -> Self {
        self.history = history;
        self
    }
}

/// Interpolate, analyse and score a forecast for every requested species
pub struct BiteForecastService {
    engine: ScoringEngine,
}

impl BiteForecastService {
    pub fn new(catalog: SpeciesCatalog) -> Self {
        Self {
            engine: ScoringEngine::new(catalog),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn run(&self, request: &ForecastRequest) -> Result<BiteForecast> {
        let hourly = interpolate(&request.samples, request.start)?;

        let history = HistoricalContext::from_days(&request.history);
        if history.is_none() {
            debug!("No historical weather supplied, scoring without recent-weather context");
        }

        let conditions = BiteConditions::analyze(request.location, hourly, history)?;

        let species_ids: Vec<String> = if request.species.is_empty() {
            self.engine.catalog().ids().map(String::from).collect()
        } else {
            request.species.clone()
        };

        let species: Vec<SpeciesForecast> = species_ids
            .par_iter()
            .map(|id| self.species_forecast(id, &conditions))
            .collect();

        debug!(
            "Scored {} species from {} raw samples",
            species.len(),
            request.samples.len()
        );

        Ok(BiteForecast {
            start: request.start,
            location: request.location,
            hourly: conditions.hourly,
            storm_events: conditions.storm_events,
            species,
        })
    }

    fn species_forecast(&self, species_id: &str, conditions: &BiteConditions) -> SpeciesForecast {
        let name = match self.engine.catalog().get(species_id) {
            Some(profile) => profile.name.to_string(),
            None => {
                warn!("Unknown species requested: {}", species_id);
                species_id.to_string()
            }
        };

        let scores = self.engine.daily_scores(species_id, conditions);
        let best_windows = best_bite_times(&scores);

        SpeciesForecast {
            species_id: species_id.to_string(),
            name,
            scores,
            best_windows,
        }
    }
}

impl Default for BiteForecastService {
    fn default() -> Self {
        Self::new(SpeciesCatalog::builtin())
    }
}
