use super::annotations::StormEvent;
use super::forecast::{HourlySample, Location};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of factors kept on a score for presentation
pub const PRESENTED_FACTORS: usize = 5;

/// Score at or above which an hour counts toward a bite window
pub const GOOD_SCORE_THRESHOLD: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    TimeOfDay,
    Pressure,
    Temperature,
    CloudCover,
    Storm,
    Wind,
    Season,
    Moon,
    DayLength,
    History,
    Error,
}

impl FactorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorCategory::TimeOfDay => "Time of Day",
            FactorCategory::Pressure => "Pressure",
            FactorCategory::Temperature => "Temperature",
            FactorCategory::CloudCover => "Cloud Cover",
            FactorCategory::Storm => "Storm",
            FactorCategory::Wind => "Wind",
            FactorCategory::Season => "Season",
            FactorCategory::Moon => "Moon",
            FactorCategory::DayLength => "Day Length",
            FactorCategory::History => "Recent Weather",
            FactorCategory::Error => "Error",
        }
    }
}

impl std::fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quality bucket derived from a score. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BiteQuality {
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl BiteQuality {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => BiteQuality::Excellent,
            60..=79 => BiteQuality::Good,
            40..=59 => BiteQuality::Fair,
            20..=39 => BiteQuality::Poor,
            _ => BiteQuality::VeryPoor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BiteQuality::Excellent => "Excellent",
            BiteQuality::Good => "Good",
            BiteQuality::Fair => "Fair",
            BiteQuality::Poor => "Poor",
            BiteQuality::VeryPoor => "Very Poor",
        }
    }
}

impl std::fmt::Display for BiteQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One signed contribution to a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub category: FactorCategory,
    pub description: String,
    pub impact: f64,
}

impl ScoreFactor {
    pub fn new(category: FactorCategory, description: impl Into<String>, impact: f64) -> Self {
        Self {
            category,
            description: description.into(),
            impact,
        }
    }
}

/// Sort by descending absolute impact. Stable, so ties keep evaluation order.
pub fn rank_factors(factors: &mut [ScoreFactor]) {
    factors.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiteScore {
    pub species_id: String,
    pub hour: usize,
    pub timestamp: DateTime<Utc>,
    pub score: u8,
    #[serde(rename = "qualityLabel")]
    pub quality: BiteQuality,
    pub factors: Vec<ScoreFactor>,
    /// Every non-zero factor, ranked. Not part of the output contract.
    #[serde(skip)]
    pub all_factors: Vec<ScoreFactor>,
}

impl BiteScore {
    /// Build a score from a clamped total and the full factor list
    pub fn new(
        species_id: impl Into<String>,
        hour: usize,
        timestamp: DateTime<Utc>,
        score: u8,
        mut all_factors: Vec<ScoreFactor>,
    ) -> Self {
        rank_factors(&mut all_factors);
        let factors = all_factors
            .iter()
            .take(PRESENTED_FACTORS)
            .cloned()
            .collect();
        Self {
            species_id: species_id.into(),
            hour,
            timestamp,
            score,
            quality: BiteQuality::from_score(score),
            factors,
            all_factors,
        }
    }

    /// Zero score carrying a single explanatory error factor
    pub fn failed(
        species_id: impl Into<String>,
        hour: usize,
        timestamp: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(
            species_id,
            hour,
            timestamp,
            0,
            vec![ScoreFactor::new(FactorCategory::Error, reason, 0.0)],
        )
    }

    pub fn is_error(&self) -> bool {
        self.factors
            .iter()
            .any(|f| f.category == FactorCategory::Error)
    }
}

/// A contiguous run of good hours around a local score maximum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiteWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_hour: usize,
    pub end_hour: usize,
    pub peak_score: u8,
    pub peak_time: DateTime<Utc>,
    pub duration_hours: usize,
}

/// Scores and windows for one species across the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesForecast {
    pub species_id: String,
    pub name: String,
    pub scores: Vec<BiteScore>,
    pub best_windows: Vec<BiteWindow>,
}

impl SpeciesForecast {
    pub fn peak(&self) -> Option<&BiteScore> {
        self.scores
            .iter()
            .fold(None, |best: Option<&BiteScore>, s| match best {
                Some(b) if b.score >= s.score => Some(b),
                _ => Some(s),
            })
    }
}

/// Output of one forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiteForecast {
    pub start: DateTime<Utc>,
    pub location: Location,
    pub hourly: Vec<HourlySample>,
    pub storm_events: Vec<StormEvent>,
    pub species: Vec<SpeciesForecast>,
}

impl BiteForecast {
    pub fn species(&self, id: &str) -> Option<&SpeciesForecast> {
        self.species.iter().find(|s| s.species_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_bands() {
        assert_eq!(BiteQuality::from_score(100), BiteQuality::Excellent);
        assert_eq!(BiteQuality::from_score(80), BiteQuality::Excellent);
        assert_eq!(BiteQuality::from_score(79), BiteQuality::Good);
        assert_eq!(BiteQuality::from_score(60), BiteQuality::Good);
        assert_eq!(BiteQuality::from_score(59), BiteQuality::Fair);
        assert_eq!(BiteQuality::from_score(40), BiteQuality::Fair);
        assert_eq!(BiteQuality::from_score(39), BiteQuality::Poor);
        assert_eq!(BiteQuality::from_score(20), BiteQuality::Poor);
        assert_eq!(BiteQuality::from_score(19), BiteQuality::VeryPoor);
        assert_eq!(BiteQuality::from_score(0), BiteQuality::VeryPoor);
    }

    #[test]
    fn score_serializes_quality_label() {
        let score = BiteScore::new("walleye", 0, Utc::now(), 10, Vec::new());
        let value = serde_json::to_value(&score).unwrap();
        assert_eq!(value["qualityLabel"], "Very Poor");
        assert!(value.get("quality").is_none());

        let back: BiteScore = serde_json::from_value(value).unwrap();
        assert_eq!(back.quality, BiteQuality::VeryPoor);
    }

    #[test]
    fn factors_ranked_by_absolute_impact_and_truncated() {
        let factors = vec![
            ScoreFactor::new(FactorCategory::Wind, "wind", -2.0),
            ScoreFactor::new(FactorCategory::Pressure, "pressure", 14.4),
            ScoreFactor::new(FactorCategory::Season, "season", -8.0),
            ScoreFactor::new(FactorCategory::Moon, "moon", 1.0),
            ScoreFactor::new(FactorCategory::TimeOfDay, "dawn", 15.0),
            ScoreFactor::new(FactorCategory::CloudCover, "clouds", 5.5),
        ];
        let score = BiteScore::new("walleye", 6, Utc::now(), 85, factors);

        assert_eq!(score.factors.len(), PRESENTED_FACTORS);
        assert_eq!(score.all_factors.len(), 6);
        assert_eq!(score.factors[0].category, FactorCategory::TimeOfDay);
        assert_eq!(score.factors[1].category, FactorCategory::Pressure);
        assert_eq!(score.factors[2].category, FactorCategory::Season);
        assert_eq!(score.all_factors[5].category, FactorCategory::Moon);
        assert_eq!(score.quality, BiteQuality::Excellent);
    }

    #[test]
    fn failed_score_has_single_error_factor() {
        let score = BiteScore::failed("kraken", 3, Utc::now(), "Unknown species: kraken");
        assert_eq!(score.score, 0);
        assert_eq!(score.factors.len(), 1);
        assert!(score.is_error());
        assert_eq!(score.quality, BiteQuality::VeryPoor);
    }

    #[test]
    fn all_factors_not_serialized() {
        let score = BiteScore::new(
            "bluegill",
            0,
            Utc::now(),
            50,
            vec![ScoreFactor::new(FactorCategory::Wind, "Strong wind", -5.0)],
        );
        let json = serde_json::to_value(&score).unwrap();
        assert!(json.get("allFactors").is_none());
        assert_eq!(json["speciesId"], "bluegill");
        assert_eq!(json["factors"][0]["category"], "wind");
    }
}
