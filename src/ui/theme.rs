use bitecast::models::{BiteQuality, FactorCategory, StormPhase, WeatherCondition};
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::LightCyan;

    // Status colors
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // Bite quality colors
    pub const EXCELLENT: Color = Color::Rgb(0x22, 0xc5, 0x5e);
    pub const GOOD: Color = Color::Rgb(0x84, 0xcc, 0x16);
    pub const FAIR: Color = Color::Rgb(0xea, 0xb3, 0x08);
    pub const POOR: Color = Color::Rgb(0xf9, 0x73, 0x16);
    pub const VERY_POOR: Color = Color::Rgb(0xef, 0x44, 0x44);

    // Styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Self::FG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn quality_color(quality: BiteQuality) -> Color {
        match quality {
            BiteQuality::Excellent => Self::EXCELLENT,
            BiteQuality::Good => Self::GOOD,
            BiteQuality::Fair => Self::FAIR,
            BiteQuality::Poor => Self::POOR,
            BiteQuality::VeryPoor => Self::VERY_POOR,
        }
    }

    /// Hex form of [`quality_color`](Self::quality_color) for JSON consumers
    pub fn quality_hex(quality: BiteQuality) -> &'static str {
        match quality {
            BiteQuality::Excellent => "#22c55e",
            BiteQuality::Good => "#84cc16",
            BiteQuality::Fair => "#eab308",
            BiteQuality::Poor => "#f97316",
            BiteQuality::VeryPoor => "#ef4444",
        }
    }

    pub fn quality_style(quality: BiteQuality) -> Style {
        Style::default().fg(Self::quality_color(quality))
    }

    pub fn impact_style(impact: f64) -> Style {
        if impact > 0.0 {
            Self::success()
        } else if impact < 0.0 {
            Style::default().fg(Self::ERROR)
        } else {
            Self::dim()
        }
    }

    pub fn condition_symbol(condition: WeatherCondition) -> &'static str {
        match condition {
            WeatherCondition::Clear => "☀",
            WeatherCondition::Clouds => "☁",
            WeatherCondition::Rain => "🌧",
            WeatherCondition::Drizzle => "🌦",
            WeatherCondition::Thunderstorm => "⛈",
            WeatherCondition::Snow => "❄",
            WeatherCondition::Mist | WeatherCondition::Fog => "🌫",
            WeatherCondition::Other => "?",
        }
    }

    pub fn storm_symbol(phase: StormPhase) -> &'static str {
        match phase {
            StormPhase::PreStorm => "▼",
            StormPhase::Active => "≈",
            StormPhase::PostStorm => "▲",
        }
    }

    pub fn factor_symbol(category: FactorCategory) -> &'static str {
        match category {
            FactorCategory::TimeOfDay => "◐",
            FactorCategory::Pressure => "◎",
            FactorCategory::Temperature => "°",
            FactorCategory::CloudCover => "☁",
            FactorCategory::Storm => "⛈",
            FactorCategory::Wind => "≋",
            FactorCategory::Season => "❄",
            FactorCategory::Moon => "☾",
            FactorCategory::DayLength => "☀",
            FactorCategory::History => "↺",
            FactorCategory::Error => "!",
        }
    }

    pub fn nav_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_label() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::DIM)
    }
}
