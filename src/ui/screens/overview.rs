use crate::ui::Theme;
use bitecast::models::{BiteForecast, SpeciesForecast};
use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

const STRIP_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M").to_string()
}

pub struct OverviewScreen<'a> {
    pub lake_name: &'a str,
    pub forecast: Option<&'a BiteForecast>,
    pub selected_index: usize,
    pub status_message: Option<&'a str>,
}

impl<'a> OverviewScreen<'a> {
    pub fn new(lake_name: &'a str, forecast: Option<&'a BiteForecast>) -> Self {
        Self {
            lake_name,
            forecast,
            selected_index: 0,
            status_message: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for OverviewScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Species table
                Constraint::Length(3), // Storm events
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_species(chunks[1], buf);
        self.render_storms(chunks[2], buf);
        self.render_status_message(chunks[3], buf);
        self.render_nav(chunks[4], buf);
    }
}

impl OverviewScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let title = format!("BiteCast - {}", self.lake_name);
        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let info = match self.forecast {
            Some(f) => {
                let now = f.hourly.first();
                let conditions = now
                    .map(|h| {
                        format!(
                            "  Now: {} {:.0}°F {:.0} hPa wind {:.0} mph",
                            Theme::condition_symbol(h.condition_code.condition),
                            h.temperature,
                            h.pressure,
                            h.wind_speed
                        )
                    })
                    .unwrap_or_default();
                format!(
                    "24h from {}{}",
                    f.start.with_timezone(&Local).format("%a %b %d %H:%M"),
                    conditions
                )
            }
            None => "No forecast loaded".to_string(),
        };

        Paragraph::new(Span::styled(info, Theme::dim()))
            .block(block)
            .render(area, buf);
    }

    fn render_species(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Species (peak / best window / 24h)", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(forecast) = self.forecast else {
            Paragraph::new(Span::styled("Press r to load a forecast", Theme::dim()))
                .render(inner, buf);
            return;
        };

        let items: Vec<ListItem> = forecast
            .species
            .iter()
            .enumerate()
            .map(|(i, species)| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Style::default()
                };
                ListItem::new(species_line(species)).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_storms(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Storm Events", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let events = self.forecast.map(|f| f.storm_events.as_slice()).unwrap_or(&[]);
        if events.is_empty() {
            Paragraph::new(Span::styled("None expected", Theme::dim())).render(inner, buf);
            return;
        }

        let hourly = self.forecast.map(|f| f.hourly.as_slice()).unwrap_or(&[]);
        let spans: Vec<Span> = events
            .iter()
            .flat_map(|e| {
                let time = hourly
                    .get(e.hour)
                    .map(|h| local_time(h.timestamp))
                    .unwrap_or_default();
                vec![
                    Span::styled(
                        format!("{} ", Theme::storm_symbol(e.phase)),
                        Theme::impact_style(e.impact),
                    ),
                    Span::styled(format!("{} {}  ", time, e.phase.as_str()), Theme::normal()),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.status_message {
            let style = if msg.contains("failed") || msg.contains("unavailable") {
                Theme::warning()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Select ", Theme::nav_label()),
            Span::styled("[Enter/2]", Theme::nav_key()),
            Span::styled("Details ", Theme::nav_label()),
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Refresh ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(area, buf);
    }
}

fn species_line(species: &SpeciesForecast) -> Line<'_> {
    let mut spans = vec![Span::styled(format!("{:<18}", species.name), Theme::normal())];

    match species.peak() {
        Some(peak) if !peak.is_error() => {
            spans.push(Span::styled(
                format!("{:>3} {:<10}", peak.score, peak.quality.as_str()),
                Theme::quality_style(peak.quality),
            ));
        }
        _ => spans.push(Span::styled(format!("{:<14}", "  - unavailable"), Theme::dim())),
    }

    let window = species
        .best_windows
        .first()
        .map(|w| format!("{}-{} ", local_time(w.start), local_time(w.end)))
        .unwrap_or_else(|| format!("{:<12}", "no window"));
    spans.push(Span::styled(format!("{:<13}", window), Theme::dim()));

    for score in &species.scores {
        let level = (score.score as usize * (STRIP_LEVELS.len() - 1)) / 100;
        spans.push(Span::styled(
            STRIP_LEVELS[level].to_string(),
            Theme::quality_style(score.quality),
        ));
    }

    Line::from(spans)
}
