use super::overview::local_time;
use crate::ui::components::{render_bar, ScoreBar};
use crate::ui::Theme;
use bitecast::models::{BiteScore, HourlySample, SpeciesForecast, SpeciesProfile};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct SpeciesScreen<'a> {
    pub species: Option<&'a SpeciesForecast>,
    pub profile: Option<&'a SpeciesProfile>,
    pub hourly: &'a [HourlySample],
    pub selected_hour: usize,
}

impl<'a> SpeciesScreen<'a> {
    pub fn new(
        species: Option<&'a SpeciesForecast>,
        profile: Option<&'a SpeciesProfile>,
        hourly: &'a [HourlySample],
    ) -> Self {
        Self {
            species,
            profile,
            hourly,
            selected_hour: 0,
        }
    }

    pub fn with_hour(mut self, hour: usize) -> Self {
        self.selected_hour = hour;
        self
    }

    fn selected_score(&self) -> Option<&'a BiteScore> {
        self.species.and_then(|s| s.scores.get(self.selected_hour))
    }
}

impl Widget for SpeciesScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = match (self.species, self.profile) {
            (Some(s), Some(p)) => Line::from(vec![
                Span::styled(s.name.as_str(), Theme::title()),
                Span::styled(
                    format!(" ({}, {})", p.scientific_name, p.group.as_str()),
                    Theme::dim(),
                ),
            ]),
            (Some(s), None) => Line::from(Span::styled(s.name.as_str(), Theme::title())),
            _ => Line::from(Span::styled("No species selected", Theme::dim())),
        };
        Paragraph::new(title).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        self.render_hours(content[0], buf);
        self.render_details(content[1], buf);

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Hour ", Theme::nav_label()),
            Span::styled("[←→]", Theme::nav_key()),
            Span::styled("Species ", Theme::nav_label()),
            Span::styled("[Esc/1]", Theme::nav_key()),
            Span::styled("Overview ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[2], buf);
    }
}

impl SpeciesScreen<'_> {
    fn render_hours(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Hourly")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(species) = self.species else {
            return;
        };

        let items: Vec<ListItem> = species
            .scores
            .iter()
            .map(|score| {
                let weather = self
                    .hourly
                    .get(score.hour)
                    .map(|h| {
                        format!(
                            "{} {:>4.0}°F {:>5.0}",
                            Theme::condition_symbol(h.condition_code.condition),
                            h.temperature,
                            h.pressure
                        )
                    })
                    .unwrap_or_default();
                let line = Line::from(vec![
                    Span::styled(format!("{} ", local_time(score.timestamp)), Theme::dim()),
                    Span::styled(
                        format!("{:>3} ", score.score),
                        Theme::quality_style(score.quality),
                    ),
                    Span::styled(weather, Theme::normal()),
                ]);
                let style = if score.hour == self.selected_hour {
                    Theme::selected()
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);

        // Bars to the right of the text when there is room
        let text_width = 24;
        if inner.width > text_width + 4 {
            for (row, score) in species.scores.iter().enumerate() {
                let y = inner.y + row as u16;
                if y >= inner.y + inner.height {
                    break;
                }
                let bar = Rect {
                    x: inner.x + text_width + 1,
                    y,
                    width: inner.width - text_width - 1,
                    height: 1,
                };
                render_bar(bar, buf, score.score, score.quality);
            }
        }
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Score
                Constraint::Length(7), // Factors
                Constraint::Min(6),    // Windows and profile
            ])
            .split(area);

        let title = self
            .selected_score()
            .map(|s| format!("Score at {}", local_time(s.timestamp)))
            .unwrap_or_else(|| "Score".to_string());
        ScoreBar::new(&title, self.selected_score()).render(chunks[0], buf);

        self.render_factors(chunks[1], buf);
        self.render_profile(chunks[2], buf);
    }

    fn render_factors(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Factors")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(score) = self.selected_score() else {
            return;
        };

        let items: Vec<ListItem> = score
            .factors
            .iter()
            .map(|f| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} {:>+5.1} ", Theme::factor_symbol(f.category), f.impact),
                        Theme::impact_style(f.impact),
                    ),
                    Span::styled(f.description.as_str(), Theme::normal()),
                ]))
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_profile(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Best Times & Tips")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();

        if let Some(species) = self.species {
            if species.best_windows.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No hours reach a good bite today",
                    Theme::dim(),
                )));
            }
            for window in &species.best_windows {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}-{} ", local_time(window.start), local_time(window.end)),
                        Theme::highlight(),
                    ),
                    Span::styled(
                        format!(
                            "peak {} at {} ({}h)",
                            window.peak_score,
                            local_time(window.peak_time),
                            window.duration_hours
                        ),
                        Theme::normal(),
                    ),
                ]));
            }
        }

        if let Some(profile) = self.profile {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(profile.description, Theme::dim())));
            lines.push(Line::from(vec![
                Span::styled("Tip: ", Theme::header()),
                Span::styled(profile.ice_tip, Theme::normal()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
