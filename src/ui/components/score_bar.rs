use crate::ui::Theme;
use bitecast::models::{BiteQuality, BiteScore};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Boxed score readout with a proportional bar, coloured by bite quality
pub struct ScoreBar<'a> {
    title: &'a str,
    score: Option<&'a BiteScore>,
}

impl<'a> ScoreBar<'a> {
    pub fn new(title: &'a str, score: Option<&'a BiteScore>) -> Self {
        Self { title, score }
    }
}

impl Widget for ScoreBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(score) = self.score else {
            Paragraph::new(Span::styled("N/A", Theme::dim())).render(inner, buf);
            return;
        };

        let color = Theme::quality_color(score.quality);
        let value_line = Line::from(vec![
            Span::styled(format!("{:>3}", score.score), Style::default().fg(color)),
            Span::styled(format!(" {}", score.quality), Theme::dim()),
        ]);
        Paragraph::new(value_line).render(inner, buf);

        if inner.height >= 2 {
            let bar_area = Rect {
                x: inner.x,
                y: inner.y + 1,
                width: inner.width,
                height: 1,
            };
            render_bar(bar_area, buf, score.score, score.quality);
        }
    }
}

/// One-line bar filled in proportion to `score` out of 100
pub fn render_bar(area: Rect, buf: &mut Buffer, score: u8, quality: BiteQuality) {
    let color = Theme::quality_color(quality);
    let filled = (area.width as u32 * score.min(100) as u32 / 100) as u16;

    for x in area.x..area.x + area.width {
        let ch = if x < area.x + filled { '█' } else { '░' };
        buf[(x, area.y)].set_char(ch).set_fg(color);
    }
}
