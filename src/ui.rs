pub mod experimenter;
pub mod participant;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Draws the active page
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.page).render(app, f);
}

fn title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn body_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn legend_style(enabled: bool) -> Style {
    let style = Style::default().add_modifier(Modifier::ITALIC);
    if enabled {
        style
    } else {
        style.add_modifier(Modifier::DIM)
    }
}

/// Splits the screen into body and a one-line legend at the bottom
fn body_and_legend(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Vertically centred title + paragraph, the layout most pages share
fn render_message(f: &mut Frame, area: Rect, title: &str, body: &str) {
    let title_lines = title.lines().count() as u16;
    let body_height = if body.is_empty() { 0 } else { 4 };
    let content = title_lines + 1 + body_height;
    let top = area.height.saturating_sub(content) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(title_lines),
            Constraint::Length(1),
            Constraint::Length(body_height),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(Text::styled(title.to_string(), title_style()))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[1]);

    if !body.is_empty() {
        let body = Paragraph::new(Span::styled(body.to_string(), body_style()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(body, chunks[3]);
    }
}

/// Legend entries; disabled ones are dimmed
fn render_legend(f: &mut Frame, area: Rect, entries: &[(&str, bool)]) {
    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (i, (label, enabled)) in entries.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" / ", legend_style(true)));
        }
        spans.push(Span::styled(label.to_string(), legend_style(*enabled)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Rectangle of `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
pub(crate) fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered(area, 20, 4);
        assert_eq!(r, Rect::new(30, 10, 20, 4));

        let clamped = centered(area, 200, 50);
        assert_eq!(clamped, area);
    }
}
