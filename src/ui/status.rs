//! Loading and error screens.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;

use super::TITLE;

pub fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(TITLE, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("Loading test {}...", app.session().test_id),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];

    render_centered(frame, area, content);
}

pub fn render_error(frame: &mut Frame, area: Rect, app: &App) {
    let message = app
        .session()
        .error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "Something went wrong".to_string());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(TITLE, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red).bold())),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] try another test  ·  [Q] quit",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    render_centered(frame, area, content);
}

fn render_centered(frame: &mut Frame, area: Rect, content: Vec<Line>) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(content.len() as u16),
        Constraint::Percentage(40),
    ])
    .split(area);

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
