use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, SetupField};

use super::TITLE;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(13),
        Constraint::Fill(1),
    ])
    .split(area);

    let form = app.form();
    let start_style = if app.can_start() {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(TITLE, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from("Reading & Writing · Timed".fg(Color::DarkGray)),
        Line::from(""),
        field_line(
            "Test number: ",
            &form.test_id,
            form.focus == SetupField::TestId,
        ),
        field_line(
            "Questions:   ",
            &form.count,
            form.focus == SetupField::Count,
        ),
        Line::from("(leave blank for all questions)".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled("ENTER", start_style)),
        Line::from("tab switch field  ·  esc quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { " " };

    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::White)),
        Span::styled(value, value_style),
        Span::styled(cursor, value_style),
    ])
}
