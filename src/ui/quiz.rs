use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{OptionKey, Question};

/// Below this many seconds the clock turns red.
const LOW_TIME_SECS: u64 = 60;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.session().current_question() else {
        return;
    };
    let has_passage = question.passage.is_some();
    let chunks = create_layout(area, has_passage);

    render_header(frame, chunks[0], app);

    let prompt_chunk = if let Some(passage) = &question.passage {
        render_passage(frame, chunks[1], passage);
        chunks[2]
    } else {
        chunks[1]
    };
    render_prompt(frame, prompt_chunk, &question.prompt);

    let options_chunk = if has_passage { chunks[3] } else { chunks[2] };
    render_options(frame, options_chunk, question, app);

    let controls_chunk = if has_passage { chunks[4] } else { chunks[3] };
    render_controls(frame, controls_chunk, app);
}

fn create_layout(area: Rect, has_passage: bool) -> std::rc::Rc<[Rect]> {
    if has_passage {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(area)
    } else {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .margin(2)
        .split(area)
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).split(area);

    let progress = format!(
        "Question {} / {}",
        session.current_index + 1,
        session.total_questions()
    );
    frame.render_widget(Paragraph::new(progress).fg(Color::DarkGray), chunks[0]);

    let clock_color = if session.time_remaining_secs < LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Green
    };
    let clock = Paragraph::new(session.clock())
        .alignment(Alignment::Right)
        .fg(clock_color)
        .bold();
    frame.render_widget(clock, chunks[1]);
}

fn render_passage(frame: &mut Frame, area: Rect, passage: &str) {
    let widget = Paragraph::new(passage)
        .wrap(Wrap { trim: true })
        .fg(Color::Yellow)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &str) {
    let widget = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, app: &App) {
    let recorded = app.session().current_answer();
    let mut lines: Vec<Line> = Vec::with_capacity(OptionKey::ALL.len() * 2);

    for key in OptionKey::ALL {
        let is_recorded = recorded == Some(key);
        let under_cursor = key.index() == app.option_cursor();
        let style = if is_recorded {
            Style::default().fg(Color::Cyan).bold()
        } else if under_cursor {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = match (under_cursor, is_recorded) {
            (true, _) => ">",
            (false, true) => "*",
            _ => " ",
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", key), style),
            Span::styled(question.option(key), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let advance = if app.session().is_last_question() {
        "enter submit"
    } else {
        "enter next"
    };
    let advance_color = if app.can_advance() {
        Color::Gray
    } else {
        Color::DarkGray
    };

    let widget = Paragraph::new(Line::from(vec![
        Span::styled("a-d answer  ·  j/k space choose  ·  h previous  ·  ", Color::DarkGray),
        Span::styled(advance, advance_color),
        Span::styled("  ·  q quit", Color::DarkGray),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
