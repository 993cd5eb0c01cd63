use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::session::{OptionMark, Review, ReviewItem};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(review) = app.session().review.as_ref() else {
        return;
    };
    let percentage = review.percentage();
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], review, app.session().time_remaining_secs, grade_color);
    render_question_breakdown(frame, chunks[2], review, app.result_scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    review: &Review,
    time_remaining_secs: u64,
    grade_color: Color,
) {
    let finish_note = if time_remaining_secs == 0 {
        Span::styled("Time is up", Style::default().fg(Color::Red))
    } else {
        Span::styled("Submitted", Style::default().fg(Color::DarkGray))
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(finish_note),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                review.total_correct,
                review.total(),
                review.percentage()
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(vec![
            Span::styled(format!("{} correct", review.total_correct), Color::Green),
            Span::styled("  ·  ", Color::DarkGray),
            Span::styled(format!("{} wrong", review.total_wrong), Color::Red),
        ]),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

/// Scrolls one question at a time.
fn render_question_breakdown(frame: &mut Frame, area: Rect, review: &Review, scroll: usize) {
    let lines: Vec<Line> = review
        .items
        .iter()
        .skip(scroll)
        .flat_map(review_lines)
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn review_lines(item: &ReviewItem) -> Vec<Line<'_>> {
    let (symbol, color) = if item.is_correct {
        ("+", Color::Green)
    } else {
        ("-", Color::Red)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
        Span::styled(
            format!("{:2}. ", item.index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(item.prompt.as_str(), Style::default().fg(Color::White).bold()),
    ])];

    if let Some(passage) = &item.passage {
        lines.push(Line::from(Span::styled(
            format!("     {}", passage),
            Style::default().fg(Color::Yellow),
        )));
    }

    for option in &item.options {
        let style = match option.mark {
            OptionMark::Correct => Style::default().fg(Color::Green).bold(),
            OptionMark::WrongSelection => Style::default().fg(Color::Red).bold(),
            OptionMark::Plain => Style::default().fg(Color::Gray),
        };
        let marker = if option.selected { ">" } else { " " };
        lines.push(Line::from(Span::styled(
            format!("   {} {}. {}", marker, option.key, option.text),
            style,
        )));
    }

    lines.push(Line::from(vec![
        Span::styled("     Your answer: ", Color::DarkGray),
        Span::styled(item.selection_label(), color),
    ]));
    lines.push(Line::from(vec![
        Span::styled("     Correct answer: ", Color::DarkGray),
        Span::styled(item.correct_label(), Color::Green),
    ]));
    if let Some(explanation) = &item.explanation {
        lines.push(Line::from(vec![
            Span::styled("     Explanation: ", Color::DarkGray),
            Span::styled(explanation.as_str(), Color::Gray),
        ]));
    }
    lines.push(Line::from(""));

    lines
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
