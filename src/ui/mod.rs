mod quiz;
mod result;
mod setup;
mod status;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::models::Phase;

pub const TITLE: &str = "SAT PRACTICE TEST";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.phase() {
        Phase::Setup => setup::render(frame, area, app),
        Phase::Loading => status::render_loading(frame, area, app),
        Phase::Error => status::render_error(frame, area, app),
        Phase::Active => quiz::render(frame, area, app),
        Phase::Results => result::render(frame, area, app),
    }
}
