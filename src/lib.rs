//! # sat-quiz
//!
//! Timed SAT practice tests in the terminal.
//!
//! A test is assembled from a question bank (a local JSON file or a remote
//! question server), given a time budget proportional to its length and
//! scored when the taker submits or the countdown runs out.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sat_quiz::{Quiz, QuizConfig, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::from_json("questions.json", QuizConfig::default())?;
//!     quiz.run().await
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod server;
pub mod session;
pub mod terminal;
mod ui;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::task::JoinHandle;

pub use app::{App, SetupField, SetupForm};
pub use config::QuizConfig;
pub use data::{
    InMemoryRepository, JsonFileRepository, QuestionRepository, RemoteRepository,
    load_records_from_json,
};
pub use error::{AssemblyError, ConfigError, LoadError, QuizError, RepositoryError};
pub use models::{OptionKey, Phase, Question, QuestionRecord, Session};
pub use session::{Action, QuizHandle, QuizRunner, Review};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A quiz session driven from the terminal.
pub struct Quiz {
    app: App,
    runner: JoinHandle<()>,
}

impl Quiz {
    /// Start a session runner over `repository`.
    ///
    /// Must be called inside a tokio runtime. Fails if `config` does not
    /// validate.
    pub fn new(
        config: QuizConfig,
        repository: Arc<dyn QuestionRepository>,
    ) -> Result<Self, QuizError> {
        let (handle, runner) = QuizRunner::spawn(config, repository)?;
        Ok(Self {
            app: App::new(handle),
            runner,
        })
    }

    /// Serve tests from a local JSON bank.
    ///
    /// The file is read once up front so a missing or broken bank is
    /// reported before the terminal is taken over.
    ///
    /// ```rust,no_run
    /// use sat_quiz::{Quiz, QuizConfig};
    ///
    /// # async fn demo() -> Result<(), sat_quiz::QuizError> {
    /// let quiz = Quiz::from_json("questions.json", QuizConfig::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P, config: QuizConfig) -> Result<Self, QuizError> {
        load_records_from_json(path.as_ref())?;
        let repository = JsonFileRepository::new(path.as_ref());
        Self::new(config, Arc::new(repository))
    }

    /// Pre-fill the setup form.
    pub fn with_setup(mut self, form: SetupForm) -> Self {
        self.app.form = form;
        self
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app).await;
        self.runner.abort();
        terminal::restore()?;
        result
    }
}

impl Drop for Quiz {
    fn drop(&mut self) {
        self.runner.abort();
    }
}

async fn run_event_loop(terminal: &mut terminal::QuizTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        app.refresh();
        terminal.draw(|frame| ui::render(frame, app))?;

        if app.should_quit() {
            break;
        }

        // Redraw at least every poll interval so the clock keeps moving.
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_input(app, key.code);
                }
            }
        }
        tokio::task::yield_now().await;
    }

    Ok(())
}

fn handle_input(app: &mut App, key: KeyCode) {
    match app.phase() {
        Phase::Setup => handle_setup_input(app, key),
        Phase::Loading => handle_loading_input(app, key),
        Phase::Error => handle_error_input(app, key),
        Phase::Active => handle_quiz_input(app, key),
        Phase::Results => handle_result_input(app, key),
    }
}

fn handle_setup_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => app.start(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.toggle_field(),
        KeyCode::Backspace => app.form_pop(),
        KeyCode::Esc => app.quit(),
        KeyCode::Char('q') | KeyCode::Char('Q') if app.form_is_empty() => app.quit(),
        KeyCode::Char(c) if !c.is_control() => app.form_push(c),
        _ => {}
    }
}

fn handle_loading_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')) {
        app.quit();
    }
}

fn handle_error_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => app.retry(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(' ') => app.choose_highlighted(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Enter => app.confirm(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => {
            if let Some(option) = OptionKey::from_char(c) {
                app.choose(option);
            }
        }
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::fixtures;

    fn repository() -> Arc<dyn QuestionRepository> {
        Arc::new(InMemoryRepository::from_records(fixtures::records("1", 2)))
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let config = QuizConfig {
            tick_interval_ms: 0,
            ..QuizConfig::default()
        };
        assert!(matches!(
            Quiz::new(config, repository()),
            Err(QuizError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[tokio::test]
    async fn test_dropping_quiz_stops_runner() {
        let quiz = Quiz::new(QuizConfig::default(), repository()).unwrap();
        let runner = quiz.runner.abort_handle();
        assert!(!runner.is_finished());

        drop(quiz);
        tokio::time::timeout(Duration::from_secs(5), async {
            while !runner.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }
}
