use crate::models::{OptionKey, Phase, Session};
use crate::session::{Action, QuizHandle, parse_requested_count};

const NUM_OPTIONS: usize = 4;
const MAX_FIELD_LENGTH: usize = 16;

/// Which setup field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupField {
    #[default]
    TestId,
    Count,
}

/// Text typed on the setup screen.
#[derive(Debug, Clone, Default)]
pub struct SetupForm {
    pub test_id: String,
    pub count: String,
    pub focus: SetupField,
}

/// Terminal front end state: the latest session snapshot plus what only the
/// screen cares about (form input, option cursor, review scroll).
pub struct App {
    handle: QuizHandle,
    session: Session,
    pub(crate) form: SetupForm,
    option_cursor: usize,
    result_scroll: usize,
    should_quit: bool,
}

impl App {
    pub fn new(handle: QuizHandle) -> Self {
        let session = handle.snapshot();
        Self {
            handle,
            session,
            form: SetupForm::default(),
            option_cursor: 0,
            result_scroll: 0,
            should_quit: false,
        }
    }

    pub fn with_form(mut self, form: SetupForm) -> Self {
        self.form = form;
        self
    }

    /// Pull the latest snapshot from the runner.
    pub fn refresh(&mut self) {
        let latest = self.handle.snapshot();
        let moved = latest.id != self.session.id
            || latest.current_index != self.session.current_index
            || latest.phase != self.session.phase;
        self.session = latest;

        if moved {
            self.option_cursor = self
                .session
                .current_answer()
                .map(OptionKey::index)
                .unwrap_or(0);
            self.result_scroll = 0;
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn form(&self) -> &SetupForm {
        &self.form
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // Setup

    pub fn form_push(&mut self, c: char) {
        let field = match self.form.focus {
            SetupField::TestId => &mut self.form.test_id,
            SetupField::Count => &mut self.form.count,
        };
        if field.chars().count() < MAX_FIELD_LENGTH {
            field.push(c);
        }
    }

    pub fn form_pop(&mut self) {
        match self.form.focus {
            SetupField::TestId => self.form.test_id.pop(),
            SetupField::Count => self.form.count.pop(),
        };
    }

    pub fn toggle_field(&mut self) {
        self.form.focus = match self.form.focus {
            SetupField::TestId => SetupField::Count,
            SetupField::Count => SetupField::TestId,
        };
    }

    pub fn form_is_empty(&self) -> bool {
        self.form.test_id.is_empty() && self.form.count.is_empty()
    }

    pub fn can_start(&self) -> bool {
        !self.form.test_id.trim().is_empty()
    }

    pub fn start(&mut self) {
        if !self.can_start() {
            return;
        }
        self.dispatch(Action::Start {
            test_id: self.form.test_id.clone(),
            requested_count: parse_requested_count(&self.form.count),
        });
    }

    // Active

    pub fn select_next_option(&mut self) {
        self.option_cursor = (self.option_cursor + 1) % NUM_OPTIONS;
    }

    pub fn select_previous_option(&mut self) {
        self.option_cursor = (self.option_cursor + NUM_OPTIONS - 1) % NUM_OPTIONS;
    }

    /// Record the option under the cursor.
    pub fn choose_highlighted(&mut self) {
        if let Some(key) = OptionKey::from_index(self.option_cursor) {
            self.choose(key);
        }
    }

    pub fn choose(&mut self, key: OptionKey) {
        self.option_cursor = key.index();
        self.dispatch(Action::SelectAnswer(key));
    }

    /// Whether Next or Submit is currently offered.
    pub fn can_advance(&self) -> bool {
        self.session.current_answer().is_some()
    }

    pub fn next_question(&mut self) {
        if self.can_advance() && !self.session.is_last_question() {
            self.dispatch(Action::Next);
        }
    }

    pub fn previous_question(&mut self) {
        if self.session.current_index > 0 {
            self.dispatch(Action::Previous);
        }
    }

    /// Next, or Submit on the last question.
    pub fn confirm(&mut self) {
        if !self.can_advance() {
            return;
        }
        if self.session.is_last_question() {
            self.dispatch(Action::Submit);
        } else {
            self.dispatch(Action::Next);
        }
    }

    // Error

    pub fn retry(&mut self) {
        self.dispatch(Action::Retry);
    }

    // Results

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self
            .session
            .review
            .as_ref()
            .map(|r| r.items.len().saturating_sub(1))
            .unwrap_or(0);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        self.form = SetupForm::default();
        self.dispatch(Action::Restart);
    }

    fn dispatch(&mut self, action: Action) {
        if !self.handle.dispatch(action) {
            self.should_quit = true;
        }
    }
}
