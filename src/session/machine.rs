//! The session state machine.
//!
//! ```text
//! Setup -> Loading -> Active -> Results -> Setup
//!             |
//!             v
//!           Error -> Setup
//! ```
//!
//! The machine is pure: it never spawns, sleeps or performs IO. Work that
//! has to happen outside (fetching questions, running the countdown) is
//! returned as an `Effect` for the runner to carry out. A refused action
//! returns `InvalidTransition` and leaves the session untouched.

use uuid::Uuid;

use crate::config::QuizConfig;
use crate::error::{AssemblyError, InvalidTransition};
use crate::models::{OptionKey, Phase, Session};
use crate::session::assembler::AssembledTest;
use crate::session::review::build_review;

/// Something the taker asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start {
        test_id: String,
        requested_count: Option<i64>,
    },
    SelectAnswer(OptionKey),
    Next,
    Previous,
    Submit,
    /// Leave the `Error` phase.
    Retry,
    /// Leave the `Results` phase.
    Restart,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start { .. } => "Start",
            Action::SelectAnswer(_) => "SelectAnswer",
            Action::Next => "Next",
            Action::Previous => "Previous",
            Action::Submit => "Submit",
            Action::Retry => "Retry",
            Action::Restart => "Restart",
        }
    }
}

/// Input to the machine: taker actions plus completions stamped with the
/// session they were started for.
#[derive(Debug)]
pub enum Event {
    Action(Action),
    Assembled {
        session_id: Uuid,
        result: Result<AssembledTest, AssemblyError>,
    },
    Tick {
        session_id: Uuid,
    },
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Assemble {
        session_id: Uuid,
        test_id: String,
        requested_count: Option<i64>,
    },
    StartCountdown {
        session_id: Uuid,
        seconds: u64,
    },
    CancelCountdown,
}

pub struct SessionMachine {
    session: Session,
    config: QuizConfig,
}

impl SessionMachine {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            session: Session::new(config.total_budget_secs),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn handle(&mut self, event: Event) -> Result<Option<Effect>, InvalidTransition> {
        match event {
            Event::Action(action) => self.dispatch(action),
            Event::Assembled { session_id, result } => self.on_assembled(session_id, result),
            Event::Tick { session_id } => self.on_tick(session_id),
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Option<Effect>, InvalidTransition> {
        let name = action.name();
        match action {
            Action::Start {
                test_id,
                requested_count,
            } => self.start(test_id, requested_count),
            Action::SelectAnswer(option) => {
                self.require(name, Phase::Active)?;
                let index = self.session.current_index;
                self.session.answers.record(index, option);
                Ok(None)
            }
            Action::Next => {
                self.require(name, Phase::Active)?;
                let index = self.session.current_index;
                if !self.session.answers.is_answered(index) {
                    return Err(InvalidTransition::Unanswered { index });
                }
                if self.session.is_last_question() {
                    return Err(InvalidTransition::AtLastQuestion);
                }
                self.session.current_index += 1;
                Ok(None)
            }
            Action::Previous => {
                self.require(name, Phase::Active)?;
                if self.session.current_index == 0 {
                    return Err(InvalidTransition::AtFirstQuestion);
                }
                self.session.current_index -= 1;
                Ok(None)
            }
            Action::Submit => {
                self.require(name, Phase::Active)?;
                let index = self.session.current_index;
                if !self.session.is_last_question() {
                    return Err(InvalidTransition::NotLastQuestion { index });
                }
                if !self.session.answers.is_answered(index) {
                    return Err(InvalidTransition::Unanswered { index });
                }
                Ok(Some(self.finish()))
            }
            Action::Retry => {
                self.require(name, Phase::Error)?;
                self.reset();
                Ok(None)
            }
            Action::Restart => {
                self.require(name, Phase::Results)?;
                self.reset();
                Ok(Some(Effect::CancelCountdown))
            }
        }
    }

    fn start(
        &mut self,
        test_id: String,
        requested_count: Option<i64>,
    ) -> Result<Option<Effect>, InvalidTransition> {
        self.require("Start", Phase::Setup)?;
        let test_id = test_id.trim().to_string();
        if test_id.is_empty() {
            return Err(InvalidTransition::EmptyTestId);
        }

        let session = &mut self.session;
        session.id = Uuid::new_v4();
        session.phase = Phase::Loading;
        session.test_id = test_id.clone();
        session.requested_count = requested_count;
        session.error = None;

        Ok(Some(Effect::Assemble {
            session_id: session.id,
            test_id,
            requested_count,
        }))
    }

    fn on_assembled(
        &mut self,
        session_id: Uuid,
        result: Result<AssembledTest, AssemblyError>,
    ) -> Result<Option<Effect>, InvalidTransition> {
        self.require_current(session_id)?;
        self.require("Assembled", Phase::Loading)?;

        let session = &mut self.session;
        match result {
            Ok(test) => {
                session.questions = test.questions;
                session.current_index = 0;
                session.answers = Default::default();
                session.time_remaining_secs = test.time_budget_secs;
                session.phase = Phase::Active;
                // Nothing would ever tick a zero budget down.
                if test.time_budget_secs == 0 {
                    return Ok(Some(self.finish()));
                }
                Ok(Some(Effect::StartCountdown {
                    session_id,
                    seconds: test.time_budget_secs,
                }))
            }
            Err(error) => {
                session.questions.clear();
                session.error = Some(error);
                session.phase = Phase::Error;
                Ok(None)
            }
        }
    }

    fn on_tick(&mut self, session_id: Uuid) -> Result<Option<Effect>, InvalidTransition> {
        self.require_current(session_id)?;
        self.require("Tick", Phase::Active)?;

        self.session.time_remaining_secs = self.session.time_remaining_secs.saturating_sub(1);
        if self.session.time_remaining_secs == 0 {
            return Ok(Some(self.finish()));
        }
        Ok(None)
    }

    /// Enter `Results`, scoring whatever answers are recorded.
    fn finish(&mut self) -> Effect {
        self.session.review = Some(build_review(
            &self.session.questions,
            &self.session.answers,
        ));
        self.session.phase = Phase::Results;
        Effect::CancelCountdown
    }

    fn reset(&mut self) {
        self.session = Session::new(self.config.total_budget_secs);
    }

    fn require(&self, action: &'static str, phase: Phase) -> Result<(), InvalidTransition> {
        if self.session.phase == phase {
            Ok(())
        } else {
            Err(InvalidTransition::WrongPhase {
                action,
                phase: self.session.phase,
            })
        }
    }

    fn require_current(&self, session_id: Uuid) -> Result<(), InvalidTransition> {
        if self.session.id == session_id {
            Ok(())
        } else {
            Err(InvalidTransition::StaleSession)
        }
    }
}
