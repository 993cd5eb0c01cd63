//! The session actor.
//!
//! One task owns the `SessionMachine` and the countdown. Actions from any
//! number of `QuizHandle`s, countdown ticks and assembly results are queued
//! and applied one at a time, so no two transitions ever overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::QuizConfig;
use crate::data::QuestionRepository;
use crate::error::ConfigError;
use crate::models::{Phase, Session};
use crate::session::assembler::Assembler;
use crate::session::machine::{Action, Effect, Event, SessionMachine};
use crate::session::timer::Countdown;

/// Cloneable front door to a running session.
#[derive(Clone)]
pub struct QuizHandle {
    actions: mpsc::UnboundedSender<Action>,
    state: watch::Receiver<Session>,
}

impl QuizHandle {
    /// Queue an action. Returns false once the runner has stopped.
    ///
    /// Actions the current phase does not allow are dropped by the runner.
    pub fn dispatch(&self, action: Action) -> bool {
        self.actions.send(action).is_ok()
    }

    /// Receiver notified after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }
}

pub struct QuizRunner {
    machine: SessionMachine,
    assembler: Assembler,
    tick_interval: Duration,
    countdown: Option<Countdown>,
    actions: mpsc::UnboundedReceiver<Action>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    state: watch::Sender<Session>,
}

impl QuizRunner {
    /// Start a runner on the current tokio runtime.
    ///
    /// The config is validated first. The runner stops once every
    /// `QuizHandle` has been dropped.
    pub fn spawn(
        config: QuizConfig,
        repository: Arc<dyn QuestionRepository>,
    ) -> Result<(QuizHandle, JoinHandle<()>), ConfigError> {
        config.validate()?;

        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let machine = SessionMachine::new(config.clone());
        let (state_tx, state_rx) = watch::channel(machine.session().clone());

        let runner = Self {
            machine,
            assembler: Assembler::new(repository, config.clone()),
            tick_interval: config.tick_interval(),
            countdown: None,
            actions: actions_rx,
            events_tx,
            events_rx,
            state: state_tx,
        };
        let task = tokio::spawn(runner.run());

        let handle = QuizHandle {
            actions: actions_tx,
            state: state_rx,
        };
        Ok((handle, task))
    }

    async fn run(mut self) {
        loop {
            let event = tokio::select! {
                action = self.actions.recv() => match action {
                    Some(action) => Event::Action(action),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => event,
            };
            self.handle(event);
        }

        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
        debug!("quiz runner stopped");
    }

    fn handle(&mut self, event: Event) {
        let before = self.machine.phase();

        match self.machine.handle(event) {
            Ok(effect) => {
                if let Some(effect) = effect {
                    self.apply(effect);
                }
                let after = self.machine.phase();
                if before != after {
                    self.log_phase_change(before, after);
                }
                self.state.send_replace(self.machine.session().clone());
            }
            Err(refused) => {
                debug!("ignored: {}", refused);
            }
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Assemble {
                session_id,
                test_id,
                requested_count,
            } => {
                let assembler = self.assembler.clone();
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = assembler.assemble(&test_id, requested_count).await;
                    if events.send(Event::Assembled { session_id, result }).is_err() {
                        debug!(%session_id, "runner gone before assembly finished");
                    }
                });
            }
            Effect::StartCountdown {
                session_id,
                seconds,
            } => {
                let countdown =
                    Countdown::start(session_id, seconds, self.tick_interval, self.events_tx.clone());
                if let Some(previous) = self.countdown.replace(countdown) {
                    previous.cancel();
                }
            }
            Effect::CancelCountdown => {
                if let Some(countdown) = self.countdown.take() {
                    countdown.cancel();
                }
            }
        }
    }

    fn log_phase_change(&self, before: Phase, after: Phase) {
        let session = self.machine.session();
        match after {
            Phase::Error => warn!(
                test_id = %session.test_id,
                "assembly failed: {}",
                session.error.as_ref().map(|e| e.to_string()).unwrap_or_default()
            ),
            Phase::Active => info!(
                test_id = %session.test_id,
                questions = session.total_questions(),
                seconds = session.time_remaining_secs,
                "session started"
            ),
            Phase::Results => {
                if let Some(review) = &session.review {
                    info!(
                        test_id = %session.test_id,
                        correct = review.total_correct,
                        wrong = review.total_wrong,
                        timed_out = session.time_remaining_secs == 0,
                        "session finished"
                    );
                }
            }
            _ => info!("phase {:?} -> {:?}", before, after),
        }
    }
}
