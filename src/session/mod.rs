//! The timed quiz session: assembly, state machine, countdown and scoring.

pub mod assembler;
pub mod machine;
pub mod review;
pub mod runner;
pub mod timer;

pub use assembler::{AssembledTest, Assembler, effective_count, parse_requested_count, time_budget_secs};
pub use machine::{Action, Effect, Event, SessionMachine};
pub use review::{OptionMark, Review, ReviewItem, ReviewOption, Selection, build_review};
pub use runner::{QuizHandle, QuizRunner};
pub use timer::Countdown;
