mod question;
mod session;

pub use question::{MISSING_PROMPT, OptionKey, Question, QuestionRecord};
pub use session::{AnswerSheet, Phase, Session, format_clock};
