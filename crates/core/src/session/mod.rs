mod action;
mod persisted;
mod reducer;
mod state;
mod timer;

pub use action::{Action, StartQuiz};
pub use persisted::PersistedState;
pub use reducer::TransitionError;
pub use state::{DEFAULT_DURATION_SECS, QuizSession, SessionProgress};
pub use timer::TickOutcome;
