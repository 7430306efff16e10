mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use service::QuizSessionService;
pub use workflow::QuizLoopService;
