#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod config;
pub mod error;
pub mod persistence;
pub mod question_sync;
pub mod report_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use api::{HttpQuizApi, QuestionPatch, QuizApi, StartedQuiz};
pub use app_services::AppServices;
pub use config::{ApiConfig, QuizSettings};
pub use error::{ApiError, AppServicesError, ConfigError, ReportError, SessionError};
pub use persistence::PersistenceSync;
pub use question_sync::QuestionSync;
pub use report_service::ReportService;
pub use sessions::{QuizLoopService, QuizSessionService};
