use std::sync::Arc;

use tracing::info;

use quiz_core::session::{Action, QuizSession, StartQuiz};
use storage::repository::KeyValueRepository;

use super::service::QuizSessionService;
use crate::Clock;
use crate::api::{QuizApi, StartedQuiz};
use crate::config::QuizSettings;
use crate::error::SessionError;
use crate::persistence::PersistenceSync;
use crate::question_sync::QuestionSync;

/// Orchestrates quiz start: remote creation, local hydration, first navigation.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    api: Arc<dyn QuizApi>,
    values: Arc<dyn KeyValueRepository>,
    settings: QuizSettings,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        api: Arc<dyn QuizApi>,
        values: Arc<dyn KeyValueRepository>,
    ) -> Self {
        Self {
            clock,
            api,
            values,
            settings: QuizSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    /// Start a quiz for `email` and open it on the first question.
    ///
    /// Must run inside a tokio runtime: the returned session owns a background
    /// worker for question patches.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the server call fails or is rejected, and
    /// `SessionError::Empty` if the quiz has no questions.
    pub async fn start_quiz(&self, email: &str) -> Result<QuizSessionService, SessionError> {
        let email = email.trim();
        let StartedQuiz { quiz_id, questions } = self.api.start_quiz(email).await?;
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        info!("started quiz {quiz_id} with {} questions", questions.len());

        let mut session = QuizSession::new();
        session.dispatch(Action::Start(StartQuiz {
            quiz_id,
            email: email.to_owned(),
            questions,
            duration_secs: self.settings.duration_secs,
            started_at: self.clock.now(),
        }))?;

        let mut persistence = PersistenceSync::new(Arc::clone(&self.values));
        persistence.hydrate(&mut session).await;

        let sync = QuestionSync::spawn(Arc::clone(&self.api));
        let mut service = QuizSessionService::new(session, Arc::clone(&self.api), sync, persistence);
        service.go_to(0)?;
        Ok(service)
    }
}
