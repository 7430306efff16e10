use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::api::{HttpQuizApi, QuizApi};
use crate::config::{ApiConfig, QuizSettings};
use crate::error::AppServicesError;
use crate::report_service::ReportService;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services over one storage backend and one API client.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    reports: Arc<ReportService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP quiz API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        api_config: ApiConfig,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(api_config)?);
        Ok(Self::from_parts(clock, api, &storage, settings))
    }

    /// Wire services over an existing storage and API, e.g. in-memory fakes.
    #[must_use]
    pub fn from_parts(
        clock: Clock,
        api: Arc<dyn QuizApi>,
        storage: &Storage,
        settings: QuizSettings,
    ) -> Self {
        let quiz_loop = Arc::new(
            QuizLoopService::new(clock, Arc::clone(&api), Arc::clone(&storage.values))
                .with_settings(settings),
        );
        let reports = Arc::new(ReportService::new(api));
        Self { quiz_loop, reports }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn reports(&self) -> Arc<ReportService> {
        Arc::clone(&self.reports)
    }
}
