use std::sync::Arc;

use tracing::warn;

use quiz_core::analytics::QuizReport;
use quiz_core::model::{QuizId, QuizResults};

use crate::api::QuizApi;
use crate::error::ReportError;

/// Builds the post-quiz report from server results.
#[derive(Clone)]
pub struct ReportService {
    api: Arc<dyn QuizApi>,
}

impl ReportService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// Fetch detailed results and aggregate them.
    ///
    /// When the results call fails, `fallback` (usually the submit payload) is
    /// used instead.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Api` if the call fails and no fallback is given.
    pub async fn load_report(
        &self,
        quiz_id: &QuizId,
        fallback: Option<&QuizResults>,
    ) -> Result<QuizReport, ReportError> {
        match self.api.get_results(quiz_id).await {
            Ok(results) => Ok(QuizReport::from_results(&results)),
            Err(err) => match fallback {
                Some(results) => {
                    warn!("results for quiz {quiz_id} unavailable, using submit payload: {err}");
                    Ok(QuizReport::from_results(results))
                }
                None => Err(err.into()),
            },
        }
    }
}
