use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use quiz_core::model::{Question, QuizId, QuizResults};

use super::{QuestionPatch, QuizApi, StartedQuiz};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// `QuizApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: Client,
    config: ApiConfig,
}

impl HttpQuizApi {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn read_body(&self, what: &str, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        // Error statuses may still carry a `{success: false, message}` body.
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        error!("quiz API {what} failed: {status}");
        match rejection(&body) {
            Some(err) => Err(err),
            None => Err(ApiError::HttpStatus(status)),
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        what: &str,
        segments: &[&str],
        body: &T,
    ) -> Result<Value, ApiError> {
        let url = self.config.endpoint(segments);
        debug!("quiz API {what}: POST {url}");
        let response = self.client.post(url).json(body).send().await?;
        self.read_body(what, response).await
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn start_quiz(&self, email: &str) -> Result<StartedQuiz, ApiError> {
        let body = self
            .post_json("start", &["quiz", "start"], &serde_json::json!({ "email": email }))
            .await?;
        decode_start(body)
    }

    async fn update_question(
        &self,
        quiz_id: &QuizId,
        index: usize,
        patch: &QuestionPatch,
    ) -> Result<(), ApiError> {
        let index = index.to_string();
        let url = self
            .config
            .endpoint(["quiz", quiz_id.as_str(), "question", index.as_str()]);
        debug!("quiz API update: PUT {url}");
        let response = self.client.put(url).json(patch).send().await?;
        let body = self.read_body("update", response).await?;
        match rejection(&body) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn submit_quiz(
        &self,
        quiz_id: &QuizId,
        time_taken: u32,
    ) -> Result<QuizResults, ApiError> {
        let body = self
            .post_json(
                "submit",
                &["quiz", quiz_id.as_str(), "submit"],
                &serde_json::json!({ "time_taken": time_taken }),
            )
            .await?;
        decode_submit(body)
    }

    async fn get_results(&self, quiz_id: &QuizId) -> Result<QuizResults, ApiError> {
        let url = self.config.endpoint(["quiz", quiz_id.as_str(), "results"]);
        debug!("quiz API results: GET {url}");
        let response = self.client.get(url).send().await?;
        let body = self.read_body("results", response).await?;
        decode_results(body)
    }
}

//
// ─── DECODING ──────────────────────────────────────────────────────────────────
//

/// `Some` when the body is an explicit `success: false` envelope.
fn rejection(body: &Value) -> Option<ApiError> {
    match body.get("success").and_then(Value::as_bool) {
        Some(false) => Some(ApiError::Rejected(
            body.get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
        )),
        _ => None,
    }
}

/// Calls that return data require an explicit `success: true`.
fn require_success(body: &Value) -> Result<(), ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    Err(rejection(body).unwrap_or(ApiError::Rejected(None)))
}

fn decode_start(mut body: Value) -> Result<StartedQuiz, ApiError> {
    require_success(&body)?;
    let quiz_id = match body.get("quiz_id") {
        Some(Value::String(id)) if !id.trim().is_empty() => QuizId::new(id.trim()),
        Some(Value::Number(id)) => QuizId::new(id.to_string()),
        _ => return Err(ApiError::MissingField("quiz_id")),
    };
    let questions = match body.get_mut("questions") {
        Some(questions) => serde_json::from_value::<Vec<Question>>(questions.take())?,
        None => return Err(ApiError::MissingField("questions")),
    };
    Ok(StartedQuiz { quiz_id, questions })
}

fn decode_submit(body: Value) -> Result<QuizResults, ApiError> {
    require_success(&body)?;
    Ok(serde_json::from_value(body)?)
}

fn decode_results(mut body: Value) -> Result<QuizResults, ApiError> {
    require_success(&body)?;
    match body.get_mut("quiz") {
        Some(quiz) => Ok(serde_json::from_value(quiz.take())?),
        None => Err(ApiError::MissingField("quiz")),
    }
}
