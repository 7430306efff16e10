use std::sync::Arc;

use tracing::{debug, info};

use quiz_core::model::{Answer, QuizId, QuizResults};
use quiz_core::session::{Action, QuizSession, TickOutcome, TransitionError};

use crate::api::{QuestionPatch, QuizApi};
use crate::error::SessionError;
use crate::persistence::PersistenceSync;
use crate::question_sync::QuestionSync;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A running quiz: the session state plus its remote and local side effects.
///
/// Every mutation goes through the session reducer first; remote patches and
/// storage writes follow only when the transition was accepted.
pub struct QuizSessionService {
    session: QuizSession,
    api: Arc<dyn QuizApi>,
    sync: QuestionSync,
    persistence: PersistenceSync,
}

impl QuizSessionService {
    pub(crate) fn new(
        session: QuizSession,
        api: Arc<dyn QuizApi>,
        sync: QuestionSync,
        persistence: PersistenceSync,
    ) -> Self {
        Self {
            session,
            api,
            sync,
            persistence,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn quiz_id(&self) -> Option<&QuizId> {
        self.session.quiz_id()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_completed()
    }

    fn require_quiz_id(&self) -> Result<QuizId, SessionError> {
        self.session
            .quiz_id()
            .cloned()
            .ok_or(SessionError::Transition(TransitionError::NotStarted))
    }

    fn require_current(&self) -> Result<usize, SessionError> {
        self.session
            .current_index()
            .ok_or(SessionError::Transition(TransitionError::NoCurrentQuestion))
    }

    async fn dispatch_persisted(&mut self, action: Action) -> Result<(), SessionError> {
        self.session.dispatch(action)?;
        self.persistence.write_through(&self.session).await;
        Ok(())
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Make `index` the current question. Returns `false` if it already was.
    ///
    /// The question being left gets its accumulated time pushed to the server
    /// and the new one is marked visited.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` for an out-of-range index or a quiz
    /// that is not running.
    pub fn go_to(&mut self, index: usize) -> Result<bool, SessionError> {
        let previous = self.session.current_index();
        if previous == Some(index) {
            self.session.validate(&Action::SetCurrentQuestion(index))?;
            return Ok(false);
        }

        self.session.dispatch(Action::SetCurrentQuestion(index))?;
        let quiz_id = self.require_quiz_id()?;
        if let Some(left) = previous {
            self.sync.send(
                &quiz_id,
                left,
                QuestionPatch::time_spent(self.session.time_spent_on(left)),
            );
        }
        self.sync.send(&quiz_id, index, QuestionPatch::visited());
        Ok(true)
    }

    /// Move to the following question; stays put on the last one.
    ///
    /// # Errors
    ///
    /// See [`QuizSessionService::go_to`].
    pub fn next(&mut self) -> Result<bool, SessionError> {
        let total = self.session.total_questions();
        match self.session.current_index() {
            Some(index) if index + 1 < total => self.go_to(index + 1),
            Some(_) => Ok(false),
            None => self.go_to(0),
        }
    }

    /// Move to the preceding question; stays put on the first one.
    ///
    /// # Errors
    ///
    /// See [`QuizSessionService::go_to`].
    pub fn prev(&mut self) -> Result<bool, SessionError> {
        match self.session.current_index() {
            Some(index) if index > 0 => self.go_to(index - 1),
            Some(_) => Ok(false),
            None => self.go_to(0),
        }
    }

    //
    // ─── ANSWERS & MARKERS ─────────────────────────────────────────────────────
    //

    /// Record `answer` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` if no question is current or the quiz
    /// is not running.
    pub fn answer(&mut self, answer: Answer) -> Result<(), SessionError> {
        let index = self.require_current()?;
        self.session.dispatch(Action::SetAnswer(answer.clone()))?;
        let quiz_id = self.require_quiz_id()?;
        self.sync.send(&quiz_id, index, QuestionPatch::answered(answer));
        Ok(())
    }

    /// Pick an option on the current question.
    ///
    /// Single-choice questions replace the answer; multi-select questions
    /// toggle `choice` in the current set.
    ///
    /// # Errors
    ///
    /// See [`QuizSessionService::answer`].
    pub fn select_option(&mut self, choice: &str) -> Result<Answer, SessionError> {
        let index = self.require_current()?;
        let is_multi = self
            .session
            .question(index)
            .is_some_and(quiz_core::model::Question::is_multi);
        let answer = if is_multi {
            Answer::toggled(self.session.answer(index), choice)
        } else {
            Answer::single(choice)
        };
        self.answer(answer.clone())?;
        Ok(answer)
    }

    /// Flip the bookmark on the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` if no question is current or the quiz
    /// is not running.
    pub async fn toggle_bookmark(&mut self) -> Result<bool, SessionError> {
        let index = self.require_current()?;
        self.dispatch_persisted(Action::ToggleBookmark(index)).await?;
        Ok(self.session.bookmarked().contains(&index))
    }

    /// Flip the review-later flag on the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` if no question is current or the quiz
    /// is not running.
    pub async fn toggle_review_later(&mut self) -> Result<bool, SessionError> {
        let index = self.require_current()?;
        self.dispatch_persisted(Action::ToggleReviewLater(index))
            .await?;
        Ok(self.session.review_later().contains(&index))
    }

    /// Replace the note on the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` if no question is current or the quiz
    /// is not running.
    pub async fn set_note(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        let index = self.require_current()?;
        self.dispatch_persisted(Action::SetNote {
            index,
            text: text.into(),
        })
        .await
    }

    /// Reveal the hint for the current question.
    ///
    /// Returns `true` the first time a hint is used on this question; only
    /// that first use is recorded and reported to the server.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` if no question is current or the quiz
    /// is not running.
    pub fn use_hint(&mut self) -> Result<bool, SessionError> {
        let index = self.require_current()?;
        if self.session.hint_used().contains(&index) {
            return Ok(false);
        }
        self.session.dispatch(Action::SetHintUsed(index))?;
        let quiz_id = self.require_quiz_id()?;
        self.sync.send(&quiz_id, index, QuestionPatch::hint_used());
        Ok(true)
    }

    //
    // ─── CLOCK ─────────────────────────────────────────────────────────────────
    //

    /// Advance the quiz by one second.
    ///
    /// When the countdown reaches zero the quiz is submitted on the spot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the forced submission fails. The quiz then
    /// stays open at zero seconds so [`QuizSessionService::submit`] can be retried.
    pub async fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        let outcome = self.session.tick();
        match outcome {
            TickOutcome::Halted => {}
            TickOutcome::Running { .. } => self.persistence.write_through(&self.session).await,
            TickOutcome::Expired => {
                self.persistence.write_through(&self.session).await;
                info!(
                    "time is up for quiz {}; submitting",
                    self.require_quiz_id()?
                );
                self.submit().await?;
            }
        }
        Ok(outcome)
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Submit the quiz and record the graded results.
    ///
    /// Pending question patches are delivered first so the submission is the
    /// last call the server sees for this quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the quiz was already submitted and
    /// `SessionError::Api` if the server call fails; the session is unchanged
    /// in both cases.
    pub async fn submit(&mut self) -> Result<QuizResults, SessionError> {
        if self.session.is_completed() {
            return Err(SessionError::Completed);
        }
        let quiz_id = self.require_quiz_id()?;

        if let Some(index) = self.session.current_index() {
            self.sync.send(
                &quiz_id,
                index,
                QuestionPatch::time_spent(self.session.time_spent_on(index)),
            );
        }
        self.sync.flush().await;
        self.persistence.write_through(&self.session).await;

        let time_taken = self.session.time_taken();
        debug!("submitting quiz {quiz_id} after {time_taken}s");
        let results = self.api.submit_quiz(&quiz_id, time_taken).await?;
        self.session.dispatch(Action::Complete(results.clone()))?;
        info!(
            "quiz {quiz_id} completed: {}/{}",
            results.score, results.total_questions
        );
        Ok(results)
    }

    /// Wait until queued question patches have been attempted.
    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    /// Drop all quiz state. Stored bookmarks, notes and times stay on disk.
    pub fn reset(&mut self) {
        // Reset is accepted in every state.
        let _ = self.session.dispatch(Action::Reset);
        self.persistence.detach();
    }
}
