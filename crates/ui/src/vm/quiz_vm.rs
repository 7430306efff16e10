use quiz_core::model::{Answer, QuizResults};
use quiz_core::session::{TickOutcome, TransitionError};
use services::{QuizSessionService, SessionError};

use crate::error::ViewError;

use super::nav_vm::{NavFilter, NavigatorVm, map_navigator};
use super::question_vm::{Feedback, QuestionVm, map_current_question, resolve_letter};
use super::time_fmt::format_datetime;
use super::timer_vm::{TimerVm, map_session_timer};

/// What the person at the keyboard asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Next,
    Prev,
    /// 1-based question number.
    GoTo(usize),
    /// Option letters. One letter toggles on multi-select questions; several
    /// letters replace the whole selection.
    Choose(Vec<String>),
    ToggleBookmark,
    ToggleReviewLater,
    Note(String),
    Hint,
    Filter(NavFilter),
    Submit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuizOutcome {
    Continue,
    Notice(String),
    Completed(QuizResults),
}

pub struct QuizVm {
    quiz: QuizSessionService,
    filter: NavFilter,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: QuizSessionService) -> Self {
        Self {
            quiz,
            filter: NavFilter::All,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizSessionService {
        &self.quiz
    }

    #[must_use]
    pub fn filter(&self) -> NavFilter {
        self.filter
    }

    #[must_use]
    pub fn started_label(&self) -> Option<String> {
        self.quiz.session().started_at().map(format_datetime)
    }

    #[must_use]
    pub fn question(&self) -> Option<QuestionVm> {
        map_current_question(self.quiz.session())
    }

    #[must_use]
    pub fn navigator(&self) -> NavigatorVm {
        map_navigator(self.quiz.session(), self.filter)
    }

    #[must_use]
    pub fn timer(&self) -> TimerVm {
        map_session_timer(self.quiz.session())
    }

    /// # Errors
    ///
    /// Returns `ViewError` for input that does not fit the current question
    /// and for rejected session operations; the quiz is unchanged either way.
    pub async fn apply(&mut self, intent: QuizIntent) -> Result<QuizOutcome, ViewError> {
        match intent {
            QuizIntent::Next => Ok(if self.quiz.next()? {
                QuizOutcome::Continue
            } else {
                QuizOutcome::Notice("Already at the last question".to_owned())
            }),
            QuizIntent::Prev => Ok(if self.quiz.prev()? {
                QuizOutcome::Continue
            } else {
                QuizOutcome::Notice("Already at the first question".to_owned())
            }),
            QuizIntent::GoTo(number) => {
                let total = self.quiz.session().total_questions();
                if number == 0 || number > total {
                    return Err(ViewError::NoSuchQuestion(number));
                }
                self.quiz.go_to(number - 1)?;
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::Choose(letters) => self.choose(&letters),
            QuizIntent::ToggleBookmark => {
                let on = self.quiz.toggle_bookmark().await?;
                Ok(notice(if on { "Bookmarked" } else { "Bookmark removed" }))
            }
            QuizIntent::ToggleReviewLater => {
                let on = self.quiz.toggle_review_later().await?;
                Ok(notice(if on {
                    "Marked for review"
                } else {
                    "Review flag removed"
                }))
            }
            QuizIntent::Note(text) => {
                let cleared = text.trim().is_empty();
                self.quiz.set_note(text.trim()).await?;
                Ok(notice(if cleared { "Note cleared" } else { "Note saved" }))
            }
            QuizIntent::Hint => {
                self.quiz.use_hint()?;
                Ok(self
                    .question()
                    .and_then(|q| q.hint)
                    .map_or(QuizOutcome::Continue, notice))
            }
            QuizIntent::Filter(filter) => {
                self.filter = filter;
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::Submit => Ok(QuizOutcome::Completed(self.quiz.submit().await?)),
        }
    }

    /// Feed one second of wall-clock time into the quiz.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Session` when the forced submission at zero fails.
    pub async fn tick(&mut self) -> Result<QuizOutcome, ViewError> {
        match self.quiz.tick().await? {
            TickOutcome::Expired => Ok(self
                .quiz
                .session()
                .results()
                .cloned()
                .map_or(QuizOutcome::Continue, QuizOutcome::Completed)),
            TickOutcome::Running { .. } | TickOutcome::Halted => Ok(QuizOutcome::Continue),
        }
    }

    /// Drop the quiz so a new one can start.
    pub fn reset(&mut self) {
        self.quiz.reset();
        self.filter = NavFilter::All;
    }

    fn choose(&mut self, letters: &[String]) -> Result<QuizOutcome, ViewError> {
        let Some(question) = self.quiz.session().current_question().cloned() else {
            return Err(SessionError::from(TransitionError::NoCurrentQuestion).into());
        };

        let values = letters
            .iter()
            .map(|letter| {
                resolve_letter(&question, letter)
                    .ok_or_else(|| ViewError::UnknownOption(letter.trim().to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let answer = match values.len() {
            0 => return Err(ViewError::UnknownOption(String::new())),
            1 => self.quiz.select_option(&values[0])?,
            _ if question.is_multi() => {
                let answer = Answer::multi(values);
                self.quiz.answer(answer.clone())?;
                answer
            }
            _ => return Err(ViewError::SingleChoiceOnly),
        };

        Ok(notice(Feedback::for_answer(&question, &answer).label()))
    }
}

fn notice(text: &str) -> QuizOutcome {
    QuizOutcome::Notice(text.to_owned())
}
