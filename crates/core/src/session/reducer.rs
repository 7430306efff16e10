use std::sync::Arc;
use thiserror::Error;

use super::action::{Action, StartQuiz};
use super::persisted::PersistedState;
use super::state::QuizSession;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a transition is rejected. A rejected transition leaves the session unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("quiz has not started")]
    NotStarted,

    #[error("quiz is already completed")]
    Completed,

    #[error("question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no question is current")]
    NoCurrentQuestion,

    #[error("timer cannot move up from {remaining}s to {requested}s")]
    TimerIncrease { remaining: u32, requested: u32 },
}

//
// ─── TRANSITIONS ───────────────────────────────────────────────────────────────
//

impl QuizSession {
    /// Pure transition: returns the next state, or the reason `action` was rejected.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` when the action's precondition does not hold.
    pub fn apply(&self, action: Action) -> Result<QuizSession, TransitionError> {
        self.validate(&action)?;
        let mut next = self.clone();
        next.reduce(action);
        Ok(next)
    }

    /// Apply `action` in place. On error the session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` when the action's precondition does not hold.
    pub fn dispatch(&mut self, action: Action) -> Result<(), TransitionError> {
        self.validate(&action)?;
        self.reduce(action);
        Ok(())
    }

    /// Check an action's precondition against the current state.
    ///
    /// `START` and `RESET` are always accepted. Every other transition
    /// requires a started quiz that has not completed.
    ///
    /// # Errors
    ///
    /// Returns the `TransitionError` the action would fail with.
    pub fn validate(&self, action: &Action) -> Result<(), TransitionError> {
        match action {
            Action::Start(_) | Action::Reset => return Ok(()),
            _ => {}
        }
        if !self.is_started() {
            return Err(TransitionError::NotStarted);
        }
        if self.completed {
            return Err(TransitionError::Completed);
        }

        match action {
            Action::SetCurrentQuestion(index)
            | Action::ToggleBookmark(index)
            | Action::ToggleReviewLater(index)
            | Action::SetNote { index, .. }
            | Action::SetHintUsed(index)
            | Action::IncrementTime(index) => self.check_index(*index),
            Action::SetAnswer(_) => match self.current {
                Some(index) => self.check_index(index),
                None => Err(TransitionError::NoCurrentQuestion),
            },
            Action::UpdateTimer(seconds) => {
                if *seconds > self.time_remaining {
                    Err(TransitionError::TimerIncrease {
                        remaining: self.time_remaining,
                        requested: *seconds,
                    })
                } else {
                    Ok(())
                }
            }
            Action::LoadPersisted(persisted) => match persisted.max_index() {
                Some(index) => self.check_index(index),
                None => Ok(()),
            },
            Action::Complete(_) => Ok(()),
            Action::Start(_) | Action::Reset => Ok(()),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), TransitionError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(TransitionError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            })
        }
    }

    /// Apply an already-validated action.
    pub(super) fn reduce(&mut self, action: Action) {
        match action {
            Action::Start(start) => self.start(start),
            Action::SetCurrentQuestion(index) => {
                self.current = Some(index);
                self.visited.insert(index);
            }
            Action::SetAnswer(answer) => {
                if let Some(index) = self.current {
                    self.answers.insert(index, answer);
                    self.attempted.insert(index);
                }
            }
            Action::ToggleBookmark(index) => toggle(&mut self.bookmarked, index),
            Action::ToggleReviewLater(index) => toggle(&mut self.review_later, index),
            Action::SetNote { index, text } => {
                self.notes.insert(index, text);
            }
            Action::SetHintUsed(index) => {
                self.hint_used.insert(index);
            }
            Action::IncrementTime(index) => {
                let spent = self.time_spent.entry(index).or_insert(0);
                *spent = spent.saturating_add(1);
            }
            Action::UpdateTimer(seconds) => self.time_remaining = seconds,
            Action::Complete(results) => {
                self.completed = true;
                self.results = Some(results);
            }
            Action::Reset => *self = QuizSession::new(),
            Action::LoadPersisted(persisted) => self.load_persisted(persisted),
        }
    }

    fn start(&mut self, start: StartQuiz) {
        let StartQuiz {
            quiz_id,
            email,
            questions,
            duration_secs,
            started_at,
        } = start;

        *self = QuizSession::new();
        self.quiz_id = Some(quiz_id);
        self.email = email;
        self.questions = Arc::from(questions);
        self.duration_secs = duration_secs;
        self.time_remaining = duration_secs;
        self.started_at = Some(started_at);
    }

    fn load_persisted(&mut self, persisted: PersistedState) {
        let PersistedState {
            bookmarked,
            review_later,
            notes,
            time_spent,
        } = persisted;
        self.bookmarked = bookmarked;
        self.review_later = review_later;
        self.notes = notes;
        self.time_spent = time_spent;
    }
}

fn toggle(set: &mut std::collections::BTreeSet<usize>, index: usize) {
    if !set.remove(&index) {
        set.insert(index);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Difficulty, Question, QuizId, QuizResults};
    use crate::time::fixed_now;

    fn question(correct: &str) -> Question {
        Question {
            prompt: format!("Q {correct}"),
            all_answers: vec!["A".into(), "B".into(), "C".into()],
            incorrect_answers: Vec::new(),
            correct_answer: Answer::single(correct),
            difficulty: Difficulty::Easy,
            category: Some("General".into()),
            kind: None,
            mode: None,
        }
    }

    fn started(len: usize) -> QuizSession {
        let mut session = QuizSession::new();
        session
            .dispatch(Action::Start(StartQuiz {
                quiz_id: QuizId::new("q1"),
                email: "ada@example.com".into(),
                questions: (0..len).map(|_| question("A")).collect(),
                duration_secs: 60,
                started_at: fixed_now(),
            }))
            .unwrap();
        session
    }

    fn results() -> QuizResults {
        QuizResults {
            score: 1,
            total_questions: 3,
            time_taken: 10,
            email: "ada@example.com".into(),
            questions: Vec::new(),
        }
    }

    #[test]
    fn start_resets_derived_fields() {
        let mut session = started(3);
        session.dispatch(Action::SetCurrentQuestion(1)).unwrap();
        session.dispatch(Action::SetAnswer(Answer::single("B"))).unwrap();
        session.dispatch(Action::ToggleBookmark(2)).unwrap();

        session
            .dispatch(Action::Start(StartQuiz {
                quiz_id: QuizId::new("q2"),
                email: "bob@example.com".into(),
                questions: vec![question("C")],
                duration_secs: 90,
                started_at: fixed_now(),
            }))
            .unwrap();

        assert_eq!(session.quiz_id(), Some(&QuizId::new("q2")));
        assert_eq!(session.total_questions(), 1);
        assert_eq!(session.current_index(), None);
        assert!(session.answers().is_empty());
        assert!(session.visited().is_empty());
        assert!(session.bookmarked().is_empty());
        assert_eq!(session.time_remaining(), 90);
        assert!(!session.is_completed());
    }

    #[test]
    fn navigation_marks_visited() {
        let mut session = started(3);
        session.dispatch(Action::SetCurrentQuestion(2)).unwrap();
        session.dispatch(Action::SetCurrentQuestion(0)).unwrap();

        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.visited().iter().copied().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn answer_requires_current_question() {
        let session = started(2);
        let err = session.apply(Action::SetAnswer(Answer::single("A"))).unwrap_err();
        assert_eq!(err, TransitionError::NoCurrentQuestion);
    }

    #[test]
    fn empty_multi_select_still_counts_as_attempted() {
        let mut session = started(2);
        session.dispatch(Action::SetCurrentQuestion(1)).unwrap();
        session
            .dispatch(Action::SetAnswer(Answer::multi(Vec::<String>::new())))
            .unwrap();

        assert!(session.attempted().contains(&1));
        assert_eq!(session.answer(1), Some(&Answer::multi(Vec::<String>::new())));
    }

    #[test]
    fn answers_overwrite_but_attempted_stays() {
        let mut session = started(2);
        session.dispatch(Action::SetCurrentQuestion(0)).unwrap();
        session.dispatch(Action::SetAnswer(Answer::single("A"))).unwrap();
        session.dispatch(Action::SetAnswer(Answer::single("B"))).unwrap();

        assert_eq!(session.answer(0), Some(&Answer::single("B")));
        assert_eq!(session.attempted().len(), 1);
    }

    #[test]
    fn out_of_range_indices_are_rejected_without_change() {
        let session = started(2);
        for action in [
            Action::SetCurrentQuestion(2),
            Action::ToggleBookmark(5),
            Action::ToggleReviewLater(2),
            Action::SetNote {
                index: 9,
                text: "x".into(),
            },
            Action::SetHintUsed(3),
            Action::IncrementTime(2),
        ] {
            let name = action.name();
            let err = session.apply(action).unwrap_err();
            assert!(
                matches!(err, TransitionError::IndexOutOfRange { len: 2, .. }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn dispatch_leaves_state_untouched_on_error() {
        let mut session = started(2);
        session.dispatch(Action::ToggleBookmark(1)).unwrap();
        let before = session.clone();

        assert!(session.dispatch(Action::ToggleBookmark(7)).is_err());
        assert_eq!(session, before);
    }

    #[test]
    fn actions_before_start_are_rejected() {
        let session = QuizSession::new();
        assert_eq!(
            session.apply(Action::ToggleBookmark(0)).unwrap_err(),
            TransitionError::NotStarted
        );
        assert_eq!(
            session
                .apply(Action::LoadPersisted(PersistedState::default()))
                .unwrap_err(),
            TransitionError::NotStarted
        );
    }

    #[test]
    fn toggles_flip_membership() {
        let mut session = started(3);
        session.dispatch(Action::ToggleBookmark(1)).unwrap();
        session.dispatch(Action::ToggleReviewLater(1)).unwrap();
        assert!(session.bookmarked().contains(&1));
        assert!(session.review_later().contains(&1));

        session.dispatch(Action::ToggleBookmark(1)).unwrap();
        assert!(!session.bookmarked().contains(&1));
        assert!(session.review_later().contains(&1));
    }

    #[test]
    fn notes_are_last_write_wins() {
        let mut session = started(2);
        session
            .dispatch(Action::SetNote {
                index: 1,
                text: "first".into(),
            })
            .unwrap();
        session
            .dispatch(Action::SetNote {
                index: 1,
                text: "second".into(),
            })
            .unwrap();
        assert_eq!(session.note(1), "second");
        assert_eq!(session.note(0), "");
    }

    #[test]
    fn hint_use_is_idempotent() {
        let mut session = started(2);
        session.dispatch(Action::SetHintUsed(0)).unwrap();
        let once = session.clone();
        session.dispatch(Action::SetHintUsed(0)).unwrap();
        assert_eq!(session, once);
    }

    #[test]
    fn timer_only_counts_down() {
        let mut session = started(1);
        session.dispatch(Action::UpdateTimer(59)).unwrap();
        assert_eq!(session.time_remaining(), 59);
        assert_eq!(session.time_taken(), 1);

        let err = session.apply(Action::UpdateTimer(60)).unwrap_err();
        assert_eq!(
            err,
            TransitionError::TimerIncrease {
                remaining: 59,
                requested: 60
            }
        );
    }

    #[test]
    fn complete_happens_once_and_freezes_session() {
        let mut session = started(2);
        session.dispatch(Action::SetCurrentQuestion(0)).unwrap();
        session.dispatch(Action::Complete(results())).unwrap();

        assert!(session.is_completed());
        assert_eq!(session.results().map(|r| r.score), Some(1));

        let frozen = session.clone();
        for action in [
            Action::Complete(results()),
            Action::SetAnswer(Answer::single("A")),
            Action::UpdateTimer(10),
            Action::IncrementTime(0),
            Action::ToggleBookmark(0),
        ] {
            assert_eq!(
                session.dispatch(action).unwrap_err(),
                TransitionError::Completed
            );
        }
        assert_eq!(session, frozen);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut session = started(2);
        session.dispatch(Action::SetCurrentQuestion(1)).unwrap();
        session.dispatch(Action::Complete(results())).unwrap();

        session.dispatch(Action::Reset).unwrap();
        assert_eq!(session, QuizSession::new());
    }

    #[test]
    fn load_persisted_replaces_fields_wholesale() {
        let mut session = started(3);
        session.dispatch(Action::ToggleBookmark(0)).unwrap();
        session.dispatch(Action::IncrementTime(0)).unwrap();

        let persisted = PersistedState {
            bookmarked: [2].into_iter().collect(),
            review_later: [1].into_iter().collect(),
            notes: [(1, "check units".to_string())].into_iter().collect(),
            time_spent: [(2, 14)].into_iter().collect(),
        };
        session
            .dispatch(Action::LoadPersisted(persisted.clone()))
            .unwrap();

        assert_eq!(session.persisted(), persisted);
    }

    #[test]
    fn load_persisted_rejects_foreign_indices() {
        let session = started(2);
        let persisted = PersistedState {
            notes: [(4, "from a longer quiz".to_string())].into_iter().collect(),
            ..PersistedState::default()
        };
        assert_eq!(
            session.apply(Action::LoadPersisted(persisted)).unwrap_err(),
            TransitionError::IndexOutOfRange { index: 4, len: 2 }
        );
    }
}
