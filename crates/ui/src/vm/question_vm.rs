use quiz_core::model::{Answer, DEFAULT_CATEGORY, Difficulty, Question};
use quiz_core::session::QuizSession;

use super::markup::to_plain_text;
use super::time_fmt::format_duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    AllCorrect,
    Incorrect,
}

impl Feedback {
    /// Grade `answer` the way the question screen shows it right after a pick.
    #[must_use]
    pub fn for_answer(question: &Question, answer: &Answer) -> Self {
        match (question.is_correct(answer), question.is_multi()) {
            (true, true) => Self::AllCorrect,
            (true, false) => Self::Correct,
            (false, _) => Self::Incorrect,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Feedback::Correct => "Correct",
            Feedback::AllCorrect => "All correct",
            Feedback::Incorrect => "Incorrect",
        }
    }
}

#[must_use]
pub fn hint_text(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Think of the most straightforward definition or obvious choice.",
        Difficulty::Medium => "Consider related concepts and eliminate unlikely options.",
        Difficulty::Hard => "Break the problem down and watch for subtle distinctions.",
    }
}

#[must_use]
pub fn difficulty_badge(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "🟢 EASY",
        Difficulty::Medium => "🟡 MEDIUM",
        Difficulty::Hard => "🔴 HARD",
    }
}

/// Letter shown next to the option at `position`.
///
/// Boolean questions use `T`/`F`; everything else counts up from `A`, falling
/// back to the 1-based number past `Z`.
#[must_use]
pub fn option_letter(question: &Question, option: &str, position: usize) -> String {
    if question.is_boolean() {
        if let Some(first) = option.chars().next() {
            return first.to_uppercase().to_string();
        }
    }
    match u8::try_from(position) {
        Ok(offset) if offset < 26 => char::from(b'A' + offset).to_string(),
        _ => (position + 1).to_string(),
    }
}

/// Option value behind a typed letter, matched case-insensitively.
#[must_use]
pub fn resolve_letter(question: &Question, letter: &str) -> Option<String> {
    let wanted = letter.trim();
    question
        .options()
        .into_iter()
        .enumerate()
        .find(|(position, option)| {
            option_letter(question, option, *position).eq_ignore_ascii_case(wanted)
        })
        .map(|(_, option)| option)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub letter: String,
    /// Raw option value, as sent back in answers.
    pub value: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub progress_label: String,
    pub prompt: String,
    pub badge: &'static str,
    pub category: String,
    pub is_multi: bool,
    pub options: Vec<OptionVm>,
    pub feedback: Option<Feedback>,
    /// Present once a hint was used on this question.
    pub hint: Option<&'static str>,
    pub bookmarked: bool,
    pub review_later: bool,
    pub note: String,
    pub time_spent_label: String,
}

#[must_use]
pub fn map_question(session: &QuizSession, index: usize) -> Option<QuestionVm> {
    let question = session.question(index)?;
    let answer = session.answer(index);

    let options = question
        .options()
        .into_iter()
        .enumerate()
        .map(|(position, value)| OptionVm {
            letter: option_letter(question, &value, position),
            text: to_plain_text(&value),
            selected: answer.is_some_and(|a| a.contains(&value)),
            value,
        })
        .collect();

    Some(QuestionVm {
        index,
        progress_label: format!("Question {} of {}", index + 1, session.total_questions()),
        prompt: to_plain_text(&question.prompt),
        badge: difficulty_badge(question.difficulty),
        category: to_plain_text(question.category.as_deref().unwrap_or(DEFAULT_CATEGORY)),
        is_multi: question.is_multi(),
        options,
        feedback: answer.map(|a| Feedback::for_answer(question, a)),
        hint: session
            .hint_used()
            .contains(&index)
            .then(|| hint_text(question.difficulty)),
        bookmarked: session.bookmarked().contains(&index),
        review_later: session.review_later().contains(&index),
        note: session.note(index).to_owned(),
        time_spent_label: format_duration(session.time_spent_on(index)),
    })
}

#[must_use]
pub fn map_current_question(session: &QuizSession) -> Option<QuestionVm> {
    session
        .current_index()
        .and_then(|index| map_question(session, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::test_harness::{sample_questions, started_session};
    use quiz_core::session::Action;

    #[test]
    fn maps_plain_single_choice_question() {
        let session = started_session(1800);
        let vm = map_current_question(&session).unwrap();

        assert_eq!(vm.progress_label, "Question 1 of 3");
        assert_eq!(vm.prompt, "Capital of \"France\"?");
        assert_eq!(vm.badge, "🟢 EASY");
        assert_eq!(vm.category, "Geography: Europe");
        assert!(!vm.is_multi);
        let letters: Vec<&str> = vm.options.iter().map(|o| o.letter.as_str()).collect();
        assert_eq!(letters, ["A", "B", "C"]);
        assert_eq!(vm.options[2].value, "Paris");
        assert!(vm.options.iter().all(|o| !o.selected));
        assert_eq!(vm.feedback, None);
        assert_eq!(vm.hint, None);
        assert_eq!(vm.time_spent_label, "0m 0s");
    }

    #[test]
    fn boolean_questions_use_true_false_letters() {
        let questions = sample_questions();
        let boolean = &questions[1];
        assert_eq!(resolve_letter(boolean, "t").as_deref(), Some("True"));
        assert_eq!(resolve_letter(boolean, "F").as_deref(), Some("False"));
        assert_eq!(resolve_letter(boolean, "A"), None);

        let mut session = started_session(1800);
        session.dispatch(Action::SetCurrentQuestion(1)).unwrap();
        let vm = map_current_question(&session).unwrap();
        assert_eq!(vm.category, "General");
        assert_eq!(vm.options[0].letter, "T");
        assert_eq!(vm.options[1].letter, "F");
    }

    #[test]
    fn feedback_and_selection_follow_the_answer() {
        let mut session = started_session(1800);
        session
            .dispatch(Action::SetAnswer(Answer::single("Lyon")))
            .unwrap();
        let vm = map_current_question(&session).unwrap();
        assert_eq!(vm.feedback, Some(Feedback::Incorrect));
        assert!(vm.options[0].selected);

        session.dispatch(Action::SetCurrentQuestion(2)).unwrap();
        session
            .dispatch(Action::SetAnswer(Answer::multi(["5", "2"])))
            .unwrap();
        let vm = map_current_question(&session).unwrap();
        assert!(vm.is_multi);
        assert_eq!(vm.feedback, Some(Feedback::AllCorrect));
        assert_eq!(vm.feedback.map(Feedback::label), Some("All correct"));
        let selected: Vec<&str> = vm
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.letter.as_str())
            .collect();
        assert_eq!(selected, ["A", "C"]);
    }

    #[test]
    fn markers_hint_and_note_show_up() {
        let mut session = started_session(1800);
        session.dispatch(Action::ToggleBookmark(0)).unwrap();
        session.dispatch(Action::SetHintUsed(0)).unwrap();
        session.dispatch(Action::IncrementTime(0)).unwrap();
        session
            .dispatch(Action::SetNote {
                index: 0,
                text: "check the map".into(),
            })
            .unwrap();

        let vm = map_question(&session, 0).unwrap();
        assert!(vm.bookmarked);
        assert!(!vm.review_later);
        assert_eq!(vm.hint, Some(hint_text(Difficulty::Easy)));
        assert_eq!(vm.note, "check the map");
        assert_eq!(vm.time_spent_label, "0m 1s");
        assert!(map_question(&session, 3).is_none());
    }

    #[test]
    fn letters_fall_back_to_numbers_past_z() {
        let questions = sample_questions();
        assert_eq!(option_letter(&questions[0], "x", 25), "Z");
        assert_eq!(option_letter(&questions[0], "x", 26), "27");
    }
}
