use quiz_core::model::{Answer, Difficulty, Question, QuizId};
use quiz_core::session::{Action, QuizSession, StartQuiz};
use quiz_core::time::fixed_now;

pub fn question(prompt: &str, correct: &str, difficulty: Difficulty) -> Question {
    Question {
        prompt: prompt.to_owned(),
        all_answers: Vec::new(),
        incorrect_answers: vec!["Lyon".into(), "Nice".into()],
        correct_answer: Answer::single(correct),
        difficulty,
        category: Some("Geography: Europe".into()),
        kind: None,
        mode: None,
    }
}

pub fn boolean(prompt: &str, correct: &str) -> Question {
    Question {
        prompt: prompt.to_owned(),
        all_answers: Vec::new(),
        incorrect_answers: Vec::new(),
        correct_answer: Answer::single(correct),
        difficulty: Difficulty::Medium,
        category: None,
        kind: Some("boolean".into()),
        mode: None,
    }
}

pub fn multi(prompt: &str, options: &[&str], correct: &[&str]) -> Question {
    Question {
        prompt: prompt.to_owned(),
        all_answers: options.iter().map(|o| (*o).to_owned()).collect(),
        incorrect_answers: Vec::new(),
        correct_answer: Answer::multi(correct.iter().copied()),
        difficulty: Difficulty::Hard,
        category: Some("Math".into()),
        kind: None,
        mode: Some("multi".into()),
    }
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        question("Capital of &quot;France&quot;?", "Paris", Difficulty::Easy),
        boolean("The sun is a star.", "True"),
        multi("Pick the primes", &["2", "4", "5", "9"], &["2", "5"]),
    ]
}

/// A started session sitting on the first question.
pub fn started_session(duration_secs: u32) -> QuizSession {
    let mut session = QuizSession::new();
    session
        .dispatch(Action::Start(StartQuiz {
            quiz_id: QuizId::new("q1"),
            email: "ada@example.com".into(),
            questions: sample_questions(),
            duration_secs,
            started_at: fixed_now(),
        }))
        .unwrap();
    session.dispatch(Action::SetCurrentQuestion(0)).unwrap();
    session
}
