#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use quiz_core::model::{
    Answer, Difficulty, Question, QuestionResult, QuizId, QuizResults,
};
use services::{ApiError, QuestionPatch, QuizApi, StartedQuiz};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start(String),
    Update {
        quiz_id: String,
        index: usize,
        patch: QuestionPatch,
    },
    Submit {
        quiz_id: String,
        time_taken: u32,
    },
    Results(String),
}

/// In-process quiz backend that grades answers it has been sent.
pub struct FakeQuizApi {
    quiz_id: String,
    questions: Vec<Question>,
    calls: Mutex<Vec<Call>>,
    pub reject_start: Mutex<Option<Option<String>>>,
    pub fail_updates: AtomicBool,
    pub fail_submit: AtomicBool,
    pub fail_results: AtomicBool,
}

impl FakeQuizApi {
    pub fn new(quiz_id: &str, questions: Vec<Question>) -> Self {
        Self {
            quiz_id: quiz_id.to_owned(),
            questions,
            calls: Mutex::new(Vec::new()),
            reject_start: Mutex::new(None),
            fail_updates: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
            fail_results: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates_for(&self, index: usize) -> Vec<QuestionPatch> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update { index: i, patch, .. } if i == index => Some(patch),
                _ => None,
            })
            .collect()
    }

    pub fn submit_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Submit { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn graded(&self, time_taken: u32) -> QuizResults {
        let mut answers: BTreeMap<usize, Answer> = BTreeMap::new();
        for call in self.calls() {
            if let Call::Update { index, patch, .. } = call {
                if let Some(answer) = patch.user_answer {
                    answers.insert(index, answer);
                }
            }
        }

        let questions: Vec<QuestionResult> = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let user_answer = answers.get(&index).cloned();
                QuestionResult {
                    prompt: question.prompt.clone(),
                    difficulty: question.difficulty,
                    category: question.category.clone(),
                    is_correct: user_answer
                        .as_ref()
                        .is_some_and(|answer| question.is_correct(answer)),
                    hint_used: false,
                    time_spent: None,
                    user_answer,
                    correct_answer: Some(question.correct_answer.clone()),
                }
            })
            .collect();

        QuizResults {
            score: u32::try_from(questions.iter().filter(|q| q.is_correct).count()).unwrap(),
            total_questions: u32::try_from(questions.len()).unwrap(),
            time_taken,
            email: "ada@example.com".into(),
            questions,
        }
    }
}

#[async_trait]
impl QuizApi for FakeQuizApi {
    async fn start_quiz(&self, email: &str) -> Result<StartedQuiz, ApiError> {
        self.record(Call::Start(email.to_owned()));
        if let Some(message) = self.reject_start.lock().unwrap().clone() {
            return Err(ApiError::Rejected(message));
        }
        Ok(StartedQuiz {
            quiz_id: QuizId::new(self.quiz_id.clone()),
            questions: self.questions.clone(),
        })
    }

    async fn update_question(
        &self,
        quiz_id: &QuizId,
        index: usize,
        patch: &QuestionPatch,
    ) -> Result<(), ApiError> {
        self.record(Call::Update {
            quiz_id: quiz_id.to_string(),
            index,
            patch: patch.clone(),
        });
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ApiError::Rejected(Some("update refused".into())));
        }
        Ok(())
    }

    async fn submit_quiz(
        &self,
        quiz_id: &QuizId,
        time_taken: u32,
    ) -> Result<QuizResults, ApiError> {
        self.record(Call::Submit {
            quiz_id: quiz_id.to_string(),
            time_taken,
        });
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ApiError::Rejected(None));
        }
        Ok(self.graded(time_taken))
    }

    async fn get_results(&self, quiz_id: &QuizId) -> Result<QuizResults, ApiError> {
        self.record(Call::Results(quiz_id.to_string()));
        if self.fail_results.load(Ordering::SeqCst) {
            return Err(ApiError::MissingField("quiz"));
        }
        Ok(self.graded(0))
    }
}

pub fn single(prompt: &str, correct: &str, difficulty: Difficulty, category: &str) -> Question {
    Question {
        prompt: prompt.to_owned(),
        all_answers: Vec::new(),
        incorrect_answers: vec!["wrong".into(), "also wrong".into()],
        correct_answer: Answer::single(correct),
        difficulty,
        category: Some(category.to_owned()),
        kind: None,
        mode: None,
    }
}

pub fn multi(prompt: &str, correct: &[&str]) -> Question {
    Question {
        prompt: prompt.to_owned(),
        all_answers: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        incorrect_answers: Vec::new(),
        correct_answer: Answer::multi(correct.iter().copied()),
        difficulty: Difficulty::Hard,
        category: Some("Logic".into()),
        kind: None,
        mode: Some("multi".into()),
    }
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        single("Capital of France?", "Paris", Difficulty::Easy, "Geography: Europe"),
        single("2 + 2?", "4", Difficulty::Medium, "Math: Arithmetic"),
        multi("Pick the primes", &["A", "C"]),
    ]
}
