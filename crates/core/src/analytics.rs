//! Post-quiz analytics: accuracy by category and difficulty, hints, and timing.

use std::collections::BTreeMap;

use crate::model::{Difficulty, QuestionResult, QuizResults};

/// Integer percentage `round(100 * numerator / denominator)`, rounding half up.
///
/// A zero denominator yields `0`.
#[must_use]
pub fn percent(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let n = u64::from(numerator);
    let d = u64::from(denominator);
    u32::try_from((200 * n + d) / (2 * d)).unwrap_or(u32::MAX)
}

//
// ─── MATRIX ────────────────────────────────────────────────────────────────────
//

/// Correct/total counters for one (category, difficulty) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccuracyCell {
    pub correct: u32,
    pub total: u32,
}

impl AccuracyCell {
    fn record(&mut self, is_correct: bool) {
        self.total = self.total.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    fn merge(self, other: AccuracyCell) -> AccuracyCell {
        AccuracyCell {
            correct: self.correct.saturating_add(other.correct),
            total: self.total.saturating_add(other.total),
        }
    }

    #[must_use]
    pub fn pct(&self) -> u32 {
        percent(self.correct, self.total)
    }
}

fn slot(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
    }
}

/// Category × difficulty accuracy counters, keyed by category key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccuracyMatrix {
    cells: BTreeMap<String, [AccuracyCell; 3]>,
}

impl AccuracyMatrix {
    /// Build the matrix in a single pass over the questions.
    #[must_use]
    pub fn from_results(questions: &[QuestionResult]) -> Self {
        let mut matrix = Self::default();
        for question in questions {
            matrix.record(question.category_key(), question.difficulty, question.is_correct);
        }
        matrix
    }

    pub fn record(&mut self, category: &str, difficulty: Difficulty, is_correct: bool) {
        let row = self.cells.entry(category.to_owned()).or_default();
        row[slot(difficulty)].record(is_correct);
    }

    /// Category keys in ascending order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    #[must_use]
    pub fn cell(&self, category: &str, difficulty: Difficulty) -> AccuracyCell {
        self.cells
            .get(category)
            .map(|row| row[slot(difficulty)])
            .unwrap_or_default()
    }

    /// Counters for one difficulty summed across every category.
    #[must_use]
    pub fn difficulty_total(&self, difficulty: Difficulty) -> AccuracyCell {
        self.cells
            .values()
            .map(|row| row[slot(difficulty)])
            .fold(AccuracyCell::default(), AccuracyCell::merge)
    }

    /// Counters for one category summed across every difficulty.
    #[must_use]
    pub fn category_total(&self, category: &str) -> AccuracyCell {
        self.cells
            .get(category)
            .map(|row| row.iter().copied().fold(AccuracyCell::default(), AccuracyCell::merge))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn difficulty_accuracy(&self) -> DifficultyAccuracy {
        DifficultyAccuracy {
            easy: self.difficulty_total(Difficulty::Easy).pct(),
            medium: self.difficulty_total(Difficulty::Medium).pct(),
            hard: self.difficulty_total(Difficulty::Hard).pct(),
        }
    }

    /// Per-category accuracy, highest first; ties keep ascending category order.
    #[must_use]
    pub fn category_accuracy(&self) -> Vec<CategoryAccuracy> {
        let mut out: Vec<CategoryAccuracy> = self
            .categories()
            .map(|category| CategoryAccuracy {
                category: category.to_owned(),
                pct: self.category_total(category).pct(),
            })
            .collect();
        out.sort_by(|a, b| b.pct.cmp(&a.pct));
        out
    }
}

//
// ─── SUMMARIES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyAccuracy {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl DifficultyAccuracy {
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAccuracy {
    pub category: String,
    pub pct: u32,
}

/// Everything the report screen shows for a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub email: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub time_taken: u32,
    pub matrix: AccuracyMatrix,
    pub difficulty_accuracy: DifficultyAccuracy,
    pub category_accuracy: Vec<CategoryAccuracy>,
    pub total_hints: u32,
    /// Rounded mean of positive per-question times; `0` when none were tracked.
    pub avg_time: u32,
    /// Number of questions that contributed to `avg_time`.
    pub timed_questions: u32,
}

impl QuizReport {
    #[must_use]
    pub fn from_results(results: &QuizResults) -> Self {
        let matrix = AccuracyMatrix::from_results(&results.questions);

        let mut total_hints = 0_u32;
        let mut total_time = 0.0_f64;
        let mut timed_questions = 0_u32;
        for question in &results.questions {
            if question.hint_used {
                total_hints = total_hints.saturating_add(1);
            }
            if let Some(spent) = question.time_spent.filter(|t| t.is_finite() && *t > 0.0) {
                total_time += spent;
                timed_questions = timed_questions.saturating_add(1);
            }
        }

        Self {
            email: results.email.clone(),
            score: results.score,
            total_questions: results.total_questions,
            percentage: percent(results.score, results.total_questions),
            time_taken: results.time_taken,
            difficulty_accuracy: matrix.difficulty_accuracy(),
            category_accuracy: matrix.category_accuracy(),
            matrix,
            total_hints,
            avg_time: average_secs(total_time, timed_questions),
            timed_questions,
        }
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.total_questions.saturating_sub(self.score)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn average_secs(total: f64, count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    (total / f64::from(count)).round() as u32
}
