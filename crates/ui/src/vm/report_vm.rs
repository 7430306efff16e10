use quiz_core::analytics::{AccuracyCell, QuizReport};
use quiz_core::model::Difficulty;

use super::time_fmt::format_duration;

const NO_TIME_DATA: &str = "—";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreClass {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreClass {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Average,
            _ => Self::Poor,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreClass::Excellent => "excellent",
            ScoreClass::Good => "good",
            ScoreClass::Average => "average",
            ScoreClass::Poor => "poor",
        }
    }
}

/// Hue for an accuracy heat cell: 0 is red, 120 is green.
#[must_use]
pub fn heat_hue(pct: u32) -> u32 {
    (pct.min(100) * 120 + 50) / 100
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccuracyRowVm {
    pub label: String,
    pub pct: u32,
    pub hue: u32,
}

impl AccuracyRowVm {
    fn new(label: impl Into<String>, pct: u32) -> Self {
        Self {
            label: label.into(),
            pct,
            hue: heat_hue(pct),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatrixCellVm {
    pub difficulty: Difficulty,
    pub correct: u32,
    pub total: u32,
    /// `None` when the category had no question of this difficulty.
    pub pct: Option<u32>,
    pub hue: Option<u32>,
}

impl MatrixCellVm {
    fn new(difficulty: Difficulty, cell: AccuracyCell) -> Self {
        let pct = (cell.total > 0).then(|| cell.pct());
        Self {
            difficulty,
            correct: cell.correct,
            total: cell.total,
            pct,
            hue: pct.map(heat_hue),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixRowVm {
    pub category: String,
    pub cells: Vec<MatrixCellVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportVm {
    pub email: String,
    pub score_label: String,
    pub percentage: u32,
    pub score_class: ScoreClass,
    pub correct: u32,
    pub incorrect: u32,
    pub time_taken_label: String,
    pub avg_time_label: String,
    pub tracked_label: String,
    pub hints_used: u32,
    pub difficulty_rows: Vec<AccuracyRowVm>,
    pub category_rows: Vec<AccuracyRowVm>,
    pub matrix_rows: Vec<MatrixRowVm>,
}

#[must_use]
pub fn map_report(report: &QuizReport) -> ReportVm {
    let avg_time_label = if report.avg_time == 0 {
        NO_TIME_DATA.to_owned()
    } else {
        format_duration(report.avg_time)
    };
    let tracked_label = if report.timed_questions == 0 {
        "no time data".to_owned()
    } else {
        format!("{} tracked", report.timed_questions)
    };

    let difficulty_rows = Difficulty::ALL
        .into_iter()
        .map(|d| AccuracyRowVm::new(d.as_str(), report.difficulty_accuracy.get(d)))
        .collect();

    let category_rows = report
        .category_accuracy
        .iter()
        .map(|row| AccuracyRowVm::new(row.category.clone(), row.pct))
        .collect();

    let matrix_rows = report
        .matrix
        .categories()
        .map(|category| MatrixRowVm {
            category: category.to_owned(),
            cells: Difficulty::ALL
                .into_iter()
                .map(|d| MatrixCellVm::new(d, report.matrix.cell(category, d)))
                .collect(),
        })
        .collect();

    ReportVm {
        email: report.email.clone(),
        score_label: format!("{} / {}", report.score, report.total_questions),
        percentage: report.percentage,
        score_class: ScoreClass::from_percentage(report.percentage),
        correct: report.score,
        incorrect: report.incorrect(),
        time_taken_label: format_duration(report.time_taken),
        avg_time_label,
        tracked_label,
        hints_used: report.total_hints,
        difficulty_rows,
        category_rows,
        matrix_rows,
    }
}
