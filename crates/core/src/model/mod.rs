mod answer;
mod ids;
mod lenient;
mod question;
mod results;

pub use answer::Answer;
pub use ids::{ParseIdError, QuizId};
pub use question::{DEFAULT_CATEGORY, Difficulty, Question, category_key};
pub use results::{QuestionResult, QuizResults};
