mod markup;
mod nav_vm;
mod question_vm;
mod quiz_vm;
mod report_vm;
mod start_vm;
#[cfg(test)]
mod test_harness;
mod time_fmt;
mod timer_vm;

pub use markup::to_plain_text;
pub use nav_vm::{
    NavFilter, NavItemVm, NavStatsVm, NavigatorVm, QuestionStatus, map_navigator, question_status,
};
pub use question_vm::{
    Feedback, OptionVm, QuestionVm, difficulty_badge, hint_text, map_current_question,
    map_question, option_letter, resolve_letter,
};
pub use quiz_vm::{QuizIntent, QuizOutcome, QuizVm};
pub use report_vm::{
    AccuracyRowVm, MatrixCellVm, MatrixRowVm, ReportVm, ScoreClass, heat_hue, map_report,
};
pub use start_vm::{
    EmailError, StartError, start_failure_message, start_quiz, validate_email,
};
pub use time_fmt::{format_clock, format_datetime, format_duration};
pub use timer_vm::{TimerLevel, TimerVm, map_session_timer, map_timer};
