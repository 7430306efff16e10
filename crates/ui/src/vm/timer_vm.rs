use quiz_core::analytics::percent;
use quiz_core::session::QuizSession;

use super::time_fmt::format_clock;

const WARNING_SECS: u32 = 600;
const CRITICAL_SECS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerLevel {
    Normal,
    Warning,
    Critical,
}

impl TimerLevel {
    #[must_use]
    pub fn from_remaining(remaining: u32) -> Self {
        if remaining <= CRITICAL_SECS {
            Self::Critical
        } else if remaining <= WARNING_SECS {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerVm {
    pub label: String,
    pub level: TimerLevel,
    /// Share of the quiz duration still left, 0..=100.
    pub percent_left: u32,
}

#[must_use]
pub fn map_timer(remaining: u32, duration: u32) -> TimerVm {
    TimerVm {
        label: format_clock(remaining),
        level: TimerLevel::from_remaining(remaining),
        percent_left: percent(remaining, duration).min(100),
    }
}

#[must_use]
pub fn map_session_timer(session: &QuizSession) -> TimerVm {
    map_timer(session.time_remaining(), session.duration_secs())
}
