use super::action::Action;
use super::state::QuizSession;

/// What a one-second tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time was credited and the countdown moved; `remaining` seconds are left.
    Running { remaining: u32 },
    /// This tick took the countdown to zero. The caller must complete the quiz.
    ///
    /// Reported exactly once per session: later ticks are `Halted`.
    Expired,
    /// Nothing changed: the quiz is not running.
    Halted,
}

impl QuizSession {
    /// Transitions a tick would apply right now, in order.
    ///
    /// Credits the question that is current *at fire time*, then moves the
    /// countdown. Empty when the quiz is not running.
    #[must_use]
    pub fn tick_actions(&self) -> Vec<Action> {
        if !self.is_running() {
            return Vec::new();
        }
        let mut actions = Vec::with_capacity(2);
        if let Some(index) = self.current {
            actions.push(Action::IncrementTime(index));
        }
        actions.push(Action::UpdateTimer(self.time_remaining - 1));
        actions
    }

    /// Advance the session by one elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        let actions = self.tick_actions();
        if actions.is_empty() {
            return TickOutcome::Halted;
        }
        for action in actions {
            // Preconditions were established by `tick_actions`.
            self.reduce(action);
        }
        match self.time_remaining {
            0 => TickOutcome::Expired,
            remaining => TickOutcome::Running { remaining },
        }
    }
}
