use quiz_core::analytics::percent;
use quiz_core::model::Difficulty;
use quiz_core::session::QuizSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionStatus {
    Attempted,
    Visited,
    Unvisited,
}

impl QuestionStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionStatus::Attempted => "Answered",
            QuestionStatus::Visited => "Visited",
            QuestionStatus::Unvisited => "Not Visited",
        }
    }
}

/// Attempted wins over visited.
#[must_use]
pub fn question_status(session: &QuizSession, index: usize) -> QuestionStatus {
    if session.attempted().contains(&index) {
        QuestionStatus::Attempted
    } else if session.visited().contains(&index) {
        QuestionStatus::Visited
    } else {
        QuestionStatus::Unvisited
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavFilter {
    #[default]
    All,
    Answered,
    Unanswered,
    Visited,
    Bookmarked,
    Review,
}

impl NavFilter {
    pub const ALL: [NavFilter; 6] = [
        NavFilter::All,
        NavFilter::Answered,
        NavFilter::Unanswered,
        NavFilter::Visited,
        NavFilter::Bookmarked,
        NavFilter::Review,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            NavFilter::All => "all",
            NavFilter::Answered => "answered",
            NavFilter::Unanswered => "unanswered",
            NavFilter::Visited => "visited",
            NavFilter::Bookmarked => "bookmarked",
            NavFilter::Review => "review",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|filter| filter.key().eq_ignore_ascii_case(raw))
    }

    #[must_use]
    pub fn matches(self, session: &QuizSession, index: usize) -> bool {
        match self {
            NavFilter::All => true,
            NavFilter::Answered => session.attempted().contains(&index),
            NavFilter::Unanswered => !session.attempted().contains(&index),
            NavFilter::Visited => session.visited().contains(&index),
            NavFilter::Bookmarked => session.bookmarked().contains(&index),
            NavFilter::Review => session.review_later().contains(&index),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItemVm {
    pub index: usize,
    pub number: usize,
    pub status: QuestionStatus,
    pub difficulty: Difficulty,
    pub bookmarked: bool,
    pub review_later: bool,
    pub current: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavStatsVm {
    pub answered: usize,
    pub visited: usize,
    /// Questions never opened.
    pub remaining: usize,
    pub progress_pct: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorVm {
    pub filter: NavFilter,
    pub items: Vec<NavItemVm>,
    pub stats: NavStatsVm,
}

#[must_use]
pub fn map_navigator(session: &QuizSession, filter: NavFilter) -> NavigatorVm {
    let current = session.current_index();
    let items = session
        .questions()
        .iter()
        .enumerate()
        .filter(|(index, _)| filter.matches(session, *index))
        .map(|(index, question)| NavItemVm {
            index,
            number: index + 1,
            status: question_status(session, index),
            difficulty: question.difficulty,
            bookmarked: session.bookmarked().contains(&index),
            review_later: session.review_later().contains(&index),
            current: current == Some(index),
        })
        .collect();

    let progress = session.progress();
    NavigatorVm {
        filter,
        items,
        stats: NavStatsVm {
            answered: progress.answered,
            visited: progress.visited,
            remaining: progress.remaining,
            progress_pct: percent(to_u32(progress.answered), to_u32(progress.total)),
        },
    }
}

fn to_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::test_harness::started_session;
    use quiz_core::model::Answer;
    use quiz_core::session::Action;

    fn indices(vm: &NavigatorVm) -> Vec<usize> {
        vm.items.iter().map(|item| item.index).collect()
    }

    #[test]
    fn status_prefers_attempted_over_visited() {
        let mut session = started_session(1800);
        session
            .dispatch(Action::SetAnswer(Answer::single("Paris")))
            .unwrap();
        session.dispatch(Action::SetCurrentQuestion(1)).unwrap();

        assert_eq!(question_status(&session, 0), QuestionStatus::Attempted);
        assert_eq!(question_status(&session, 1), QuestionStatus::Visited);
        assert_eq!(question_status(&session, 2), QuestionStatus::Unvisited);
    }

    #[test]
    fn filters_select_matching_questions() {
        let mut session = started_session(1800);
        session
            .dispatch(Action::SetAnswer(Answer::single("Paris")))
            .unwrap();
        session.dispatch(Action::SetCurrentQuestion(1)).unwrap();
        session.dispatch(Action::ToggleBookmark(2)).unwrap();
        session.dispatch(Action::ToggleReviewLater(1)).unwrap();

        assert_eq!(indices(&map_navigator(&session, NavFilter::All)), [0, 1, 2]);
        assert_eq!(indices(&map_navigator(&session, NavFilter::Answered)), [0]);
        assert_eq!(indices(&map_navigator(&session, NavFilter::Unanswered)), [1, 2]);
        assert_eq!(indices(&map_navigator(&session, NavFilter::Visited)), [0, 1]);
        assert_eq!(indices(&map_navigator(&session, NavFilter::Bookmarked)), [2]);
        assert_eq!(indices(&map_navigator(&session, NavFilter::Review)), [1]);

        let vm = map_navigator(&session, NavFilter::All);
        assert!(vm.items[1].current);
        assert!(vm.items[2].bookmarked);
        assert_eq!(vm.items[2].number, 3);
    }

    #[test]
    fn stats_count_answered_visited_and_remaining() {
        let mut session = started_session(1800);
        session
            .dispatch(Action::SetAnswer(Answer::single("Paris")))
            .unwrap();
        session.dispatch(Action::SetCurrentQuestion(1)).unwrap();

        let stats = map_navigator(&session, NavFilter::All).stats;
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.visited, 2);
        assert_eq!(stats.remaining, 1);
        assert_eq!(stats.progress_pct, 33);
    }

    #[test]
    fn filter_names_parse_case_insensitively() {
        assert_eq!(NavFilter::parse(" Review "), Some(NavFilter::Review));
        assert_eq!(NavFilter::parse("unanswered"), Some(NavFilter::Unanswered));
        assert_eq!(NavFilter::parse("starred"), None);
        for filter in NavFilter::ALL {
            assert_eq!(NavFilter::parse(filter.key()), Some(filter));
        }
    }
}
