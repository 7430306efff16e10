use std::fmt;

use ui::vm::{NavFilter, QuizIntent};

/// One line typed on the question screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Intent(QuizIntent),
    Show,
    Navigator,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidNumber { raw: String },
    UnknownFilter { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => write!(f, "unknown command `{word}` (try `help`)"),
            CommandError::MissingArgument { command } => write!(f, "{command} needs an argument"),
            CommandError::InvalidNumber { raw } => write!(f, "not a question number: {raw}"),
            CommandError::UnknownFilter { raw } => write!(
                f,
                "unknown filter `{raw}`; use one of: {}",
                NavFilter::ALL.map(NavFilter::key).join(", ")
            ),
        }
    }
}

impl std::error::Error for CommandError {}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let intent = match word.to_ascii_lowercase().as_str() {
        "" | "show" => return Ok(Command::Show),
        "nav" | "list" => return Ok(Command::Navigator),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        "next" | "n" => QuizIntent::Next,
        "prev" | "p" => QuizIntent::Prev,
        "goto" | "g" => {
            let raw = required(rest, "goto")?;
            let number = raw.parse::<usize>().map_err(|_| CommandError::InvalidNumber {
                raw: raw.to_owned(),
            })?;
            QuizIntent::GoTo(number)
        }
        "answer" | "a" => {
            let letters: Vec<String> = required(rest, "answer")?
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|letter| !letter.is_empty())
                .map(str::to_owned)
                .collect();
            QuizIntent::Choose(letters)
        }
        "bookmark" | "b" => QuizIntent::ToggleBookmark,
        "review" | "r" => QuizIntent::ToggleReviewLater,
        // An empty note clears it.
        "note" => QuizIntent::Note(rest.to_owned()),
        "hint" | "h" => QuizIntent::Hint,
        "filter" | "f" => {
            let raw = required(rest, "filter")?;
            let filter = NavFilter::parse(raw).ok_or_else(|| CommandError::UnknownFilter {
                raw: raw.to_owned(),
            })?;
            QuizIntent::Filter(filter)
        }
        "submit" => QuizIntent::Submit,
        _ => return Err(CommandError::Unknown(word.to_owned())),
    };
    Ok(Command::Intent(intent))
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command })
    } else {
        Ok(rest)
    }
}

pub const HELP: &str = "\
Commands:
  next | n                 go to the next question
  prev | p                 go to the previous question
  goto <N> | g <N>         jump to question N
  answer <A> | a <A>       pick an option (multi-select: `answer A,C` or toggle one letter)
  bookmark | b             toggle the bookmark on this question
  review | r               toggle the review-later flag
  note <text>              save a note (`note` alone clears it)
  hint | h                 show a hint
  filter <name> | f        navigator filter: all, answered, unanswered, visited, bookmarked, review
  nav                      show the navigator
  show                     show the current question again
  submit                   submit the quiz
  quit | q                 leave without submitting";

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(line: &str) -> QuizIntent {
        match parse_command(line) {
            Ok(Command::Intent(intent)) => intent,
            other => panic!("expected an intent for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn navigation_commands() {
        assert_eq!(intent("next"), QuizIntent::Next);
        assert_eq!(intent(" P "), QuizIntent::Prev);
        assert_eq!(intent("goto 12"), QuizIntent::GoTo(12));
        assert_eq!(
            parse_command("goto twelve"),
            Err(CommandError::InvalidNumber {
                raw: "twelve".into()
            })
        );
        assert_eq!(
            parse_command("goto"),
            Err(CommandError::MissingArgument { command: "goto" })
        );
    }

    #[test]
    fn answers_split_on_commas_and_spaces() {
        assert_eq!(intent("answer B"), QuizIntent::Choose(vec!["B".into()]));
        assert_eq!(
            intent("a A, c"),
            QuizIntent::Choose(vec!["A".into(), "c".into()])
        );
        assert_eq!(
            intent("answer A,C"),
            QuizIntent::Choose(vec!["A".into(), "C".into()])
        );
    }

    #[test]
    fn notes_keep_their_text() {
        assert_eq!(
            intent("note  carry the one "),
            QuizIntent::Note("carry the one".into())
        );
        assert_eq!(intent("note"), QuizIntent::Note(String::new()));
    }

    #[test]
    fn filters_and_plain_commands() {
        assert_eq!(intent("filter review"), QuizIntent::Filter(NavFilter::Review));
        assert!(matches!(
            parse_command("filter starred"),
            Err(CommandError::UnknownFilter { .. })
        ));
        assert_eq!(parse_command(""), Ok(Command::Show));
        assert_eq!(parse_command("nav"), Ok(Command::Navigator));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(intent("submit"), QuizIntent::Submit);
        assert_eq!(intent("hint"), QuizIntent::Hint);
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
