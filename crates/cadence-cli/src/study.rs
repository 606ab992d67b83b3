//! Interactive study loop.
//!
//! Reads answers line by line from any `BufRead` and writes prompts and
//! feedback to any `Write`, so the loop runs the same against a terminal
//! or a test buffer.

use std::io::{BufRead, Write};

use cadence_core::{AnswerResult, Question, QuestionMode, Response, SessionController};
use colored::Colorize;

/// Typed at the prompt to end the session
pub const QUIT_COMMAND: &str = ":q";

/// What happened during one run of the loop
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StudyReport {
    pub answered: u64,
    pub correct: u64,
    /// Ended by the quit command rather than input running out or the limit
    pub quit: bool,
}

/// Ask questions until the learner quits, input ends, or `max_questions`
/// answers were given.
///
/// When nothing is due the loop keeps going with the card that falls due
/// soonest; the session clock only moves when questions are answered.
pub fn run<R: BufRead, W: Write>(
    session: &mut SessionController,
    input: &mut R,
    out: &mut W,
    max_questions: Option<u64>,
) -> anyhow::Result<StudyReport> {
    let mut report = StudyReport::default();
    let mut reviewing_ahead = false;

    loop {
        if max_questions.is_some_and(|max| report.answered >= max) {
            break;
        }

        let question = match session.next_question()? {
            Some(q) => q,
            None => {
                if !reviewing_ahead {
                    writeln!(out, "{}", "Nothing due right now, reviewing ahead.".dimmed())?;
                    reviewing_ahead = true;
                }
                match session.force_next_question()? {
                    Some(q) => q,
                    None => break,
                }
            }
        };

        render_question(out, &question, report.answered + 1)?;
        let Some(line) = read_answer(input, out)? else {
            break;
        };
        if line == QUIT_COMMAND {
            report.quit = true;
            break;
        }

        let result = session.submit_answer(&question.card_id, to_response(&question, &line))?;
        render_result(out, &result)?;

        report.answered += 1;
        if result.correct {
            report.correct += 1;
        }
    }

    Ok(report)
}

/// Turn a line of input into a response for the question's mode.
///
/// For multiple-choice, a number selects that option; anything else is
/// taken as the option text.
pub fn to_response(question: &Question, line: &str) -> Response {
    match question.mode {
        QuestionMode::Typed => Response::Typed(line.to_string()),
        QuestionMode::MultipleChoice => {
            let picked = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| question.choices.get(i));
            Response::Choice(picked.cloned().unwrap_or_else(|| line.to_string()))
        }
    }
}

/// Next non-blank line, without its line ending. `None` at end of input.
fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<Option<String>> {
    loop {
        write!(out, "{} ", ">".cyan().bold())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']).trim();
        if !line.is_empty() {
            return Ok(Some(line.to_string()));
        }
    }
}

fn render_question<W: Write>(out: &mut W, question: &Question, number: u64) -> anyhow::Result<()> {
    writeln!(out)?;
    let level = if question.is_new {
        "new".yellow().to_string()
    } else {
        format!("level {}", question.mastery).dimmed().to_string()
    };
    writeln!(out, "{} {}  ({})", format!("Q{number}.").cyan().bold(), question.front.bold(), level)?;

    match question.mode {
        QuestionMode::MultipleChoice => {
            for (i, choice) in question.choices.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, choice)?;
            }
        }
        QuestionMode::Typed => {
            writeln!(out, "  {}", "Type your answer".dimmed())?;
        }
    }
    Ok(())
}

fn render_result<W: Write>(out: &mut W, result: &AnswerResult) -> anyhow::Result<()> {
    if result.correct {
        write!(out, "{}", "Correct".green().bold())?;
    } else {
        write!(out, "{} {}", "Wrong, expected:".red().bold(), result.expected)?;
    }
    writeln!(
        out,
        "  {}",
        format!("level {} -> {}", result.previous_mastery, result.state.mastery).dimmed()
    )?;
    if result.mastered {
        writeln!(out, "{}", "Mastered!".magenta().bold())?;
    }
    Ok(())
}
