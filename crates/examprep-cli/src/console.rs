//! Line-oriented terminal driver for practice exams and study sessions.
//!
//! The drivers are generic over input and output so the same loop runs
//! against stdin/stdout and against in-memory buffers in tests. The wall
//! clock is injected for the same reason.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{DateTime, Utc};

use examprep_core::model::{Letter, Question};
use examprep_core::session::{ExamSession, FinishReason, Phase, SubmitOutcome};
use examprep_core::timer::format_elapsed;

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The session finished and should be scored.
    Finished(FinishReason),
    /// The learner quit; nothing is scored or saved.
    Abandoned,
}

/// One line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Answer(Letter),
    Next,
    Previous,
    Finish,
    Quit,
    Empty,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Input::Empty,
            "n" | "next" => Input::Next,
            "p" | "prev" | "previous" => Input::Previous,
            "f" | "finish" => Input::Finish,
            "q" | "quit" => Input::Quit,
            _ => match trimmed.parse::<Letter>() {
                Ok(letter) => Input::Answer(letter),
                Err(_) => Input::Unknown(trimmed.to_string()),
            },
        }
    }
}

/// Prompting console over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `message` and read one line. `None` means end of input.
    pub fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Drive a timed practice exam until it finishes, times out, or is abandoned.
///
/// The timer is sampled before every prompt and again before applying the
/// learner's input, so an answer typed after the deadline is not recorded.
pub fn run_practice<R, W, C>(
    session: &mut ExamSession,
    console: &mut Console<R, W>,
    low_time_warning_secs: u64,
    now: C,
) -> Result<Ending>
where
    R: BufRead,
    W: Write,
    C: Fn() -> DateTime<Utc>,
{
    let total = session.total();
    loop {
        let status = session.poll(now(), low_time_warning_secs);
        if timed_out(session, console)? {
            return Ok(Ending::Finished(FinishReason::TimeExpired));
        }
        if session.is_finished() {
            return Ok(Ending::Finished(FinishReason::Completed));
        }

        let position = session.position();
        let mut header = format!("\nQuestion {} of {}", position + 1, total);
        if let Some(status) = status {
            header.push_str(&format!(
                "   [time left {}]",
                format_elapsed(status.remaining_seconds)
            ));
            if status.low_time {
                header.push_str(&format!(
                    "  Less than {} minutes remaining!",
                    low_time_warning_secs / 60
                ));
            }
        }
        writeln!(console.out(), "{header}")?;
        let chosen = session.answer_at(position);
        if let Some(question) = session.current_question() {
            render_question(console.out(), question, chosen)?;
        }

        let Some(line) = console.prompt("Answer [A-D], n)ext, p)revious, f)inish, q)uit: ")? else {
            session.finish(None)?;
            return Ok(Ending::Finished(FinishReason::Completed));
        };

        session.poll(now(), low_time_warning_secs);
        if timed_out(session, console)? {
            return Ok(Ending::Finished(FinishReason::TimeExpired));
        }

        let result = match Input::parse(&line) {
            Input::Answer(letter) => session.submit(letter).map(|_| ()),
            Input::Next => session.next(None),
            Input::Previous => session.previous(None),
            Input::Finish => session.finish(None),
            Input::Quit => return Ok(Ending::Abandoned),
            Input::Empty => {
                writeln!(console.out(), "Select an answer before submitting.")?;
                Ok(())
            }
            Input::Unknown(other) => {
                writeln!(console.out(), "Unrecognized input '{other}'.")?;
                Ok(())
            }
        };
        if let Err(e) = result {
            writeln!(console.out(), "{e}")?;
        }
    }
}

/// Drive a study session with feedback after every answer.
pub fn run_study<R, W>(session: &mut ExamSession, console: &mut Console<R, W>) -> Result<Ending>
where
    R: BufRead,
    W: Write,
{
    let total = session.total();
    loop {
        match session.phase() {
            Phase::Finished => return Ok(Ending::Finished(FinishReason::Completed)),
            Phase::Feedback { .. } => {
                let line = console.prompt("Press Enter to continue, q to quit: ")?;
                match line.as_deref().map(Input::parse) {
                    None => {
                        session.finish(None)?;
                    }
                    Some(Input::Quit) => return Ok(Ending::Abandoned),
                    Some(Input::Finish) => session.finish(None)?,
                    Some(_) => session.advance()?,
                }
            }
            Phase::Answering => {
                let position = session.position();
                let Some(question) = session.current_question().cloned() else {
                    return Ok(Ending::Finished(FinishReason::Completed));
                };
                writeln!(console.out(), "\nQuestion {} of {}", position + 1, total)?;
                writeln!(console.out(), "{}", question.domain_label)?;
                render_question(console.out(), &question, None)?;

                let Some(line) = console.prompt("Answer [A-D], f)inish, q)uit: ")? else {
                    session.finish(None)?;
                    return Ok(Ending::Finished(FinishReason::Completed));
                };

                match Input::parse(&line) {
                    Input::Answer(letter) => match session.submit(letter) {
                        Ok(SubmitOutcome::Feedback {
                            correct,
                            correct_letter,
                        }) => render_feedback(console.out(), &question, letter, correct, correct_letter)?,
                        Ok(_) => {}
                        Err(e) => writeln!(console.out(), "{e}")?,
                    },
                    Input::Finish => session.finish(None)?,
                    Input::Quit => return Ok(Ending::Abandoned),
                    Input::Empty => writeln!(console.out(), "Select an answer before submitting.")?,
                    Input::Next => {
                        if let Err(e) = session.next(None) {
                            writeln!(console.out(), "{e}")?;
                        }
                    }
                    Input::Previous => {
                        if let Err(e) = session.previous(None) {
                            writeln!(console.out(), "{e}")?;
                        }
                    }
                    Input::Unknown(other) => {
                        writeln!(console.out(), "Unrecognized input '{other}'.")?
                    }
                }
            }
        }
    }
}

fn timed_out<R: BufRead, W: Write>(session: &ExamSession, console: &mut Console<R, W>) -> Result<bool> {
    if session.finish_reason() == Some(FinishReason::TimeExpired) {
        writeln!(console.out(), "\nTime is up! Your exam has been submitted.")?;
        return Ok(true);
    }
    Ok(false)
}

/// Print question text and options, marking the chosen letter.
pub fn render_question<W: Write>(out: &mut W, question: &Question, chosen: Option<Letter>) -> Result<()> {
    writeln!(out, "{}", question.question_text)?;
    for option in &question.options {
        let marker = if chosen == Some(option.letter) { '*' } else { ' ' };
        writeln!(out, " {marker} {}. {}", option.letter, option.text)?;
    }
    Ok(())
}

fn render_feedback<W: Write>(
    out: &mut W,
    question: &Question,
    chosen: Letter,
    correct: bool,
    correct_letter: Option<Letter>,
) -> Result<()> {
    if correct {
        writeln!(out, "Correct!")?;
    } else {
        writeln!(out, "Incorrect.")?;
        match question.correct_option() {
            Some(option) => writeln!(out, "Correct answer: {}. {}", option.letter, option.text)?,
            None => writeln!(out, "This question has no single correct answer on record.")?,
        }
    }
    for option in &question.options {
        let tag = if Some(option.letter) == correct_letter {
            "[correct]"
        } else if option.letter == chosen {
            "[your answer]"
        } else {
            ""
        };
        writeln!(out, "   {}. {} {tag}", option.letter, option.text)?;
    }
    if !question.excerpt.is_empty() {
        writeln!(out, "Reference: {}", question.excerpt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Cursor;

    use chrono::Duration;

    use examprep_core::model::{AnswerOption, Question};
    use examprep_core::timer::ExamClock;

    use super::*;

    fn question(id: u32) -> Question {
        Question {
            id,
            domain_label: "Domain 1: Governance".into(),
            domain_number: 1,
            question_text: format!("Question {id}?"),
            options: Letter::ALL
                .iter()
                .map(|&letter| AnswerOption {
                    letter,
                    text: format!("choice {letter}"),
                    is_correct: letter == Letter::A,
                })
                .collect(),
            excerpt: format!("Excerpt {id}"),
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn input_parsing() {
        assert_eq!(Input::parse(" b \n"), Input::Answer(Letter::B));
        assert_eq!(Input::parse("D"), Input::Answer(Letter::D));
        assert_eq!(Input::parse("N"), Input::Next);
        assert_eq!(Input::parse("previous"), Input::Previous);
        assert_eq!(Input::parse("f"), Input::Finish);
        assert_eq!(Input::parse("quit"), Input::Quit);
        assert_eq!(Input::parse("   "), Input::Empty);
        assert_eq!(Input::parse("e"), Input::Unknown("e".into()));
    }

    #[test]
    fn practice_answers_in_order_and_completes() {
        let mut session =
            ExamSession::practice(vec![question(1), question(2)], ExamClock::start(start(), 150));
        let mut console = console("a\nc\n");

        let ending = run_practice(&mut session, &mut console, 600, start).unwrap();
        assert_eq!(ending, Ending::Finished(FinishReason::Completed));
        assert_eq!(session.answer_at(0), Some(Letter::A));
        assert_eq!(session.answer_at(1), Some(Letter::C));
        assert_eq!(session.score(80.0).correct_count, 1);

        let text = output(console);
        assert!(text.contains("Question 1 of 2"));
        assert!(text.contains("time left 150:00"));
    }

    #[test]
    fn practice_navigation_and_empty_submit() {
        let mut session = ExamSession::practice(
            vec![question(1), question(2), question(3)],
            ExamClock::start(start(), 150),
        );
        let mut console = console("\nn\np\nb\nf\n");

        let ending = run_practice(&mut session, &mut console, 600, start).unwrap();
        assert_eq!(ending, Ending::Finished(FinishReason::Completed));
        assert_eq!(session.answer_at(0), Some(Letter::B));
        assert_eq!(session.answers().len(), 1);
        assert!(output(console).contains("Select an answer before submitting."));
    }

    #[test]
    fn practice_quit_abandons() {
        let mut session = ExamSession::practice(vec![question(1)], ExamClock::start(start(), 150));
        let mut console = console("q\n");
        let ending = run_practice(&mut session, &mut console, 600, start).unwrap();
        assert_eq!(ending, Ending::Abandoned);
        assert!(!session.is_finished());
    }

    #[test]
    fn practice_end_of_input_finishes() {
        let mut session =
            ExamSession::practice(vec![question(1), question(2)], ExamClock::start(start(), 150));
        let mut console = console("a\n");
        let ending = run_practice(&mut session, &mut console, 600, start).unwrap();
        assert_eq!(ending, Ending::Finished(FinishReason::Completed));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn practice_answer_after_deadline_is_not_recorded() {
        let mut session =
            ExamSession::practice(vec![question(1), question(2)], ExamClock::start(start(), 1));
        let mut console = console("a\na\n");

        // Each clock read moves forward a minute, so the deadline passes
        // while the first answer is being typed.
        let ticks = Cell::new(0i64);
        let now = || {
            let t = ticks.get();
            ticks.set(t + 1);
            start() + Duration::minutes(t)
        };

        let ending = run_practice(&mut session, &mut console, 600, now).unwrap();
        assert_eq!(ending, Ending::Finished(FinishReason::TimeExpired));
        assert!(session.answers().is_empty());
        assert_eq!(session.finish_reason(), Some(FinishReason::TimeExpired));
        assert!(output(console).contains("Time is up!"));
    }

    #[test]
    fn practice_shows_low_time_warning() {
        let mut session = ExamSession::practice(vec![question(1)], ExamClock::start(start(), 5));
        let mut console = console("a\n");
        run_practice(&mut session, &mut console, 600, start).unwrap();
        let text = output(console);
        assert!(text.contains("time left 05:00"));
        assert!(text.contains("Less than 10 minutes remaining!"));
    }

    #[test]
    fn study_feedback_then_continue() {
        let mut session = ExamSession::study(vec![question(1), question(2)]);
        let mut console = console("b\n\na\n\n");

        let ending = run_study(&mut session, &mut console).unwrap();
        assert_eq!(ending, Ending::Finished(FinishReason::Completed));
        assert_eq!(session.score(80.0).correct_count, 1);

        let text = output(console);
        assert!(text.contains("Incorrect."));
        assert!(text.contains("Correct answer: A. choice A"));
        assert!(text.contains("Reference: Excerpt 1"));
        assert!(text.contains("Correct!"));
    }

    #[test]
    fn study_requires_answer_before_moving_on() {
        let mut session = ExamSession::study(vec![question(1), question(2)]);
        let mut console = console("n\n\np\nq\n");

        let ending = run_study(&mut session, &mut console).unwrap();
        assert_eq!(ending, Ending::Abandoned);
        assert_eq!(session.position(), 0);

        let text = output(console);
        assert!(text.contains("submit an answer before moving on"));
        assert!(text.contains("Select an answer before submitting."));
        assert!(text.contains("previous is not available in this mode"));
    }
}
