//! Session state for one practice exam or study session.
//!
//! The caller owns an [`ExamSession`] and passes it to whatever renders the
//! screen. Every answer change goes through an explicit action on the
//! session, and an action only ever touches the answer at the current
//! position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{AnswerMap, Letter, Question, SessionMode};
use crate::scoring::{self, ScoreReport};
use crate::timer::{ExamClock, TimerStatus};

/// Where the session is in its answer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum Phase {
    /// Waiting for an answer to the current question.
    Answering,
    /// Study only: the last answer has been checked and feedback is showing.
    Feedback { correct: bool },
    /// No further answers are accepted.
    Finished,
}

/// Why a session stopped accepting answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The learner reached the end or chose to finish.
    Completed,
    /// The exam deadline passed.
    TimeExpired,
}

/// What happened after a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Practice: the answer was recorded and the next question is current.
    Advanced,
    /// Practice: the last question was answered and the exam is finished.
    Completed,
    /// Study: the answer was checked.
    Feedback {
        correct: bool,
        correct_letter: Option<Letter>,
    },
}

/// Mutable state of one session.
#[derive(Debug, Clone)]
pub struct ExamSession {
    mode: SessionMode,
    questions: Vec<Question>,
    current: usize,
    answers: AnswerMap,
    clock: Option<ExamClock>,
    phase: Phase,
    finish_reason: Option<FinishReason>,
}

impl ExamSession {
    /// A timed practice exam over an assembled question set.
    pub fn practice(questions: Vec<Question>, clock: ExamClock) -> Self {
        Self::new(SessionMode::Practice, questions, Some(clock))
    }

    /// An untimed study session with immediate feedback.
    pub fn study(questions: Vec<Question>) -> Self {
        Self::new(SessionMode::Study, questions, None)
    }

    fn new(mode: SessionMode, questions: Vec<Question>, clock: Option<ExamClock>) -> Self {
        let empty = questions.is_empty();
        Self {
            mode,
            questions,
            current: 0,
            answers: AnswerMap::new(),
            clock,
            phase: if empty { Phase::Finished } else { Phase::Answering },
            finish_reason: empty.then_some(FinishReason::Completed),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer_at(&self, position: usize) -> Option<Letter> {
        self.answers.get(&position).copied()
    }

    pub fn clock(&self) -> Option<&ExamClock> {
        self.clock.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Submit an answer for the current question.
    ///
    /// Practice sessions record it and move on, finishing after the last
    /// question. Study sessions record it and switch to feedback.
    pub fn submit(&mut self, letter: Letter) -> Result<SubmitOutcome, SessionError> {
        self.ensure_open()?;
        if matches!(self.phase, Phase::Feedback { .. }) {
            return Err(SessionError::AwaitingContinue);
        }
        self.record(letter)?;

        match self.mode {
            SessionMode::Practice => {
                if self.is_last() {
                    self.close(FinishReason::Completed);
                    Ok(SubmitOutcome::Completed)
                } else {
                    self.current += 1;
                    Ok(SubmitOutcome::Advanced)
                }
            }
            SessionMode::Study => {
                let question = &self.questions[self.current];
                let correct = question.is_correct_answer(letter);
                let correct_letter = question.correct_letter();
                self.phase = Phase::Feedback { correct };
                Ok(SubmitOutcome::Feedback {
                    correct,
                    correct_letter,
                })
            }
        }
    }

    /// Move to the next question, keeping `selection` for the current one.
    ///
    /// In study sessions this is only allowed while feedback is showing.
    pub fn next(&mut self, selection: Option<Letter>) -> Result<(), SessionError> {
        self.ensure_open()?;
        match self.mode {
            SessionMode::Practice => {
                if let Some(letter) = selection {
                    self.record(letter)?;
                }
                if !self.is_last() {
                    self.current += 1;
                }
                Ok(())
            }
            SessionMode::Study => match self.phase {
                Phase::Feedback { .. } => self.advance(),
                _ => Err(SessionError::AnswerRequired),
            },
        }
    }

    /// Move back one question, keeping `selection` for the current one.
    pub fn previous(&mut self, selection: Option<Letter>) -> Result<(), SessionError> {
        self.ensure_open()?;
        if self.mode == SessionMode::Study {
            return Err(SessionError::NavigationUnavailable("previous"));
        }
        if let Some(letter) = selection {
            self.record(letter)?;
        }
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Leave study feedback for the next question, or finish after the last.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        if !matches!(self.phase, Phase::Feedback { .. }) {
            return Err(SessionError::NotAnswering);
        }
        if self.is_last() {
            self.close(FinishReason::Completed);
        } else {
            self.current += 1;
            self.phase = Phase::Answering;
        }
        Ok(())
    }

    /// End the session now, keeping `selection` for the current question.
    pub fn finish(&mut self, selection: Option<Letter>) -> Result<(), SessionError> {
        self.ensure_open()?;
        if let (Some(letter), Phase::Answering) = (selection, self.phase) {
            self.record(letter)?;
        }
        self.close(FinishReason::Completed);
        Ok(())
    }

    /// Sample the timer at `now`, finishing the session once time is up.
    ///
    /// Returns `None` for untimed sessions.
    pub fn poll(&mut self, now: DateTime<Utc>, low_time_warning_secs: u64) -> Option<TimerStatus> {
        let status = self.clock?.status(now, low_time_warning_secs);
        if status.expired && !self.is_finished() {
            tracing::debug!(
                answered = self.answers.len(),
                total = self.total(),
                "exam time expired"
            );
            self.close(FinishReason::TimeExpired);
        }
        Some(status)
    }

    /// Score the answers recorded so far.
    pub fn score(&self, passing_percentage: f64) -> ScoreReport {
        scoring::score(&self.questions, &self.answers, passing_percentage)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            Err(SessionError::Finished)
        } else {
            Ok(())
        }
    }

    fn record(&mut self, letter: Letter) -> Result<(), SessionError> {
        let question = &self.questions[self.current];
        if !question.has_option(letter) {
            return Err(SessionError::UnknownOption(letter));
        }
        self.answers.insert(self.current, letter);
        Ok(())
    }

    fn close(&mut self, reason: FinishReason) {
        self.phase = Phase::Finished;
        self.finish_reason = Some(reason);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::model::fixtures::question;
    use crate::model::AnswerOption;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn questions(n: u32) -> Vec<Question> {
        (1..=n).map(|id| question(id, 1, Some(Letter::A))).collect()
    }

    fn practice(n: u32) -> ExamSession {
        ExamSession::practice(questions(n), ExamClock::start(t0(), 150))
    }

    #[test]
    fn practice_submit_advances_then_completes() {
        let mut session = practice(2);
        assert_eq!(session.submit(Letter::A), Ok(SubmitOutcome::Advanced));
        assert_eq!(session.position(), 1);
        assert_eq!(session.submit(Letter::B), Ok(SubmitOutcome::Completed));
        assert!(session.is_finished());
        assert_eq!(session.finish_reason(), Some(FinishReason::Completed));

        let report = session.score(50.0);
        assert_eq!(report.correct_count, 1);
        assert!(report.passed);
    }

    #[test]
    fn navigation_only_touches_current_position() {
        let mut session = practice(3);
        session.submit(Letter::A).unwrap();
        session.next(Some(Letter::C)).unwrap();
        assert_eq!(session.position(), 2);

        session.previous(None).unwrap();
        session.previous(Some(Letter::D)).unwrap();
        assert_eq!(session.position(), 0);

        assert_eq!(session.answer_at(0), Some(Letter::A));
        assert_eq!(session.answer_at(1), Some(Letter::D));
        assert_eq!(session.answer_at(2), None);

        // Overwrite the current answer only.
        session.next(Some(Letter::B)).unwrap();
        assert_eq!(session.answer_at(0), Some(Letter::B));
        assert_eq!(session.answer_at(1), Some(Letter::D));
    }

    #[test]
    fn navigation_stops_at_the_ends() {
        let mut session = practice(2);
        session.previous(None).unwrap();
        assert_eq!(session.position(), 0);
        session.next(None).unwrap();
        session.next(None).unwrap();
        assert_eq!(session.position(), 1);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut q = question(1, 1, Some(Letter::A));
        q.options.retain(|o: &AnswerOption| o.letter != Letter::D);
        let mut session = ExamSession::practice(vec![q], ExamClock::start(t0(), 10));
        assert_eq!(
            session.submit(Letter::D),
            Err(SessionError::UnknownOption(Letter::D))
        );
        assert!(session.answers().is_empty());
        assert!(!session.is_finished());
    }

    #[test]
    fn finished_session_rejects_actions() {
        let mut session = practice(3);
        session.finish(Some(Letter::A)).unwrap();
        assert_eq!(session.answer_at(0), Some(Letter::A));
        assert_eq!(session.submit(Letter::A), Err(SessionError::Finished));
        assert_eq!(session.next(None), Err(SessionError::Finished));
        assert_eq!(session.finish(None), Err(SessionError::Finished));
    }

    #[test]
    fn expiry_forces_finish_and_unanswered_score_wrong() {
        let mut session = practice(4);
        session.submit(Letter::A).unwrap();

        let status = session.poll(t0() + Duration::minutes(100), 600).unwrap();
        assert!(!status.expired);
        assert!(!session.is_finished());

        let status = session.poll(t0() + Duration::minutes(150), 600).unwrap();
        assert!(status.expired);
        assert!(session.is_finished());
        assert_eq!(session.finish_reason(), Some(FinishReason::TimeExpired));
        assert_eq!(session.submit(Letter::A), Err(SessionError::Finished));

        let report = session.score(80.0);
        assert_eq!(report.correct_count, 1);
        assert_eq!(report.total, 4);
        assert!(!report.passed);
    }

    #[test]
    fn study_feedback_flow() {
        let mut session = ExamSession::study(questions(2));
        assert!(session.poll(t0(), 600).is_none());
        assert_eq!(session.next(None), Err(SessionError::AnswerRequired));
        assert_eq!(
            session.previous(None),
            Err(SessionError::NavigationUnavailable("previous"))
        );

        let outcome = session.submit(Letter::B).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Feedback {
                correct: false,
                correct_letter: Some(Letter::A)
            }
        );
        assert_eq!(session.phase(), Phase::Feedback { correct: false });
        assert_eq!(session.submit(Letter::A), Err(SessionError::AwaitingContinue));

        session.advance().unwrap();
        assert_eq!(session.position(), 1);
        assert_eq!(session.advance(), Err(SessionError::NotAnswering));

        session.submit(Letter::A).unwrap();
        session.next(None).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.score(80.0).correct_count, 1);
    }

    #[test]
    fn empty_session_starts_finished() {
        let session = ExamSession::study(Vec::new());
        assert!(session.is_finished());
        assert!(session.current_question().is_none());
        assert_eq!(session.score(80.0).total, 0);
    }
}
