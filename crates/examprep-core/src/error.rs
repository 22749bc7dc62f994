//! Error types for parsing, configuration, and session handling.
//!
//! Block errors never escape [`crate::parser::parse`]; they exist so the
//! skip-and-continue path stays typed and can be inspected by diagnostics.

use thiserror::Error;

use crate::model::Letter;

/// Why a single `----Question` record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// The id after the record marker does not fit in a `u32`.
    #[error("invalid question id: {0}")]
    InvalidId(String),

    /// No `Domain:` line, or the label after it is empty.
    #[error("question {id} has no domain label")]
    MissingDomain { id: u32 },

    /// No `Question text:` field, or the captured text is blank.
    #[error("question {id} has no question text")]
    MissingQuestionText { id: u32 },

    /// No option line could be recovered.
    #[error("question {id} has no options")]
    NoOptions { id: u32 },
}

/// Invalid exam configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("quota table is empty")]
    EmptyQuotaTable,

    #[error("quota table sums to zero questions")]
    ZeroTotal,

    #[error("domain {0} is outside 1..=5")]
    InvalidDomain(u8),

    #[error("domain {0} is configured more than once")]
    DuplicateDomain(u8),

    #[error("exam duration must be positive")]
    NonPositiveDuration,

    #[error("passing percentage {0} is outside (0, 100]")]
    PassingPercentageOutOfRange(f64),
}

/// A session action that the current session state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session has already been finished (or timed out).
    #[error("the session is already finished")]
    Finished,

    /// The submitted letter is not one of the current question's options.
    #[error("option {0} is not available for this question")]
    UnknownOption(Letter),

    /// Study sessions only move forward after an answer is submitted.
    #[error("submit an answer before moving on")]
    AnswerRequired,

    /// Study feedback is showing; the learner has to continue first.
    #[error("feedback is showing; continue to the next question")]
    AwaitingContinue,

    /// The requested navigation is not offered in this mode.
    #[error("{0} is not available in this mode")]
    NavigationUnavailable(&'static str),

    /// `advance` was called while no feedback is showing.
    #[error("no feedback is showing")]
    NotAnswering,
}
