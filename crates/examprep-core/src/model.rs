//! Core data model types for examprep.
//!
//! These are the fundamental types the whole system uses to represent
//! parsed questions, their options, and a learner's answers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Domain number used for questions whose domain label could not be read.
pub const UNKNOWN_DOMAIN: u8 = 0;

/// Highest domain number a question can belong to.
pub const MAX_DOMAIN: u8 = 5;

/// The letter identifying one option of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    /// All letters in display order.
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    /// Map an uppercase ASCII character to a letter.
    pub fn from_char(c: char) -> Option<Letter> {
        match c {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Letter::A => write!(f, "A"),
            Letter::B => write!(f, "B"),
            Letter::C => write!(f, "C"),
            Letter::D => write!(f, "D"),
        }
    }
}

impl FromStr for Letter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::from_char(c.to_ascii_uppercase())
                .ok_or_else(|| format!("unknown option letter: {trimmed}")),
            _ => Err(format!("unknown option letter: {trimmed}")),
        }
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub letter: Letter,
    /// Option text with the correctness marker stripped.
    pub text: String,
    pub is_correct: bool,
}

/// A parsed multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Id taken from the record marker. Unique within one parse only by convention.
    pub id: u32,
    /// Raw domain label, e.g. "Domain 2: Information Security Controls".
    pub domain_label: String,
    /// Domain number in `1..=5`, or [`UNKNOWN_DOMAIN`].
    pub domain_number: u8,
    pub question_text: String,
    /// Options in source order, at most one per letter.
    pub options: Vec<AnswerOption>,
    /// Source excerpt backing the answer; empty when absent.
    #[serde(default)]
    pub excerpt: String,
}

impl Question {
    /// Letter of the single option flagged correct.
    ///
    /// Returns `None` when no option, or more than one option, is flagged.
    /// Such a question can never be answered correctly. With several flags
    /// not even the first flagged letter is credited.
    pub fn correct_letter(&self) -> Option<Letter> {
        let mut correct = self.options.iter().filter(|o| o.is_correct);
        match (correct.next(), correct.next()) {
            (Some(option), None) => Some(option.letter),
            _ => None,
        }
    }

    /// The correct option itself, when there is exactly one.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        let letter = self.correct_letter()?;
        self.option(letter)
    }

    /// Look up an option by letter.
    pub fn option(&self, letter: Letter) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.letter == letter)
    }

    /// Whether `letter` names one of this question's options.
    pub fn has_option(&self, letter: Letter) -> bool {
        self.option(letter).is_some()
    }

    /// Whether `answer` earns credit for this question.
    pub fn is_correct_answer(&self, answer: Letter) -> bool {
        self.correct_letter() == Some(answer)
    }

    /// Whether the question belongs to a known domain.
    pub fn has_known_domain(&self) -> bool {
        (1..=MAX_DOMAIN).contains(&self.domain_number)
    }
}

/// Chosen letters keyed by zero-based position within an exam set.
///
/// Sparse: unanswered positions are absent.
pub type AnswerMap = BTreeMap<usize, Letter>;

/// What kind of session an exam set was assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Timed, domain-stratified practice exam.
    Practice,
    /// Untimed single-domain study session with immediate feedback.
    Study,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Practice => write!(f, "practice"),
            SessionMode::Study => write!(f, "study"),
        }
    }
}
