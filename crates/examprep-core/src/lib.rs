//! examprep-core: question parser, exam assembly, and scoring engine.
//!
//! This crate turns a loosely formatted question bank into typed questions,
//! assembles domain-stratified practice exams and study sessions from them,
//! and scores the answers a caller collects. It owns no clock, no file
//! handles, and no terminal: callers hand it text and timestamps.

pub mod assembler;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod timer;

pub use assembler::{assemble_practice_exam, assemble_study_session};
pub use config::{DomainConfig, DomainQuota, ExamConfig};
pub use error::{BlockError, ConfigError, SessionError};
pub use index::{index_by_domain, DomainIndex};
pub use model::{AnswerMap, AnswerOption, Letter, Question, SessionMode};
pub use parser::parse;
pub use scoring::{score, ScoreReport};
pub use session::ExamSession;
pub use timer::{format_elapsed, remaining_seconds, ExamClock};
