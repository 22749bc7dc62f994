//! Session reports with JSON persistence and answer review.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ExamConfig;
use crate::model::{AnswerMap, AnswerOption, Letter, Question, SessionMode};
use crate::scoring::{is_position_correct, passing_score, score_by_domain, ScoreReport};
use crate::session::{ExamSession, FinishReason};

/// How one exam position turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
}

/// One question as it is shown in the answer review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Zero-based position within the exam set.
    pub position: usize,
    pub question_id: u32,
    pub domain_label: String,
    pub domain_number: u8,
    pub question_text: String,
    pub options: Vec<AnswerOption>,
    /// The learner's answer, if any.
    pub chosen: Option<Letter>,
    /// The single correct letter, if the question has one.
    pub correct: Option<Letter>,
    pub outcome: Outcome,
    #[serde(default)]
    pub excerpt: String,
}

/// Per-domain result with the domain's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResult {
    pub domain: u8,
    pub name: Option<String>,
    pub correct: usize,
    pub total: usize,
}

impl DomainResult {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total as f64
        }
    }
}

/// A finished session: score, breakdown, and every question for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub mode: SessionMode,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
    pub score: ScoreReport,
    pub passing_percentage: f64,
    /// Minimum correct answers needed to pass this exam.
    pub passing_score: usize,
    pub domains: Vec<DomainResult>,
    pub items: Vec<ReviewItem>,
    /// Time spent, for timed sessions.
    #[serde(default)]
    pub elapsed_seconds: Option<u64>,
}

/// Build review entries for every position of an exam set.
pub fn review_items(exam: &[Question], answers: &AnswerMap) -> Vec<ReviewItem> {
    exam.iter()
        .enumerate()
        .map(|(position, question)| {
            let chosen = answers.get(&position).copied();
            let outcome = match chosen {
                None => Outcome::Unanswered,
                Some(_) if is_position_correct(exam, answers, position) => Outcome::Correct,
                Some(_) => Outcome::Incorrect,
            };
            ReviewItem {
                position,
                question_id: question.id,
                domain_label: question.domain_label.clone(),
                domain_number: question.domain_number,
                question_text: question.question_text.clone(),
                options: question.options.clone(),
                chosen,
                correct: question.correct_letter(),
                outcome,
                excerpt: question.excerpt.clone(),
            }
        })
        .collect()
}

impl SessionReport {
    /// Snapshot a session at `now`.
    pub fn from_session(session: &ExamSession, config: &ExamConfig, now: DateTime<Utc>) -> Self {
        let questions = session.questions();
        let answers = session.answers();

        let domains = score_by_domain(questions, answers)
            .into_iter()
            .map(|d| DomainResult {
                domain: d.domain,
                name: config.domain_name(d.domain).map(str::to_string),
                correct: d.correct,
                total: d.total,
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: now,
            mode: session.mode(),
            finish_reason: session.finish_reason(),
            score: session.score(config.passing_percentage),
            passing_percentage: config.passing_percentage,
            passing_score: passing_score(session.total(), config.passing_percentage),
            domains,
            items: review_items(questions, answers),
            elapsed_seconds: session.clock().map(|c| c.elapsed_seconds(now)),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Items the learner missed or skipped.
    pub fn incorrect(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.iter().filter(|i| i.outcome != Outcome::Correct)
    }

    /// Format the review as markdown.
    pub fn to_markdown(&self, incorrect_only: bool) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Final score:** {}/{} ({:.1}%) - {}\n\n",
            self.score.correct_count,
            self.score.total,
            self.score.percentage,
            if self.score.passed { "PASSED" } else { "FAILED" }
        ));
        md.push_str(&format!(
            "Passing score: {}% ({} correct)\n\n",
            self.passing_percentage, self.passing_score
        ));

        if !self.domains.is_empty() {
            md.push_str("| Domain | Correct | Total | Score |\n");
            md.push_str("|--------|---------|-------|-------|\n");
            for d in &self.domains {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.1}% |\n",
                    domain_heading(d.domain, d.name.as_deref()),
                    d.correct,
                    d.total,
                    d.percentage()
                ));
            }
            md.push('\n');
        }

        for item in &self.items {
            if incorrect_only && item.outcome == Outcome::Correct {
                continue;
            }
            let status = match item.outcome {
                Outcome::Correct => "correct",
                Outcome::Incorrect => "incorrect",
                Outcome::Unanswered => "unanswered",
            };
            md.push_str(&format!("### Question {} ({status})\n\n", item.position + 1));
            md.push_str(&format!("**{}**\n\n", item.question_text));

            for option in &item.options {
                let chosen = item.chosen == Some(option.letter);
                let correct = item.correct == Some(option.letter);
                let note = match (correct, chosen) {
                    (true, true) => " (your answer, correct)",
                    (true, false) => " <- correct answer",
                    (false, true) => " <- your answer",
                    (false, false) => "",
                };
                md.push_str(&format!("- {}. {}{note}\n", option.letter, option.text));
            }

            md.push_str(&format!("\n*Domain:* {}\n", item.domain_label));
            if !item.excerpt.is_empty() {
                md.push_str(&format!("\n*Excerpt:* {}\n", item.excerpt));
            }
            md.push('\n');
        }

        md
    }
}

fn domain_heading(domain: u8, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Domain {domain}: {name}"),
        None if domain == 0 => "Unknown domain".to_string(),
        None => format!("Domain {domain}"),
    }
}
