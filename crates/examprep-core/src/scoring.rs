//! Scoring and pass/fail evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerMap, Question};

/// Aggregate result of one exam set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Positions answered with the unique correct letter.
    pub correct_count: usize,
    /// Questions in the exam set.
    pub total: usize,
    /// Positions with any recorded answer.
    pub answered: usize,
    /// `correct_count / total * 100`, or 0 for an empty exam.
    pub percentage: f64,
    /// `percentage >= passing percentage`.
    pub passed: bool,
}

/// Correct answers per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: u8,
    pub correct: usize,
    pub total: usize,
}

impl DomainScore {
    pub fn percentage(&self) -> f64 {
        percentage(self.correct, self.total)
    }
}

/// Score an exam set against the recorded answers.
///
/// A position counts only when it was answered with the letter of the
/// question's single correct option. Questions with no (or several) flagged
/// options never count. Empty exams score 0% and fail.
pub fn score(exam: &[Question], answers: &AnswerMap, passing_percentage: f64) -> ScoreReport {
    let correct_count = (0..exam.len())
        .filter(|&i| is_position_correct(exam, answers, i))
        .count();
    let answered = answers.keys().filter(|&&i| i < exam.len()).count();
    let percentage = percentage(correct_count, exam.len());

    ScoreReport {
        correct_count,
        total: exam.len(),
        answered,
        percentage,
        passed: !exam.is_empty() && percentage >= passing_percentage,
    }
}

/// Whether position `i` was answered correctly.
pub fn is_position_correct(exam: &[Question], answers: &AnswerMap, i: usize) -> bool {
    match (exam.get(i), answers.get(&i)) {
        (Some(question), Some(&answer)) => question.is_correct_answer(answer),
        _ => false,
    }
}

/// Correct/total per domain, ordered by domain number.
pub fn score_by_domain(exam: &[Question], answers: &AnswerMap) -> Vec<DomainScore> {
    let mut per_domain: BTreeMap<u8, DomainScore> = BTreeMap::new();
    for (i, question) in exam.iter().enumerate() {
        let entry = per_domain
            .entry(question.domain_number)
            .or_insert(DomainScore {
                domain: question.domain_number,
                correct: 0,
                total: 0,
            });
        entry.total += 1;
        if is_position_correct(exam, answers, i) {
            entry.correct += 1;
        }
    }
    per_domain.into_values().collect()
}

/// Smallest correct count that passes an exam of `total` questions.
pub fn passing_score(total: usize, passing_percentage: f64) -> usize {
    (total as f64 * passing_percentage / 100.0).ceil() as usize
}

fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / total as f64
    }
}
