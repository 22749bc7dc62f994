//! Question bank parser.
//!
//! Recovers questions from the loosely delimited text format used by
//! question banks:
//!
//! ```text
//! ----Question 12
//! Domain: Domain 2: Information Security Controls and Audit Management
//! Question text: Which control ...?
//! Options:
//! A. First option
//! B. Second option [CORRECT]
//! Excerpt from source: ...
//! ```
//!
//! Records that cannot be fully recovered are skipped; parsing never fails.

use std::collections::HashSet;

use crate::error::BlockError;
use crate::model::{AnswerOption, Letter, Question, MAX_DOMAIN, UNKNOWN_DOMAIN};

/// Literal that opens every record, followed by whitespace and the id.
pub const RECORD_MARKER: &str = "----Question";

/// In-line flag marking the correct option.
pub const CORRECT_MARKER: &str = "[CORRECT]";

/// Field labels recognised at the start of a line inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Domain,
    QuestionText,
    Options,
    Excerpt,
}

impl Label {
    const ALL: [Label; 4] = [
        Label::Domain,
        Label::QuestionText,
        Label::Options,
        Label::Excerpt,
    ];

    fn text(self) -> &'static str {
        match self {
            Label::Domain => "Domain:",
            Label::QuestionText => "Question text:",
            Label::Options => "Options:",
            Label::Excerpt => "Excerpt from source:",
        }
    }
}

/// One record as split out of the input, before field extraction.
#[derive(Debug, Clone, Copy)]
struct RawBlock<'a> {
    id: &'a str,
    body: &'a str,
}

/// Raw field regions of a record. The first occurrence of each label wins.
#[derive(Debug, Default)]
struct Fields<'a> {
    domain: Option<&'a str>,
    question_text: Option<&'a str>,
    options: Option<&'a str>,
    excerpt: Option<&'a str>,
}

impl<'a> Fields<'a> {
    fn slot(&mut self, label: Label) -> &mut Option<&'a str> {
        match label {
            Label::Domain => &mut self.domain,
            Label::QuestionText => &mut self.question_text,
            Label::Options => &mut self.options,
            Label::Excerpt => &mut self.excerpt,
        }
    }
}

/// Parse a question bank into questions, in source order.
///
/// Malformed records are dropped silently; an empty result means no usable
/// question was found.
pub fn parse(text: &str) -> Vec<Question> {
    let mut questions = Vec::new();
    let mut skipped = 0usize;

    for result in parse_blocks(text) {
        match result {
            Ok(question) => questions.push(question),
            Err(e) => {
                skipped += 1;
                tracing::debug!("skipping record: {e}");
            }
        }
    }

    tracing::debug!(parsed = questions.len(), skipped, "parsed question bank");
    questions
}

/// Parse every record, keeping the reason each failed one was rejected.
pub fn parse_blocks(text: &str) -> impl Iterator<Item = Result<Question, BlockError>> + '_ {
    split_records(text).into_iter().map(parse_block)
}

/// Count the record markers in `text`; an upper bound on `parse(text).len()`.
pub fn count_records(text: &str) -> usize {
    split_records(text).len()
}

fn split_records(text: &str) -> Vec<RawBlock<'_>> {
    let mut blocks = Vec::new();
    // (id, byte offset where the body starts)
    let mut open: Option<(&str, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if let Some((id, id_end)) = record_marker(line) {
            if let Some((prev_id, start)) = open.take() {
                blocks.push(RawBlock {
                    id: prev_id,
                    body: &text[start..offset],
                });
            }
            open = Some((id, offset + id_end));
        }
        offset += line.len();
    }

    if let Some((id, start)) = open {
        blocks.push(RawBlock {
            id,
            body: &text[start..],
        });
    }

    blocks
}

/// If `line` opens a record, return the id digits and the offset just past them.
fn record_marker(line: &str) -> Option<(&str, usize)> {
    let indent = leading_blank_len(line);
    let rest = line[indent..].strip_prefix(RECORD_MARKER)?;
    let gap = leading_blank_len(rest);
    if gap == 0 {
        return None;
    }

    let digits_start = indent + RECORD_MARKER.len() + gap;
    let digits_len = line[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }

    let end = digits_start + digits_len;
    Some((&line[digits_start..end], end))
}

fn leading_blank_len(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}

fn parse_block(raw: RawBlock<'_>) -> Result<Question, BlockError> {
    let id: u32 = raw
        .id
        .parse()
        .map_err(|_| BlockError::InvalidId(raw.id.to_string()))?;

    let fields = scan_fields(raw.body);

    // The label may sit on the line after `Domain:`.
    let domain_label = fields
        .domain
        .and_then(|region| region.lines().map(str::trim).find(|line| !line.is_empty()))
        .ok_or(BlockError::MissingDomain { id })?;
    let domain_number = domain_number(domain_label);

    let question_text = fields
        .question_text
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(BlockError::MissingQuestionText { id })?;

    let options = fields.options.map(parse_options).unwrap_or_default();
    if options.is_empty() {
        return Err(BlockError::NoOptions { id });
    }

    let excerpt = fields.excerpt.map(str::trim).unwrap_or_default();

    Ok(Question {
        id,
        domain_label: domain_label.to_string(),
        domain_number,
        question_text: question_text.to_string(),
        options,
        excerpt: excerpt.to_string(),
    })
}

/// Locate every label line and cut the body into field regions.
///
/// A region runs from just after its label to the start of the next label
/// line, or to the end of the record.
fn scan_fields(body: &str) -> Fields<'_> {
    // (label, value start, start of the label's line)
    let mut marks: Vec<(Label, usize, usize)> = Vec::new();
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let indent = leading_blank_len(line);
        let rest = &line[indent..];
        if let Some(label) = Label::ALL.into_iter().find(|l| rest.starts_with(l.text())) {
            marks.push((label, offset + indent + label.text().len(), offset));
        }
        offset += line.len();
    }

    let mut fields = Fields::default();
    for (i, &(label, value_start, _)) in marks.iter().enumerate() {
        let end = marks.get(i + 1).map_or(body.len(), |&(_, _, line_start)| line_start);
        let slot = fields.slot(label);
        if slot.is_none() {
            *slot = Some(&body[value_start..end]);
        }
    }
    fields
}

/// First integer following the word "Domain"; 0 when absent or out of range.
fn domain_number(label: &str) -> u8 {
    const WORD: &str = "Domain";

    let mut rest = label;
    while let Some(pos) = rest.find(WORD) {
        let after = &rest[pos + WORD.len()..];
        let candidate = after.trim_start();
        let digits_len = candidate
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits_len > 0 {
            return candidate[..digits_len]
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=MAX_DOMAIN).contains(n))
                .unwrap_or(UNKNOWN_DOMAIN);
        }
        rest = after;
    }
    UNKNOWN_DOMAIN
}

/// Extract `A.` .. `D.` options from the options region.
fn parse_options(region: &str) -> Vec<AnswerOption> {
    // (letter, text start, start of the option's line)
    let mut starts: Vec<(Letter, usize, usize)> = Vec::new();
    let mut offset = 0;

    for line in region.split_inclusive('\n') {
        let indent = leading_blank_len(line);
        let mut chars = line[indent..].chars();
        if let (Some(c), Some('.')) = (chars.next(), chars.next()) {
            if let Some(letter) = Letter::from_char(c) {
                starts.push((letter, offset + indent + 2, offset));
            }
        }
        offset += line.len();
    }

    let mut seen = HashSet::new();
    let mut options = Vec::with_capacity(starts.len());
    for (i, &(letter, text_start, _)) in starts.iter().enumerate() {
        let end = starts
            .get(i + 1)
            .map_or(region.len(), |&(_, _, line_start)| line_start);
        if !seen.insert(letter) {
            continue;
        }
        options.push(option_from_raw(letter, &region[text_start..end]));
    }
    options
}

fn option_from_raw(letter: Letter, raw: &str) -> AnswerOption {
    let is_correct = raw.contains(CORRECT_MARKER);
    let text = if is_correct {
        raw.replace(CORRECT_MARKER, "").trim().to_string()
    } else {
        raw.trim().to_string()
    };
    AnswerOption {
        letter,
        text,
        is_correct,
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Check a parsed corpus for questions that will behave oddly in an exam.
pub fn validate_corpus(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in questions {
        if !seen_ids.insert(q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: format!("duplicate question id: {}", q.id),
            });
        }
    }

    for q in questions {
        let flagged = q.options.iter().filter(|o| o.is_correct).count();
        let message = match flagged {
            0 => Some("no option is marked correct; it can never be scored as correct".to_string()),
            1 => None,
            n => Some(format!(
                "{n} options are marked correct; it can never be scored as correct"
            )),
        };
        if let Some(message) = message {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message,
            });
        }
    }

    for q in questions.iter().filter(|q| !q.has_known_domain()) {
        warnings.push(ValidationWarning {
            question_id: Some(q.id),
            message: format!(
                "domain label '{}' has no domain number; it is only used to fill shortfalls",
                q.domain_label
            ),
        });
    }

    warnings
}
