//! The `examprep validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examprep_core::index::index_by_domain;
use examprep_core::model::{Question, UNKNOWN_DOMAIN};
use examprep_core::parser;

use crate::bank;
use crate::config::load_config_from;

pub fn execute(questions_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let text = bank::read_bank(&questions_path)?;

    let mut questions: Vec<Question> = Vec::new();
    let mut skipped = Vec::new();
    for block in parser::parse_blocks(&text) {
        match block {
            Ok(q) => questions.push(q),
            Err(e) => skipped.push(e),
        }
    }

    println!(
        "Question bank: {} ({} questions, {} records skipped)",
        questions_path.display(),
        questions.len(),
        skipped.len()
    );
    for e in &skipped {
        println!("  SKIPPED: {e}");
    }
    if questions.is_empty() {
        anyhow::bail!("no valid questions found in {}", questions_path.display());
    }

    let index = index_by_domain(&questions);
    let mut table = Table::new();
    table.set_header(vec!["Domain", "Name", "Questions", "Quota", "Status"]);
    for domain in &config.domains {
        let available = index.count(domain.number);
        let status = if available >= domain.quota {
            "OK".to_string()
        } else {
            format!("short by {}", domain.quota - available)
        };
        table.add_row(vec![
            Cell::new(domain.number),
            Cell::new(&domain.name),
            Cell::new(available),
            Cell::new(domain.quota),
            Cell::new(status),
        ]);
    }
    let unknown = index.count(UNKNOWN_DOMAIN);
    if unknown > 0 {
        table.add_row(vec![
            Cell::new("-"),
            Cell::new("(no domain number)"),
            Cell::new(unknown),
            Cell::new("-"),
            Cell::new("fill only"),
        ]);
    }
    println!("{table}");

    let warnings = parser::validate_corpus(&questions);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
