//! Question bank loading shared by the commands.

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use examprep_core::model::Question;
use examprep_core::parser;

/// Read and parse a question bank, failing when nothing usable is in it.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let text = read_bank(path)?;
    let questions = parser::parse(&text);
    if questions.is_empty() {
        anyhow::bail!(
            "no valid questions found in {}; each record needs a '----Question <id>' marker, \
             a Domain line, question text, and options",
            path.display()
        );
    }
    tracing::info!(
        questions = questions.len(),
        records = parser::count_records(&text),
        "loaded question bank from {}",
        path.display()
    );
    Ok(questions)
}

/// Read a question bank file as UTF-8 text.
pub fn read_bank(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))
}

/// A seeded generator when `seed` is given, an entropy-seeded one otherwise.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
