//! The `examprep study` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use examprep_core::assembler::{assemble_study_session, clamp_study_count};
use examprep_core::index::index_by_domain;
use examprep_core::model::MAX_DOMAIN;
use examprep_core::report::SessionReport;
use examprep_core::session::ExamSession;

use crate::bank;
use crate::config::load_config_from;
use crate::console::{run_study, Console, Ending};
use crate::results::{print_results, save_report};

pub fn execute(
    questions_path: PathBuf,
    domain: u8,
    count: Option<usize>,
    all: bool,
    seed: Option<u64>,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        (1..=MAX_DOMAIN).contains(&domain),
        "domain must be between 1 and {MAX_DOMAIN}"
    );

    let config = load_config_from(config_path.as_deref())?;
    let corpus = bank::load_questions(&questions_path)?;
    let index = index_by_domain(&corpus);

    let pool = index.pool(domain);
    let name = config.domain_name(domain).unwrap_or("unnamed");
    if pool.is_empty() {
        anyhow::bail!("no questions available for domain {domain} ({name})");
    }

    let requested = if all {
        pool.len()
    } else {
        count.unwrap_or(config.default_study_count)
    };
    let count = clamp_study_count(requested, pool.len());
    if count != requested {
        eprintln!("Note: using {count} questions ({} available in domain {domain}).", pool.len());
    }

    let mut rng = bank::rng(seed);
    let questions = assemble_study_session(&pool, count, &mut rng);
    println!("Study session: domain {domain} ({name}), {} questions.", questions.len());

    let mut session = ExamSession::study(questions);
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock());

    if run_study(&mut session, &mut console)? == Ending::Abandoned {
        println!("\nStudy session abandoned; nothing was saved.");
        return Ok(());
    }

    let report = SessionReport::from_session(&session, &config, Utc::now());
    print_results(console.out(), &report)?;

    let path = save_report(&report, &output)?;
    println!("\nReport saved to: {}", path.display());

    Ok(())
}
