//! The `examprep exam` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use examprep_core::assembler::assemble_practice_exam;
use examprep_core::index::index_by_domain;
use examprep_core::report::SessionReport;
use examprep_core::session::ExamSession;
use examprep_core::timer::ExamClock;

use crate::bank;
use crate::config::load_config_from;
use crate::console::{run_practice, Console, Ending};
use crate::results::{print_results, save_report};

pub fn execute(
    questions_path: PathBuf,
    seed: Option<u64>,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let corpus = bank::load_questions(&questions_path)?;

    let quotas = config.quota_table();
    let index = index_by_domain(&corpus);
    for shortfall in index.shortfalls(&quotas) {
        eprintln!(
            "Note: domain {} has {} of {} questions; {} will be drawn from other domains.",
            shortfall.domain,
            shortfall.available,
            shortfall.quota,
            shortfall.missing()
        );
    }

    let mut rng = bank::rng(seed);
    let exam = assemble_practice_exam(&index, &quotas, &mut rng);
    anyhow::ensure!(!exam.is_empty(), "could not assemble a practice exam");

    println!(
        "Practice exam: {} questions, {} minutes, {:.0}% to pass.",
        exam.len(),
        config.duration_minutes,
        config.passing_percentage
    );

    let mut session = ExamSession::practice(exam, ExamClock::start(Utc::now(), config.duration_minutes));
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock());

    let ending = run_practice(&mut session, &mut console, config.low_time_warning_secs, Utc::now)?;
    if ending == Ending::Abandoned {
        println!("\nExam abandoned; nothing was saved.");
        return Ok(());
    }

    let report = SessionReport::from_session(&session, &config, Utc::now());
    print_results(console.out(), &report)?;

    let path = save_report(&report, &output)?;
    println!("\nReport saved to: {}", path.display());
    println!("Review it with: examprep review --report {}", path.display());

    Ok(())
}
