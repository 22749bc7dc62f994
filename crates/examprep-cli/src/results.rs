//! Result tables and report saving for finished sessions.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examprep_core::model::SessionMode;
use examprep_core::report::SessionReport;
use examprep_core::session::FinishReason;
use examprep_core::timer::format_elapsed;

/// Print the score summary and per-domain breakdown.
pub fn print_results<W: Write>(out: &mut W, report: &SessionReport) -> Result<()> {
    let score = &report.score;
    let title = match report.mode {
        SessionMode::Practice => "Practice Exam Results",
        SessionMode::Study => "Study Session Results",
    };
    writeln!(out, "\n{title}")?;
    if report.finish_reason == Some(FinishReason::TimeExpired) {
        writeln!(out, "Time expired; unanswered questions count as incorrect.")?;
    }

    let mut summary = Table::new();
    summary.set_header(vec!["Score", "Percentage", "Passing", "Result"]);
    summary.add_row(vec![
        Cell::new(format!("{}/{}", score.correct_count, score.total)),
        Cell::new(format!("{:.1}%", score.percentage)),
        Cell::new(format!(
            "{}/{} ({:.0}%)",
            report.passing_score, score.total, report.passing_percentage
        )),
        Cell::new(if score.passed { "PASSED" } else { "FAILED" }),
    ]);
    writeln!(out, "{summary}")?;
    writeln!(out, "Answered {} of {}", score.answered, score.total)?;
    if let Some(elapsed) = report.elapsed_seconds {
        writeln!(out, "Time used: {}", format_elapsed(elapsed))?;
    }

    if !report.domains.is_empty() {
        let mut domains = Table::new();
        domains.set_header(vec!["Domain", "Name", "Correct", "Score"]);
        for d in &report.domains {
            domains.add_row(vec![
                Cell::new(d.domain),
                Cell::new(d.name.as_deref().unwrap_or("-")),
                Cell::new(format!("{}/{}", d.correct, d.total)),
                Cell::new(format!("{:.1}%", d.percentage())),
            ]);
        }
        writeln!(out, "\n{domains}")?;
    }
    Ok(())
}

/// Save `report` as JSON under `output_dir`, returning the file path.
pub fn save_report(report: &SessionReport, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;
    let id = report.id.simple().to_string();
    let path = output_dir.join(format!(
        "{}-{}-{}.json",
        report.mode,
        report.created_at.format("%Y%m%d-%H%M%S"),
        &id[..8]
    ));
    report.save_json(&path)?;
    tracing::info!(report = %report.id, "saved session report to {}", path.display());
    Ok(path)
}
