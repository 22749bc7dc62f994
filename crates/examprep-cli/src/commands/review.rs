//! The `examprep review` command.

use std::path::PathBuf;

use anyhow::Result;

use examprep_core::report::{Outcome, ReviewItem, SessionReport};

pub fn execute(report_path: PathBuf, incorrect_only: bool, format: String) -> Result<()> {
    let report = SessionReport::load_json(&report_path)?;

    match format.as_str() {
        "text" => print!("{}", render_text(&report, incorrect_only)),
        "markdown" => print!("{}", report.to_markdown(incorrect_only)),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, or json)"),
    }

    Ok(())
}

fn render_text(report: &SessionReport, incorrect_only: bool) -> String {
    let score = &report.score;
    let mut out = format!(
        "{} session of {}\nScore: {}/{} ({:.1}%) {}\n",
        report.mode,
        report.created_at.format("%Y-%m-%d %H:%M UTC"),
        score.correct_count,
        score.total,
        score.percentage,
        if score.passed { "PASSED" } else { "FAILED" }
    );

    let items: Vec<&ReviewItem> = if incorrect_only {
        report.incorrect().collect()
    } else {
        report.items.iter().collect()
    };
    if items.is_empty() {
        out.push_str("\nNothing to review.\n");
        return out;
    }

    for item in items {
        let verdict = match item.outcome {
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
            Outcome::Unanswered => "not answered",
        };
        out.push_str(&format!(
            "\nQuestion {} (#{}, {}): {verdict}\n{}\n",
            item.position + 1,
            item.question_id,
            item.domain_label,
            item.question_text
        ));
        for option in &item.options {
            let mut tags = Vec::new();
            if Some(option.letter) == item.chosen {
                tags.push("your answer");
            }
            if Some(option.letter) == item.correct {
                tags.push("correct");
            }
            let tags = if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(", "))
            };
            out.push_str(&format!("   {}. {}{tags}\n", option.letter, option.text));
        }
        if !item.excerpt.is_empty() {
            out.push_str(&format!("   Reference: {}\n", item.excerpt));
        }
    }
    out
}
