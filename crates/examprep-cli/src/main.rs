//! examprep CLI: practice exams and study sessions in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod bank;
mod commands;
mod config;
mod console;
mod results;

#[derive(Parser)]
#[command(name = "examprep", version, about = "Certification exam practice engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a timed, domain-weighted practice exam
    Exam {
        /// Question bank text file
        #[arg(long)]
        questions: PathBuf,

        /// Seed for question selection (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for the saved session report
        #[arg(long, default_value = "./examprep-results")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Study one domain with immediate feedback
    Study {
        /// Question bank text file
        #[arg(long)]
        questions: PathBuf,

        /// Domain number (1-5)
        #[arg(long)]
        domain: u8,

        /// Number of questions (clamped to the domain's pool)
        #[arg(long, conflicts_with = "all")]
        count: Option<usize>,

        /// Use every question in the domain
        #[arg(long)]
        all: bool,

        /// Seed for question selection (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for the saved session report
        #[arg(long, default_value = "./examprep-results")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Review the answers of a saved session report
    Review {
        /// Session report JSON
        #[arg(long)]
        report: PathBuf,

        /// Only show questions answered incorrectly or skipped
        #[arg(long)]
        incorrect_only: bool,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check a question bank and show its domain coverage
    Validate {
        /// Question bank text file
        #[arg(long)]
        questions: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and a sample question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("examprep=info,examprep_core=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Exam {
            questions,
            seed,
            output,
            config,
        } => commands::exam::execute(questions, seed, output, config),
        Commands::Study {
            questions,
            domain,
            count,
            all,
            seed,
            output,
            config,
        } => commands::study::execute(questions, domain, count, all, seed, output, config),
        Commands::Review {
            report,
            incorrect_only,
            format,
        } => commands::review::execute(report, incorrect_only, format),
        Commands::Validate { questions, config } => commands::validate::execute(questions, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
