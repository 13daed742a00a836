use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod models;
mod rating;
mod report;
mod roster;
mod stats;

use models::{CourseSummary, MemberSummary};
use roster::{ImportOutcome, Roster};

#[derive(Parser)]
#[command(name = "coursework-ratings")]
#[command(about = "Grades between students, lecturers and reviewers, with course averages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in Python course scenario
    Demo {
        #[arg(long)]
        json: bool,
    },
    /// Print every member and the course averages
    Summary {
        #[arg(long, env = "COURSEWORK_ROSTER")]
        roster: PathBuf,
        #[arg(long)]
        ratings: Option<PathBuf>,
        #[arg(long, default_value = "Python")]
        course: String,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, env = "COURSEWORK_ROSTER")]
        roster: PathBuf,
        #[arg(long)]
        ratings: Option<PathBuf>,
        #[arg(long, default_value = "Python")]
        course: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Serialize)]
struct JsonSummary {
    members: Vec<MemberSummary>,
    course: CourseSummary,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load(roster_path: &Path, ratings: Option<&Path>) -> anyhow::Result<(Roster, Option<ImportOutcome>)> {
    let mut roster = roster::load_roster(roster_path)?;
    let imported = match ratings {
        Some(path) => Some(roster.import_ratings_file(path)?),
        None => None,
    };
    Ok((roster, imported))
}

fn print_json(roster: &Roster, course: &str) -> anyhow::Result<()> {
    let summary = JsonSummary {
        members: stats::rank_members(&roster.members),
        course: report::course_summary(roster, course),
    };
    let rendered = serde_json::to_string_pretty(&summary).context("failed to render summary")?;
    println!("{rendered}");
    Ok(())
}

fn run_demo(json: bool) -> anyhow::Result<()> {
    let roster = roster::demo_roster().context("demo scenario refused a rating")?;
    if json {
        return print_json(&roster, "Python");
    }

    for member in &roster.members {
        println!("{member}\n");
    }

    if let [first, second] = roster.students().as_slice() {
        println!("{}", first.is_better_than(second));
    }
    if let [first, second] = roster.lecturers().as_slice() {
        println!("{}", first.is_better_than(second));
    }
    println!();

    let summary = report::course_summary(&roster, "Python");
    for (label, outcome) in [("students", &summary.students), ("lecturers", &summary.lecturers)] {
        match outcome {
            Ok(average) => println!("Average grade of {label} on Python: {average}"),
            Err(reason) => println!("Average grade of {label} on Python: error ({reason})"),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { json } => run_demo(json)?,
        Commands::Summary {
            roster,
            ratings,
            course,
            json,
        } => {
            let (roster, _) = load(&roster, ratings.as_deref())?;
            if json {
                print_json(&roster, &course)?;
            } else {
                print!("{}", report::build_summary(&roster, &course));
            }
        }
        Commands::Report {
            roster,
            ratings,
            course,
            out,
        } => {
            let (roster, imported) = load(&roster, ratings.as_deref())?;
            let report = report::build_report(
                &roster,
                &course,
                imported.as_ref(),
                chrono::Utc::now().date_naive(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write report {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
