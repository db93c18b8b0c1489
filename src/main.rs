use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod advisor;
mod config;
mod error;
mod models;
mod query;
mod report;
mod stats;
mod store;

use advisor::{GeminiClient, TextGenerator};
use config::Settings;
use models::{FilterConfig, GpaBucket, GradeFilter, StudentRecord};
use store::RosterStore;

#[derive(Parser)]
#[command(name = "edutrack")]
#[command(about = "Student roster, dashboard statistics and advisor reports", long_about = None)]
struct Cli {
    /// JSON or CSV roster to use instead of the built-in fixture
    #[arg(long, global = true)]
    roster: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List students matching the given filters
    Students {
        /// Matches full name or email
        #[arg(long, default_value = "")]
        search: String,
        /// Matches full name only
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value_t = GradeFilter::All)]
        grade: GradeFilter,
        #[arg(long)]
        json: bool,
    },
    /// Show one student's profile and grades
    Show {
        #[arg(long)]
        id: String,
    },
    /// Print dashboard statistics
    Dashboard {
        #[arg(long)]
        json: bool,
        /// Write a markdown overview instead of printing
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate an advisor report for one student
    Report {
        #[arg(long)]
        id: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the known subject catalog
    Subjects,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let store = match &cli.roster {
        Some(path) => RosterStore::load(path)?,
        None => RosterStore::fixture(),
    };

    match cli.command {
        Commands::Students {
            search,
            name,
            grade,
            json,
        } => {
            let config = FilterConfig {
                global_search: search,
                name_filter: name,
                grade_filter: grade,
            };
            let students = query::filter_students(store.records(), &config);

            if json {
                println!("{}", serde_json::to_string_pretty(&students)?);
                return Ok(());
            }
            if students.is_empty() {
                println!("No students found matching your criteria.");
                return Ok(());
            }

            for student in students {
                println!(
                    "- [{}] {} ({}) {} GPA {:.2} ({:?}), attendance {}% ({:?})",
                    student.id,
                    student.full_name(),
                    student.email,
                    student.grade_level,
                    student.gpa,
                    student.gpa_tier(),
                    student.attendance_rate,
                    student.attendance_tier()
                );
            }
        }
        Commands::Show { id } => {
            let student = find_student(&store, &id)?;
            print_profile(student);
        }
        Commands::Dashboard { json, out } => {
            if store.is_empty() {
                println!("No students on the roster.");
                return Ok(());
            }

            if let Some(out) = out {
                let today = chrono::Local::now().date_naive();
                let overview = report::build_dashboard_report(store.records(), today)?;
                std::fs::write(&out, overview)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Dashboard overview written to {}.", out.display());
                return Ok(());
            }

            let summary = stats::aggregate(store.records())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("Total students: {}", summary.total_count);
            println!("Average GPA: {:.2}", summary.mean_gpa);
            println!("Avg attendance: {:.1}%", summary.mean_attendance);
            println!("At risk: {}", summary.at_risk_count);
            println!("GPA distribution:");
            for bucket in GpaBucket::ALL {
                println!("- {}: {}", bucket.label(), summary.bucket_count(bucket));
            }
        }
        Commands::Report { id, model, out } => {
            let student = find_student(&store, &id)?;
            let client = GeminiClient::from_settings(&settings).map(|client| match model {
                Some(model) => client.with_model(model),
                None => client,
            });
            let transport = client.as_ref().map(|c| c as &dyn TextGenerator);

            let text = advisor::generate_report(student, transport).await;

            match out {
                Some(out) => {
                    std::fs::write(&out, &text)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Report written to {}.", out.display());
                }
                None => println!("{text}"),
            }
        }
        Commands::Subjects => {
            for subject in store::SUBJECTS {
                println!("{subject}");
            }
        }
    }

    Ok(())
}

fn find_student<'a>(store: &'a RosterStore, id: &str) -> anyhow::Result<&'a StudentRecord> {
    store
        .find(id)
        .with_context(|| format!("no student with id {id}"))
}

fn print_profile(student: &StudentRecord) {
    println!("{} ({})", student.full_name(), student.id);
    println!("{} | {}", student.grade_level, student.email);
    println!("Avatar: {}", student.avatar_url);
    println!(
        "GPA {} ({:?}), attendance {}% ({:?})",
        student.gpa,
        student.gpa_tier(),
        student.attendance_rate,
        student.attendance_tier()
    );

    if student.activities().is_empty() {
        println!("Activities: none");
    } else {
        println!("Activities: {}", student.activities().join(", "));
    }

    println!("Grades:");
    for grade in student.grades.iter() {
        println!(
            "- {}: {} {} ({:?})",
            grade.subject,
            grade.score,
            grade.letter,
            grade.band()
        );
    }
}
