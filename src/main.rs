use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use placement_portal::config::Config;
use placement_portal::db::PgStore;
use placement_portal::models::{CompanyForm, StudentForm, StudentPatch};
use placement_portal::{import, report, seed, PortalService};

#[derive(Parser)]
#[command(name = "placement-portal")]
#[command(about = "Placement eligibility and decision tracking for students and administrators", long_about = None)]
struct Cli {
    /// Log filter (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Caller {
    /// Signed-in identity (usually the college email)
    #[arg(long, env = "PORTAL_IDENTITY")]
    identity: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo students, companies and decisions
    Seed,
    /// Import student profiles from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Submit the caller's student profile
    Register {
        #[command(flatten)]
        caller: Caller,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        cgpa: String,
        #[arg(long)]
        semester: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        university_id: String,
        #[arg(long)]
        college_id: String,
    },
    /// Show the caller's student profile
    Profile {
        #[command(flatten)]
        caller: Caller,
    },
    /// Change fields of the caller's student profile
    UpdateProfile {
        #[command(flatten)]
        caller: Caller,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        cgpa: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        university_id: Option<String>,
        #[arg(long)]
        college_id: Option<String>,
    },
    /// List every student
    Students,
    /// Add a company, or replace one when --id names an existing company
    AddCompany {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cgpa_requirement: String,
        /// YYYY-MM-DD
        #[arg(long)]
        interview_date: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        package: String,
        /// Eligible branch; repeat for several
        #[arg(long = "branch")]
        branches: Vec<String>,
    },
    /// List every company
    Companies,
    /// Delete a company and every decision about it
    DeleteCompany {
        #[arg(long)]
        id: String,
    },
    /// Students eligible for a company, with their current decision
    Candidates {
        #[arg(long)]
        company: String,
    },
    /// Record a decision (pending, eligible or rejected)
    Mark {
        #[arg(long)]
        company: String,
        #[arg(long)]
        student: String,
        #[arg(long)]
        status: String,
    },
    /// Show the decision for one company and student
    Status {
        #[arg(long)]
        company: String,
        #[arg(long)]
        student: String,
    },
    /// Interviews a student has been cleared for (the caller unless --student is given)
    Interviews {
        #[arg(long)]
        student: Option<String>,
        #[command(flatten)]
        caller: Caller,
    },
    /// Generate a markdown placement report
    Report {
        #[arg(long)]
        company: Option<String>,
        #[arg(long, default_value = "placement-report.md")]
        out: PathBuf,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = Config::from_env()?;
    let store = PgStore::connect(&config)
        .await
        .context("failed to connect to Postgres")?;

    let store = Arc::new(store);
    let service = PortalService::new(store.clone(), config.retry);
    let json = cli.json;

    match cli.command {
        Commands::InitDb => {
            store.init_db().await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            seed::seed(&service).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let summary = import::import_students(service.records(), &csv).await?;
            println!(
                "Imported {} students from {} ({} rows rejected).",
                summary.imported,
                csv.display(),
                summary.rejected
            );
        }
        Commands::Register {
            caller,
            name,
            email,
            cgpa,
            semester,
            branch,
            university_id,
            college_id,
        } => {
            let form = StudentForm {
                name,
                email,
                cgpa,
                semester,
                branch,
                university_id,
                college_id,
            };
            let student = service
                .records()
                .save_student(caller.identity.as_deref(), &form)
                .await?;
            if json {
                print_json(&student)?;
            } else {
                println!("Profile saved for {}.", student.id);
            }
        }
        Commands::Profile { caller } => {
            let student = service.records().get_student(caller.identity.as_deref()).await?;
            if json {
                print_json(&student)?;
            } else {
                println!("{} <{}>", student.name, student.email);
                println!("- branch {}, semester {}", student.branch, student.semester);
                println!("- CGPA {:.2}", student.cgpa);
                println!(
                    "- university id {}, college id {}",
                    student.university_id, student.college_id
                );
            }
        }
        Commands::UpdateProfile {
            caller,
            name,
            email,
            cgpa,
            semester,
            branch,
            university_id,
            college_id,
        } => {
            let patch = StudentPatch {
                name,
                email,
                cgpa,
                semester,
                branch,
                university_id,
                college_id,
            };
            let student = service
                .records()
                .update_student(caller.identity.as_deref(), &patch)
                .await?;
            if json {
                print_json(&student)?;
            } else {
                println!("Profile updated for {}.", student.id);
            }
        }
        Commands::Students => {
            let mut students = service.records().list_students().await?;
            students.sort_by(|a, b| a.name.cmp(&b.name));
            if json {
                print_json(&students)?;
            } else if students.is_empty() {
                println!("No students registered.");
            } else {
                for student in students.iter() {
                    println!(
                        "- {} ({}, {}) CGPA {:.2}, semester {}",
                        student.name, student.id, student.branch, student.cgpa, student.semester
                    );
                }
            }
        }
        Commands::AddCompany {
            id,
            name,
            cgpa_requirement,
            interview_date,
            location,
            package,
            branches,
        } => {
            let form = CompanyForm {
                id,
                name,
                location,
                package,
                cgpa_requirement,
                interview_date,
                eligible_branches: branches,
            };
            let company = service.records().save_company(&form).await?;
            if json {
                print_json(&company)?;
            } else {
                println!("Company {} saved with id {}.", company.name, company.id);
            }
        }
        Commands::Companies => {
            let companies = service.records().list_companies().await?;
            if json {
                print_json(&companies)?;
            } else if companies.is_empty() {
                println!("No companies registered.");
            } else {
                for company in companies.iter() {
                    println!(
                        "- {} ({}) on {}, min CGPA {:.2}, branches: {}",
                        company.name,
                        company.id,
                        company.interview_date,
                        company.cgpa_requirement,
                        company.eligible_branches.join(", ")
                    );
                }
            }
        }
        Commands::DeleteCompany { id } => {
            let outcome = service.records().delete_company(&id).await?;
            if json {
                print_json(&outcome)?;
            } else if outcome.company_removed {
                println!(
                    "Company {id} deleted along with {} decisions.",
                    outcome.decisions_removed
                );
            } else {
                println!(
                    "Company {id} was already gone; removed {} leftover decisions.",
                    outcome.decisions_removed
                );
            }
        }
        Commands::Candidates { company } => {
            let candidates = service.candidates_for_company(&company).await?;
            if json {
                print_json(&candidates)?;
            } else if candidates.is_empty() {
                println!("No students meet the criteria for {company}.");
            } else {
                for candidate in candidates.iter() {
                    println!(
                        "- {} ({}, {}) CGPA {:.2}: {}",
                        candidate.student.name,
                        candidate.student.id,
                        candidate.student.branch,
                        candidate.student.cgpa,
                        candidate.status
                    );
                }
            }
        }
        Commands::Mark {
            company,
            student,
            status,
        } => {
            let decision = service.ledger().set_status(&company, &student, &status).await?;
            if json {
                print_json(&decision)?;
            } else {
                println!("Marked {} as {} for {}.", student, decision.status, company);
            }
        }
        Commands::Status { company, student } => {
            let status = service.ledger().get_status(&company, &student).await?;
            if json {
                print_json(&status)?;
            } else {
                println!("{status}");
            }
        }
        Commands::Interviews { student, caller } => {
            let interviews = match student {
                Some(student_id) => service.eligible_interviews(&student_id).await?,
                None => service.my_interviews(caller.identity.as_deref()).await?,
            };
            if json {
                print_json(&interviews)?;
            } else if interviews.is_empty() {
                println!("No interviews yet.");
            } else {
                for company in interviews.iter() {
                    println!(
                        "- {} on {} in {} ({})",
                        company.name, company.interview_date, company.location, company.package
                    );
                }
            }
        }
        Commands::Report { company, out } => {
            let overview = service.placement_overview(company.as_deref()).await?;
            let report = report::build_report(company.as_deref(), Utc::now().date_naive(), &overview);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
