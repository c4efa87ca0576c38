use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod access;
mod catalog;
mod config;
mod db;
mod directory;
mod error;
mod evaluation;
mod input;
mod models;
mod report;
mod scoring;
mod store;

use crate::config::Config;
use crate::directory::{Directory, EmployeeFilter};
use crate::evaluation::{EmployeeView, EvaluationDraft, EvaluationService};
use crate::models::{Actor, NewEmployee, Role};
use crate::store::Store;

#[derive(Parser)]
#[command(name = "employee-evaluation")]
#[command(about = "Weighted performance and personality evaluations for employees", long_about = None)]
struct Cli {
    /// JSON criteria catalog replacing the built-in one
    #[arg(long, global = true)]
    criteria: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ActorArgs {
    /// Id of the user performing the action
    #[arg(long = "as", env = "EVAL_USER_ID")]
    user: Uuid,
    #[arg(long, env = "EVAL_ROLE")]
    role: Role,
}

impl ActorArgs {
    fn actor(&self) -> Actor {
        Actor {
            id: self.user,
            role: self.role,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo departments, employees and an evaluation
    Seed,
    /// Import employees from a CSV file
    ImportEmployees {
        #[arg(long)]
        csv: PathBuf,
    },
    /// List the evaluation criteria
    Criteria,
    /// List employees
    Employees {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Add an employee
    AddEmployee {
        #[command(flatten)]
        actor: ActorArgs,
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        department: String,
        #[arg(long, default_value = "")]
        avatar: String,
        #[arg(long)]
        hire_date: Option<NaiveDate>,
    },
    /// Delete an employee
    DeleteEmployee {
        #[command(flatten)]
        actor: ActorArgs,
        #[arg(long)]
        id: Uuid,
    },
    /// List departments
    Departments,
    /// Add a department
    AddDepartment {
        #[command(flatten)]
        actor: ActorArgs,
        #[arg(long)]
        name: String,
    },
    /// Delete a department that no employee belongs to
    DeleteDepartment {
        #[command(flatten)]
        actor: ActorArgs,
        #[arg(long)]
        name: String,
    },
    /// Create an evaluation, or re-score an existing one with --evaluation
    Evaluate {
        #[command(flatten)]
        actor: ActorArgs,
        #[arg(long)]
        employee: Option<Uuid>,
        #[arg(long)]
        evaluation: Option<Uuid>,
        /// CSV file with criteria_id,score rows
        #[arg(long)]
        scores: Option<PathBuf>,
        /// Single score as criteria_id=score; may be repeated
        #[arg(long = "score", value_parser = input::parse_score_arg)]
        score: Vec<(String, i32)>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Show an employee's evaluations, or aggregates for read-only roles
    Show {
        #[command(flatten)]
        actor: ActorArgs,
        #[arg(long)]
        employee: Uuid,
        /// Force the read-only summary
        #[arg(long)]
        view: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if cli.criteria.is_some() {
        config.criteria_path = cli.criteria.clone();
    }
    let catalog = config.load_catalog()?;
    debug!(criteria = catalog.len(), "criteria catalog loaded");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let store: Arc<dyn Store> = Arc::new(db::PgStore::new(pool.clone()));
    let directory = Directory::new(store.clone());
    let evaluations = EvaluationService::new(store, catalog);

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::ImportEmployees { csv } => {
            let inserted = db::import_employees(&pool, &csv).await?;
            println!("Inserted {inserted} employees from {}.", csv.display());
        }
        Commands::Criteria => {
            print!("{}", report::criteria_listing(evaluations.catalog()));
        }
        Commands::Employees { search, department } => {
            let employees = directory
                .list_employees(&EmployeeFilter { search, department })
                .await?;
            print!("{}", report::employee_table(&employees));
        }
        Commands::AddEmployee {
            actor,
            name,
            position,
            department,
            avatar,
            hire_date,
        } => {
            let employee = directory
                .add_employee(
                    &actor.actor(),
                    NewEmployee {
                        name,
                        position,
                        department,
                        avatar,
                        hire_date,
                        performance: 0.0,
                        personality: 0.0,
                    },
                )
                .await?;
            println!(
                "{} added as {} ({}).",
                employee.name, employee.position, employee.id
            );
        }
        Commands::DeleteEmployee { actor, id } => {
            let employee = directory.delete_employee(&actor.actor(), id).await?;
            println!("{} removed.", employee.name);
        }
        Commands::Departments => {
            for department in directory.list_departments().await? {
                println!("- {}", department.name);
            }
        }
        Commands::AddDepartment { actor, name } => {
            let department = directory.add_department(&actor.actor(), &name).await?;
            println!("Department {} added.", department.name);
        }
        Commands::DeleteDepartment { actor, name } => {
            let department = directory.delete_department(&actor.actor(), &name).await?;
            println!("Department {} deleted.", department.name);
        }
        Commands::Evaluate {
            actor,
            employee,
            evaluation,
            scores,
            score,
            comment,
        } => {
            let mut draft = EvaluationDraft {
                evaluation_id: evaluation,
                employee_id: employee,
                ..Default::default()
            };
            if let Some(id) = evaluation {
                let session = evaluations.load_for_edit(id).await?;
                draft.scores = session.scores;
                draft.comment = session.evaluation.overall_comment;
            }
            if let Some(path) = scores {
                for (id, value) in input::read_score_file(&path)?.iter() {
                    draft.scores.set(id, value);
                }
            }
            for (id, value) in score {
                draft.scores.set(&id, value);
            }
            if let Some(comment) = comment {
                draft.comment = comment;
            }

            println!(
                "Form {:.0}% complete.",
                scoring::progress(&draft.scores, evaluations.catalog())
            );
            let submission = evaluations.submit(&actor.actor(), &draft).await?;
            let verb = if submission.created { "saved" } else { "updated" };
            println!("Evaluation {} {verb}. {}", submission.evaluation.id, submission.message());
        }
        Commands::Show {
            actor,
            employee,
            view,
        } => match evaluations
            .employee_view(&actor.actor(), employee, view)
            .await?
        {
            EmployeeView::Aggregate { employee } => {
                print!("{}", report::view_only_summary(&employee));
            }
            EmployeeView::Detailed {
                employee,
                evaluations: records,
            } => {
                if records.is_empty() {
                    print!("{}", report::view_only_summary(&employee));
                    println!();
                    println!("No evaluations recorded.");
                }
                for record in &records {
                    print!(
                        "{}",
                        report::evaluation_summary(&employee, record, evaluations.catalog())
                    );
                    println!();
                }
            }
        },
    }

    Ok(())
}
