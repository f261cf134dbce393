mod display;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use task_cli::config::Config;
use task_cli::{Status, TaskStore};
use tracing_subscriber::EnvFilter;

/// Track tasks in a local JSON file
#[derive(Parser, Debug)]
#[command(version, arg_required_else_help = true)]
struct Cli {
    /// Task file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Configuration file to load instead of ./task-cli.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Adds a new task
    Add {
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Updates the description of an existing task
    Update {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Deletes a task by ID
    Delete {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,
    },
    /// Marks a task as in-progress
    MarkInProgress {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,
    },
    /// Marks a task as done
    MarkDone {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,
    },
    /// Moves a task back to todo
    MarkTodo {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,
    },
    /// Lists tasks, optionally only those with the given status
    List {
        /// One of: todo, in-progress, done
        status: Option<Status>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    let config = Config::load(args.config.as_deref()).context("cannot load configuration")?;
    init_tracing(&config.log_level);

    let path = args.file.unwrap_or_else(|| config.file.clone());
    let mut store = TaskStore::open_with(&path, config.store_options())
        .with_context(|| format!("cannot open task store at {}", path.display()))?;

    run(&mut store, args.command)
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(store: &mut TaskStore, command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Add { description } => {
            let id = store.add(&description.join(" "))?;
            println!("Task added successfully (ID: {id})");
        }
        Commands::Update { id, description } => {
            if store.update(id, &description.join(" "))?.is_none() {
                return Ok(not_found(id));
            }
            println!("Task {id} updated successfully");
        }
        Commands::Delete { id } => {
            if store.delete(id)?.is_none() {
                return Ok(not_found(id));
            }
            println!("Task {id} deleted successfully");
        }
        Commands::MarkInProgress { id } => return mark(store, id, Status::InProgress),
        Commands::MarkDone { id } => return mark(store, id, Status::Done),
        Commands::MarkTodo { id } => return mark(store, id, Status::Todo),
        Commands::List { status } => {
            println!("{}", display::render_tasks(store.list(status)));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn mark(store: &mut TaskStore, id: u32, status: Status) -> anyhow::Result<ExitCode> {
    if store.mark_status(id, status)?.is_none() {
        return Ok(not_found(id));
    }
    println!("Task {id} marked as {status}");
    Ok(ExitCode::SUCCESS)
}

fn not_found(id: u32) -> ExitCode {
    eprintln!("Task with ID {id} not found");
    ExitCode::FAILURE
}
