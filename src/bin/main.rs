//! druidkit CLI - Run native queries and manage tasks on a Druid cluster
//!
//! Usage:
//!   druidkit [--config <file>] [-v] query <query.json> [--context <key=value>]...
//!   druidkit intervals <datasource>
//!   druidkit describe <datasource>
//!   druidkit submit <task.json>
//!   druidkit status <task-id>
//!   druidkit wait <task-id> [--poll-ms <ms>] [--max-polls <n>]
//!
//! Examples:
//!   druidkit query queries/top_channels.json
//!   druidkit query queries/scan.json --context timeout=30000 --context vectorize=force
//!   druidkit --config prod.toml describe wikipedia
//!   druidkit wait index_wikipedia_2020 --poll-ms 2000

use clap::{Parser, Subcommand};
use druidkit::client::{DruidClient, TaskState};
use druidkit::config::Settings;
use druidkit::query::QueryContext;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "druidkit")]
#[command(about = "druidkit - Native query and task client for Apache Druid")]
#[command(version)]
struct Cli {
    /// Path to a druidkit.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log requests and retries to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a native JSON query and print the normalized rows
    Query {
        /// Path to the query JSON file
        file: PathBuf,

        /// Context flag to set on the query, as key=value (value parsed as JSON, else a string)
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
    },

    /// List segment intervals of a data source
    Intervals {
        /// Data source name
        datasource: String,
    },

    /// Show the dimensions and metrics of a data source
    Describe {
        /// Data source name
        datasource: String,
    },

    /// Submit an indexing task
    Submit {
        /// Path to the task JSON file
        file: PathBuf,
    },

    /// Show the status of a task
    Status {
        /// Task id
        task_id: String,
    },

    /// Wait for a task to finish
    Wait {
        /// Task id
        task_id: String,

        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 5000)]
        poll_ms: u64,

        /// Stop after this many polls even if the task is still running
        #[arg(long)]
        max_polls: Option<u32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = match build_client(cli.config.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Query { file, context } => cmd_query(&client, &file, &context),
        Commands::Intervals { datasource } => cmd_intervals(&client, &datasource),
        Commands::Describe { datasource } => cmd_describe(&client, &datasource),
        Commands::Submit { file } => cmd_submit(&client, &file),
        Commands::Status { task_id } => cmd_status(&client, &task_id),
        Commands::Wait {
            task_id,
            poll_ms,
            max_polls,
        } => cmd_wait(&client, &task_id, Duration::from_millis(poll_ms), max_polls),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("druidkit=debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: Option<&Path>) -> druidkit::DruidResult<DruidClient> {
    let settings = match config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    DruidClient::from_settings(settings)
}

fn read_json(file: &Path) -> Result<Value, String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("Error reading file '{}': {}", file.display(), e))?;
    serde_json::from_str(&source)
        .map_err(|e| format!("Invalid JSON in '{}': {}", file.display(), e))
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to render output: {}", e),
    }
}

fn parse_context(flags: &[String]) -> Result<QueryContext, String> {
    let mut context = QueryContext::new();
    for flag in flags {
        let (key, raw) = flag
            .split_once('=')
            .ok_or_else(|| format!("Context flag '{}' must be key=value", flag))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        context.set_json(key, &value).map_err(|e| e.to_string())?;
    }
    context.validate().map_err(|e| e.to_string())?;
    Ok(context)
}

fn cmd_query(client: &DruidClient, file: &Path, context: &[String]) -> ExitCode {
    let mut body = match read_json(file) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    match parse_context(context) {
        Ok(context) if !context.is_empty() => context.apply_to(&mut body),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    match client.execute_native(body) {
        Ok(result) => {
            print_json(&result.rows);
            if let Some(ids) = result.paging_identifiers() {
                eprintln!("pagingIdentifiers: {}", Value::Object(ids.clone()));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Query error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_intervals(client: &DruidClient, datasource: &str) -> ExitCode {
    match client.intervals(datasource) {
        Ok(intervals) => {
            for interval in intervals {
                println!("{}", interval);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_describe(client: &DruidClient, datasource: &str) -> ExitCode {
    match client.describe(datasource) {
        Ok(structure) => {
            println!("Data source: {}", datasource);
            println!();
            println!("Dimensions:");
            for dim in &structure.dimensions {
                println!("  - {}", dim);
            }
            println!();
            println!("Metrics:");
            for metric in &structure.metrics {
                println!("  - {}", metric);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_submit(client: &DruidClient, file: &Path) -> ExitCode {
    let task = match read_json(file) {
        Ok(task) => task,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match client.submit_task(task) {
        Ok(id) => {
            println!("{}", id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Submission error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_status(client: &DruidClient, task_id: &str) -> ExitCode {
    match client.task_status(task_id) {
        Ok(status) => {
            println!("{}: {:?}", status.id, status.status);
            if let Some(msg) = &status.error_msg {
                println!("  error: {}", msg);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_wait(
    client: &DruidClient,
    task_id: &str,
    poll_interval: Duration,
    max_polls: Option<u32>,
) -> ExitCode {
    match client.wait_for_task(task_id, poll_interval, max_polls) {
        Ok(status) => {
            println!("{}: {:?}", status.id, status.status);
            if status.status == TaskState::Success {
                ExitCode::SUCCESS
            } else {
                if let Some(msg) = &status.error_msg {
                    eprintln!("  error: {}", msg);
                }
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
