//! Employee records - command-line caller for the employee request pipeline.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use employee_records as app;

use app::{AppError, EmployeeService};
use app::config::{AppConfig, ConfigLoadResult, LoggingConfig};
use app::db;
use app::domain::{
    CreateEmployeeCommand, DeleteEmployeeQuery, GetEmployeeByIdQuery, ListEmployeesQuery, SortType,
    UpdateEmployeeCommand,
};
use app::models::{Department, Envelope};
use app::store::EmployeeStore;

/// Create, update, delete, fetch and list employee records.
#[derive(Parser)]
#[command(name = "employee-records")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long, global = true)]
    dev: bool,

    /// Use a throwaway in-memory store instead of PostgreSQL
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new employee
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Date of birth (YYYY-MM-DD, YYYY/MM/DD or YYYY.MM.DD)
        #[arg(long, value_parser = parse_flexible_date)]
        dob: NaiveDate,
        /// Admin, Accounts, HR, IT, Sales or Marketing
        #[arg(long)]
        department: Department,
    },
    /// Replace the name, email and department of an employee
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_parser = parse_flexible_date)]
        dob: NaiveDate,
        #[arg(long)]
        department: Department,
    },
    /// Remove an employee
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Fetch one employee
    Get {
        #[arg(long)]
        id: String,
    },
    /// List employees with optional filters, ordering and paging
    List {
        /// Name substring
        #[arg(long)]
        name: Option<String>,
        /// Email substring
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        department: Option<Department>,
        /// name, email, department or dob
        #[arg(long)]
        sort_by: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u64,
        /// Page size (defaults to the configured listing page size)
        #[arg(long)]
        page_size: Option<u64>,
    },
}

/// Parse date input flexibly, accepting multiple formats.
fn parse_flexible_date(input: &str) -> app::Result<NaiveDate> {
    let input = input.trim();
    for format in &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }
    Err(AppError::parse(format!("invalid date '{input}', expected YYYY-MM-DD")))
}

/// How the configuration was obtained.
enum ConfigSource {
    Loaded,
    Created,
}

/// Load the config, writing defaults on first run.
fn load_config(path: &Path) -> app::Result<(AppConfig, ConfigSource)> {
    match AppConfig::try_load(path) {
        ConfigLoadResult::Loaded(config) => Ok((config, ConfigSource::Loaded)),
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            config.save(path)?;
            Ok((config, ConfigSource::Created))
        }
        ConfigLoadResult::Invalid(e) => Err(e.into()),
    }
}

/// Install the console subscriber and, when configured, a daily-rolling file layer.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log filter")?;
    let console = fmt::layer().with_writer(std::io::stderr);

    match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "employee-records.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
            Ok(None)
        }
    }
}

async fn open_store(config: &AppConfig, memory: bool) -> anyhow::Result<Arc<dyn EmployeeStore>> {
    if memory {
        tracing::info!("Using in-memory store");
        return Ok(Arc::new(db::InMemoryEmployeeStore::new()));
    }

    let store = db::open_store(&config.database)
        .await
        .context("Failed to open database")?;
    Ok(Arc::new(store))
}

/// Print the envelope as JSON and report whether it is valid.
fn print_envelope<T: Serialize>(envelope: &Envelope<T>) -> app::Result<bool> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(envelope.is_valid())
}

async fn run(
    service: &EmployeeService,
    command: Command,
    page_size: u64,
    cancel: &CancellationToken,
) -> app::Result<bool> {
    match command {
        Command::Create {
            name,
            email,
            dob,
            department,
        } => {
            let command = CreateEmployeeCommand {
                correlation_id: None,
                name,
                email,
                date_of_birth: dob,
                department,
            };
            print_envelope(&service.create_employee(command, cancel).await?)
        }
        Command::Update {
            id,
            name,
            email,
            dob,
            department,
        } => {
            let command = UpdateEmployeeCommand {
                correlation_id: None,
                id,
                name,
                email,
                date_of_birth: dob,
                department,
            };
            print_envelope(&service.update_employee(command, cancel).await?)
        }
        Command::Delete { id } => print_envelope(&service.delete_employee(DeleteEmployeeQuery::new(id), cancel).await?),
        Command::Get { id } => print_envelope(&service.get_employee(GetEmployeeByIdQuery::new(id), cancel).await?),
        Command::List {
            name,
            email,
            department,
            sort_by,
            desc,
            page,
            page_size: requested,
        } => {
            let query = ListEmployeesQuery {
                correlation_id: None,
                name,
                email,
                department,
                sort_by,
                sort_type: if desc { SortType::Desc } else { SortType::Asc },
                page_no: page,
                page_size: requested.unwrap_or(page_size),
            };
            print_envelope(&service.list_employees(query, cancel).await?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    let (config, source) =
        load_config(&config_path).with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let _guard = init_logging(&config.logging)?;
    match source {
        ConfigSource::Loaded => tracing::info!("Config loaded from {:?}", config_path),
        ConfigSource::Created => tracing::info!("Config missing, wrote defaults to {:?}", config_path),
    }

    let store = open_store(&config, cli.memory).await?;
    let service = EmployeeService::new(store);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling request");
            on_signal.cancel();
        }
    });

    let valid = run(&service, cli.command, config.listing.default_page_size, &cancel).await?;
    Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
        assert_eq!(parse_flexible_date("1990-04-12").unwrap(), expected);
        assert_eq!(parse_flexible_date("1990/04/12").unwrap(), expected);
        assert_eq!(parse_flexible_date(" 1990.04.12 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_flexible_date_rejects_garbage() {
        assert!(parse_flexible_date("12-04-1990").is_err());
        assert!(parse_flexible_date("").is_err());
    }

    #[test]
    fn test_cli_parses_list_arguments() {
        let cli = Cli::try_parse_from([
            "employee-records",
            "--memory",
            "list",
            "--department",
            "hr",
            "--sort-by",
            "dob",
            "--desc",
            "--page",
            "2",
        ])
        .unwrap();

        assert!(cli.memory);
        match cli.command {
            Command::List {
                department,
                desc,
                page,
                page_size,
                ..
            } => {
                assert_eq!(department, Some(Department::Hr));
                assert!(desc);
                assert_eq!(page, 2);
                assert_eq!(page_size, None);
            }
            _ => panic!("expected list command"),
        }
    }

    #[tokio::test]
    async fn test_run_create_against_memory_store() {
        let service = EmployeeService::new(Arc::new(db::InMemoryEmployeeStore::new()));
        let command = Command::Create {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            department: Department::It,
        };

        let valid = run(&service, command, 10, &CancellationToken::new()).await.unwrap();
        assert!(valid);
    }

    #[tokio::test]
    async fn test_run_invalid_request_fails() {
        let service = EmployeeService::new(Arc::new(db::InMemoryEmployeeStore::new()));
        let command = Command::Get { id: String::new() };

        let valid = run(&service, command, 10, &CancellationToken::new()).await.unwrap();
        assert!(!valid);
    }
}
