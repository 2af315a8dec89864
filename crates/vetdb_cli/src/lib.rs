//! Console front end for the veterinary clinic customer database.
//!
//! # Responsibility
//! - Parse flags, resolve configuration and open the database once per run.
//! - Route `add`/`search`/`edit` to prompt-driven commands.
//!
//! # Invariants
//! - Soft outcomes print a message and exit 0.
//! - Only storage, configuration or console i/o failures exit non-zero.

pub mod commands;
pub mod console;

use clap::{Args, Parser, Subcommand};
use commands::{CommandError, CommandResult};
use console::Console;
use log::{error, info};
use std::io::{BufRead, Write};
use std::process::ExitCode;
use vetdb_core::db::open_db;
use vetdb_core::{
    init_logging, AppConfig, ConfigInput, CustomerRepository, CustomerService,
    SqliteCustomerRepository,
};

#[derive(Debug, Parser)]
#[command(
    name = "vetdb",
    version,
    about = "Veterinary clinic customer database",
    after_help = "Examples:\n  vetdb add\n  vetdb search 5551234567\n  vetdb edit 3\n  vetdb --db clinic.db search Springfield --json"
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct Settings {
    #[arg(
        long,
        global = true,
        help = "Database file (default: veterinarian.db, env VETDB_DB_PATH)"
    )]
    pub db: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Log level trace|debug|info|warn|error (env VETDB_LOG_LEVEL)"
    )]
    pub log_level: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Absolute directory for rolling log files (env VETDB_LOG_DIR)"
    )]
    pub log_dir: Option<String>,
    #[arg(long, global = true, help = "Accept 10 to 15 digit phone numbers")]
    pub lenient_phone: bool,
    #[arg(long, global = true, help = "Do not check the Canadian postal code format")]
    pub skip_postal_check: bool,
    #[arg(long, global = true, help = "Store fields without any validation")]
    pub no_validation: bool,
    #[arg(
        long,
        global = true,
        help = "Do not ask before adding a customer whose last name exists"
    )]
    pub no_name_check: bool,
    #[arg(long, global = true, help = "Show only the first search match")]
    pub first_match: bool,
}

impl From<Settings> for ConfigInput {
    fn from(value: Settings) -> Self {
        Self {
            db_path: value.db,
            log_level: value.log_level,
            log_dir: value.log_dir,
            lenient_phone: value.lenient_phone,
            skip_postal_check: value.skip_postal_check,
            no_validation: value.no_validation,
            no_name_check: value.no_name_check,
            first_match: value.first_match,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(about = "Add a customer, prompting for each field")]
    Add,
    #[command(about = "Find customers whose field exactly equals a term")]
    Search {
        term: Option<String>,
        #[arg(long, help = "Emit matches as JSON")]
        json: bool,
    },
    #[command(about = "Edit a customer by id through a letter menu")]
    Edit { id: Option<String> },
    #[command(about = "Create the database file and tables if missing")]
    Init,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::resolve(cli.settings.into()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("vetdb: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("vetdb: {err}");
            return ExitCode::FAILURE;
        }
    }

    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout());

    match run_with_config(&config, cli.command, &mut console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("vetdb: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Opens the configured database and runs one command against it.
pub fn run_with_config<R: BufRead, W: Write>(
    config: &AppConfig,
    command: Option<Command>,
    console: &mut Console<R, W>,
) -> CommandResult<()> {
    let conn = open_db(&config.db_path).map_err(|err| CommandError::Repo(err.into()))?;
    let repo = SqliteCustomerRepository::try_new(&conn)?;
    let service = CustomerService::with_options(repo, config.service);

    info!(
        "event=cli_run module=cli status=start command={}",
        command_name(command.as_ref())
    );
    dispatch(console, &service, command)
}

/// Runs `command`, or asks for an action when none was given.
pub fn dispatch<Repo, R, W>(
    console: &mut Console<R, W>,
    service: &CustomerService<Repo>,
    command: Option<Command>,
) -> CommandResult<()>
where
    Repo: CustomerRepository,
    R: BufRead,
    W: Write,
{
    match command {
        None => commands::prompt_action(console, service),
        Some(Command::Add) => commands::add::run(console, service),
        Some(Command::Search { term, json }) => commands::search::run(console, service, term, json),
        Some(Command::Edit { id }) => commands::edit::run(console, service, id),
        Some(Command::Init) => {
            let count = service.count_customers()?;
            console.say(format!(
                "Database ready with {count} customer(s). (vetdb_core {})",
                vetdb_core::core_version()
            ))?;
            Ok(())
        }
    }
}

fn command_name(command: Option<&Command>) -> &'static str {
    match command {
        None => "prompt",
        Some(Command::Add) => "add",
        Some(Command::Search { .. }) => "search",
        Some(Command::Edit { .. }) => "edit",
        Some(Command::Init) => "init",
    }
}
