//! Console commands over the customer service.

pub mod add;
pub mod edit;
pub mod search;

use crate::console::Console;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use vetdb_core::{
    Customer, CustomerRepository, CustomerService, EditSessionError, RepoError, ValidationError,
};

pub type CommandResult<T> = Result<T, CommandError>;

/// Hard failures that end the console session.
///
/// Soft outcomes (invalid input, duplicates, not found) are printed and
/// never reach this type.
#[derive(Debug)]
pub enum CommandError {
    Io(io::Error),
    Repo(RepoError),
    Edit(EditSessionError),
    Json(serde_json::Error),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console i/o failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Edit(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "failed to encode search results: {err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Edit(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<io::Error> for CommandError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for CommandError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<EditSessionError> for CommandError {
    fn from(value: EditSessionError) -> Self {
        match value {
            EditSessionError::Repo(err) => Self::Repo(err),
            other => Self::Edit(other),
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Top-level action chosen at the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Search,
    Edit,
}

impl Action {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "add" => Some(Self::Add),
            "search" => Some(Self::Search),
            "edit" => Some(Self::Edit),
            _ => None,
        }
    }
}

const ACTION_PROMPT: &str =
    "What do you want to do? Add customer, search customer, or edit customer? (add/search/edit): ";

/// Asks for an action token and runs it.
pub fn prompt_action<Repo, R, W>(
    console: &mut Console<R, W>,
    service: &CustomerService<Repo>,
) -> CommandResult<()>
where
    Repo: CustomerRepository,
    R: BufRead,
    W: Write,
{
    let Some(answer) = console.ask(ACTION_PROMPT)? else {
        return Ok(());
    };

    match Action::parse(&answer) {
        Some(Action::Add) => add::run(console, service),
        Some(Action::Search) => search::run(console, service, None, false),
        Some(Action::Edit) => edit::run(console, service, None),
        None => {
            console.say("Invalid choice. Please choose 'add', 'search', or 'edit'.")?;
            Ok(())
        }
    }
}

/// Console line for a rejected record; missing fields are listed by label.
pub fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::MissingFields(fields) if !fields.is_empty() => {
            let labels: Vec<&str> = fields.iter().map(|field| field.label()).collect();
            format!("Validation error: {err} Missing: {}", labels.join(", "))
        }
        _ => format!("Validation error: {err}"),
    }
}

/// Multi-line record block used by search and edit.
pub fn render_customer(customer: &Customer) -> String {
    let details = &customer.details;
    [
        ("ID", customer.id.to_string()),
        ("First Name", details.fname.clone()),
        ("Last Name", details.lname.clone()),
        ("Phone Num", details.phone.clone()),
        ("Email", details.email.clone()),
        ("Address", details.address.clone()),
        ("City", details.city.clone()),
        ("Postal Code", details.postalcode.clone()),
    ]
    .iter()
    .map(|(label, value)| format!("    {label:<11}: {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}
