//! `search`: exact match on any customer field.

use super::{render_customer, CommandResult};
use crate::console::Console;
use std::io::{BufRead, Write};
use vetdb_core::{CustomerRepository, CustomerService};

pub fn run<Repo, R, W>(
    console: &mut Console<R, W>,
    service: &CustomerService<Repo>,
    term: Option<String>,
    json: bool,
) -> CommandResult<()>
where
    Repo: CustomerRepository,
    R: BufRead,
    W: Write,
{
    let term = match term {
        Some(term) => term,
        None => match console.ask("Enter any field value to find customer: ")? {
            Some(term) => term,
            None => return Ok(()),
        },
    };
    let term = term.trim();
    if term.is_empty() {
        console.say("Please enter a search term.")?;
        return Ok(());
    }

    let matches = service.search(term)?;

    if json {
        console.say(serde_json::to_string_pretty(&matches)?)?;
        return Ok(());
    }

    if matches.is_empty() {
        console.say("No matches found")?;
        return Ok(());
    }
    for customer in &matches {
        console.say(render_customer(customer))?;
        console.say("")?;
    }
    Ok(())
}
