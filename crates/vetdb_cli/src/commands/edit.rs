//! `edit`: load one customer, change fields from a letter menu, save on `I`.

use super::{render_customer, validation_message, CommandResult};
use crate::console::Console;
use std::io::{BufRead, Write};
use vetdb_core::{
    parse_customer_id, CustomerField, CustomerRepository, CustomerService, EditCommand,
    EditSession, UpdateOutcome, FINISH_MENU_KEY,
};

fn menu() -> String {
    let mut lines: Vec<String> = CustomerField::ALL
        .iter()
        .map(|field| {
            format!(
                "    {}: change {}",
                field.menu_key(),
                field.label().to_ascii_lowercase()
            )
        })
        .collect();
    lines.push(format!("    {FINISH_MENU_KEY}: finish update"));
    lines.join("\n")
}

pub fn run<Repo, R, W>(
    console: &mut Console<R, W>,
    service: &CustomerService<Repo>,
    id: Option<String>,
) -> CommandResult<()>
where
    Repo: CustomerRepository,
    R: BufRead,
    W: Write,
{
    let id_text = match id {
        Some(id) => id,
        None => match console.ask("Enter the ID of the customer you want to edit: ")? {
            Some(id) => id,
            None => return Ok(()),
        },
    };
    let Some(id) = parse_customer_id(&id_text) else {
        console.say("Customer ID must be a number.")?;
        return Ok(());
    };

    let mut session = EditSession::new();
    if !session.load(service, id)? {
        console.say("Customer not found.")?;
        return Ok(());
    }
    if let Some(customer) = session.working_copy() {
        console.say(render_customer(customer))?;
    }

    loop {
        console.say(menu())?;
        let Some(choice) = console.ask(">>> ")? else {
            return Ok(());
        };

        match EditCommand::parse(&choice) {
            Some(EditCommand::Change(field)) => {
                let prompt = format!("Enter new {}: ", field.label());
                let Some(value) = console.ask(&prompt)? else {
                    return Ok(());
                };
                session.change(field, value.trim())?;
            }
            Some(EditCommand::Finish) => match session.finish(service)? {
                UpdateOutcome::Updated => {
                    console.say("Customer data updated successfully.")?;
                    return Ok(());
                }
                UpdateOutcome::NotFound => {
                    console.say("Customer not found.")?;
                    return Ok(());
                }
                UpdateOutcome::Invalid(err) => console.say(validation_message(&err))?,
                UpdateOutcome::Duplicate(_) => {
                    console.say("Another customer already uses this phone number or email.")?
                }
            },
            None => console.say("Invalid choice. Please choose again.")?,
        }
    }
}
