//! `add`: collect seven fields and insert a customer.

use super::{validation_message, CommandResult};
use crate::console::Console;
use std::io::{BufRead, Write};
use vetdb_core::{
    AddOutcome, Customer, CustomerDetails, CustomerField, CustomerRepository, CustomerService,
};

fn field_prompt(field: CustomerField) -> &'static str {
    match field {
        CustomerField::FirstName => "Enter first name: ",
        CustomerField::LastName => "Enter last name: ",
        CustomerField::Phone => "Enter phone number: ",
        CustomerField::Email => "Enter email: ",
        CustomerField::Address => "Enter address: ",
        CustomerField::City => "Enter city: ",
        CustomerField::PostalCode => "Enter postal code: ",
    }
}

pub fn run<Repo, R, W>(
    console: &mut Console<R, W>,
    service: &CustomerService<Repo>,
) -> CommandResult<()>
where
    Repo: CustomerRepository,
    R: BufRead,
    W: Write,
{
    let mut details = CustomerDetails::default();
    for field in CustomerField::ALL {
        let Some(value) = console.ask(field_prompt(field))? else {
            return Ok(());
        };
        details.set(field, value);
    }
    let details = details.trimmed();

    // Prompt i/o errors surface after the service call returns.
    let mut prompt_error = None;
    let outcome = service.add_customer(&details, |matches| {
        match confirm_collisions(console, matches) {
            Ok(confirmed) => confirmed,
            Err(err) => {
                prompt_error = Some(err);
                false
            }
        }
    })?;
    if let Some(err) = prompt_error {
        return Err(err.into());
    }

    match outcome {
        AddOutcome::Added(id) => {
            console.say(format!("Customer added successfully. (ID: {id})"))?
        }
        AddOutcome::Invalid(err) => console.say(validation_message(&err))?,
        AddOutcome::Duplicate(_) => {
            console.say("There is already a customer with the same phone number or email.")?
        }
        AddOutcome::Declined(_) => console.say("Customer not added.")?,
    }

    Ok(())
}

fn confirm_collisions<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    matches: &[Customer],
) -> std::io::Result<bool> {
    console.say("Customers with the same last name found:")?;
    for customer in matches {
        console.say(format!(
            "ID: {}, Name: {} {}",
            customer.id, customer.details.fname, customer.details.lname
        ))?;
    }
    let answer = console.ask("Do you still want to add? (Y/n): ")?;
    Ok(answer.as_deref() == Some("Y"))
}
