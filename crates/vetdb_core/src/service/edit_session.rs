//! Interactive customer edit flow as an explicit state machine.
//!
//! # Responsibility
//! - Hold a working copy of one customer while fields are changed.
//! - Persist only the changed fields when the flow finishes.
//!
//! # Invariants
//! - `AwaitId -> Loaded | Terminal`, `Loaded -> Terminal`; `Terminal` is final.
//! - Field changes only affect the working copy until `finish`.
//! - A finish rejected by validation or a duplicate email keeps the session
//!   `Loaded` so the caller can correct the working copy.

use crate::model::customer::{Customer, CustomerField, CustomerId, CustomerPatch};
use crate::repo::customer_repo::{CustomerRepository, RepoError};
use crate::service::customer_service::{CustomerService, UpdateOutcome};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Menu letter that persists the working copy.
pub const FINISH_MENU_KEY: char = 'I';

/// Lifecycle state of an [`EditSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    AwaitId,
    Loaded,
    Terminal,
}

/// One parsed edit-menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Change(CustomerField),
    Finish,
}

impl EditCommand {
    /// Parses a menu letter (`A`-`G`, `I`), case-insensitive.
    ///
    /// Returns `None` for anything else; callers re-prompt.
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if key.to_ascii_uppercase() == FINISH_MENU_KEY {
            return Some(Self::Finish);
        }
        CustomerField::from_menu_key(key).map(Self::Change)
    }
}

#[derive(Debug)]
pub enum EditSessionError {
    InvalidState {
        expected: EditState,
        actual: EditState,
    },
    Repo(RepoError),
}

impl Display for EditSessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState { expected, actual } => {
                write!(f, "edit session is {actual:?}, expected {expected:?}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditSessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidState { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for EditSessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type EditResult<T> = Result<T, EditSessionError>;

/// Working state for editing one customer.
#[derive(Debug, Clone)]
pub struct EditSession {
    state: EditState,
    working: Option<Customer>,
    patch: CustomerPatch,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            state: EditState::AwaitId,
            working: None,
            patch: CustomerPatch::new(),
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// Current working copy, present once loaded.
    pub fn working_copy(&self) -> Option<&Customer> {
        self.working.as_ref()
    }

    /// Fields changed since load.
    pub fn pending_changes(&self) -> &CustomerPatch {
        &self.patch
    }

    /// Looks up the customer; returns whether it was found.
    ///
    /// Not found moves the session to `Terminal`.
    pub fn load<R: CustomerRepository>(
        &mut self,
        service: &CustomerService<R>,
        id: CustomerId,
    ) -> EditResult<bool> {
        self.expect_state(EditState::AwaitId)?;

        match service.get_customer(id)? {
            Some(customer) => {
                self.working = Some(customer);
                self.state = EditState::Loaded;
                Ok(true)
            }
            None => {
                self.state = EditState::Terminal;
                Ok(false)
            }
        }
    }

    /// Changes one field of the working copy.
    pub fn change(&mut self, field: CustomerField, value: impl Into<String>) -> EditResult<()> {
        self.expect_state(EditState::Loaded)?;

        let value = value.into();
        if let Some(working) = self.working.as_mut() {
            working.details.set(field, value.as_str());
        }
        self.patch.set(field, value);
        Ok(())
    }

    /// Persists pending changes through the service.
    pub fn finish<R: CustomerRepository>(
        &mut self,
        service: &CustomerService<R>,
    ) -> EditResult<UpdateOutcome> {
        self.expect_state(EditState::Loaded)?;

        let Some(id) = self.working.as_ref().map(|customer| customer.id) else {
            return Err(EditSessionError::InvalidState {
                expected: EditState::Loaded,
                actual: self.state,
            });
        };

        let outcome = service.update_customer(id, &self.patch)?;
        if matches!(outcome, UpdateOutcome::Updated | UpdateOutcome::NotFound) {
            self.state = EditState::Terminal;
        }
        Ok(outcome)
    }

    fn expect_state(&self, expected: EditState) -> EditResult<()> {
        if self.state != expected {
            return Err(EditSessionError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EditCommand;
    use crate::model::customer::CustomerField;

    #[test]
    fn parse_accepts_menu_letters_in_any_case() {
        assert_eq!(
            EditCommand::parse("a"),
            Some(EditCommand::Change(CustomerField::FirstName))
        );
        assert_eq!(
            EditCommand::parse(" F "),
            Some(EditCommand::Change(CustomerField::City))
        );
        assert_eq!(EditCommand::parse("i"), Some(EditCommand::Finish));
    }

    #[test]
    fn parse_rejects_unknown_input() {
        assert_eq!(EditCommand::parse("H"), None);
        assert_eq!(EditCommand::parse("AB"), None);
        assert_eq!(EditCommand::parse(""), None);
        assert_eq!(EditCommand::parse("z"), None);
    }
}
