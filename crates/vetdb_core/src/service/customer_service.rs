//! Customer use-case service.
//!
//! # Responsibility
//! - Run validation, duplicate rejection and last-name soft collision checks
//!   around repository writes.
//! - Shape search results for single-match or multi-match callers.
//!
//! # Invariants
//! - Soft outcomes (invalid, duplicate, declined, not found) are returned as
//!   values; only storage failures surface as `Err`.
//! - A rejected add or update leaves storage untouched.
//! - Customer field values are never written to logs.

use crate::model::customer::{Customer, CustomerDetails, CustomerField, CustomerId, CustomerPatch};
use crate::repo::customer_repo::{CustomerRepository, RepoError, RepoResult};
use crate::validation::{validate_changes, validate_customer, ValidationError, ValidationPolicy};
use log::{info, warn};

/// How many rows a search returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Lowest-id match only.
    First,
    /// Every match, ordered by id.
    #[default]
    All,
}

/// Behavior switches for [`CustomerService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerServiceOptions {
    /// `None` disables field validation entirely.
    pub validation: Option<ValidationPolicy>,
    /// Ask for confirmation before adding a customer whose last name exists.
    pub confirm_last_name_collisions: bool,
    pub search_mode: SearchMode,
}

impl Default for CustomerServiceOptions {
    fn default() -> Self {
        Self {
            validation: Some(ValidationPolicy::default()),
            confirm_last_name_collisions: true,
            search_mode: SearchMode::All,
        }
    }
}

/// Result of [`CustomerService::add_customer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(CustomerId),
    Invalid(ValidationError),
    /// Existing customers sharing the phone number or email.
    Duplicate(Vec<Customer>),
    /// Same-last-name customers shown to the caller, who declined to proceed.
    Declined(Vec<Customer>),
}

/// Result of [`CustomerService::update_customer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Invalid(ValidationError),
    /// Other customers already hold the new phone number or email.
    Duplicate(Vec<Customer>),
    NotFound,
}

/// Use-case service wrapper for customer operations.
pub struct CustomerService<R: CustomerRepository> {
    repo: R,
    options: CustomerServiceOptions,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Creates a service with default options.
    pub fn new(repo: R) -> Self {
        Self::with_options(repo, CustomerServiceOptions::default())
    }

    pub fn with_options(repo: R, options: CustomerServiceOptions) -> Self {
        Self { repo, options }
    }

    pub fn options(&self) -> &CustomerServiceOptions {
        &self.options
    }

    /// Adds a customer after validation and duplicate checks.
    ///
    /// `confirm` is called with the same-last-name customers only when such
    /// customers exist and collision confirmation is enabled; returning
    /// `false` aborts the insert.
    pub fn add_customer<F>(&self, details: &CustomerDetails, confirm: F) -> RepoResult<AddOutcome>
    where
        F: FnOnce(&[Customer]) -> bool,
    {
        if let Some(policy) = &self.options.validation {
            if let Err(err) = validate_customer(details, policy) {
                info!("event=customer_add module=service status=invalid reason={err:?}");
                return Ok(AddOutcome::Invalid(err));
            }
        }

        let duplicates = self
            .repo
            .find_by_phone_or_email(&details.phone, &details.email)?;
        if !duplicates.is_empty() {
            info!(
                "event=customer_add module=service status=duplicate matches={}",
                duplicates.len()
            );
            return Ok(AddOutcome::Duplicate(duplicates));
        }

        if self.options.confirm_last_name_collisions {
            let same_last_name = self.repo.find_by_last_name(&details.lname)?;
            if !same_last_name.is_empty() && !confirm(&same_last_name) {
                info!(
                    "event=customer_add module=service status=declined matches={}",
                    same_last_name.len()
                );
                return Ok(AddOutcome::Declined(same_last_name));
            }
        }

        match self.repo.create_customer(details) {
            Ok(id) => {
                info!("event=customer_add module=service status=ok customer_id={id}");
                Ok(AddOutcome::Added(id))
            }
            // Another writer inserted the email between lookup and insert.
            Err(RepoError::DuplicateEmail) => {
                warn!("event=customer_add module=service status=duplicate source=constraint");
                Ok(AddOutcome::Duplicate(Vec::new()))
            }
            Err(err) => Err(err),
        }
    }

    /// Finds customers whose fields exactly equal `term`.
    ///
    /// An empty vector is the no-match result.
    pub fn search(&self, term: &str) -> RepoResult<Vec<Customer>> {
        let mut matches = self.repo.find_by_any_field(term)?;
        if self.options.search_mode == SearchMode::First {
            matches.truncate(1);
        }
        info!(
            "event=customer_search module=service status=ok matches={}",
            matches.len()
        );
        Ok(matches)
    }

    pub fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        self.repo.get_customer(id)
    }

    /// Rewrites the patched columns of an existing customer.
    ///
    /// With validation enabled only the patched values are checked; columns
    /// outside the patch keep whatever is stored. A new phone or email that
    /// another customer holds is rejected, matching the add rules.
    pub fn update_customer(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> RepoResult<UpdateOutcome> {
        if self.repo.get_customer(id)?.is_none() {
            info!("event=customer_update module=service status=not_found customer_id={id}");
            return Ok(UpdateOutcome::NotFound);
        }

        if let Some(policy) = &self.options.validation {
            if let Err(err) = validate_changes(patch, policy) {
                info!(
                    "event=customer_update module=service status=invalid customer_id={id} reason={err:?}"
                );
                return Ok(UpdateOutcome::Invalid(err));
            }
        }

        let phone = patch.get(CustomerField::Phone);
        let email = patch.get(CustomerField::Email);
        if phone.is_some() || email.is_some() {
            let conflicts = self.repo.find_contact_conflicts(id, phone, email)?;
            if !conflicts.is_empty() {
                info!(
                    "event=customer_update module=service status=duplicate customer_id={id} matches={}",
                    conflicts.len()
                );
                return Ok(UpdateOutcome::Duplicate(conflicts));
            }
        }

        match self.repo.update_customer(id, patch) {
            Ok(()) => {
                info!(
                    "event=customer_update module=service status=ok customer_id={id} fields={}",
                    patch.len()
                );
                Ok(UpdateOutcome::Updated)
            }
            Err(RepoError::DuplicateEmail) => {
                warn!(
                    "event=customer_update module=service status=duplicate customer_id={id} source=constraint"
                );
                Ok(UpdateOutcome::Duplicate(Vec::new()))
            }
            Err(RepoError::NotFound(_)) => Ok(UpdateOutcome::NotFound),
            Err(err) => Err(err),
        }
    }

    pub fn count_customers(&self) -> RepoResult<u64> {
        self.repo.count_customers()
    }
}
