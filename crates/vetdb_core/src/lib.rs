//! Core persistence and validation for the veterinary clinic customer database.
//! This crate is the single source of truth for customer invariants; front
//! ends only collect input and render results.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{AppConfig, ConfigError, ConfigInput};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::{
    parse_customer_id, Customer, CustomerDetails, CustomerField, CustomerId, CustomerPatch,
};
pub use repo::customer_repo::{
    CustomerRepository, RepoError, RepoResult, SqliteCustomerRepository,
};
pub use service::customer_service::{
    AddOutcome, CustomerService, CustomerServiceOptions, SearchMode, UpdateOutcome,
};
pub use service::edit_session::{
    EditCommand, EditSession, EditSessionError, EditState, FINISH_MENU_KEY,
};
pub use validation::{
    is_non_empty, is_valid_email, is_valid_phone, is_valid_phone_extended, is_valid_postal_code,
    validate_changes, validate_customer, PhoneRule, ValidationError, ValidationPolicy,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
