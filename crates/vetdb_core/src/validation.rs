//! Customer field validation.
//!
//! # Responsibility
//! - Provide pure predicates for phone, email and postal-code shapes.
//! - Compose them into a single check that reports the first failure.
//!
//! # Invariants
//! - Checks run in a fixed order: emptiness, phone, email, postal code.
//! - Predicates never touch storage.

use crate::model::customer::{CustomerDetails, CustomerField, CustomerPatch};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static POSTAL_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]\d[A-Za-z][ -]?\d[A-Za-z]\d$").expect("valid postal code regex")
});

/// Accepted phone number lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhoneRule {
    /// Exactly 10 digits.
    #[default]
    TenDigits,
    /// Between 10 and 15 digits inclusive.
    Extended,
}

impl PhoneRule {
    pub fn accepts(self, phone: &str) -> bool {
        match self {
            Self::TenDigits => is_valid_phone(phone),
            Self::Extended => is_valid_phone_extended(phone),
        }
    }
}

/// Which checks [`validate_customer`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub phone: PhoneRule,
    pub check_postal_code: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            phone: PhoneRule::TenDigits,
            check_postal_code: true,
        }
    }
}

/// First failed validation check for a customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more fields are blank, listed in column order.
    MissingFields(Vec<CustomerField>),
    InvalidPhone(PhoneRule),
    InvalidEmail,
    InvalidPostalCode,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields(_) => write!(f, "All fields must be filled."),
            Self::InvalidPhone(PhoneRule::TenDigits) => {
                write!(f, "Phone number must be exactly 10 digits.")
            }
            Self::InvalidPhone(PhoneRule::Extended) => {
                write!(f, "Phone number must be 10 to 15 digits.")
            }
            Self::InvalidEmail => write!(f, "Invalid email format."),
            Self::InvalidPostalCode => {
                write!(f, "Invalid Canadian postal code format (e.g., V8W 1N6).")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns `false` when any value is empty or whitespace-only.
pub fn is_non_empty(fields: &[&str]) -> bool {
    fields.iter().all(|value| !value.trim().is_empty())
}

/// Exactly 10 ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && all_ascii_digits(phone)
}

/// Between 10 and 15 ASCII digits.
pub fn is_valid_phone_extended(phone: &str) -> bool {
    (10..=15).contains(&phone.len()) && all_ascii_digits(phone)
}

/// `local@domain.tld` shape without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Canadian postal code: `A1A 1A1`, `A1A-1A1` or `A1A1A1`.
pub fn is_valid_postal_code(code: &str) -> bool {
    POSTAL_CODE_RE.is_match(code)
}

/// Runs every check enabled by `policy` and returns the first failure.
pub fn validate_customer(
    details: &CustomerDetails,
    policy: &ValidationPolicy,
) -> Result<(), ValidationError> {
    let missing: Vec<CustomerField> = CustomerField::ALL
        .into_iter()
        .filter(|field| !is_non_empty(&[details.get(*field)]))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if !policy.phone.accepts(&details.phone) {
        return Err(ValidationError::InvalidPhone(policy.phone));
    }
    if !is_valid_email(&details.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if policy.check_postal_code && !is_valid_postal_code(&details.postalcode) {
        return Err(ValidationError::InvalidPostalCode);
    }

    Ok(())
}

/// Runs the checks for the fields `patch` touches, in the same order as
/// [`validate_customer`].
///
/// Stored columns outside the patch are not inspected, so rows written
/// without validation can still be partially edited. A patch naming all
/// seven fields gets the full-record check.
pub fn validate_changes(
    patch: &CustomerPatch,
    policy: &ValidationPolicy,
) -> Result<(), ValidationError> {
    let missing: Vec<CustomerField> = patch
        .iter()
        .filter(|(_, value)| !is_non_empty(&[*value]))
        .map(|(field, _)| field)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if let Some(phone) = patch.get(CustomerField::Phone) {
        if !policy.phone.accepts(phone) {
            return Err(ValidationError::InvalidPhone(policy.phone));
        }
    }
    if let Some(email) = patch.get(CustomerField::Email) {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
    }
    if let Some(code) = patch.get(CustomerField::PostalCode) {
        if policy.check_postal_code && !is_valid_postal_code(code) {
            return Err(ValidationError::InvalidPostalCode);
        }
    }

    Ok(())
}

fn all_ascii_digits(value: &str) -> bool {
    value.bytes().all(|byte| byte.is_ascii_digit())
}
