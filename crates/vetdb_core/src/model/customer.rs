//! Customer domain model.
//!
//! # Responsibility
//! - Define the clinic customer record and its seven editable text fields.
//! - Describe field-level changes as a typed patch instead of column maps.
//!
//! # Invariants
//! - `id` is assigned by storage and never rewritten.
//! - `email` is unique across customers (enforced by storage).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage-assigned customer identifier.
pub type CustomerId = i64;

/// Parses user-entered customer id text.
///
/// Only plain ASCII digits are accepted; signs and whitespace inside the
/// number are rejected.
pub fn parse_customer_id(input: &str) -> Option<CustomerId> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// One editable customer column.
///
/// Declaration order is the canonical column order used for inserts,
/// full-record updates and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    FirstName,
    LastName,
    Phone,
    Email,
    Address,
    City,
    PostalCode,
}

impl CustomerField {
    /// All fields in canonical column order.
    pub const ALL: [CustomerField; 7] = [
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::Phone,
        CustomerField::Email,
        CustomerField::Address,
        CustomerField::City,
        CustomerField::PostalCode,
    ];

    /// Column name in the `customers` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "fname",
            Self::LastName => "lname",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalcode",
        }
    }

    /// Human-readable label used by prompts and record blocks.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Phone => "Phone Number",
            Self::Email => "Email",
            Self::Address => "Address",
            Self::City => "City",
            Self::PostalCode => "Postal Code",
        }
    }

    /// Edit-menu letter selecting this field.
    pub fn menu_key(self) -> char {
        match self {
            Self::FirstName => 'A',
            Self::LastName => 'B',
            Self::Phone => 'C',
            Self::Email => 'D',
            Self::Address => 'E',
            Self::City => 'F',
            Self::PostalCode => 'G',
        }
    }

    /// Resolves an edit-menu letter (case-insensitive).
    pub fn from_menu_key(key: char) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        Self::ALL.into_iter().find(|field| field.menu_key() == key)
    }
}

/// The seven text fields of a customer, without identity.
///
/// Used as the insert payload and as the mutable part of a stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub fname: String,
    pub lname: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postalcode: String,
}

impl CustomerDetails {
    /// Returns the value stored for `field`.
    pub fn get(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::FirstName => &self.fname,
            CustomerField::LastName => &self.lname,
            CustomerField::Phone => &self.phone,
            CustomerField::Email => &self.email,
            CustomerField::Address => &self.address,
            CustomerField::City => &self.city,
            CustomerField::PostalCode => &self.postalcode,
        }
    }

    /// Overwrites the value stored for `field`.
    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CustomerField::FirstName => self.fname = value,
            CustomerField::LastName => self.lname = value,
            CustomerField::Phone => self.phone = value,
            CustomerField::Email => self.email = value,
            CustomerField::Address => self.address = value,
            CustomerField::City => self.city = value,
            CustomerField::PostalCode => self.postalcode = value,
        }
    }

    /// Field values in canonical column order.
    pub fn values(&self) -> [&str; 7] {
        CustomerField::ALL.map(|field| self.get(field))
    }

    /// Returns a copy with every value trimmed of surrounding whitespace.
    pub fn trimmed(&self) -> Self {
        let mut trimmed = Self::default();
        for field in CustomerField::ALL {
            trimmed.set(field, self.get(field).trim());
        }
        trimmed
    }
}

/// A persisted customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(flatten)]
    pub details: CustomerDetails,
}

impl Customer {
    pub fn new(id: CustomerId, details: CustomerDetails) -> Self {
        Self { id, details }
    }
}

/// Explicit set of field-level changes applied by an update.
///
/// Fields absent from the patch keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    changes: BTreeMap<CustomerField, String>,
}

impl CustomerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a patch that rewrites all seven columns.
    pub fn replace_all(details: &CustomerDetails) -> Self {
        let mut patch = Self::new();
        for field in CustomerField::ALL {
            patch.set(field, details.get(field));
        }
        patch
    }

    /// Builder-style variant of [`CustomerPatch::set`].
    pub fn with(mut self, field: CustomerField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Records a change; a later change to the same field wins.
    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        self.changes.insert(field, value.into());
    }

    pub fn get(&self, field: CustomerField) -> Option<&str> {
        self.changes.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Changes in canonical column order.
    pub fn iter(&self) -> impl Iterator<Item = (CustomerField, &str)> {
        self.changes
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Applies the changes to an in-memory record.
    pub fn apply_to(&self, details: &mut CustomerDetails) {
        for (field, value) in self.iter() {
            details.set(field, value);
        }
    }
}
