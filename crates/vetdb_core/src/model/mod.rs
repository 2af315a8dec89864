//! Clinic domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by customer business logic.
//!
//! # Invariants
//! - Customers are identified by a storage-assigned integer id.
//! - Customers are never deleted; updates rewrite fields in place.

pub mod customer;
