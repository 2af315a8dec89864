//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateEmail`) in
//!   addition to DB transport errors.
//! - Repositories borrow a caller-owned connection; they never open one.

pub mod customer_repo;
