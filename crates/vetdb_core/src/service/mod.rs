//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep console layers decoupled from storage details.

pub mod customer_service;
pub mod edit_session;
