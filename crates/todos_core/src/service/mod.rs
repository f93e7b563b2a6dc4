//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the flows a front end needs.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod todo_service;
