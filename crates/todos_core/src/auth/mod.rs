//! Credential hashing and verification.
//!
//! # Responsibility
//! - Hash passwords for storage and verify sign-in attempts.
//!
//! # Invariants
//! - Stored credentials are Argon2id PHC strings; plaintext is never persisted.

pub mod password;
