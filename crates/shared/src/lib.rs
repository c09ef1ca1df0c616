//! Shared utilities and common types for the Quizdeck backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cookie and token signing (HMAC-SHA256)
//! - Password hashing with Argon2id
//! - Common validation logic
//! - Pagination helpers

pub mod pagination;
pub mod password;
pub mod signing;
pub mod validation;
