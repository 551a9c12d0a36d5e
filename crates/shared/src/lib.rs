//! Shared types, errors, and configuration for Maleta.
//!
//! This crate provides common types used across all other crates:
//! - Money and currency types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management, including the accounting policy

pub mod config;
pub mod error;
pub mod types;

pub use config::{AccountingPolicy, AppConfig};
pub use error::{AppError, AppResult};
