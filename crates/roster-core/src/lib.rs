//! Core types and trait definitions for the Roster person store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod person;
pub mod store;
pub mod version;

pub use error::{Error, Result};
