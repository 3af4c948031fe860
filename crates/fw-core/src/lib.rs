//! fw-core: shared error type and configuration.
//!
//! This crate is the foundational dependency for the other fw-* crates,
//! providing the unified [`Error`] every operation reports and the JSON
//! [`config::Config`] consumed by the tool runner and the facade.

pub mod config;
pub mod error;

pub use error::{Error, Result};
