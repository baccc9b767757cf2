//! Core types and trait definitions for the barangay civil registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod error;
pub mod form;
pub mod household;
pub mod ident;
pub mod query;
pub mod resident;
pub mod staff;
pub mod store;

pub use error::{Error, Result, ValidationErrors};
