//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently has a single domain: tools that look things up in
//! external services.

pub mod tools;
