//! High-level commands for berth operations.
//!
//! This module provides the public API for orchestrating deployment
//! reporting. Commands are designed to be called by frontends; they
//! return rendered reports instead of printing.

pub mod list;

pub use list::{ListCommand, ListOptions, ListReport};
