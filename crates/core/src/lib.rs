//! Paddock Core - Shared types library.
//!
//! This crate provides common types used across all Paddock components:
//! - `server` - JSON API for horses, appointments, users and documents
//! - `cli` - Command-line tools for migrations and user provisioning
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, roles, usernames, document/entity references
//!   and the upload acceptance policy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
