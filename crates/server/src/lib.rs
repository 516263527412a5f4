//! Paddock server library.
//!
//! JSON API for stable management: users, horses, appointments and the
//! documents attached to them. Exposed as a library so the router can be
//! driven in-process by tests and reused by the CLI.
//!
//! # Architecture
//!
//! - Axum web framework, handlers in [`routes`]
//! - [`db::Store`] trait over `PostgreSQL` (sqlx) or memory
//! - [`services::FileStore`] for uploaded files on local disk
//! - tower-sessions for cookie sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
