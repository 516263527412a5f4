//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password registration and login (argon2)
//! - `uploads` - File storage for accepted uploads

pub mod auth;
pub mod uploads;

pub use auth::{AuthError, AuthService, Registration};
pub use uploads::{FileStore, LocalDiskStore, StorageError};
