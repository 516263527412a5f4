//! Core types for Paddock.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod document;
pub mod id;
pub mod role;
pub mod upload;
pub mod username;

pub use document::{DocumentType, EntityKind, EntityRef, ParseEnumError};
pub use id::*;
pub use role::Role;
pub use upload::{
    DOCUMENT_MIME_TYPES, UploadLimits, UploadPurpose, UploadRejection, sanitized_extension,
};
pub use username::{Username, UsernameError};
