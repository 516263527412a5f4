//! Domain models for Paddock.
//!
//! Plain data types shared by the storage layer and the HTTP handlers.
//! Row mapping lives in [`crate::db`]; nothing here performs I/O.

pub mod appointment;
pub mod document;
pub mod horse;
pub mod lookup;
pub mod patch;
pub mod session;
pub mod user;

pub use appointment::{Appointment, AppointmentWithRelations, NewAppointment};
pub use document::{Document, DocumentWithUploader, NewDocument};
pub use horse::{Horse, HorsePatch, HorseWithRelations, NewHorse};
pub use lookup::{EventGroup, RoleInfo, Stable, Translation};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User, UserPatch, UserSummary, UserWithRelations};
