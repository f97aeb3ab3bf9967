//! # Domain Models
//!
//! Pure types shared by the registration form crates (`serde`, `bitflags`, `strum` only).
//! Keep it lean: no I/O and no validation logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod fields;
pub mod strength;
pub mod values;

pub use fields::{Field, FieldSet, InputKind};
pub use strength::{StrengthColor, StrengthLevel};
pub use values::{PersistedSnapshot, RegistrationFormValues};
