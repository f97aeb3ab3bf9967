//! # Registration Form
//!
//! The registration form slice: a declarative validation schema for five fields,
//! a password strength classifier, a persistence adapter that mirrors the
//! password-redacted values into a [`regform_storage::KeyValueStore`], and the
//! [`RegistrationForm`] orchestrator that wires them together with a simulated,
//! delayed submission.
//!
//! ## Example
//!
//! ```rust
//! use regform_registration::{Field, RegistrationForm, StrengthLevel};
//! use regform_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let form = RegistrationForm::builder().store(Arc::new(MemoryStore::new())).build();
//!
//! form.set_field(Field::Name, "J");
//! assert_eq!(form.errors(Field::Name), ["Name must be at least 2 characters."]);
//!
//! form.set_field(Field::Password, "Abcdef1!");
//! assert_eq!(form.strength(), StrengthLevel::Good);
//! assert!(!form.is_submittable());
//! ```

mod error;
mod form;
mod observer;
mod persistence;
pub mod schema;
pub mod strength;
mod view;

pub use error::{FormError, FormErrorExt};
pub use form::{
    NoStore, RegistrationForm, RegistrationFormBuilder, SimulatedSubmit, SubmissionState,
    SubmitHandler, SubmitOutcome, WithStore,
};
pub use observer::{Derived, FormEvent, Listeners, SubscriptionId};
pub use persistence::FormPersistence;
pub use schema::{FieldConstraint, FieldValidation, FormValidation, is_submittable, validate_form};
pub use strength::{StrengthReport, analyze, classify};
pub use view::{InputView, StrengthBar, SubmitButton, ViewModel};

pub use regform_domain::{Field, FieldSet, InputKind, RegistrationFormValues, StrengthColor, StrengthLevel};
