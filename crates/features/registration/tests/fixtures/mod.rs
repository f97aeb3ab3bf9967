#![allow(dead_code)]

use regform_registration::{Field, FormError, RegistrationForm, RegistrationFormValues, SubmitHandler};
use regform_storage::MemoryStore;
use std::sync::Arc;
use std::time::Duration;

pub const DELAY: Duration = Duration::from_millis(2000);

pub fn valid_values() -> RegistrationFormValues {
    RegistrationFormValues {
        name: "Jo".to_owned(),
        address: "1 Main St".to_owned(),
        phone: "555-123-4567".to_owned(),
        email: "user@example.com".to_owned(),
        password: "Abcdef1!".to_owned(),
    }
}

pub fn fill(form: &RegistrationForm, values: &RegistrationFormValues) {
    for field in Field::ALL {
        form.set_field(field, values.get(field));
    }
}

pub fn form_on(store: &MemoryStore) -> RegistrationForm {
    RegistrationForm::builder().store(Arc::new(store.clone())).build()
}

#[derive(Debug)]
pub struct FailingSubmit;

impl SubmitHandler for FailingSubmit {
    fn submit(&self, _: &RegistrationFormValues) -> Result<(), FormError> {
        Err("backend unreachable".into())
    }
}

#[derive(Debug)]
pub struct PanickingSubmit;

impl SubmitHandler for PanickingSubmit {
    fn submit(&self, _: &RegistrationFormValues) -> Result<(), FormError> {
        panic!("submit body exploded");
    }
}
