//! Field validation rules.
//!
//! Each field owns an ordered list of independent rules. Every rule is evaluated,
//! so a value can collect several messages at once (a short password without an
//! uppercase letter reports both).

use regex::Regex;
use regform_domain::{Field, FieldSet, RegistrationFormValues};
use std::sync::LazyLock;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]*([0-9]{1,4})?[-.\s]?\(?([0-9]{1,4})?\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}$")
        .unwrap_or_else(|e| unreachable!("phone pattern is a valid regex: {e}"))
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap_or_else(|e| unreachable!("email pattern is a valid regex: {e}"))
});

/// The predicate half of a [`Rule`].
#[derive(Debug, Clone, Copy)]
pub enum Check {
    /// At least this many characters.
    MinLength(usize),
    /// At most this many characters.
    MaxLength(usize),
    Pattern(&'static LazyLock<Regex>),
    Custom(fn(&str) -> bool),
}

impl Check {
    #[must_use]
    pub fn passes(self, value: &str) -> bool {
        match self {
            Self::MinLength(min) => value.chars().count() >= min,
            Self::MaxLength(max) => value.chars().count() <= max,
            Self::Pattern(re) => re.is_match(value),
            Self::Custom(predicate) => predicate(value),
        }
    }
}

/// A predicate paired with the message shown when it fails.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    const fn new(check: Check, message: &'static str) -> Self {
        Self { check, message }
    }
}

static NAME_RULES: [Rule; 2] = [
    Rule::new(Check::MinLength(2), "Name must be at least 2 characters."),
    Rule::new(Check::MaxLength(50), "Name cannot exceed 50 characters."),
];

static ADDRESS_RULES: [Rule; 2] = [
    Rule::new(Check::MinLength(1), "Address is required"),
    Rule::new(Check::MaxLength(100), "Address cannot exceed 100 characters."),
];

static PHONE_RULES: [Rule; 2] = [
    Rule::new(Check::Pattern(&PHONE_PATTERN), "Please enter a valid phone number."),
    Rule::new(Check::MinLength(10), "Phone number must be at least 10 digits."),
];

static EMAIL_RULES: [Rule; 1] = [Rule::new(Check::Custom(is_email), "Invalid email address")];

static PASSWORD_RULES: [Rule; 4] = [
    Rule::new(Check::MinLength(6), "Password must be at least 6 characters"),
    Rule::new(Check::Custom(has_uppercase), "Password must contain at least one uppercase letter"),
    Rule::new(Check::Custom(has_special), "Password must contain at least one special character"),
    Rule::new(Check::Custom(has_lowercase), "Password must contain at least one lowercase letter"),
];

fn has_uppercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_uppercase())
}

fn has_lowercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
}

/// Anything outside `[A-Za-z0-9]` counts, including spaces and non-ASCII letters.
fn has_special(value: &str) -> bool {
    value.chars().any(|c| !c.is_ascii_alphanumeric())
}

// The pattern has no lookaround, so the leading-dot and double-dot cases are checked here.
fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_PATTERN.is_match(value)
}

/// The ordered rule list of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldConstraint {
    pub field: Field,
    pub rules: &'static [Rule],
}

impl FieldConstraint {
    #[must_use]
    pub fn of(field: Field) -> Self {
        let rules: &'static [Rule] = match field {
            Field::Name => &NAME_RULES,
            Field::Address => &ADDRESS_RULES,
            Field::Phone => &PHONE_RULES,
            Field::Email => &EMAIL_RULES,
            Field::Password => &PASSWORD_RULES,
        };
        Self { field, rules }
    }

    /// Evaluates every rule against `value`.
    #[must_use]
    pub fn validate(&self, value: &str) -> FieldValidation {
        FieldValidation {
            errors: self
                .rules
                .iter()
                .filter(|rule| !rule.check.passes(value))
                .map(|rule| rule.message)
                .collect(),
        }
    }
}

/// Failing messages of one field, in rule order. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValidation {
    errors: Vec<&'static str>,
}

impl FieldValidation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[&'static str] {
        &self.errors
    }

    #[must_use]
    pub fn first(&self) -> Option<&'static str> {
        self.errors.first().copied()
    }
}

/// Validation of all five fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    fields: [FieldValidation; 5],
}

impl FormValidation {
    #[must_use]
    pub fn field(&self, field: Field) -> &FieldValidation {
        &self.fields[field as usize]
    }

    /// Replaces the result of one field, as done on every keystroke.
    pub fn update(&mut self, field: Field, validation: FieldValidation) {
        self.fields[field as usize] = validation;
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldValidation::is_valid)
    }

    #[must_use]
    pub fn invalid_fields(&self) -> FieldSet {
        Field::ALL
            .into_iter()
            .filter(|f| !self.field(*f).is_valid())
            .fold(FieldSet::empty(), |set, f| set | FieldSet::from(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValidation)> {
        Field::ALL.into_iter().map(|f| (f, self.field(f)))
    }
}

#[must_use]
pub fn validate_field(field: Field, value: &str) -> FieldValidation {
    FieldConstraint::of(field).validate(value)
}

#[must_use]
pub fn validate_name(value: &str) -> FieldValidation {
    validate_field(Field::Name, value)
}

#[must_use]
pub fn validate_address(value: &str) -> FieldValidation {
    validate_field(Field::Address, value)
}

#[must_use]
pub fn validate_phone(value: &str) -> FieldValidation {
    validate_field(Field::Phone, value)
}

#[must_use]
pub fn validate_email(value: &str) -> FieldValidation {
    validate_field(Field::Email, value)
}

#[must_use]
pub fn validate_password(value: &str) -> FieldValidation {
    validate_field(Field::Password, value)
}

#[must_use]
pub fn validate_form(values: &RegistrationFormValues) -> FormValidation {
    let mut validation = FormValidation::default();
    for field in Field::ALL {
        validation.update(field, validate_field(field, values.get(field)));
    }
    validation
}

/// True only when all five fields pass.
#[must_use]
pub fn is_submittable(values: &RegistrationFormValues) -> bool {
    validate_form(values).is_valid()
}
