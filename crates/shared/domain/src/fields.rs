use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// The five inputs of the registration form, in rendering order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    Address,
    Phone,
    Email,
    Password,
}

/// How an input control is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Password,
}

impl Field {
    pub const ALL: [Self; 5] = [Self::Name, Self::Address, Self::Phone, Self::Email, Self::Password];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Address => "Address",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }

    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Enter your name",
            Self::Address => "Enter your address",
            Self::Phone => "Enter your phone number",
            Self::Email => "Enter your email",
            Self::Password => "Enter your password",
        }
    }

    #[must_use]
    pub const fn input_kind(self) -> InputKind {
        match self {
            Self::Name | Self::Address => InputKind::Text,
            Self::Phone => InputKind::Tel,
            Self::Email => InputKind::Email,
            Self::Password => InputKind::Password,
        }
    }

    /// Whether the value may be written to durable storage.
    #[must_use]
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::Password)
    }
}

bitflags! {
    /// A set of fields, e.g. the ones the user has already edited.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldSet: u8 {
        const NAME = 1 << 0;
        const ADDRESS = 1 << 1;
        const PHONE = 1 << 2;
        const EMAIL = 1 << 3;
        const PASSWORD = 1 << 4;

        const ALL = Self::NAME.bits()
            | Self::ADDRESS.bits()
            | Self::PHONE.bits()
            | Self::EMAIL.bits()
            | Self::PASSWORD.bits();
    }
}

impl From<Field> for FieldSet {
    fn from(field: Field) -> Self {
        match field {
            Field::Name => Self::NAME,
            Field::Address => Self::ADDRESS,
            Field::Phone => Self::PHONE,
            Field::Email => Self::EMAIL,
            Field::Password => Self::PASSWORD,
        }
    }
}

impl FieldSet {
    #[must_use]
    pub fn has(self, field: Field) -> bool {
        self.contains(field.into())
    }
}
