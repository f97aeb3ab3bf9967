use regform_storage::StorageError;
use std::borrow::Cow;

/// A specialized [`FormError`] enum of this crate.
#[regform_derive::regform_error]
pub enum FormError {
    #[error("Snapshot storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Snapshot encoding failure{}: {source}", format_context(.context))]
    Snapshot { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Submission failed{}: {message}", format_context(.context))]
    Submission { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("No async runtime{}: {message}", format_context(.context))]
    Runtime { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Form disposed{}: {message}", format_context(.context))]
    Disposed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal form error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
