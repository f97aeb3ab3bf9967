#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the registration form workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! regform-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own
//! macros in doctests.

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns a plain enum into a workspace error type.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless the enum already derives them.
/// * A `<Name>Ext` trait with `.context(...)` implemented for `Result<T, Name>`
///   and for `Result<T, Source>` of every variant carrying a `source` field.
/// * `From<Source>` for every such variant, so `?` works on upstream errors.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-local `format_context` helper that renders `Some(c)` as `" (c)"`.
///
/// # Requirements
///
/// * Variants use named fields. Tuple and unit variants are rejected.
/// * A `context` field, when present, is `Option<Cow<'static, str>>`.
/// * A variant with a `source` (or `#[source]`/`#[from]`) field must also have `context`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[regform_derive::regform_error]
/// pub enum StoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load() -> Result<String, StoreError> {
///     std::fs::read_to_string("form.json").context("Reading snapshot")
/// }
/// ```
#[proc_macro_attribute]
pub fn regform_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
