use regform_derive::regform_error;
use std::borrow::Cow;

#[regform_error]
pub enum DemoError {
    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn missing_file() -> Result<Vec<u8>, std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
}

#[test]
fn source_errors_convert_with_context() {
    let err = missing_file().context("Reading snapshot").expect_err("expected failure");

    assert!(matches!(err, DemoError::Io { .. }));
    assert_eq!(err.to_string(), "I/O failure (Reading snapshot): gone");
}

#[test]
fn question_mark_converts_without_context() {
    fn run() -> Result<Vec<u8>, DemoError> {
        Ok(missing_file()?)
    }

    let err = run().expect_err("expected failure");
    assert_eq!(err.to_string(), "I/O failure: gone");
}

#[test]
fn context_is_attached_to_own_variants() {
    let result: Result<(), DemoError> =
        Err(DemoError::Rejected { message: "bad key".into(), context: None });

    let err = result.context("Opening store").expect_err("expected failure");
    assert_eq!(err.to_string(), "Rejected (Opening store): bad key");
}

#[test]
fn internal_variant_accepts_strings() {
    let from_str: DemoError = "static message".into();
    let from_string: DemoError = String::from("owned message").into();

    assert_eq!(from_str.to_string(), "Internal fault: static message");
    assert_eq!(from_string.to_string(), "Internal fault: owned message");
}
