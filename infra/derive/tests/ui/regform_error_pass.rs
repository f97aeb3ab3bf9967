use regform_derive::regform_error;
use std::borrow::Cow;

#[regform_error]
pub enum SnapshotError {
    #[error("Decode failure{}: {source}", format_context(.context))]
    Decode {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal snapshot error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i64, SnapshotError> {
    raw.parse::<i64>().context("Parsing snapshot version")
}

fn main() {
    let _ = parse("7");
}
