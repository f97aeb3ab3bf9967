use regform_domain::config::LoggingConfig;
use regform_logger::{Logger, LoggerError};
use serial_test::serial;

fn console(level: &str) -> LoggingConfig {
    LoggingConfig { level: level.to_owned(), ..LoggingConfig::default() }
}

#[test]
#[serial]
fn rejected_config_does_not_claim_the_global_slot() {
    let err = Logger::init("regform", &console("regform=verbose")).expect_err("bad level");
    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
}

#[test]
#[serial]
fn global_subscriber_installs_once() {
    let first = Logger::init("regform", &console("info"));
    assert!(first.is_ok(), "first valid install should win: {first:?}");

    let second = Logger::init("regform-again", &console("debug")).expect_err("already installed");
    assert!(matches!(second, LoggerError::Subscriber { .. }));
}
