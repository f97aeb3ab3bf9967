mod fixtures;

use fixtures::*;
use regform_registration::*;
use regform_storage::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

async fn settle(elapsed: Duration) {
    sleep(elapsed).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn test_valid_submit_resets_after_delay() {
    let store = MemoryStore::new();
    let form = form_on(&store);
    fill(&form, &valid_values());
    assert!(form.is_submittable());

    assert_eq!(form.submit().unwrap(), SubmitOutcome::Started);
    assert_eq!(form.submission(), SubmissionState::Submitting);
    assert_eq!(form.view().submit, SubmitButton::Loading);

    settle(DELAY - Duration::from_millis(1)).await;
    assert_eq!(form.submission(), SubmissionState::Submitting);
    assert_eq!(form.values(), valid_values());

    settle(Duration::from_millis(2)).await;
    assert_eq!(form.submission(), SubmissionState::Idle);
    assert!(form.values().is_empty());
    assert_eq!(form.strength(), StrengthLevel::Weak);
    assert_eq!(form.touched(), FieldSet::empty());
    assert!(!form.view().has_errors());

    let snapshot = store.get("formData").unwrap().unwrap();
    assert_eq!(snapshot, r#"{"name":"","address":"","phone":"","email":"","password":""}"#);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_submit_stays_idle_and_reveals_errors() {
    let form = form_on(&MemoryStore::new());
    let mut values = valid_values();
    values.name.clear();
    for field in [Field::Address, Field::Phone, Field::Email, Field::Password] {
        form.set_field(field, values.get(field));
    }
    assert!(form.errors(Field::Name).is_empty());

    let outcome = form.submit().unwrap();
    assert_eq!(outcome, SubmitOutcome::Rejected { invalid: FieldSet::NAME });
    assert_eq!(form.submission(), SubmissionState::Idle);
    assert_eq!(form.errors(Field::Name), ["Name must be at least 2 characters."]);

    settle(DELAY * 2).await;
    assert_eq!(form.values().address, "1 Main St");
}

#[tokio::test(start_paused = true)]
async fn test_submit_while_submitting_is_ignored() {
    let form = form_on(&MemoryStore::new());
    fill(&form, &valid_values());

    assert_eq!(form.submit().unwrap(), SubmitOutcome::Started);
    settle(Duration::from_millis(500)).await;
    assert_eq!(form.submit().unwrap(), SubmitOutcome::AlreadySubmitting);

    // The original timer still fires on schedule.
    settle(Duration::from_millis(1501)).await;
    assert_eq!(form.submission(), SubmissionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_failing_handler_still_completes_lifecycle() {
    let form = RegistrationForm::builder()
        .store(Arc::new(MemoryStore::new()))
        .handler(FailingSubmit)
        .build();
    fill(&form, &valid_values());

    let finished = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&finished);
    form.subscribe(move |event| {
        if let FormEvent::SubmissionFinished { succeeded } = event {
            sink.lock().push(*succeeded);
        }
    });

    form.submit().unwrap();
    settle(DELAY + Duration::from_millis(1)).await;

    assert_eq!(form.submission(), SubmissionState::Idle);
    assert!(form.values().is_empty());
    assert_eq!(*finished.lock(), vec![false]);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_handler_still_completes_lifecycle() {
    let form = RegistrationForm::builder()
        .store(Arc::new(MemoryStore::new()))
        .handler(PanickingSubmit)
        .build();
    fill(&form, &valid_values());

    form.submit().unwrap();
    settle(DELAY + Duration::from_millis(1)).await;

    assert_eq!(form.submission(), SubmissionState::Idle);
    assert!(form.values().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_pending_timer() {
    let store = MemoryStore::new();
    let form = form_on(&store);
    fill(&form, &valid_values());

    form.submit().unwrap();
    form.dispose();
    form.dispose();
    settle(DELAY * 2).await;

    assert!(form.is_disposed());
    assert_eq!(form.values(), valid_values());
    assert!(matches!(form.submit(), Err(FormError::Disposed { .. })));

    form.set_field(Field::Name, "ignored");
    assert_eq!(form.value(Field::Name), "Jo");
    assert!(store.get("formData").unwrap().unwrap().contains(r#""name":"Jo""#));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_form_before_timer_fires_is_harmless() {
    let store = MemoryStore::new();
    let form = form_on(&store);
    fill(&form, &valid_values());

    form.submit().unwrap();
    drop(form);
    settle(DELAY * 2).await;

    assert!(store.get("formData").unwrap().unwrap().contains(r#""name":"Jo""#));
}

#[tokio::test(start_paused = true)]
async fn test_configured_delay_is_honoured() {
    let config = regform_domain::config::FormConfig { submit_delay_ms: 50, ..Default::default() };
    let form = RegistrationForm::from_config(&config, Arc::new(MemoryStore::new()));
    fill(&form, &valid_values());

    form.submit().unwrap();
    settle(Duration::from_millis(51)).await;
    assert_eq!(form.submission(), SubmissionState::Idle);
}

#[test]
fn test_submit_outside_runtime_is_an_error() {
    let form = form_on(&MemoryStore::new());
    fill(&form, &valid_values());

    assert!(matches!(form.submit(), Err(FormError::Runtime { .. })));
    assert_eq!(form.submission(), SubmissionState::Idle);
}

#[test]
fn test_invalid_submit_outside_runtime_is_rejected() {
    let form = form_on(&MemoryStore::new());
    form.set_field(Field::Address, "1 Main St");

    let outcome = form.submit().unwrap();
    assert!(matches!(outcome, SubmitOutcome::Rejected { invalid } if invalid.has(Field::Name)));
    assert_eq!(form.errors(Field::Name), ["Name must be at least 2 characters."]);
    assert_eq!(form.submission(), SubmissionState::Idle);
}
