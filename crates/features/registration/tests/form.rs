mod fixtures;

use fixtures::*;
use regform_registration::*;
use regform_storage::{DisabledStore, FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_every_change_is_mirrored_without_password() {
    let store = MemoryStore::new();
    let form = form_on(&store);

    form.set_field(Field::Name, "Jo");
    assert_eq!(
        store.get("formData").unwrap().as_deref(),
        Some(r#"{"name":"Jo","address":"","phone":"","email":"","password":""}"#)
    );

    form.set_field(Field::Password, "Secret1!");
    let raw = store.get("formData").unwrap().unwrap();
    assert!(!raw.contains("Secret1!"));
    assert_eq!(form.value(Field::Password), "Secret1!");
}

#[test]
fn test_values_survive_restart_on_file_store() {
    let temp = TempDir::new().unwrap();
    let open = || -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::builder().root(temp.path()).open().unwrap())
    };

    let form = RegistrationForm::builder().store(open()).build();
    form.set_field(Field::Name, "Jo");
    form.set_field(Field::Password, "Secret1!");
    drop(form);

    let restored = RegistrationForm::builder().store(open()).build();
    assert_eq!(restored.value(Field::Name), "Jo");
    assert_eq!(restored.value(Field::Password), "");
    assert_eq!(restored.touched(), FieldSet::empty());
    assert!(restored.errors(Field::Name).is_empty());
}

#[test]
fn test_custom_storage_key() {
    let store = MemoryStore::new();
    let form = RegistrationForm::builder()
        .storage_key("signup_v2")
        .store(Arc::new(store.clone()))
        .build();

    form.set_field(Field::Email, "user@example.com");
    assert_eq!(form.storage_key(), "signup_v2");
    assert!(store.get("signup_v2").unwrap().is_some());
    assert!(store.get("formData").unwrap().is_none());
}

#[test]
fn test_unavailable_storage_never_breaks_the_form() {
    let form = RegistrationForm::builder()
        .store(Arc::new(DisabledStore::with_reason("quota exceeded")))
        .build();

    assert!(form.values().is_empty());
    form.set_field(Field::Name, "Jo");
    assert_eq!(form.value(Field::Name), "Jo");
    assert!(form.errors(Field::Name).is_empty());
}

#[test]
fn test_errors_appear_and_clear_live() {
    let form = form_on(&MemoryStore::new());
    assert!(form.errors(Field::Phone).is_empty());

    form.set_field(Field::Phone, "123");
    assert_eq!(form.errors(Field::Phone), ["Phone number must be at least 10 digits."]);

    form.set_field(Field::Phone, "5551234567");
    assert!(form.errors(Field::Phone).is_empty());
    assert_eq!(form.touched(), FieldSet::PHONE);

    form.set_field(Field::Password, "abc");
    assert_eq!(form.errors(Field::Password).len(), 3);
    assert!(!form.is_submittable());
}

#[test]
fn test_strength_follows_password() {
    let form = form_on(&MemoryStore::new());
    let rx = form.watch_strength();
    assert_eq!(form.strength(), StrengthLevel::Weak);

    form.set_field(Field::Password, "Abcdefgh1!");
    assert_eq!(form.strength(), StrengthLevel::Strong);
    assert_eq!(*rx.borrow(), StrengthLevel::Strong);

    form.set_field(Field::Password, "");
    assert_eq!(form.strength(), StrengthLevel::Weak);
    assert!(form.view().strength.is_none());
}

#[test]
fn test_listeners_see_changes_in_order() {
    let form = form_on(&MemoryStore::new());
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = form.subscribe(move |event| sink.lock().push(event.clone()));

    form.set_field(Field::Name, "Jo");
    form.set_field(Field::Password, "abcde1");
    assert!(form.toggle_password_visibility());

    assert!(form.unsubscribe(id));
    form.set_field(Field::Email, "user@example.com");

    assert_eq!(
        *seen.lock(),
        vec![
            FormEvent::FieldChanged { field: Field::Name },
            FormEvent::FieldChanged { field: Field::Password },
            FormEvent::StrengthChanged { level: StrengthLevel::Fair },
            FormEvent::VisibilityChanged { visible: true },
        ]
    );
}

#[test]
fn test_listener_may_read_the_form() {
    let form = form_on(&MemoryStore::new());
    let observed = Arc::new(parking_lot::Mutex::new(String::new()));

    let (reader, sink) = (form.clone(), Arc::clone(&observed));
    form.subscribe(move |event| {
        if let FormEvent::FieldChanged { field } = event {
            *sink.lock() = reader.value(*field);
        }
    });

    form.set_field(Field::Address, "1 Main St");
    assert_eq!(*observed.lock(), "1 Main St");
    form.dispose();
}

#[test]
fn test_dispose_releases_listeners_holding_the_form() {
    let form = form_on(&MemoryStore::new());
    let marker = Arc::new(());

    let (reader, held) = (form.clone(), Arc::clone(&marker));
    form.subscribe(move |_| {
        let _ = (reader.is_disposed(), &held);
    });
    assert_eq!(Arc::strong_count(&marker), 2);

    form.dispose();
    assert_eq!(Arc::strong_count(&marker), 1);
}

#[test]
fn test_view_reflects_visibility_toggle() {
    let form = form_on(&MemoryStore::new());
    form.set_field(Field::Password, "Abc1!");

    let hidden = form.view();
    assert!(!hidden.password_visible);
    assert_eq!(hidden.input(Field::Password).unwrap().value, "•••••");

    assert!(form.toggle_password_visibility());
    let shown = form.view();
    assert_eq!(shown.input(Field::Password).unwrap().kind, InputKind::Text);
    assert_eq!(shown.input(Field::Password).unwrap().value, "Abc1!");

    assert!(!form.toggle_password_visibility());
    assert!(!form.password_visible());
}
