use crate::error::FormError;
use crate::observer::{Derived, FormEvent, Listeners, SubscriptionId};
use crate::persistence::FormPersistence;
use crate::schema::{FormValidation, validate_field, validate_form};
use crate::strength::classify;
use crate::view::ViewModel;
use parking_lot::Mutex;
use private::Sealed;
use regform_domain::config::FormConfig;
use regform_domain::constants::{STORAGE_KEY, SUBMIT_DELAY_MS};
use regform_domain::{Field, FieldSet, RegistrationFormValues, StrengthLevel};
use regform_storage::KeyValueStore;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Whether a submission is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}

/// What a call to [`RegistrationForm::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form was valid; the submit timer is running.
    Started,
    /// Nothing was submitted; errors of these fields are now visible.
    Rejected { invalid: FieldSet },
    /// A submission was already in flight.
    AlreadySubmitting,
}

/// The body run once the submit delay has elapsed.
///
/// Errors are logged and the form resets either way. A panic is handled the same
/// way only where panics unwind: the release profile sets `panic = "abort"`, so a
/// panicking handler ends the process there.
pub trait SubmitHandler: Debug + Send + Sync {
    /// # Errors
    /// Any error is logged and otherwise ignored.
    fn submit(&self, values: &RegistrationFormValues) -> Result<(), FormError>;
}

/// Logs the submitted values and succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSubmit;

impl SubmitHandler for SimulatedSubmit {
    fn submit(&self, values: &RegistrationFormValues) -> Result<(), FormError> {
        info!(?values, "Registration submitted");
        Ok(())
    }
}

#[derive(Debug)]
struct FormState {
    values: RegistrationFormValues,
    touched: FieldSet,
    submit_attempted: bool,
    validation: FormValidation,
    submission: SubmissionState,
    password_visible: bool,
}

impl FormState {
    fn new(values: RegistrationFormValues) -> Self {
        Self {
            validation: validate_form(&values),
            values,
            touched: FieldSet::empty(),
            submit_attempted: false,
            submission: SubmissionState::Idle,
            password_visible: false,
        }
    }

    /// Errors of untouched fields stay hidden until the first submit attempt.
    fn visible_errors(&self, field: Field) -> Vec<&'static str> {
        if self.submit_attempted || self.touched.has(field) {
            self.validation.field(field).errors().to_vec()
        } else {
            Vec::new()
        }
    }

    fn reset(&mut self) {
        let password_visible = self.password_visible;
        *self = Self::new(RegistrationFormValues::default());
        self.password_visible = password_visible;
    }
}

#[derive(Debug)]
struct FormInner {
    state: Mutex<FormState>,
    persistence: FormPersistence,
    handler: Arc<dyn SubmitHandler>,
    submit_delay: Duration,
    strength: Derived<StrengthLevel>,
    listeners: Listeners,
    timer: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl FormInner {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn finish_submission(&self, succeeded: bool) {
        self.timer.lock().take();

        if self.is_disposed() {
            debug!("Submit completed after dispose, leaving form untouched");
            return;
        }

        let mut events = vec![FormEvent::SubmissionFinished { succeeded }];
        {
            let mut state = self.state.lock();
            state.reset();
            self.persistence.persist(&state.values);
            if self.strength.update(StrengthLevel::Weak) {
                events.push(FormEvent::StrengthChanged { level: StrengthLevel::Weak });
            }
        }

        info!(succeeded, "Submission finished, form reset");
        self.listeners.emit(&events);
    }
}

impl Drop for FormInner {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.abort();
        }
    }
}

/// Returns the form to `Idle` when the submit body ends, including by panic.
struct SubmissionGuard<'a> {
    inner: &'a FormInner,
    succeeded: bool,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            error!("Submit handler panicked");
        }
        self.inner.finish_submission(self.succeeded);
    }
}

async fn run_submission(form: Weak<FormInner>, values: RegistrationFormValues, delay: Duration) {
    tokio::time::sleep(delay).await;

    let Some(inner) = form.upgrade() else {
        debug!("Form dropped before the submit timer fired");
        return;
    };

    let mut guard = SubmissionGuard { inner: &inner, succeeded: false };
    match inner.handler.submit(&values) {
        Ok(()) => guard.succeeded = true,
        Err(e) => error!(error = %e, "Submit handler failed"),
    }
}

/// A live registration form.
///
/// Every [`set_field`](Self::set_field) revalidates the field, recomputes the password
/// strength and writes the redacted snapshot before returning. Listeners run after
/// the internal lock is released, so they may call back into the form.
///
/// Clones share the same form. Dropping the last clone, or calling
/// [`dispose`](Self::dispose), cancels a pending submit timer. A listener that
/// captures a clone keeps the form alive until [`dispose`](Self::dispose) drops it,
/// so forms wired that way must be disposed explicitly.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    inner: Arc<FormInner>,
}

impl RegistrationForm {
    #[must_use = "The builder must be given a store before it can build the form"]
    pub fn builder() -> RegistrationFormBuilder {
        RegistrationFormBuilder::new()
    }

    /// Builds a form from configuration, hydrating it from `store`.
    #[must_use]
    pub fn from_config(config: &FormConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::builder()
            .storage_key(config.storage_key.clone())
            .submit_delay(config.submit_delay())
            .store(store)
            .build()
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        if self.is_disposed() {
            debug!(%field, "Ignoring input on a disposed form");
            return;
        }

        let mut events = vec![FormEvent::FieldChanged { field }];
        {
            let mut state = self.inner.state.lock();
            state.values.set(field, value);
            state.touched |= FieldSet::from(field);

            let validation = validate_field(field, state.values.get(field));
            state.validation.update(field, validation);

            self.inner.persistence.persist(&state.values);

            if field == Field::Password {
                let level = classify(&state.values.password);
                if self.inner.strength.update(level) {
                    events.push(FormEvent::StrengthChanged { level });
                }
            }
        }

        self.inner.listeners.emit(&events);
    }

    #[must_use]
    pub fn values(&self) -> RegistrationFormValues {
        self.inner.state.lock().values.clone()
    }

    #[must_use]
    pub fn value(&self, field: Field) -> String {
        self.inner.state.lock().values.get(field).to_owned()
    }

    /// Messages currently shown for `field`: empty until the field is edited or a
    /// submit is attempted.
    #[must_use]
    pub fn errors(&self, field: Field) -> Vec<&'static str> {
        self.inner.state.lock().visible_errors(field)
    }

    /// Validation of every field, shown or not.
    #[must_use]
    pub fn validation(&self) -> FormValidation {
        self.inner.state.lock().validation.clone()
    }

    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.inner.state.lock().validation.is_valid()
    }

    #[must_use]
    pub fn touched(&self) -> FieldSet {
        self.inner.state.lock().touched
    }

    #[must_use]
    pub fn strength(&self) -> StrengthLevel {
        self.inner.strength.get()
    }

    /// Watches the password strength, e.g. from a rendering task.
    #[must_use]
    pub fn watch_strength(&self) -> watch::Receiver<StrengthLevel> {
        self.inner.strength.watch()
    }

    #[must_use]
    pub fn password_visible(&self) -> bool {
        self.inner.state.lock().password_visible
    }

    /// Flips password visibility and returns the new value.
    pub fn toggle_password_visibility(&self) -> bool {
        let visible = {
            let mut state = self.inner.state.lock();
            state.password_visible = !state.password_visible;
            state.password_visible
        };
        self.inner.listeners.emit(&[FormEvent::VisibilityChanged { visible }]);
        visible
    }

    #[must_use]
    pub fn submission(&self) -> SubmissionState {
        self.inner.state.lock().submission
    }

    /// Starts a submission if every field is valid.
    ///
    /// A valid form moves to [`SubmissionState::Submitting`] at once; after the
    /// configured delay the handler runs on the current Tokio runtime, then the
    /// fields are cleared and the state returns to idle. An invalid form stays idle
    /// and all its errors become visible.
    ///
    /// # Errors
    /// Returns [`FormError::Disposed`] after [`dispose`](Self::dispose) and
    /// [`FormError::Runtime`] when a valid form is submitted outside a Tokio runtime.
    /// In that case the form stays idle. Rejection needs no runtime.
    pub fn submit(&self) -> Result<SubmitOutcome, FormError> {
        if self.is_disposed() {
            return Err(FormError::Disposed {
                message: "submit called after dispose".into(),
                context: None,
            });
        }

        let (outcome, event, payload) = {
            let mut state = self.inner.state.lock();

            if state.submission == SubmissionState::Submitting {
                debug!("Submit ignored, a submission is already in flight");
                return Ok(SubmitOutcome::AlreadySubmitting);
            }

            state.submit_attempted = true;

            if state.validation.is_valid() {
                let runtime = Handle::try_current().map_err(|e| FormError::Runtime {
                    message: e.to_string().into(),
                    context: Some("Scheduling the submit timer".into()),
                })?;
                state.submission = SubmissionState::Submitting;
                (
                    SubmitOutcome::Started,
                    FormEvent::SubmissionStarted,
                    Some((runtime, state.values.clone())),
                )
            } else {
                let invalid = state.validation.invalid_fields();
                (
                    SubmitOutcome::Rejected { invalid },
                    FormEvent::SubmissionRejected { invalid },
                    None,
                )
            }
        };

        if let Some((runtime, values)) = payload {
            info!(delay_ms = self.inner.submit_delay.as_millis(), "Submission started");
            let task = runtime.spawn(run_submission(
                Arc::downgrade(&self.inner),
                values,
                self.inner.submit_delay,
            ));
            *self.inner.timer.lock() = Some(task);
        } else {
            debug!(?outcome, "Submission rejected");
        }

        self.inner.listeners.emit(&[event]);
        Ok(outcome)
    }

    /// Registers `listener` until [`unsubscribe`](Self::unsubscribe) or
    /// [`dispose`](Self::dispose).
    pub fn subscribe(&self, listener: impl Fn(&FormEvent) + Send + Sync + 'static) -> SubscriptionId {
        self.inner.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.unsubscribe(id)
    }

    #[must_use]
    pub fn view(&self) -> ViewModel {
        let state = self.inner.state.lock();
        ViewModel::build(
            &state.values,
            |field| state.visible_errors(field),
            state.password_visible,
            state.submission == SubmissionState::Submitting,
        )
    }

    /// Tears the form down: cancels the submit timer and drops all listeners.
    ///
    /// Later input is ignored and [`submit`](Self::submit) fails. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(timer) = self.inner.timer.lock().take() {
            timer.abort();
        }
        self.inner.listeners.clear();
        info!("Registration form disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        self.inner.persistence.key()
    }
}

#[derive(Debug, Default)]
pub struct NoStore;
#[derive(Debug)]
pub struct WithStore(Arc<dyn KeyValueStore>);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoStore {}
impl Sealed for WithStore {}

/// Configures a [`RegistrationForm`]. A store is required before
/// [`build`](RegistrationFormBuilder::build) becomes available.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct RegistrationFormBuilder<S: Sealed = NoStore> {
    state: S,
    storage_key: String,
    submit_delay: Duration,
    handler: Arc<dyn SubmitHandler>,
}

impl Default for RegistrationFormBuilder {
    fn default() -> Self {
        Self {
            state: NoStore,
            storage_key: STORAGE_KEY.to_owned(),
            submit_delay: Duration::from_millis(SUBMIT_DELAY_MS),
            handler: Arc::new(SimulatedSubmit),
        }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> RegistrationFormBuilder<S> {
    #[must_use = "Sets the key the snapshot is stored under"]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use = "Sets the simulated submission latency"]
    pub const fn submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    #[must_use = "Sets the body run when the submit delay elapses"]
    pub fn handler(mut self, handler: impl SubmitHandler + 'static) -> Self {
        self.handler = Arc::new(handler);
        self
    }
}

impl RegistrationFormBuilder<NoStore> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the snapshot store"]
    pub fn store(self, store: Arc<dyn KeyValueStore>) -> RegistrationFormBuilder<WithStore> {
        RegistrationFormBuilder {
            state: WithStore(store),
            storage_key: self.storage_key,
            submit_delay: self.submit_delay,
            handler: self.handler,
        }
    }
}

impl RegistrationFormBuilder<WithStore> {
    /// Hydrates the initial values from the store and builds the form.
    ///
    /// Never fails: an unreadable snapshot yields an empty form.
    #[must_use]
    pub fn build(self) -> RegistrationForm {
        let persistence = FormPersistence::new(self.state.0, self.storage_key);
        let values = persistence.hydrate();
        let strength = Derived::new(classify(&values.password));

        info!(key = persistence.key(), restored = !values.is_empty(), "Registration form ready");

        RegistrationForm {
            inner: Arc::new(FormInner {
                state: Mutex::new(FormState::new(values)),
                persistence,
                handler: self.handler,
                submit_delay: self.submit_delay,
                strength,
                listeners: Listeners::default(),
                timer: Mutex::new(None),
                disposed: AtomicBool::new(false),
            }),
        }
    }
}
