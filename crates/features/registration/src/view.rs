//! Render model of the form, independent of any UI toolkit.

use crate::strength::classify;
use regform_domain::{Field, InputKind, RegistrationFormValues, StrengthColor, StrengthLevel};
use std::fmt;

const MASK: char = '•';
const SPINNER: &str = "⟳ Submitting...";

/// One labelled input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: InputKind,
    /// Display value; the password is masked unless visible.
    pub value: String,
    pub errors: Vec<&'static str>,
}

/// The strength indicator under the password input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthBar {
    pub level: StrengthLevel,
    pub segments: usize,
    pub color: StrengthColor,
    pub full_width: bool,
}

impl StrengthBar {
    pub const MAX_SEGMENTS: usize = 4;

    #[must_use]
    pub const fn new(level: StrengthLevel) -> Self {
        Self {
            level,
            segments: level.segments(),
            color: level.color(),
            full_width: level.fills_width(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitButton {
    Ready,
    Loading,
}

impl SubmitButton {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Submit",
            Self::Loading => SPINNER,
        }
    }

    /// The button is disabled while a submission is in flight.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Everything needed to draw the form once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub inputs: Vec<InputView>,
    pub password_visible: bool,
    /// Present only while the password is non-empty.
    pub strength: Option<StrengthBar>,
    pub submit: SubmitButton,
}

impl ViewModel {
    pub(crate) fn build(
        values: &RegistrationFormValues,
        visible_errors: impl Fn(Field) -> Vec<&'static str>,
        password_visible: bool,
        submitting: bool,
    ) -> Self {
        let inputs = Field::ALL
            .into_iter()
            .map(|field| {
                let raw = values.get(field);
                let (kind, value) = match field.input_kind() {
                    InputKind::Password if password_visible => (InputKind::Text, raw.to_owned()),
                    InputKind::Password => (InputKind::Password, mask(raw)),
                    kind => (kind, raw.to_owned()),
                };
                InputView {
                    field,
                    label: field.label(),
                    placeholder: field.placeholder(),
                    kind,
                    value,
                    errors: visible_errors(field),
                }
            })
            .collect();

        let strength =
            (!values.password.is_empty()).then(|| StrengthBar::new(classify(&values.password)));

        Self {
            inputs,
            password_visible,
            strength,
            submit: if submitting { SubmitButton::Loading } else { SubmitButton::Ready },
        }
    }

    #[must_use]
    pub fn input(&self, field: Field) -> Option<&InputView> {
        self.inputs.iter().find(|input| input.field == field)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.inputs.iter().any(|input| !input.errors.is_empty())
    }
}

fn mask(value: &str) -> String {
    value.chars().map(|_| MASK).collect()
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            let shown = if input.value.is_empty() {
                format!("<{}>", input.placeholder)
            } else {
                input.value.clone()
            };
            writeln!(f, "{:<9} [{:<8}] {shown}", input.label, input.kind.to_string())?;

            if input.field == Field::Password {
                let toggle = if self.password_visible { "hide" } else { "show" };
                writeln!(f, "{:<9} ({toggle} password)", "")?;
                if let Some(bar) = &self.strength {
                    let filled = "■".repeat(bar.segments);
                    let empty = "□".repeat(StrengthBar::MAX_SEGMENTS - bar.segments);
                    let width = if bar.full_width { ", full width" } else { "" };
                    writeln!(f, "{:<9} {filled}{empty} {} ({}{width})", "", bar.level, bar.color)?;
                }
            }

            for error in &input.errors {
                writeln!(f, "{:<9} ! {error}", "")?;
            }
        }
        write!(f, "[ {} ]", self.submit.label())
    }
}
