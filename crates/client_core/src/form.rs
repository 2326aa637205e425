//! View-model for the registration form.
//!
//! Presentation code feeds [`FormEvent`]s in and reads [`FieldState`]s and the
//! two result flags back out. Rendering never touches validation directly.

use std::collections::BTreeMap;

use shared::{
    domain::{Field, RegistrationRequest},
    validation::{validate, ValidationError, ValidationErrors},
};
use tracing::{debug, warn};

use crate::{RegistrationApi, SubmitOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
    pub error: Option<ValidationError>,
    /// Message the server attached to this field on the last rejected submit.
    pub server_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Change { field: Field, value: String },
    Blur(Field),
    Submit,
}

#[derive(Debug)]
pub enum SubmitAttempt {
    /// Client-side rules failed; nothing was sent.
    Invalid(ValidationErrors),
    Completed(SubmitOutcome),
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    fields: BTreeMap<Field, FieldState>,
    phase: FormPhase,
    signup_success: bool,
    signup_error: Option<&'static str>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationForm {
    pub fn new() -> Self {
        let mut form = Self {
            fields: Field::ALL
                .into_iter()
                .map(|field| (field, FieldState::default()))
                .collect(),
            phase: FormPhase::Idle,
            signup_success: false,
            signup_error: None,
        };
        form.revalidate();
        form
    }

    pub fn field(&self, field: Field) -> &FieldState {
        // Every field is inserted in `new` and never removed.
        &self.fields[&field]
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldState)> + '_ {
        self.fields.iter().map(|(field, state)| (*field, state))
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn signup_success(&self) -> bool {
        self.signup_success
    }

    pub fn signup_error(&self) -> Option<&'static str> {
        self.signup_error
    }

    /// Error text to render next to `field`, if any.
    pub fn visible_error(&self, field: Field) -> Option<String> {
        let state = self.field(field);
        if !state.touched {
            return None;
        }
        state
            .error
            .map(|error| error.to_string())
            .or_else(|| state.server_error.clone())
    }

    pub fn request(&self) -> RegistrationRequest {
        let mut request = RegistrationRequest::default();
        for (field, state) in &self.fields {
            request.value_mut(*field).clone_from(&state.value);
        }
        request
    }

    /// Dispatches one UI event. Returns the request to send when a submit passes validation.
    pub fn apply(&mut self, event: FormEvent) -> Option<RegistrationRequest> {
        match event {
            FormEvent::Change { field, value } => {
                self.on_change(field, value);
                None
            }
            FormEvent::Blur(field) => {
                self.on_blur(field);
                None
            }
            FormEvent::Submit => self.on_submit().ok(),
        }
    }

    pub fn on_change(&mut self, field: Field, value: impl Into<String>) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.value = value.into();
            state.server_error = None;
        }
        self.revalidate();
    }

    pub fn on_blur(&mut self, field: Field) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.touched = true;
        }
        self.revalidate();
    }

    /// Touches every field and validates. On success the form moves to
    /// `Submitting` and hands back the snapshot to send.
    pub fn on_submit(&mut self) -> Result<RegistrationRequest, ValidationErrors> {
        for state in self.fields.values_mut() {
            state.touched = true;
            state.server_error = None;
        }

        let request = self.request();
        if let Err(errors) = validate(&request) {
            self.apply_errors(&errors);
            debug!(invalid_fields = errors.len(), "registration blocked by validation");
            return Err(errors);
        }
        self.apply_errors(&ValidationErrors::default());

        if self.phase == FormPhase::Submitting {
            warn!("registration submitted again while a previous submit is in flight");
        }
        self.phase = FormPhase::Submitting;
        Ok(request)
    }

    /// Records the result of a submit and returns to `Idle`.
    pub fn complete_submit(&mut self, outcome: &SubmitOutcome) {
        self.phase = FormPhase::Idle;

        match outcome {
            SubmitOutcome::Success(_) => {
                self.signup_success = true;
                self.signup_error = None;
                for state in self.fields.values_mut() {
                    *state = FieldState::default();
                }
                self.revalidate();
            }
            SubmitOutcome::Failure(err) => {
                self.signup_success = false;
                self.signup_error = Some(err.user_message());
                if let Some(rejection) = err.rejection() {
                    for (field, message) in rejection.field_messages() {
                        if let Some(state) = self.fields.get_mut(&field) {
                            state.server_error = Some(message);
                        }
                    }
                }
            }
        }
    }

    /// Full submit cycle: validate, send through `api`, record the outcome.
    pub async fn submit<A>(&mut self, api: &A) -> SubmitAttempt
    where
        A: RegistrationApi + ?Sized,
    {
        let request = match self.on_submit() {
            Ok(request) => request,
            Err(errors) => return SubmitAttempt::Invalid(errors),
        };

        let outcome = api.submit(request).await;
        self.complete_submit(&outcome);
        SubmitAttempt::Completed(outcome)
    }

    fn revalidate(&mut self) {
        let errors = validate(&self.request()).err().unwrap_or_default();
        self.apply_errors(&errors);
    }

    fn apply_errors(&mut self, errors: &ValidationErrors) {
        for (field, state) in self.fields.iter_mut() {
            state.error = errors.get(*field);
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
