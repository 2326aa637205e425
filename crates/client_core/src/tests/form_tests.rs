use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::error::{FieldErrors, RegisterRejection};

use super::*;
use crate::{SubmitError, GENERIC_FAILURE_MESSAGE};

#[derive(Clone, Copy)]
enum FakeReply {
    Accept,
    RejectUsername,
}

struct FakeRegistrationApi {
    reply: FakeReply,
    received: Arc<Mutex<Vec<RegistrationRequest>>>,
}

impl FakeRegistrationApi {
    fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn received(&self) -> Vec<RegistrationRequest> {
        self.received.lock().expect("lock").clone()
    }
}

#[async_trait]
impl RegistrationApi for FakeRegistrationApi {
    async fn submit(&self, request: RegistrationRequest) -> SubmitOutcome {
        self.received.lock().expect("lock").push(request);
        match self.reply {
            FakeReply::Accept => SubmitOutcome::Success(None),
            FakeReply::RejectUsername => {
                let mut data = FieldErrors::new();
                data.insert(
                    "username".into(),
                    vec!["A user with that username already exists.".into()],
                );
                SubmitOutcome::Failure(SubmitError::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    rejection: Some(RegisterRejection::from_field_errors(data)),
                })
            }
        }
    }
}

fn fill_valid(form: &mut RegistrationForm) {
    form.on_change(Field::FirstName, "Barbara");
    form.on_change(Field::LastName, "Liskov");
    form.on_change(Field::Username, "barbara_liskov");
    form.on_change(Field::Email, "barbara@mit.edu");
    form.on_change(Field::Password, "substitution!");
    form.on_change(Field::Password2, "substitution!");
}

#[test]
fn new_form_is_idle_with_hidden_errors() {
    let form = RegistrationForm::new();

    assert_eq!(form.phase(), FormPhase::Idle);
    assert!(!form.signup_success());
    assert_eq!(form.signup_error(), None);
    for field in Field::ALL {
        assert_eq!(form.field(field).error, Some(ValidationError::Empty));
        assert_eq!(form.visible_error(field), None);
    }
}

#[test]
fn blur_reveals_the_field_error() {
    let mut form = RegistrationForm::new();
    form.on_change(Field::Username, "short");
    assert_eq!(form.visible_error(Field::Username), None);

    form.on_blur(Field::Username);
    assert_eq!(
        form.visible_error(Field::Username).as_deref(),
        Some("Username is too small")
    );
    assert_eq!(form.visible_error(Field::Email), None);
}

#[test]
fn changing_password_revalidates_confirmation() {
    let mut form = RegistrationForm::new();
    form.on_change(Field::Password, "first-password");
    form.on_change(Field::Password2, "first-password");
    assert_eq!(form.field(Field::Password2).error, None);

    form.on_change(Field::Password, "second-password");
    assert_eq!(
        form.field(Field::Password2).error,
        Some(ValidationError::PasswordMismatch)
    );
}

#[test]
fn submit_with_empty_fields_touches_all_and_stays_idle() {
    let mut form = RegistrationForm::new();

    let errors = form.on_submit().expect_err("must be invalid");
    assert_eq!(errors.len(), Field::ALL.len());
    assert_eq!(form.phase(), FormPhase::Idle);
    for field in Field::ALL {
        assert_eq!(
            form.visible_error(field).as_deref(),
            Some("This field can not be empty")
        );
    }
}

#[test]
fn apply_dispatches_events() {
    let mut form = RegistrationForm::new();
    assert_eq!(
        form.apply(FormEvent::Change {
            field: Field::Email,
            value: "no-at-sign".into(),
        }),
        None
    );
    assert_eq!(form.apply(FormEvent::Blur(Field::Email)), None);
    assert_eq!(
        form.visible_error(Field::Email).as_deref(),
        Some("Please enter a valid email address")
    );

    fill_valid(&mut form);
    let request = form.apply(FormEvent::Submit).expect("valid request");
    assert_eq!(request.email, "barbara@mit.edu");
    assert_eq!(form.phase(), FormPhase::Submitting);
}

#[tokio::test]
async fn successful_submit_sets_success_and_clears_fields() {
    let api = FakeRegistrationApi::new(FakeReply::Accept);
    let mut form = RegistrationForm::new();
    fill_valid(&mut form);

    let attempt = form.submit(&api).await;
    assert!(matches!(
        attempt,
        SubmitAttempt::Completed(SubmitOutcome::Success(_))
    ));
    assert!(form.signup_success());
    assert_eq!(form.signup_error(), None);
    assert_eq!(form.phase(), FormPhase::Idle);
    for field in Field::ALL {
        assert!(form.field(field).value.is_empty());
        assert_eq!(form.visible_error(field), None);
    }

    let received = api.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].username, "barbara_liskov");
}

#[tokio::test]
async fn rejected_submit_shows_generic_banner_and_server_field_error() {
    let api = FakeRegistrationApi::new(FakeReply::RejectUsername);
    let mut form = RegistrationForm::new();
    fill_valid(&mut form);

    form.submit(&api).await;
    assert!(!form.signup_success());
    assert_eq!(form.signup_error(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(form.phase(), FormPhase::Idle);
    assert_eq!(form.field(Field::Username).value, "barbara_liskov");
    assert_eq!(
        form.visible_error(Field::Username).as_deref(),
        Some("A user with that username already exists.")
    );

    form.on_change(Field::Username, "barbara_liskov2");
    assert_eq!(form.visible_error(Field::Username), None);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_api() {
    let api = FakeRegistrationApi::new(FakeReply::Accept);
    let mut form = RegistrationForm::new();
    fill_valid(&mut form);
    form.on_change(Field::Password2, "something-else");

    let attempt = form.submit(&api).await;
    let SubmitAttempt::Invalid(errors) = attempt else {
        panic!("expected validation failure");
    };
    assert_eq!(
        errors.get(Field::Password2),
        Some(ValidationError::PasswordMismatch)
    );
    assert!(api.received().is_empty());
}

#[tokio::test]
async fn success_after_failure_clears_error_flag() {
    let mut form = RegistrationForm::new();
    fill_valid(&mut form);
    form.submit(&FakeRegistrationApi::new(FakeReply::RejectUsername)).await;
    assert_eq!(form.signup_error(), Some(GENERIC_FAILURE_MESSAGE));

    form.submit(&FakeRegistrationApi::new(FakeReply::Accept)).await;
    assert!(form.signup_success());
    assert_eq!(form.signup_error(), None);
}
