//! Registration rules as plain functions keyed by field.
//!
//! Each field has one validator; [`validate`] runs all of them and keeps the
//! first failure per field.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::validate_email;

use crate::{
    domain::{Field, RegistrationRequest},
    error::FieldErrors,
};

pub const MIN_USERNAME_CHARS: usize = 10;
pub const MIN_PASSWORD_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field can not be empty")]
    Empty,
    #[error("Username is too small")]
    UsernameTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password should contain atleast 10 characters including a special character")]
    PasswordTooShort,
    #[error("Passwords must match")]
    PasswordMismatch,
}

/// Validator for a single field. Gets the whole request for cross-field rules.
pub type FieldValidator = fn(&str, &RegistrationRequest) -> Result<(), ValidationError>;

pub const FIELD_VALIDATORS: [(Field, FieldValidator); 6] = [
    (Field::FirstName, validate_first_name),
    (Field::LastName, validate_last_name),
    (Field::Username, validate_username),
    (Field::Email, validate_email_address),
    (Field::Password, validate_password),
    (Field::Password2, validate_password_confirmation),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<ValidationError> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, ValidationError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    /// Wire shape used in a `400` register body.
    pub fn to_field_errors(&self) -> FieldErrors {
        self.iter()
            .map(|(field, error)| (field.as_str().to_string(), vec![error.to_string()]))
            .collect()
    }
}

pub type ValidationResult = Result<(), ValidationErrors>;

pub fn validate(request: &RegistrationRequest) -> ValidationResult {
    let errors: BTreeMap<Field, ValidationError> = FIELD_VALIDATORS
        .iter()
        .filter_map(|(field, validator)| {
            validator(request.value(*field), request)
                .err()
                .map(|error| (*field, error))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

pub fn validate_field(field: Field, request: &RegistrationRequest) -> Result<(), ValidationError> {
    FIELD_VALIDATORS
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map_or(Ok(()), |(_, validator)| validator(request.value(field), request))
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Empty)
    } else {
        Ok(())
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate_first_name(value: &str, _: &RegistrationRequest) -> Result<(), ValidationError> {
    required(value)
}

pub fn validate_last_name(value: &str, _: &RegistrationRequest) -> Result<(), ValidationError> {
    required(value)
}

pub fn validate_username(value: &str, _: &RegistrationRequest) -> Result<(), ValidationError> {
    required(value)?;
    if char_len(value) < MIN_USERNAME_CHARS {
        return Err(ValidationError::UsernameTooShort);
    }
    Ok(())
}

pub fn validate_email_address(value: &str, _: &RegistrationRequest) -> Result<(), ValidationError> {
    required(value)?;
    if !validate_email(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(value: &str, _: &RegistrationRequest) -> Result<(), ValidationError> {
    required(value)?;
    if char_len(value) < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_password_confirmation(
    value: &str,
    request: &RegistrationRequest,
) -> Result<(), ValidationError> {
    required(value)?;
    if value != request.password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
