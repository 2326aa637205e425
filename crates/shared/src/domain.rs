use std::fmt;

use serde::{Deserialize, Serialize};

/// One named input of the registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Username,
    Email,
    Password,
    Password2,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::Username,
        Field::Email,
        Field::Password,
        Field::Password2,
    ];

    /// Wire key of the field in the register body.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::Password2 => "password2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Username => "Username",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::Password2 => "Confirm Password",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.as_str() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/users/register/`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

impl RegistrationRequest {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::Password2 => &self.password2,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::Password2 => &mut self.password2,
        }
    }
}

// Passwords never reach logs.
impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("password2", &"<redacted>")
            .finish()
    }
}
