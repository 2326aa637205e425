use serde::{Deserialize, Serialize};

use crate::domain::RegistrationRequest;

pub const REGISTER_PATH: &str = "/api/users/register/";
pub const ACCOUNT_CREATED_MESSAGE: &str = "Your account has been created successfully!";
pub const ACCOUNT_NOT_CREATED_MESSAGE: &str = "Account not created!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Public view of a registered account; never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl From<&RegistrationRequest> for RegisteredUser {
    fn from(value: &RegistrationRequest) -> Self {
        Self {
            first_name: value.first_name.clone(),
            last_name: value.last_name.clone(),
            username: value.username.clone(),
            email: value.email.clone(),
        }
    }
}

/// `201 Created` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub tokens: TokenPair,
    pub message: String,
    pub user: RegisteredUser,
}
