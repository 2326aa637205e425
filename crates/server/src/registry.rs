use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::{
    domain::{Field, RegistrationRequest},
    error::FieldErrors,
    protocol::RegisteredUser,
};
use tokio::sync::RwLock;

pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with that email already exists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user_id: UserId,
    pub user: RegisteredUser,
}

#[derive(Default)]
struct Accounts {
    next_id: i64,
    by_username: HashMap<String, StoredUser>,
}

/// In-memory account table for local development.
#[derive(Default)]
pub struct UserRegistry {
    accounts: RwLock<Accounts>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds uniqueness violations to `errors` and inserts the account when none remain.
    ///
    /// Checking and inserting happen under one write lock, so two racing
    /// registrations of the same username cannot both succeed.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
        mut errors: FieldErrors,
    ) -> Result<StoredUser, FieldErrors> {
        let mut accounts = self.accounts.write().await;

        if accounts.by_username.contains_key(&request.username) {
            push_error(&mut errors, Field::Username, DUPLICATE_USERNAME_MESSAGE);
        }
        if accounts
            .by_username
            .values()
            .any(|stored| stored.user.email.eq_ignore_ascii_case(&request.email))
        {
            push_error(&mut errors, Field::Email, DUPLICATE_EMAIL_MESSAGE);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        accounts.next_id += 1;
        let stored = StoredUser {
            user_id: UserId(accounts.next_id),
            user: RegisteredUser::from(request),
        };
        accounts
            .by_username
            .insert(request.username.clone(), stored.clone());
        Ok(stored)
    }

    #[cfg(test)]
    pub async fn find_by_username(&self, username: &str) -> Option<StoredUser> {
        self.accounts.read().await.by_username.get(username).cloned()
    }

    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.accounts.read().await.by_username.len()
    }
}

fn push_error(errors: &mut FieldErrors, field: Field, message: &str) {
    errors
        .entry(field.as_str().to_string())
        .or_default()
        .push(message.to_string());
}
