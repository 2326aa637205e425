use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{
    domain::RegistrationRequest, error::RegisterRejection, protocol::RegisterResponse,
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod config;
pub mod form;

pub use config::{load_settings, ClientSettings};
pub use form::{FieldState, FormEvent, FormPhase, RegistrationForm, SubmitAttempt};
pub use reqwest::StatusCode;

/// The only failure text ever shown to the user, whatever the cause.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something Went Wrong";
pub const SIGNUP_SUCCESS_MESSAGE: &str = "Signup successful! Proceed to Login Page";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("register request could not be sent: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("register request rejected with status {status}")]
    Rejected {
        status: StatusCode,
        rejection: Option<RegisterRejection>,
    },
}

impl SubmitError {
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }

    pub fn rejection(&self) -> Option<&RegisterRejection> {
        match self {
            SubmitError::Rejected { rejection, .. } => rejection.as_ref(),
            SubmitError::Transport(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Any 2xx. The body is kept when it decodes as a register response.
    Success(Option<RegisterResponse>),
    Failure(SubmitError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success(_))
    }

    /// Message for the result banner.
    pub fn message(&self) -> &'static str {
        match self {
            SubmitOutcome::Success(_) => SIGNUP_SUCCESS_MESSAGE,
            SubmitOutcome::Failure(err) => err.user_message(),
        }
    }
}

#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Sends one registration. The request is consumed; nothing is retried.
    async fn submit(&self, request: RegistrationRequest) -> SubmitOutcome;
}

pub struct RegistrationClient {
    http: Client,
    register_url: String,
}

impl RegistrationClient {
    pub fn new(register_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            register_url: register_url.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.register_url.clone())
    }

    pub fn register_url(&self) -> &str {
        &self.register_url
    }
}

#[async_trait]
impl RegistrationApi for RegistrationClient {
    async fn submit(&self, request: RegistrationRequest) -> SubmitOutcome {
        debug!(url = %self.register_url, payload = ?request, "submitting registration");

        let response = match self
            .http
            .post(&self.register_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %self.register_url, error = %err, "registration request failed");
                return SubmitOutcome::Failure(SubmitError::Transport(err));
            }
        };

        let status = response.status();
        if status.is_success() {
            let body = response.json::<RegisterResponse>().await.ok();
            info!(%status, username = %request.username, "registration accepted");
            return SubmitOutcome::Success(body);
        }

        let rejection = response.json::<RegisterRejection>().await.ok();
        warn!(%status, ?rejection, "registration rejected");
        SubmitOutcome::Failure(SubmitError::Rejected { status, rejection })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
