use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::RegistrationRequest,
    error::{FieldErrors, RegisterRejection},
    protocol::{RegisterResponse, ACCOUNT_CREATED_MESSAGE, REGISTER_PATH},
    validation::validate,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod registry;
mod tokens;

use app_state::AppState;
use config::load_settings;
use registry::UserRegistry;
use tokens::{mint_token_pair, TokenConfig};

type RegisterError = (StatusCode, Json<RegisterRejection>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let state = AppState {
        users: UserRegistry::new(),
        tokens: TokenConfig {
            secret: settings.jwt_secret,
            access_ttl_seconds: settings.access_ttl_seconds,
            refresh_ttl_seconds: settings.refresh_ttl_seconds,
        },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, path = REGISTER_PATH, "register server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(REGISTER_PATH, post(register))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), RegisterError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "malformed register body");
        (
            StatusCode::BAD_REQUEST,
            Json(RegisterRejection::from_error(rejection.body_text())),
        )
    })?;

    let errors: FieldErrors = match validate(&request) {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.to_field_errors(),
    };

    let stored = state
        .users
        .register(&request, errors)
        .await
        .map_err(|errors| {
            info!(
                username = %request.username,
                fields = ?errors.keys().collect::<Vec<_>>(),
                "registration rejected"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(RegisterRejection::from_field_errors(errors)),
            )
        })?;

    let tokens = mint_token_pair(&state.tokens, stored.user_id, &stored.user.username)
        .map_err(|e| {
            error!(error = %e, "failed to mint registration tokens");
            (
                StatusCode::BAD_REQUEST,
                Json(RegisterRejection::from_error(e.to_string())),
            )
        })?;

    info!(user_id = stored.user_id.0, username = %stored.user.username, "account created");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            tokens,
            message: ACCOUNT_CREATED_MESSAGE.to_string(),
            user: stored.user,
        }),
    ))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
