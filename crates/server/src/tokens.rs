use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use shared::protocol::TokenPair;

use crate::registry::UserId;

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub token_type: TokenType,
    pub user_id: i64,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

fn mint(
    cfg: &TokenConfig,
    user_id: UserId,
    username: &str,
    token_type: TokenType,
    ttl_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_seconds);
    let claims = Claims {
        token_type,
        user_id: user_id.0,
        sub: username.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
}

/// Access and refresh tokens for a freshly registered account.
pub fn mint_token_pair(
    cfg: &TokenConfig,
    user_id: UserId,
    username: &str,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        refresh: mint(
            cfg,
            user_id,
            username,
            TokenType::Refresh,
            cfg.refresh_ttl_seconds,
        )?,
        access: mint(
            cfg,
            user_id,
            username,
            TokenType::Access,
            cfg.access_ttl_seconds,
        )?,
    })
}

#[cfg(test)]
#[path = "tests/tokens_tests.rs"]
mod tests;
