use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

pub const SETTINGS_FILE: &str = "server.toml";
/// Upper bound for token lifetimes; keeps expiry arithmetic in range.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub jwt_secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            jwt_secret: "devsecret".into(),
            access_ttl_seconds: 5 * 60,
            refresh_ttl_seconds: 24 * 60 * 60,
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("jwt_secret") {
                settings.jwt_secret = v.clone();
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("JWT_SECRET") {
        settings.jwt_secret = v;
    }
    if let Some(v) = env("APP__JWT_SECRET") {
        settings.jwt_secret = v;
    }

    if let Some(parsed) = env("APP__ACCESS_TTL_SECONDS").and_then(|v| parse_ttl(&v)) {
        settings.access_ttl_seconds = parsed;
    }
    if let Some(parsed) = env("APP__REFRESH_TTL_SECONDS").and_then(|v| parse_ttl(&v)) {
        settings.refresh_ttl_seconds = parsed;
    }

    settings
}

/// Positive lifetimes up to [`MAX_TOKEN_TTL_SECONDS`]; anything else keeps the default.
fn parse_ttl(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|ttl| (1..=MAX_TOKEN_TTL_SECONDS).contains(ttl))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
