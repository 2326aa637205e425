use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use shared::protocol::REGISTER_PATH;

pub const SETTINGS_FILE: &str = "signup.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub register_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            register_url: format!("http://127.0.0.1:8000{REGISTER_PATH}"),
        }
    }
}

/// Defaults, then `signup.toml`, then the process environment.
pub fn load_settings() -> anyhow::Result<ClientSettings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("register_url") {
                    settings.register_url = v.clone();
                }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("SIGNUP_REGISTER_URL") {
        settings.register_url = v;
    }
    if let Some(v) = env("APP__REGISTER_URL") {
        settings.register_url = v;
    }

    settings.register_url = normalize_register_url(&settings.register_url)?;
    Ok(settings)
}

pub fn normalize_register_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("invalid register url '{raw}'"))?;

    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => bail!("register url '{raw}' must use http or https, got '{other}'"),
    }
}
