use super::{load_settings_from, Settings, MAX_TOKEN_TTL_SECONDS};

use std::{
    env, fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn defaults_match_local_register_host() {
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), |_| None);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_bind, "127.0.0.1:8000");
}

#[test]
fn environment_overrides_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("signup_server_settings_{suffix}.toml"));
    fs::write(&path, "bind_addr = \"0.0.0.0:9000\"\njwt_secret = \"from-file\"\n")
        .expect("write settings");

    let from_file = load_settings_from(&path, |_| None);
    assert_eq!(from_file.server_bind, "0.0.0.0:9000");
    assert_eq!(from_file.jwt_secret, "from-file");

    let from_env = load_settings_from(&path, |key| match key {
        "APP__JWT_SECRET" => Some("from-env".to_string()),
        "APP__ACCESS_TTL_SECONDS" => Some("not-a-number".to_string()),
        _ => None,
    });
    assert_eq!(from_env.server_bind, "0.0.0.0:9000");
    assert_eq!(from_env.jwt_secret, "from-env");
    assert_eq!(
        from_env.access_ttl_seconds,
        Settings::default().access_ttl_seconds
    );

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn out_of_range_token_lifetimes_keep_defaults() {
    let defaults = Settings::default();
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), |key| match key {
        "APP__ACCESS_TTL_SECONDS" => Some("-60".to_string()),
        "APP__REFRESH_TTL_SECONDS" => Some(i64::MAX.to_string()),
        _ => None,
    });
    assert_eq!(settings.access_ttl_seconds, defaults.access_ttl_seconds);
    assert_eq!(settings.refresh_ttl_seconds, defaults.refresh_ttl_seconds);

    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), |key| match key {
        "APP__ACCESS_TTL_SECONDS" => Some("0".to_string()),
        "APP__REFRESH_TTL_SECONDS" => Some(MAX_TOKEN_TTL_SECONDS.to_string()),
        _ => None,
    });
    assert_eq!(settings.access_ttl_seconds, defaults.access_ttl_seconds);
    assert_eq!(settings.refresh_ttl_seconds, MAX_TOKEN_TTL_SECONDS);
}
