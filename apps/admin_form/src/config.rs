use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use cascade::CascadeText;
use client_core::{LookupEndpoint, DEFAULT_LOOKUP_PATH, DEFAULT_QUERY_PARAM};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "admin_form.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub lookup_path: String,
    pub query_param: String,
    pub request_timeout_ms: u64,
    pub alert_dismiss_secs: u64,
    pub text: CascadeText,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            lookup_path: DEFAULT_LOOKUP_PATH.into(),
            query_param: DEFAULT_QUERY_PARAM.into(),
            request_timeout_ms: 10_000,
            alert_dismiss_secs: 5,
            text: CascadeText::default(),
        }
    }
}

impl Settings {
    pub fn endpoint(&self) -> LookupEndpoint {
        LookupEndpoint {
            server_url: self.server_url.clone(),
            path: self.lookup_path.clone(),
            query_param: self.query_param.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn alert_dismiss_after(&self) -> Duration {
        Duration::from_secs(self.alert_dismiss_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    lookup_path: Option<String>,
    query_param: Option<String>,
    request_timeout_ms: Option<u64>,
    alert_dismiss_secs: Option<u64>,
    text: Option<CascadeText>,
}

/// Defaults, then the config file, then `APP__*` environment variables. An
/// explicit `path` must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.lookup_path {
        settings.lookup_path = v;
    }
    if let Some(v) = file_cfg.query_param {
        settings.query_param = v;
    }
    if let Some(v) = file_cfg.request_timeout_ms {
        settings.request_timeout_ms = v;
    }
    if let Some(v) = file_cfg.alert_dismiss_secs {
        settings.alert_dismiss_secs = v;
    }
    if let Some(v) = file_cfg.text {
        settings.text = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__LOOKUP_PATH") {
        settings.lookup_path = v;
    }
    if let Some(v) = var("APP__QUERY_PARAM") {
        settings.query_param = v;
    }
    if let Some(v) = var("APP__REQUEST_TIMEOUT_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_ms = parsed,
            Err(err) => tracing::warn!("ignoring APP__REQUEST_TIMEOUT_MS={v}: {err}"),
        }
    }
    if let Some(v) = var("APP__ALERT_DISMISS_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.alert_dismiss_secs = parsed,
            Err(err) => tracing::warn!("ignoring APP__ALERT_DISMISS_SECS={v}: {err}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
