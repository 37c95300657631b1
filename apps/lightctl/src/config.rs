use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use light_client::RoomPolicy;
use serde::Deserialize;
use shared::domain::{default_rooms, Room};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "lightctl.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint_url: String,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub require_room_for_modes: bool,
    pub rooms: Vec<Room>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:5001/api/led/color".into(),
            debounce_ms: 300,
            request_timeout_secs: 5,
            require_room_for_modes: true,
            rooms: default_rooms(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint_url: Option<String>,
    debounce_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    require_room_for_modes: Option<bool>,
    rooms: Option<Vec<Room>>,
}

impl Settings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn room_policy(&self) -> RoomPolicy {
        if self.require_room_for_modes {
            RoomPolicy::Required
        } else {
            RoomPolicy::Optional
        }
    }

    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.endpoint_url)
            .with_context(|| format!("invalid endpoint url '{}'", self.endpoint_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("endpoint url must start with http:// or https://");
        }
        Ok(url)
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.endpoint_url {
            self.endpoint_url = v;
        }
        if let Some(v) = file_cfg.debounce_ms {
            self.debounce_ms = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.require_room_for_modes {
            self.require_room_for_modes = v;
        }
        if let Some(rooms) = file_cfg.rooms.filter(|rooms| !rooms.is_empty()) {
            self.rooms = rooms;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("LIGHT_ENDPOINT_URL") {
            self.endpoint_url = v;
        }
        if let Some(v) = var("APP__ENDPOINT_URL") {
            self.endpoint_url = v;
        }

        if let Some(v) = var("APP__DEBOUNCE_MS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.debounce_ms = parsed;
            }
        }
        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
    }
}

fn parse_file_settings(raw: &str) -> anyhow::Result<FileSettings> {
    toml::from_str(raw).context("failed to parse lightctl config")
}

/// Defaults, then the TOML file (if present), then environment overrides.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = parse_file_settings(&raw)
                .with_context(|| format!("in config file '{}'", path.display()))?;
            settings.apply_file(file_cfg);
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
