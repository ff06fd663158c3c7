// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings and API credentials.
//!
//! Settings live in `settings.toml` under the platform config directory.
//! Credentials for saving guides live next to it in `credentials.toml`, and
//! environment variables of the same name take precedence over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "guidebook";
const CONFIG_FILE: &str = "settings.toml";
const CREDENTIALS_FILE: &str = "credentials.toml";

pub const API_KEY_VAR: &str = "KUBESAIL_API_KEY";
pub const API_SECRET_VAR: &str = "KUBESAIL_API_SECRET";

pub const DEFAULT_API_ORIGIN: &str = "https://api.kubesail.com";
pub const DEFAULT_IMAGE_ORIGIN: &str = "https://i.img.guide";
pub const DEFAULT_IMAGE_PATH_PREFIX: &str = "/file/img-guide/";
pub const DEFAULT_UPLOAD_URL: &str = "https://i.img.guide/upload";
pub const DEFAULT_THUMBNAIL_MAX_SIZE: u32 = 800;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin of the guide API.
    pub api_origin: String,
    /// Longest side of uploaded thumbnails, in pixels.
    pub thumbnail_max_size: u32,
    pub request_timeout_secs: u64,
    pub images: ImageHostConfig,
    pub upload: UploadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            thumbnail_max_size: DEFAULT_THUMBNAIL_MAX_SIZE,
            request_timeout_secs: 30,
            images: ImageHostConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

/// Where step images are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageHostConfig {
    pub origin: String,
    pub path_prefix: String,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_IMAGE_ORIGIN.to_string(),
            path_prefix: DEFAULT_IMAGE_PATH_PREFIX.to_string(),
        }
    }
}

/// Where new images are uploaded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub url: String,
    /// Value of the `authorization` header sent with uploads.
    pub authorization_token: Option<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPLOAD_URL.to_string(),
            authorization_token: None,
        }
    }
}

/// API key and secret used to save guides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "KUBESAIL_API_KEY", default)]
    pub api_key: Option<String>,
    #[serde(rename = "KUBESAIL_API_SECRET", default)]
    pub api_secret: Option<String>,
}

impl Credentials {
    /// Both values, if both are present and non-empty.
    pub fn pair(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().filter(|v| !v.is_empty())?;
        let secret = self.api_secret.as_deref().filter(|v| !v.is_empty())?;
        Some((key, secret))
    }

    /// Overlay values from the environment, which win over the file.
    fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_VAR) {
            self.api_key = Some(key);
        }
        if let Some(secret) = lookup(API_SECRET_VAR) {
            self.api_secret = Some(secret);
        }
        self
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|path| path.join(APP_NAME))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Load settings from `path`, or the default location when `None`.
///
/// A missing file yields defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };
    if !path.exists() {
        log::info!("No settings at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize settings")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;
    Ok(())
}

/// Load credentials from the default location plus the environment.
pub fn load_credentials() -> Result<Credentials> {
    let from_file = match config_dir().map(|dir| dir.join(CREDENTIALS_FILE)) {
        Some(path) if path.exists() => load_credentials_from_path(&path)?,
        _ => Credentials::default(),
    };
    Ok(from_file.with_env(|name| std::env::var(name).ok()))
}

pub fn load_credentials_from_path(path: &Path) -> Result<Credentials> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse credentials in {}", path.display()))
}
