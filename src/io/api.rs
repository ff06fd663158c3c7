// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Guide API client: fetching a guide by slug and saving it back.

use crate::config::{Config, Credentials};
use crate::models::guide::Guide;
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Response envelope of the guide endpoint.
#[derive(Debug, Deserialize)]
struct GuideEnvelope {
    data: Guide,
}

/// Body of a save request.
#[derive(Debug, Serialize)]
struct SaveBody<'a> {
    slug: &'a str,
    data: &'a Guide,
}

/// What a guide fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded(Guide),
    /// A placeholder document describing the failure.
    Failed(Guide),
}

impl FetchOutcome {
    pub fn into_guide(self) -> Guide {
        match self {
            FetchOutcome::Loaded(guide) | FetchOutcome::Failed(guide) => guide,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }
}

/// Errors from saving a guide.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("KUBESAIL_API_KEY or KUBESAIL_API_SECRET not defined")]
    MissingCredentials,
    #[error("no guide is loaded")]
    NoSlug,
    #[error("save request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server rejected save with status {0}")]
    Status(u16),
}

/// A validated save, ready to send.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub url: String,
    pub slug: String,
    pub api_key: String,
    pub api_secret: String,
    pub guide: Guide,
}

pub fn guide_url(config: &Config, slug: &str) -> String {
    format!("{}/pibox/guides/{}", config.api_origin, slug)
}

pub fn save_url(config: &Config) -> String {
    format!("{}/admin/pibox/guides", config.api_origin)
}

/// Build the blocking HTTP client used for every request.
pub fn http_client(config: &Config) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Turn a guide response into the document to display.
///
/// The body is parsed before the status is looked at, so an unparsable body
/// reports a parse failure whatever the status.
pub fn interpret_guide_response(status: u16, body: &str) -> FetchOutcome {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Guide response is not JSON: {}", e);
            return FetchOutcome::Failed(Guide::failed("Failed to parse JSON"));
        }
    };
    if status != 200 {
        return FetchOutcome::Failed(Guide::failed(format!("Guide not found ({status})")));
    }
    match serde_json::from_value::<GuideEnvelope>(value) {
        Ok(envelope) => FetchOutcome::Loaded(envelope.data),
        Err(e) => {
            log::warn!("Guide response has unexpected shape: {}", e);
            FetchOutcome::Failed(Guide::failed("Failed to parse JSON"))
        }
    }
}

/// Fetch the guide for `slug`.
///
/// Never fails: transport errors become a placeholder document too.
pub fn fetch_guide(client: &reqwest::blocking::Client, config: &Config, slug: &str) -> FetchOutcome {
    let url = guide_url(config, slug);
    log::info!("Fetching guide from {}", url);

    let response = client
        .get(&url)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .and_then(|response| {
            let status = response.status().as_u16();
            response.text().map(|body| (status, body))
        });

    match response {
        Ok((status, body)) => interpret_guide_response(status, &body),
        Err(e) => {
            log::error!("Guide request to {} failed: {}", url, e);
            FetchOutcome::Failed(Guide::failed(format!("Request failed: {e}")))
        }
    }
}

/// Check that a save can be attempted without touching the network.
pub fn prepare_save(
    config: &Config,
    credentials: &Credentials,
    slug: Option<&str>,
    guide: &Guide,
) -> Result<SaveRequest, SaveError> {
    let (api_key, api_secret) = credentials.pair().ok_or(SaveError::MissingCredentials)?;
    let slug = slug.ok_or(SaveError::NoSlug)?;
    Ok(SaveRequest {
        url: save_url(config),
        slug: slug.to_string(),
        api_key: api_key.to_string(),
        api_secret: api_secret.to_string(),
        guide: guide.clone(),
    })
}

/// POST the whole document with basic authentication.
pub fn send_save(client: &reqwest::blocking::Client, request: &SaveRequest) -> Result<(), SaveError> {
    let body = SaveBody {
        slug: &request.slug,
        data: &request.guide,
    };
    let response = client
        .post(&request.url)
        .basic_auth(&request.api_key, Some(&request.api_secret))
        .json(&body)
        .send()?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(SaveError::Status(status));
    }
    log::info!("Saved guide {} ({} steps)", request.slug, request.guide.steps.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guide::FAILED_TITLE;

    const BODY: &str = r#"{
        "data": {
            "title": "PiBox setup",
            "steps": [
                {"title": "Plug in", "images": [], "lines": []},
                {"title": "Boot", "images": [{"filename": "boot", "markers": {}}],
                 "lines": [{"color": "red", "text": "Wait for the LED"}]}
            ]
        }
    }"#;

    #[test]
    fn test_ok_response_loads_guide() {
        let outcome = interpret_guide_response(200, BODY);
        assert!(outcome.is_loaded());

        let guide = outcome.into_guide();
        assert_eq!(guide.title, "PiBox setup");
        assert_eq!(guide.steps.len(), 2);
        assert_eq!(guide.steps[1].lines[0].text, "Wait for the LED");
    }

    #[test]
    fn test_non_200_is_not_found_placeholder() {
        let guide = interpret_guide_response(404, r#"{"error": "nope"}"#).into_guide();
        assert_eq!(guide.title, FAILED_TITLE);
        assert!(guide.steps.is_empty());
        assert_eq!(guide.description.as_deref(), Some("Guide not found (404)"));
    }

    #[test]
    fn test_unparsable_body_is_parse_failure() {
        for status in [200, 500] {
            let guide = interpret_guide_response(status, "<html>oops</html>").into_guide();
            assert_eq!(guide.title, FAILED_TITLE);
            assert_eq!(guide.description.as_deref(), Some("Failed to parse JSON"));
        }
    }

    #[test]
    fn test_wrong_shape_is_parse_failure() {
        let outcome = interpret_guide_response(200, r#"{"data": {"steps": 3}}"#);
        assert!(!outcome.is_loaded());
        assert_eq!(outcome.into_guide().description.as_deref(), Some("Failed to parse JSON"));
    }

    #[test]
    fn test_save_without_credentials_is_rejected() {
        let config = Config::default();
        let guide = Guide::loading();

        let err = prepare_save(&config, &Credentials::default(), Some("pibox"), &guide).unwrap_err();
        assert!(matches!(err, SaveError::MissingCredentials));
        assert_eq!(err.to_string(), "KUBESAIL_API_KEY or KUBESAIL_API_SECRET not defined");

        let half = Credentials { api_key: Some("key".to_string()), api_secret: None };
        assert!(matches!(
            prepare_save(&config, &half, Some("pibox"), &guide),
            Err(SaveError::MissingCredentials)
        ));
    }

    #[test]
    fn test_prepare_save() {
        let creds = Credentials {
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
        };
        let guide = interpret_guide_response(200, BODY).into_guide();
        let request = prepare_save(&Config::default(), &creds, Some("pibox"), &guide).unwrap();

        assert_eq!(request.url, "https://api.kubesail.com/admin/pibox/guides");
        assert_eq!(request.slug, "pibox");
        assert_eq!(request.guide, guide);

        assert!(matches!(
            prepare_save(&Config::default(), &creds, None, &guide),
            Err(SaveError::NoSlug)
        ));
    }

    #[test]
    fn test_save_body_shape() {
        let guide = Guide::loading();
        let body = serde_json::to_value(SaveBody { slug: "pibox", data: &guide }).unwrap();
        assert_eq!(body["slug"], "pibox");
        assert_eq!(body["data"]["title"], "Loading...");
    }

    #[test]
    fn test_urls() {
        let config = Config::default();
        assert_eq!(guide_url(&config, "ssd"), "https://api.kubesail.com/pibox/guides/ssd");
    }
}
