// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image upload to the image host.
//!
//! Every picked file is uploaded twice: the original bytes, and a downscaled
//! JPEG stored under the same name with a `_thumb` suffix. The image record
//! is only added to the guide once both copies are stored.

use crate::config::{Config, UploadConfig};
use crate::io::media::{self, THUMB_SUFFIX};
use crate::models::guide::Image;
use sha1::{Digest, Sha1};
use std::path::Path;
use thiserror::Error;

/// Errors from uploading an image.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no upload authorization token configured")]
    MissingAuthorization,
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build thumbnail: {0}")]
    Thumbnail(String),
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("image host rejected {filename} with status {status}")]
    Status { filename: String, status: u16 },
    #[error("upload worker panicked")]
    Worker,
}

/// One file to send to the image host.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: &'static str,
    /// Lowercase hex SHA-1 of `body`.
    pub sha1: String,
    pub body: Vec<u8>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, body: Vec<u8>, content_type: &'static str) -> Self {
        let sha1 = format!("{:x}", Sha1::digest(&body));
        Self {
            filename: filename.into(),
            content_type,
            sha1,
            body,
        }
    }

    /// Header name/value pairs sent with the upload.
    pub fn headers(&self, authorization: &str) -> Vec<(&'static str, String)> {
        vec![
            ("authorization", authorization.to_string()),
            ("x-bz-file-name", self.filename.clone()),
            ("x-bz-content-sha1", self.sha1.clone()),
            ("content-type", self.content_type.to_string()),
            ("content-length", self.body.len().to_string()),
        ]
    }
}

/// The pair of files produced for one picked image.
#[derive(Debug, Clone)]
pub struct UploadPair {
    pub original: UploadRequest,
    pub thumbnail: UploadRequest,
}

impl UploadPair {
    /// Build the original and thumbnail uploads for `bytes` under `filename`.
    pub fn build(filename: &str, bytes: Vec<u8>, max_size: u32) -> Result<Self, UploadError> {
        let thumb = media::make_thumbnail(&bytes, max_size)
            .map_err(|e| UploadError::Thumbnail(format!("{e:#}")))?;
        let content_type = media::content_type(&bytes);
        Ok(Self {
            original: UploadRequest::new(filename, bytes, content_type),
            thumbnail: UploadRequest::new(format!("{filename}{THUMB_SUFFIX}"), thumb, "image/jpeg"),
        })
    }
}

/// Send one file to the image host.
pub fn upload(
    client: &reqwest::blocking::Client,
    config: &UploadConfig,
    request: UploadRequest,
) -> Result<(), UploadError> {
    let token = config
        .authorization_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(UploadError::MissingAuthorization)?;

    let mut builder = client.post(&config.url);
    for (name, value) in request.headers(token) {
        builder = builder.header(name, value);
    }
    let filename = request.filename.clone();
    let response = builder.body(request.body).send()?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(UploadError::Status { filename, status });
    }
    // The host replies with file metadata we have no use for.
    let _: serde_json::Value = response.json()?;
    log::info!("Uploaded {}", filename);
    Ok(())
}

/// Read `path`, upload it and its thumbnail in parallel, and produce the new image record.
pub fn upload_image_file(
    client: &reqwest::blocking::Client,
    config: &Config,
    path: &Path,
) -> Result<Image, UploadError> {
    if config.upload.authorization_token.as_deref().map_or(true, str::is_empty) {
        return Err(UploadError::MissingAuthorization);
    }
    let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let filename = uuid::Uuid::new_v4().to_string();
    let pair = UploadPair::build(&filename, bytes, config.thumbnail_max_size)?;
    log::info!(
        "Uploading {} as {} ({} bytes, thumbnail {} bytes)",
        path.display(),
        filename,
        pair.original.body.len(),
        pair.thumbnail.body.len()
    );

    let (original, thumbnail) = std::thread::scope(|scope| {
        let original = scope.spawn(|| upload(client, &config.upload, pair.original));
        let thumbnail = scope.spawn(|| upload(client, &config.upload, pair.thumbnail));
        (original.join(), thumbnail.join())
    });
    original.map_err(|_| UploadError::Worker)??;
    thumbnail.map_err(|_| UploadError::Worker)??;

    Ok(Image::new(filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_sha1_of_body() {
        let request = UploadRequest::new("abc", b"abc".to_vec(), "image/jpeg");
        assert_eq!(request.sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_headers() {
        let request = UploadRequest::new("f00d", vec![1, 2, 3, 4], "image/png");
        let headers = request.headers("token-123");

        assert!(headers.contains(&("authorization", "token-123".to_string())));
        assert!(headers.contains(&("x-bz-file-name", "f00d".to_string())));
        assert!(headers.contains(&("content-type", "image/png".to_string())));
        assert!(headers.contains(&("content-length", "4".to_string())));
    }

    #[test]
    fn test_pair_names_and_types() {
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(1000, 500, Rgb([1, 2, 3])))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let pair = UploadPair::build("cafe", png.clone(), 800).unwrap();
        assert_eq!(pair.original.filename, "cafe");
        assert_eq!(pair.original.content_type, "image/png");
        assert_eq!(pair.original.body, png);
        assert_eq!(pair.thumbnail.filename, "cafe_thumb");
        assert_eq!(pair.thumbnail.content_type, "image/jpeg");

        let thumb = media::decode_rgba(&pair.thumbnail.body).unwrap();
        assert_eq!((thumb.width, thumb.height), (800, 400));
    }

    #[test]
    fn test_pair_rejects_non_image() {
        assert!(matches!(
            UploadPair::build("x", b"plain text".to_vec(), 800),
            Err(UploadError::Thumbnail(_))
        ));
    }

    #[test]
    fn test_missing_token_fails_before_reading() {
        let config = Config::default();
        let client = reqwest::blocking::Client::new();
        let result = upload_image_file(&client, &config, Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(UploadError::MissingAuthorization)));
    }
}
