// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Step image loading and thumbnail generation.
//!
//! This module decodes images fetched from the image host into RGBA pixels
//! for display, and produces the downscaled JPEG uploaded alongside every
//! original.

use crate::config::ImageHostConfig;
use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;

/// Suffix of the downscaled copy of every uploaded image.
pub const THUMB_SUFFIX: &str = "_thumb";

/// Decoded image ready to become a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// URL of the displayed (thumbnail) version of `filename`.
pub fn image_url(host: &ImageHostConfig, filename: &str) -> String {
    format!("{}{}{}{}", host.origin, host.path_prefix, filename, THUMB_SUFFIX)
}

/// Decode encoded image bytes to RGBA8 pixels.
pub fn decode_rgba(bytes: &[u8]) -> Result<LoadedImage> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    let rgba = img.to_rgba8();
    Ok(LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Download and decode the displayed version of `filename`.
pub fn fetch_image(
    client: &reqwest::blocking::Client,
    host: &ImageHostConfig,
    filename: &str,
) -> Result<LoadedImage> {
    let url = image_url(host, filename);
    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("Failed to request {url}"))?
        .error_for_status()
        .with_context(|| format!("Image host refused {url}"))?;
    let bytes = response.bytes().context("Failed to read image body")?;
    decode_rgba(&bytes)
}

/// Size of a thumbnail whose longest side is at most `max_size`.
///
/// Aspect ratio is preserved and images already small enough keep their size.
pub fn thumbnail_dimensions(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    let scale = |long: u32, short: u32| -> (u32, u32) {
        if long <= max_size {
            (long, short)
        } else {
            let scaled = (short as f64 * max_size as f64 / long as f64).round() as u32;
            (max_size, scaled.max(1))
        }
    };
    if width > height {
        scale(width, height)
    } else {
        let (h, w) = scale(height, width);
        (w, h)
    }
}

/// Downscale an encoded image and re-encode it as JPEG.
pub fn make_thumbnail(bytes: &[u8], max_size: u32) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("Failed to decode image for thumbnail")?;
    let (width, height) = thumbnail_dimensions(img.width(), img.height(), max_size);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .context("Failed to encode thumbnail")?;
    Ok(out)
}

/// MIME type of encoded image bytes, defaulting to JPEG.
pub fn content_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_thumbnail_dimensions() {
        assert_eq!(thumbnail_dimensions(1600, 1200, 800), (800, 600));
        assert_eq!(thumbnail_dimensions(1200, 1600, 800), (600, 800));
        assert_eq!(thumbnail_dimensions(2000, 2000, 800), (800, 800));
        assert_eq!(thumbnail_dimensions(640, 480, 800), (640, 480));
        assert_eq!(thumbnail_dimensions(8000, 2, 800), (800, 1));
    }

    #[test]
    fn test_make_thumbnail_is_jpeg_within_bounds() {
        let thumb = make_thumbnail(&png_bytes(200, 100), 50).unwrap();
        assert_eq!(content_type(&thumb), "image/jpeg");

        let decoded = decode_rgba(&thumb).unwrap();
        assert_eq!((decoded.width, decoded.height), (50, 25));
        assert_eq!(decoded.pixels.len(), 50 * 25 * 4);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(&png_bytes(2, 2)), "image/png");
        assert_eq!(content_type(b"GIF89a...."), "image/gif");
        assert_eq!(content_type(b"unknown"), "image/jpeg");
    }

    #[test]
    fn test_image_url() {
        let host = ImageHostConfig::default();
        assert_eq!(image_url(&host, "abc"), "https://i.img.guide/file/img-guide/abc_thumb");
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(decode_rgba(b"not an image").is_err());
    }
}
