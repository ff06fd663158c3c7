// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Conversions between screen positions inside a displayed image and the
//! normalized coordinates markers are stored in.

use crate::models::markers::Point;

/// Convert a screen position inside `rect` to normalized coordinates, clamped to 0..1.
pub fn normalize_in_rect(pos: egui::Pos2, rect: egui::Rect) -> Point {
    let x = ((pos.x - rect.min.x) / rect.width()).clamp(0.0, 1.0);
    let y = ((pos.y - rect.min.y) / rect.height()).clamp(0.0, 1.0);
    Point::new(x as f64, y as f64)
}

/// Convert normalized coordinates to a screen position inside `rect`.
pub fn denormalize_in_rect(point: &Point, rect: egui::Rect) -> egui::Pos2 {
    egui::pos2(
        rect.min.x + point.x as f32 * rect.width(),
        rect.min.y + point.y as f32 * rect.height(),
    )
}

/// Largest size with the image's aspect ratio that fits in `available`.
pub fn fit_size(image_size: (u32, u32), available: egui::Vec2) -> egui::Vec2 {
    let (width, height) = image_size;
    if width == 0 || height == 0 {
        return egui::Vec2::ZERO;
    }
    let img_aspect = width as f32 / height as f32;
    let available_aspect = available.x / available.y;
    if img_aspect > available_aspect {
        // Image is wider - fit to width
        egui::vec2(available.x, available.x / img_aspect)
    } else {
        // Image is taller - fit to height
        egui::vec2(available.y * img_aspect, available.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(800.0, 600.0));
        let pos = egui::pos2(500.0, 350.0);

        let normalized = normalize_in_rect(pos, rect);
        let back = denormalize_in_rect(&normalized, rect);

        assert!((back.x - pos.x).abs() < 0.001);
        assert!((back.y - pos.y).abs() < 0.001);
    }

    #[test]
    fn test_normalize_clamps_outside_positions() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));

        // Top-left corner
        let tl = normalize_in_rect(egui::pos2(-20.0, -5.0), rect);
        assert_eq!(tl, Point::new(0.0, 0.0));

        // Bottom-right corner
        let br = normalize_in_rect(egui::pos2(150.0, 100.0), rect);
        assert_eq!(br, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_fit_size() {
        let wide = fit_size((1600, 800), egui::vec2(400.0, 400.0));
        assert_eq!(wide, egui::vec2(400.0, 200.0));

        let tall = fit_size((600, 1200), egui::vec2(400.0, 400.0));
        assert_eq!(tall, egui::vec2(200.0, 400.0));

        assert_eq!(fit_size((0, 10), egui::vec2(400.0, 400.0)), egui::Vec2::ZERO);
    }
}
