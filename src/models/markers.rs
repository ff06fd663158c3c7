// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker overlay data structures.
//!
//! Markers are shapes drawn over a step image. Their state is stored in the
//! image record as a JSON blob so the markup survives a reload.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A 2D point with normalized coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Shape of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Rectangle,
    Ellipse,
    Arrow,
    Freehand,
}

impl MarkerKind {
    /// Shapes defined by a start and end point rather than a stroke path.
    pub fn is_two_point(self) -> bool {
        !matches!(self, MarkerKind::Freehand)
    }
}

/// A single shape drawn on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Hex color, `#rrggbb`.
    pub color: String,
    pub points: Vec<Point>,
}

impl Marker {
    /// Create a new marker starting at `origin`.
    pub fn new(kind: MarkerKind, color: impl Into<String>, origin: Point) -> Self {
        Self {
            kind,
            color: color.into(),
            points: vec![origin],
        }
    }

    /// Extend the marker to `point`.
    ///
    /// Two-point shapes keep only their start point and the latest end point.
    pub fn extend_to(&mut self, point: Point) {
        if self.kind.is_two_point() {
            self.points.truncate(1);
        }
        self.points.push(point);
    }

    /// A marker needs at least two points to be drawn.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= 2
    }
}

/// All markers drawn on one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerState {
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl MarkerState {
    /// Read marker state from an image's marker blob.
    ///
    /// `{}` and `null` are empty state. Anything else that does not match the
    /// marker shape is an error so the caller can leave the blob untouched.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(map) if map.is_empty() => Ok(Self::default()),
            other => serde_json::from_value(other.clone()).context("Unrecognized marker state"),
        }
    }

    /// Serialize to the blob stored in the image record.
    pub fn to_value(&self) -> serde_json::Value {
        if self.markers.is_empty() {
            return serde_json::Value::Object(serde_json::Map::new());
        }
        serde_json::json!({ "markers": self.markers })
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_blobs_are_empty_state() {
        assert!(MarkerState::from_value(&serde_json::json!({})).unwrap().is_empty());
        assert!(MarkerState::from_value(&serde_json::Value::Null).unwrap().is_empty());
        assert_eq!(MarkerState::default().to_value(), serde_json::json!({}));
    }

    #[test]
    fn test_unrecognized_blob_is_error() {
        let foreign = serde_json::json!({ "markers": "not a list", "width": 640 });
        assert!(MarkerState::from_value(&foreign).is_err());
        assert!(MarkerState::from_value(&serde_json::json!({ "width": 640 })).is_err());
    }

    #[test]
    fn test_state_survives_image_blob() {
        let mut marker = Marker::new(MarkerKind::Arrow, "#ff0000", Point::new(0.1, 0.2));
        marker.extend_to(Point::new(0.5, 0.5));
        let state = MarkerState { markers: vec![marker] };

        let blob = state.to_value();
        assert_eq!(blob["markers"][0]["kind"], "arrow");
        assert_eq!(MarkerState::from_value(&blob).unwrap(), state);
    }

    #[test]
    fn test_two_point_marker_keeps_latest_end() {
        let mut marker = Marker::new(MarkerKind::Rectangle, "#00ff00", Point::new(0.0, 0.0));
        assert!(!marker.is_complete());
        marker.extend_to(Point::new(0.2, 0.2));
        marker.extend_to(Point::new(0.4, 0.3));
        assert_eq!(marker.points.len(), 2);
        assert_eq!(marker.points[1], Point::new(0.4, 0.3));
    }

    #[test]
    fn test_freehand_marker_accumulates_points() {
        let mut marker = Marker::new(MarkerKind::Freehand, "#0000ff", Point::new(0.0, 0.0));
        for i in 1..=5 {
            marker.extend_to(Point::new(i as f64 * 0.1, 0.0));
        }
        assert_eq!(marker.points.len(), 6);
    }
}
