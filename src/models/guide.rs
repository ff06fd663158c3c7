// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Guide document data structures.
//!
//! A guide is a title plus an ordered list of steps. Each step carries its
//! images, its bulleted lines, and the index of the image currently on display.

use serde::{Deserialize, Serialize};

/// Title shown while the first fetch is in flight.
pub const LOADING_TITLE: &str = "Loading...";

/// Title shown when a guide could not be loaded.
pub const FAILED_TITLE: &str = "Failed to load guide.";

/// The top-level guide document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub title: String,
    /// Only set on placeholder documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Guide {
    /// Placeholder displayed before the guide arrives.
    pub fn loading() -> Self {
        Self {
            title: LOADING_TITLE.to_string(),
            description: None,
            steps: Vec::new(),
        }
    }

    /// Placeholder displayed when loading failed.
    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            title: FAILED_TITLE.to_string(),
            description: Some(description.into()),
            steps: Vec::new(),
        }
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_mut(&mut self, index: usize) -> Option<&mut Step> {
        self.steps.get_mut(index)
    }
}

impl Default for Guide {
    fn default() -> Self {
        Self::loading()
    }
}

/// One instructional stage of a guide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub lines: Vec<Line>,
    /// Index into `images` of the thumbnail currently displayed.
    #[serde(skip)]
    pub selected_image: usize,
}

impl Step {
    /// Index of the image to display, falling back to the first image.
    pub fn displayed_index(&self) -> Option<usize> {
        if self.images.is_empty() {
            None
        } else if self.selected_image < self.images.len() {
            Some(self.selected_image)
        } else {
            Some(0)
        }
    }

    /// The image to display, if the step has any.
    pub fn displayed_image(&self) -> Option<&Image> {
        self.displayed_index().and_then(|i| self.images.get(i))
    }
}

/// An image reference with its marker overlay state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub filename: String,
    #[serde(default = "empty_markers")]
    pub markers: serde_json::Value,
}

impl Image {
    /// Image record for a freshly uploaded file.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            markers: empty_markers(),
        }
    }
}

fn empty_markers() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A bulleted annotation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub color: String,
    pub text: String,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_arrays() {
        let json = r#"{"title": "Setup", "steps": [{"title": "Unbox"}]}"#;
        let guide: Guide = serde_json::from_str(json).unwrap();

        assert_eq!(guide.title, "Setup");
        assert_eq!(guide.steps.len(), 1);
        assert!(guide.steps[0].images.is_empty());
        assert!(guide.steps[0].lines.is_empty());
        assert_eq!(guide.description, None);
    }

    #[test]
    fn test_selected_image_not_serialized() {
        let mut step = Step {
            title: "Wire it".to_string(),
            images: vec![Image::new("a"), Image::new("b")],
            lines: Vec::new(),
            selected_image: 1,
        };
        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("selected_image").is_none());

        step = serde_json::from_value(json).unwrap();
        assert_eq!(step.selected_image, 0);
    }

    #[test]
    fn test_image_markers_default_to_empty_object() {
        let image: Image = serde_json::from_str(r#"{"filename": "abc"}"#).unwrap();
        assert_eq!(image.markers, serde_json::json!({}));
    }

    #[test]
    fn test_displayed_image_falls_back_to_first() {
        let mut step = Step {
            images: vec![Image::new("first"), Image::new("second")],
            ..Default::default()
        };
        assert_eq!(step.displayed_image().unwrap().filename, "first");

        step.selected_image = 1;
        assert_eq!(step.displayed_image().unwrap().filename, "second");

        step.selected_image = 7;
        assert_eq!(step.displayed_index(), Some(0));

        step.images.clear();
        assert!(step.displayed_image().is_none());
    }

    #[test]
    fn test_placeholders() {
        let failed = Guide::failed("Guide not found (404)");
        assert_eq!(failed.title, FAILED_TITLE);
        assert!(failed.steps.is_empty());
        assert_eq!(failed.description.as_deref(), Some("Guide not found (404)"));

        let json = serde_json::to_value(Guide::loading()).unwrap();
        assert!(json.get("description").is_none());
    }
}
