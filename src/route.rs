// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Guide routes: the slug to load and whether editing was requested.

const EDIT_SEGMENT: &str = "edit";

/// A parsed guide route such as `raspberry-pi-setup/edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub slug: Option<String>,
    /// The second segment was the literal `edit`.
    pub edit: bool,
}

impl Route {
    /// Build a route from path segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let mut parts = segments
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty());
        let slug = parts.next().map(str::to_string);
        let edit = parts.next() == Some(EDIT_SEGMENT);
        Self { slug, edit }
    }

    /// Parse a `/`-separated route.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').collect();
        Self::from_segments(&segments)
    }

    /// Render back to a `/`-separated route.
    pub fn to_path(&self) -> String {
        match (&self.slug, self.edit) {
            (Some(slug), true) => format!("{slug}/{EDIT_SEGMENT}"),
            (Some(slug), false) => slug.clone(),
            (None, _) => String::new(),
        }
    }
}
