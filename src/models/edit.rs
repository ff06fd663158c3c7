// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Path-addressed edits on a guide document.
//!
//! Every change the editor makes is an `Edit` value naming the node it
//! touches by step, line and image index. Applying one walks that path and
//! mutates only the addressed node.

use super::guide::{Guide, Image, Line, Step};
use thiserror::Error;

/// Failure to resolve an edit path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("step {0} does not exist")]
    NoSuchStep(usize),
    #[error("line {line} does not exist in step {step}")]
    NoSuchLine { step: usize, line: usize },
    #[error("image {image} does not exist in step {step}")]
    NoSuchImage { step: usize, image: usize },
}

/// A single change to a guide.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    SetTitle(String),
    SetStepTitle { step: usize, title: String },
    SetLineColor { step: usize, line: usize, color: String },
    SetLineText { step: usize, line: usize, text: String },
    AddLine { step: usize },
    AddStep,
    AddImage { step: usize, image: Image },
    SelectImage { step: usize, image: usize },
    SetMarkers { step: usize, image: usize, markers: serde_json::Value },
    /// Replace the whole document, as when importing a file.
    Replace(Guide),
}

/// The field an edit writes, used to coalesce keystrokes in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    StepTitle(usize),
    LineColor(usize, usize),
    LineText(usize, usize),
    Structure,
}

impl Edit {
    pub fn target(&self) -> EditTarget {
        match self {
            Edit::SetTitle(_) => EditTarget::Title,
            Edit::SetStepTitle { step, .. } => EditTarget::StepTitle(*step),
            Edit::SetLineColor { step, line, .. } => EditTarget::LineColor(*step, *line),
            Edit::SetLineText { step, line, .. } => EditTarget::LineText(*step, *line),
            _ => EditTarget::Structure,
        }
    }

    /// Whether a run of this edit on the same target may share one history entry.
    pub fn coalesces(&self) -> bool {
        self.target() != EditTarget::Structure
    }

    /// Edits that change what is displayed but not the saved content.
    pub fn is_view_only(&self) -> bool {
        matches!(self, Edit::SelectImage { .. })
    }

    /// Apply the edit in place.
    ///
    /// On error the document is left unchanged.
    pub fn apply(self, guide: &mut Guide) -> Result<(), EditError> {
        match self {
            Edit::SetTitle(title) => guide.title = title,
            Edit::SetStepTitle { step, title } => step_at(guide, step)?.title = title,
            Edit::SetLineColor { step, line, color } => {
                line_at(guide, step, line)?.color = color;
            }
            Edit::SetLineText { step, line, text } => {
                line_at(guide, step, line)?.text = text;
            }
            Edit::AddLine { step } => step_at(guide, step)?.lines.push(Line::default()),
            Edit::AddStep => guide.steps.push(Step::default()),
            Edit::AddImage { step, image } => step_at(guide, step)?.images.push(image),
            Edit::SelectImage { step, image } => {
                let target = step_at(guide, step)?;
                if image >= target.images.len() {
                    return Err(EditError::NoSuchImage { step, image });
                }
                target.selected_image = image;
            }
            Edit::SetMarkers { step, image, markers } => {
                step_at(guide, step)?
                    .images
                    .get_mut(image)
                    .ok_or(EditError::NoSuchImage { step, image })?
                    .markers = markers;
            }
            Edit::Replace(replacement) => *guide = replacement,
        }
        Ok(())
    }
}

fn step_at(guide: &mut Guide, step: usize) -> Result<&mut Step, EditError> {
    guide.step_mut(step).ok_or(EditError::NoSuchStep(step))
}

fn line_at(guide: &mut Guide, step: usize, line: usize) -> Result<&mut Line, EditError> {
    step_at(guide, step)?
        .lines
        .get_mut(line)
        .ok_or(EditError::NoSuchLine { step, line })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_guide() -> Guide {
        serde_json::from_value(serde_json::json!({
            "title": "Install the SSD",
            "steps": [
                {
                    "title": "Open the case",
                    "images": [{"filename": "case", "markers": {}}],
                    "lines": [
                        {"color": "red", "text": "Remove four screws"},
                        {"color": "blue", "text": "Lift the lid"}
                    ]
                },
                {
                    "title": "Seat the drive",
                    "images": [{"filename": "ssd-1"}, {"filename": "ssd-2"}],
                    "lines": [{"color": "black", "text": "Align the notch"}]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_set_title_leaves_steps_untouched() {
        let mut guide = sample_guide();
        let before = guide.steps.clone();

        Edit::SetTitle("X".to_string()).apply(&mut guide).unwrap();

        assert_eq!(guide.title, "X");
        assert_eq!(guide.steps, before);
    }

    #[test]
    fn test_add_line_only_changes_target_step() {
        let mut guide = sample_guide();
        let other = guide.steps[0].clone();

        Edit::AddLine { step: 1 }.apply(&mut guide).unwrap();

        assert_eq!(guide.steps[1].lines.len(), 2);
        assert_eq!(guide.steps[1].lines[1], Line::default());
        assert_eq!(guide.steps[0], other);
    }

    #[test]
    fn test_set_line_text_only_changes_one_line() {
        let mut guide = sample_guide();
        let sibling = guide.steps[0].lines[1].clone();

        Edit::SetLineText { step: 0, line: 0, text: "Remove five screws".to_string() }
            .apply(&mut guide)
            .unwrap();
        Edit::SetLineColor { step: 0, line: 0, color: "#00ff00".to_string() }
            .apply(&mut guide)
            .unwrap();

        assert_eq!(guide.steps[0].lines[0].text, "Remove five screws");
        assert_eq!(guide.steps[0].lines[0].color, "#00ff00");
        assert_eq!(guide.steps[0].lines[1], sibling);
    }

    #[test]
    fn test_out_of_range_paths_leave_guide_unchanged() {
        let mut guide = sample_guide();
        let before = guide.clone();

        assert_eq!(
            Edit::SetStepTitle { step: 5, title: "nope".to_string() }.apply(&mut guide),
            Err(EditError::NoSuchStep(5))
        );
        assert_eq!(
            Edit::SetLineText { step: 0, line: 9, text: "nope".to_string() }.apply(&mut guide),
            Err(EditError::NoSuchLine { step: 0, line: 9 })
        );
        assert_eq!(
            Edit::SelectImage { step: 0, image: 1 }.apply(&mut guide),
            Err(EditError::NoSuchImage { step: 0, image: 1 })
        );
        assert_eq!(guide, before);
    }

    #[test]
    fn test_selection_lives_on_each_step() {
        let mut guide = sample_guide();
        Edit::SelectImage { step: 1, image: 1 }.apply(&mut guide).unwrap();
        Edit::AddStep.apply(&mut guide).unwrap();

        assert_eq!(guide.steps[1].selected_image, 1);
        assert_eq!(guide.steps[2].selected_image, 0);
        assert_eq!(guide.steps[2].displayed_image(), None);
    }

    #[test]
    fn test_add_image_and_set_markers() {
        let mut guide = sample_guide();
        Edit::AddImage { step: 0, image: Image::new("fresh") }.apply(&mut guide).unwrap();
        assert_eq!(guide.steps[0].images.len(), 2);

        let markers = serde_json::json!({"markers": []});
        Edit::SetMarkers { step: 0, image: 1, markers: markers.clone() }
            .apply(&mut guide)
            .unwrap();
        assert_eq!(guide.steps[0].images[1].markers, markers);
        assert_eq!(guide.steps[0].images[0].markers, serde_json::json!({}));
    }

    #[test]
    fn test_targets() {
        assert_eq!(Edit::SetTitle(String::new()).target(), EditTarget::Title);
        assert!(Edit::SetLineText { step: 1, line: 2, text: String::new() }.coalesces());
        assert!(!Edit::AddStep.coalesces());
        assert!(Edit::SelectImage { step: 0, image: 0 }.is_view_only());
    }
}
