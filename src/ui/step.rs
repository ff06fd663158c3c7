// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Step view: title, the displayed image with its thumbnails, and the
//! bulleted lines, with inline editors in edit mode.

use crate::models::edit::Edit;
use crate::models::guide::Step;
use crate::models::markers::MarkerState;
use crate::ui::canvas;
use crate::ui::images::{ImageCache, ImageSlot};
use crate::util::{color, geometry};

const MAIN_IMAGE_SIZE: egui::Vec2 = egui::vec2(480.0, 360.0);
const THUMBNAIL_SIZE: egui::Vec2 = egui::vec2(64.0, 48.0);
const BULLET: &str = "⬢";

/// Result of interacting with a step.
pub enum StepAction {
    Edit(Edit),
    OpenMarkers { step: usize, image: usize },
    AddImage { step: usize },
}

/// Display one step.
pub fn show(
    ui: &mut egui::Ui,
    index: usize,
    step: &Step,
    editing: bool,
    images: &mut ImageCache,
) -> Option<StepAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(egui::RichText::new(format!("Step {}", index + 1)).strong());
        if editing {
            let mut title = step.title.clone();
            if ui.text_edit_singleline(&mut title).changed() {
                action = Some(StepAction::Edit(Edit::SetStepTitle { step: index, title }));
            }
        } else {
            ui.heading(&step.title);
        }
    });

    ui.horizontal_top(|ui| {
        if let Some(a) = show_main_image(ui, index, step, images) {
            action = Some(a);
        }

        ui.vertical(|ui| {
            if step.images.len() > 1 {
                if let Some(a) = show_thumbnails(ui, index, step, images) {
                    action = Some(a);
                }
                ui.add_space(6.0);
            }
            if let Some(a) = show_lines(ui, index, step, editing) {
                action = Some(a);
            }
        });
    });

    action
}

fn show_main_image(
    ui: &mut egui::Ui,
    index: usize,
    step: &Step,
    images: &mut ImageCache,
) -> Option<StepAction> {
    let (image_index, image) = step.displayed_index().zip(step.displayed_image())?;

    let ctx = ui.ctx().clone();
    match images.get(&ctx, &image.filename) {
        ImageSlot::Ready { texture, size } => {
            let display = geometry::fit_size(*size, MAIN_IMAGE_SIZE);
            let (rect, response) = ui.allocate_exact_size(display, egui::Sense::click());
            let painter = ui.painter_at(rect);
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
            match MarkerState::from_value(&image.markers) {
                Ok(state) => canvas::draw_markers(&painter, &state, rect),
                Err(e) => log::debug!("Markers of {} not drawn: {:#}", image.filename, e),
            }
            let response = response.on_hover_text("Click to add markers");
            if response.clicked() {
                return Some(StepAction::OpenMarkers { step: index, image: image_index });
            }
        }
        ImageSlot::Loading => {
            ui.allocate_ui(MAIN_IMAGE_SIZE, |ui| {
                ui.spinner();
            });
        }
        ImageSlot::Failed(e) => {
            ui.allocate_ui(MAIN_IMAGE_SIZE, |ui| {
                ui.colored_label(ui.visuals().error_fg_color, format!("Image unavailable: {e}"));
            });
        }
    }
    None
}

fn show_thumbnails(
    ui: &mut egui::Ui,
    index: usize,
    step: &Step,
    images: &mut ImageCache,
) -> Option<StepAction> {
    let mut action = None;
    let ctx = ui.ctx().clone();
    ui.horizontal_wrapped(|ui| {
        for (image_index, image) in step.images.iter().enumerate() {
            let (rect, response) = ui.allocate_exact_size(THUMBNAIL_SIZE, egui::Sense::click());
            if let Some((texture, size)) = images.ready(&ctx, &image.filename) {
                let fitted = geometry::fit_size(size, THUMBNAIL_SIZE);
                ui.painter().image(
                    texture.id(),
                    egui::Rect::from_center_size(rect.center(), fitted),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            } else {
                ui.painter().rect_filled(rect, 2.0, ui.visuals().faint_bg_color);
            }
            if step.displayed_index() == Some(image_index) {
                ui.painter().rect_stroke(rect, 2.0, ui.visuals().selection.stroke);
            }
            if (response.hovered() || response.clicked()) && step.selected_image != image_index {
                action = Some(StepAction::Edit(Edit::SelectImage { step: index, image: image_index }));
            }
        }
    });
    action
}

fn show_lines(ui: &mut egui::Ui, index: usize, step: &Step, editing: bool) -> Option<StepAction> {
    let mut action = None;

    for (line_index, line) in step.lines.iter().enumerate() {
        ui.horizontal(|ui| {
            let bullet_color = color::parse_css_color(&line.color).unwrap_or(ui.visuals().text_color());
            ui.label(egui::RichText::new(BULLET).color(bullet_color));

            if editing {
                let mut line_color = line.color.clone();
                let color_edit = ui.add(egui::TextEdit::singleline(&mut line_color).desired_width(70.0));
                if color_edit.changed() {
                    action = Some(StepAction::Edit(Edit::SetLineColor {
                        step: index,
                        line: line_index,
                        color: line_color,
                    }));
                }

                let mut text = line.text.clone();
                let text_edit = ui.add(egui::TextEdit::multiline(&mut text).desired_rows(1));
                if text_edit.changed() {
                    action = Some(StepAction::Edit(Edit::SetLineText {
                        step: index,
                        line: line_index,
                        text,
                    }));
                }
            } else {
                ui.label(&line.text);
            }
        });
    }

    if editing {
        ui.horizontal(|ui| {
            if ui.small_button("add line").clicked() {
                action = Some(StepAction::Edit(Edit::AddLine { step: index }));
            }
            if ui.small_button("add image").clicked() {
                action = Some(StepAction::AddImage { step: index });
            }
        });
    }

    action
}
