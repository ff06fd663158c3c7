// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Guide header: edit controls and the guide title.

use crate::models::edit::Edit;
use crate::models::guide::Guide;

/// Result of interacting with the header.
pub enum HeaderAction {
    None,
    SetEditing(bool),
    Save,
    Edit(Edit),
}

/// Display the edit/preview toggle, save button and title.
pub fn show(ui: &mut egui::Ui, guide: &Guide, editing: bool, show_edit_buttons: bool) -> HeaderAction {
    let mut action = HeaderAction::None;

    if show_edit_buttons {
        ui.horizontal(|ui| {
            if editing {
                if ui.button("preview").clicked() {
                    action = HeaderAction::SetEditing(false);
                }
            } else if ui.button("edit").clicked() {
                action = HeaderAction::SetEditing(true);
            }
            if ui.button("save").clicked() {
                action = HeaderAction::Save;
            }
        });
        ui.add_space(4.0);
    }

    if editing {
        let mut title = guide.title.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut title)
                .font(egui::TextStyle::Heading)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            action = HeaderAction::Edit(Edit::SetTitle(title));
        }
    } else {
        ui.heading(egui::RichText::new(&guide.title).size(28.0));
    }

    if let Some(description) = &guide.description {
        ui.label(egui::RichText::new(description).weak());
    }

    action
}
