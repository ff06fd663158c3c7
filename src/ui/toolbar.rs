// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker overlay toolbar.
//!
//! Tool and color selection plus the commands that end a marker session.

use crate::models::markers::MarkerKind;
use crate::ui::canvas::MarkerSession;

/// Command chosen from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Done,
    Cancel,
}

/// Display the toolbar with tool selection buttons.
pub fn show(ui: &mut egui::Ui, session: &mut MarkerSession) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        for (kind, label) in [
            (MarkerKind::Rectangle, "▭ Rectangle"),
            (MarkerKind::Ellipse, "◯ Ellipse"),
            (MarkerKind::Arrow, "➚ Arrow"),
            (MarkerKind::Freehand, "✏ Freehand"),
        ] {
            if ui.selectable_label(session.tool == kind, label).clicked() {
                session.tool = kind;
            }
        }

        ui.separator();
        ui.color_edit_button_srgba(&mut session.color);

        ui.separator();
        if ui
            .add_enabled(!session.state.is_empty(), egui::Button::new("Undo marker"))
            .clicked()
        {
            session.undo_last();
        }
        if ui.button("Clear").clicked() {
            session.clear();
        }

        ui.separator();
        if ui.button("Done").clicked() {
            action = ToolbarAction::Done;
        }
        if ui.button("Cancel").clicked() {
            action = ToolbarAction::Cancel;
        }
    });

    // Tool description
    let tool_text = match session.tool {
        MarkerKind::Rectangle => "Drag to draw a rectangle",
        MarkerKind::Ellipse => "Drag to draw an ellipse",
        MarkerKind::Arrow => "Drag from the tail to the tip of the arrow",
        MarkerKind::Freehand => "Drag to draw freehand",
    };
    ui.label(egui::RichText::new(tool_text).italics().weak());

    action
}
