// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker overlay drawing surface.
//!
//! This module provides the canvas shown over a step image where users drag
//! out rectangles, ellipses, arrows and freehand strokes, and the painter used
//! to draw persisted markers on top of step images.

use crate::models::markers::{Marker, MarkerKind, MarkerState, Point};
use crate::util::{color, geometry};

/// Editing session for the markers of one step image.
pub struct MarkerSession {
    pub step: usize,
    pub image: usize,
    pub filename: String,
    pub state: MarkerState,
    pub tool: MarkerKind,
    pub color: egui::Color32,
    /// Marker being dragged out
    pub drawing: Option<Marker>,
}

impl MarkerSession {
    pub fn new(step: usize, image: usize, filename: String, state: MarkerState) -> Self {
        Self {
            step,
            image,
            filename,
            state,
            tool: MarkerKind::Rectangle,
            color: egui::Color32::RED,
            drawing: None,
        }
    }

    /// Start a marker with the current tool at `point`.
    pub fn begin(&mut self, point: Point) {
        self.drawing = Some(Marker::new(self.tool, color::to_hex(self.color), point));
    }

    pub fn extend(&mut self, point: Point) {
        if let Some(marker) = self.drawing.as_mut() {
            marker.extend_to(point);
        }
    }

    /// Commit the in-progress marker if it has enough points.
    pub fn finish(&mut self) {
        if let Some(marker) = self.drawing.take() {
            if marker.is_complete() {
                self.state.markers.push(marker);
                log::info!("Added marker, total: {}", self.state.markers.len());
            }
        }
    }

    pub fn undo_last(&mut self) {
        self.state.markers.pop();
    }

    pub fn clear(&mut self) {
        self.state.markers.clear();
        self.drawing = None;
    }
}

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    Begin(Point),
    Extend(Point),
    Finish,
}

/// Display the image with its markers and handle drag interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: &MarkerSession,
    texture: Option<&egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
) -> CanvasAction {
    let (Some(texture), Some(image_size)) = (texture, image_size) else {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return CanvasAction::None;
    };

    let available = ui.available_size().min(egui::vec2(1000.0, 700.0));
    let size = geometry::fit_size(image_size, available);
    let (image_rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

    let painter = ui.painter_at(image_rect);
    painter.image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
    draw_markers(&painter, &session.state, image_rect);
    if let Some(marker) = &session.drawing {
        draw_marker(&painter, marker, image_rect);
    }

    let pointer = response
        .interact_pointer_pos()
        .map(|pos| geometry::normalize_in_rect(pos, image_rect));

    if response.drag_started() {
        if let Some(point) = pointer {
            return CanvasAction::Begin(point);
        }
    }
    if response.drag_stopped() {
        return CanvasAction::Finish;
    }
    if response.dragged() {
        if let Some(point) = pointer {
            return CanvasAction::Extend(point);
        }
    }
    CanvasAction::None
}

/// Apply a canvas action to the session.
pub fn handle(session: &mut MarkerSession, action: CanvasAction) {
    match action {
        CanvasAction::Begin(point) => session.begin(point),
        CanvasAction::Extend(point) => session.extend(point),
        CanvasAction::Finish => session.finish(),
        CanvasAction::None => {}
    }
}

/// Draw every marker of `state` inside `image_rect`.
pub fn draw_markers(painter: &egui::Painter, state: &MarkerState, image_rect: egui::Rect) {
    for marker in &state.markers {
        draw_marker(painter, marker, image_rect);
    }
}

/// Draw one marker on the canvas.
fn draw_marker(painter: &egui::Painter, marker: &Marker, image_rect: egui::Rect) {
    let color = color::parse_css_color(&marker.color).unwrap_or(egui::Color32::RED);
    let stroke = egui::Stroke::new(3.0, color);

    // Convert normalized coordinates to screen coordinates
    let points: Vec<egui::Pos2> = marker
        .points
        .iter()
        .map(|p| geometry::denormalize_in_rect(p, image_rect))
        .collect();
    if points.len() < 2 {
        return;
    }

    match marker.kind {
        MarkerKind::Rectangle => {
            painter.rect_stroke(egui::Rect::from_two_pos(points[0], points[1]), 0.0, stroke);
        }
        MarkerKind::Ellipse => {
            let bounds = egui::Rect::from_two_pos(points[0], points[1]);
            painter.add(egui::Shape::closed_line(ellipse_points(bounds, 48), stroke));
        }
        MarkerKind::Arrow => {
            painter.arrow(points[0], points[1] - points[0], stroke);
        }
        MarkerKind::Freehand => {
            painter.add(egui::Shape::line(points, stroke));
        }
    }
}

/// Points on the ellipse inscribed in `bounds`.
fn ellipse_points(bounds: egui::Rect, segments: usize) -> Vec<egui::Pos2> {
    let center = bounds.center();
    let radius = bounds.size() / 2.0;
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            egui::pos2(center.x + radius.x * angle.cos(), center.y + radius.y * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> MarkerSession {
        MarkerSession::new(0, 0, "img".to_string(), MarkerState::default())
    }

    #[test]
    fn test_drag_commits_marker() {
        let mut session = session();
        session.tool = MarkerKind::Arrow;
        handle(&mut session, CanvasAction::Begin(Point::new(0.1, 0.1)));
        handle(&mut session, CanvasAction::Extend(Point::new(0.3, 0.3)));
        handle(&mut session, CanvasAction::Extend(Point::new(0.6, 0.4)));
        handle(&mut session, CanvasAction::Finish);

        assert!(session.drawing.is_none());
        assert_eq!(session.state.markers.len(), 1);
        let marker = &session.state.markers[0];
        assert_eq!(marker.kind, MarkerKind::Arrow);
        assert_eq!(marker.color, "#ff0000");
        assert_eq!(marker.points, vec![Point::new(0.1, 0.1), Point::new(0.6, 0.4)]);
    }

    #[test]
    fn test_click_without_drag_adds_nothing() {
        let mut session = session();
        handle(&mut session, CanvasAction::Begin(Point::new(0.5, 0.5)));
        handle(&mut session, CanvasAction::Finish);
        assert!(session.state.is_empty());
    }

    #[test]
    fn test_undo_and_clear() {
        let mut session = session();
        for x in [0.2, 0.4] {
            session.begin(Point::new(0.0, 0.0));
            session.extend(Point::new(x, x));
            session.finish();
        }
        session.undo_last();
        assert_eq!(session.state.markers.len(), 1);
        session.clear();
        assert!(session.state.is_empty());
    }

    #[test]
    fn test_ellipse_points_stay_in_bounds() {
        let bounds = egui::Rect::from_min_max(egui::pos2(10.0, 20.0), egui::pos2(110.0, 70.0));
        for p in ellipse_points(bounds, 16) {
            assert!(bounds.expand(0.01).contains(p));
        }
    }
}
