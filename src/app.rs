// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It owns the guide document, applies edits coming
//! from the UI components, and collects the results of background fetches,
//! uploads and saves.

use crate::config::{self, Config, Credentials};
use crate::io::{api, serialization, upload};
use crate::models::{
    edit::Edit,
    guide::{Guide, Image},
    history::History,
    markers::MarkerState,
};
use crate::route::Route;
use crate::ui::{
    canvas::{self, MarkerSession},
    header::{self, HeaderAction},
    images::ImageCache,
    step::{self, StepAction},
    toolbar::{self, ToolbarAction},
};
use crate::util::generation::{Generation, Tagged};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Result of a background job.
enum Job {
    Fetch(api::FetchOutcome),
    Upload {
        step: usize,
        result: Result<Image, String>,
    },
    Save(Result<String, String>),
}

/// Main application state.
pub struct GuideApp {
    config: Config,
    client: reqwest::blocking::Client,
    ctx: egui::Context,

    /// Route currently displayed
    route: Route,
    /// Contents of the navigation bar
    route_input: String,

    /// The guide document
    guide: Guide,
    editing: bool,
    history: History,

    /// Generation of the guide currently displayed
    generation: Generation,
    jobs_tx: Sender<Tagged<Job>>,
    jobs_rx: Receiver<Tagged<Job>>,
    loading: bool,
    pending_uploads: usize,
    pending_saves: usize,

    images: ImageCache,
    markers: Option<MarkerSession>,

    /// Message shown in a modal alert
    alert: Option<String>,
    /// Outcome of the last operation, shown in the status bar
    status: Option<String>,
}

impl GuideApp {
    /// Create the application and start loading `route`.
    pub fn new(ctx: &egui::Context, config: Config, route: Route) -> Result<Self> {
        let client = api::http_client(&config)?;
        let (jobs_tx, jobs_rx) = channel();
        let images = ImageCache::new(config.images.clone(), client.clone());

        let mut app = Self {
            config,
            client,
            ctx: ctx.clone(),
            route: Route::default(),
            route_input: String::new(),
            guide: Guide::loading(),
            editing: false,
            history: History::new(),
            generation: Generation::default(),
            jobs_tx,
            jobs_rx,
            loading: false,
            pending_uploads: 0,
            pending_saves: 0,
            images,
            markers: None,
            alert: None,
            status: None,
        };
        app.navigate(route);
        Ok(app)
    }

    /// Show the guide for `route`, discarding any unsaved edits.
    pub fn navigate(&mut self, route: Route) {
        self.route_input = route.to_path();
        self.editing = route.edit;
        self.route = route;
        self.history.clear();
        self.markers = None;

        let generation = self.generation.begin();
        let Some(slug) = self.route.slug.clone() else {
            self.guide = Guide::failed("No guide selected");
            self.loading = false;
            return;
        };
        self.guide = Guide::loading();
        self.loading = true;

        let client = self.client.clone();
        let config = self.config.clone();
        let sender = self.jobs_tx.clone();
        let ctx = self.ctx.clone();

        // Spawn background thread for the fetch
        std::thread::spawn(move || {
            let outcome = api::fetch_guide(&client, &config, &slug);
            let _ = sender.send(Tagged {
                generation,
                value: Job::Fetch(outcome),
            });
            ctx.request_repaint();
        });
    }

    /// Apply an edit, recording history for content changes.
    fn apply_edit(&mut self, edit: Edit) {
        if edit.is_view_only() {
            if let Err(e) = edit.apply(&mut self.guide) {
                log::warn!("Ignored selection: {}", e);
            }
            return;
        }

        let target = edit.target();
        let coalesce = edit.coalesces();
        let before = self.guide.clone();
        match edit.apply(&mut self.guide) {
            Ok(()) => self.history.record(&before, target, coalesce),
            Err(e) => log::warn!("Ignored edit: {}", e),
        }
    }

    fn undo(&mut self) {
        if let Some(previous) = self.history.undo(self.guide.clone()) {
            self.guide = previous;
            log::info!("Undo");
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.history.redo(self.guide.clone()) {
            self.guide = next;
            log::info!("Redo");
        }
    }

    /// Drain finished background jobs.
    fn poll_jobs(&mut self) {
        while let Ok(tagged) = self.jobs_rx.try_recv() {
            self.receive(tagged);
        }
    }

    fn receive(&mut self, tagged: Tagged<Job>) {
        let current = self.generation.is_current(tagged.generation);
        match tagged.value {
            Job::Fetch(outcome) => {
                if !current {
                    log::warn!("Discarded guide response from superseded generation {}", tagged.generation);
                    return;
                }
                self.loading = false;
                if outcome.is_loaded() {
                    log::info!("Guide loaded");
                }
                self.guide = outcome.into_guide();
                self.history.clear();
            }
            Job::Upload { step, result } => {
                self.pending_uploads = self.pending_uploads.saturating_sub(1);
                if !current {
                    log::warn!("Discarded upload for a guide that is no longer displayed");
                    return;
                }
                match result {
                    Ok(image) => {
                        self.status = Some(format!("Uploaded {}", image.filename));
                        self.apply_edit(Edit::AddImage { step, image });
                    }
                    Err(e) => {
                        log::error!("Upload failed: {}", e);
                        self.status = Some(format!("Upload failed: {e}"));
                    }
                }
            }
            Job::Save(result) => {
                self.pending_saves = self.pending_saves.saturating_sub(1);
                self.status = Some(match result {
                    Ok(message) => message,
                    Err(e) => {
                        log::error!("Save failed: {}", e);
                        format!("Save failed: {e}")
                    }
                });
            }
        }
    }

    /// Save with the configured credentials.
    fn save(&mut self) {
        match config::load_credentials() {
            Ok(credentials) => self.save_with(&credentials),
            Err(e) => {
                log::error!("Failed to load credentials: {:#}", e);
                self.alert = Some(format!("{e:#}"));
            }
        }
    }

    fn save_with(&mut self, credentials: &Credentials) {
        let request = match api::prepare_save(&self.config, credentials, self.route.slug.as_deref(), &self.guide) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Save aborted: {}", e);
                self.alert = Some(e.to_string());
                return;
            }
        };

        self.pending_saves += 1;
        let client = self.client.clone();
        let sender = self.jobs_tx.clone();
        let ctx = self.ctx.clone();
        let tag = self.generation.current();
        std::thread::spawn(move || {
            let result = api::send_save(&client, &request)
                .map(|()| format!("Saved {}", request.slug))
                .map_err(|e| e.to_string());
            let _ = sender.send(Tagged {
                generation: tag,
                value: Job::Save(result),
            });
            ctx.request_repaint();
        });
    }

    /// Pick a file and upload it into `step`.
    fn add_image(&mut self, step: usize) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "gif"])
            .pick_file()
        {
            self.start_upload(step, path);
        }
    }

    fn start_upload(&mut self, step: usize, path: PathBuf) {
        self.pending_uploads += 1;
        let client = self.client.clone();
        let config = self.config.clone();
        let sender = self.jobs_tx.clone();
        let ctx = self.ctx.clone();
        let tag = self.generation.current();

        // Spawn background thread for the upload
        std::thread::spawn(move || {
            let result = upload::upload_image_file(&client, &config, &path).map_err(|e| e.to_string());
            let _ = sender.send(Tagged {
                generation: tag,
                value: Job::Upload { step, result },
            });
            ctx.request_repaint();
        });
    }

    /// Open the marker overlay for one image.
    fn open_markers(&mut self, step: usize, image: usize) {
        let Some(record) = self.guide.step(step).and_then(|s| s.images.get(image)) else {
            return;
        };
        match MarkerState::from_value(&record.markers) {
            Ok(state) => {
                self.markers = Some(MarkerSession::new(step, image, record.filename.clone(), state));
            }
            Err(e) => {
                log::warn!("Cannot edit markers of {}: {:#}", record.filename, e);
                self.alert = Some(format!("The markers on {} use an unrecognized format.", record.filename));
            }
        }
    }

    fn finish_markers(&mut self, action: ToolbarAction) {
        let Some(session) = self.markers.take() else {
            return;
        };
        if action == ToolbarAction::Done {
            log::info!("Saved {} markers on {}", session.state.markers.len(), session.filename);
            self.apply_edit(Edit::SetMarkers {
                step: session.step,
                image: session.image,
                markers: session.state.to_value(),
            });
        }
    }

    /// Export the guide to a file.
    fn export_guide(&mut self, path: PathBuf) {
        match serialization::export_by_extension(&self.guide, &path) {
            Ok(()) => {
                log::info!("Exported guide to {}", path.display());
                self.status = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export guide: {:#}", e);
                self.alert = Some(format!("{e:#}"));
            }
        }
    }

    /// Replace the guide with the contents of a file.
    fn import_guide(&mut self, path: PathBuf) {
        match serialization::import_by_extension(&path) {
            Ok(guide) => {
                log::info!("Imported guide with {} steps from {}", guide.steps.len(), path.display());
                self.apply_edit(Edit::Replace(guide));
            }
            Err(e) => {
                log::error!("Failed to import guide: {:#}", e);
                self.alert = Some(format!("{e:#}"));
            }
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Export as JSON...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("guide.json")
                            .save_file()
                        {
                            self.export_guide(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Export as YAML...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("YAML", &["yaml", "yml"])
                            .set_file_name("guide.yaml")
                            .save_file()
                        {
                            self.export_guide(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Import...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Guides", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.import_guide(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.history.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.undo();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.history.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        self.redo();
                        ui.close_menu();
                    }
                });
            });

            ui.horizontal(|ui| {
                ui.label("Guide:");
                let response = ui.add(egui::TextEdit::singleline(&mut self.route_input).hint_text("slug or slug/edit"));
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Go").clicked() || submitted {
                    let route = Route::parse(&self.route_input);
                    self.navigate(route);
                }
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.loading || self.pending_uploads > 0 || self.pending_saves > 0 {
                    ui.spinner();
                }
                if self.pending_uploads > 0 {
                    ui.label(format!("Uploading {} image(s)", self.pending_uploads));
                    ui.separator();
                }
                ui.label(if self.editing { "Editing" } else { "Viewing" });
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
    }

    fn show_marker_window(&mut self, ctx: &egui::Context) {
        let mut finished = None;
        if let Some(session) = self.markers.as_mut() {
            let ready = self.images.ready(ctx, &session.filename);
            egui::Window::new("Markers")
                .collapsible(false)
                .resizable(true)
                .show(ctx, |ui| {
                    let toolbar_action = toolbar::show(ui, session);
                    ui.separator();
                    let (texture, size) = match &ready {
                        Some((texture, size)) => (Some(texture), Some(*size)),
                        None => (None, None),
                    };
                    let action = canvas::show(ui, session, texture, size);
                    canvas::handle(session, action);
                    if toolbar_action != ToolbarAction::None {
                        finished = Some(toolbar_action);
                    }
                });
        }
        if let Some(action) = finished {
            self.finish_markers(action);
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Alert")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }
}

impl eframe::App for GuideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs();
        self.images.poll(ctx);

        // Handle undo (Ctrl+Z) and redo (Ctrl+Shift+Z or Ctrl+Y) outside text fields
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
                self.undo();
            }
            if ctx.input(|i| {
                (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || (i.modifiers.command && i.key_pressed(egui::Key::Y))
            }) {
                self.redo();
            }
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        let mut header_action = HeaderAction::None;
        let mut step_action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                header_action = header::show(ui, &self.guide, self.editing, self.route.edit);
                ui.add_space(12.0);

                for (index, step) in self.guide.steps.iter().enumerate() {
                    if let Some(action) = step::show(ui, index, step, self.editing, &mut self.images) {
                        step_action = Some(action);
                    }
                    ui.separator();
                }

                if self.editing && ui.button("add step").clicked() {
                    step_action = Some(StepAction::Edit(Edit::AddStep));
                }
            });
        });

        match header_action {
            HeaderAction::SetEditing(editing) => self.editing = editing,
            HeaderAction::Save => self.save(),
            HeaderAction::Edit(edit) => self.apply_edit(edit),
            HeaderAction::None => {}
        }
        match step_action {
            Some(StepAction::Edit(edit)) => self.apply_edit(edit),
            Some(StepAction::OpenMarkers { step, image }) => self.open_markers(step, image),
            Some(StepAction::AddImage { step }) => self.add_image(step),
            None => {}
        }

        self.show_marker_window(ctx);
        self.show_alert(ctx);

        // Request repaint while loading (to update spinner)
        if self.loading || self.pending_uploads > 0 || self.pending_saves > 0 {
            ctx.request_repaint();
        }
    }
}
