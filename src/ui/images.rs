// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Texture cache for step images.
//!
//! Images are downloaded and decoded on background threads. Each frame the
//! cache drains finished loads into egui textures.

use crate::config::ImageHostConfig;
use crate::io::media::{self, LoadedImage};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Load state of one image.
pub enum ImageSlot {
    Loading,
    Ready {
        texture: egui::TextureHandle,
        size: (u32, u32),
    },
    Failed(String),
}

type LoadResult = (String, Result<LoadedImage, String>);

pub struct ImageCache {
    host: ImageHostConfig,
    client: reqwest::blocking::Client,
    slots: HashMap<String, ImageSlot>,
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
}

impl ImageCache {
    pub fn new(host: ImageHostConfig, client: reqwest::blocking::Client) -> Self {
        let (sender, receiver) = channel();
        Self {
            host,
            client,
            slots: HashMap::new(),
            sender,
            receiver,
        }
    }

    /// Get the slot for `filename`, starting a download the first time it is asked for.
    pub fn get(&mut self, ctx: &egui::Context, filename: &str) -> &ImageSlot {
        if !self.slots.contains_key(filename) {
            self.spawn_load(ctx, filename);
        }
        self.slots.entry(filename.to_string()).or_insert(ImageSlot::Loading)
    }

    /// Texture and size for `filename` if it has finished loading.
    pub fn ready(&mut self, ctx: &egui::Context, filename: &str) -> Option<(egui::TextureHandle, (u32, u32))> {
        match self.get(ctx, filename) {
            ImageSlot::Ready { texture, size } => Some((texture.clone(), *size)),
            _ => None,
        }
    }

    fn spawn_load(&mut self, ctx: &egui::Context, filename: &str) {
        self.slots.insert(filename.to_string(), ImageSlot::Loading);

        let sender = self.sender.clone();
        let client = self.client.clone();
        let host = self.host.clone();
        let filename = filename.to_string();
        let ctx = ctx.clone();

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = media::fetch_image(&client, &host, &filename).map_err(|e| format!("{e:#}"));
            let _ = sender.send((filename, result));
            ctx.request_repaint();
        });
    }

    /// Turn finished downloads into textures.
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok((filename, result)) = self.receiver.try_recv() {
            let slot = match result {
                Ok(loaded) => {
                    let size = [loaded.width as usize, loaded.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                    let texture = ctx.load_texture(&filename, color_image, egui::TextureOptions::LINEAR);
                    log::info!("Loaded image {} ({}x{})", filename, loaded.width, loaded.height);
                    ImageSlot::Ready {
                        texture,
                        size: (loaded.width, loaded.height),
                    }
                }
                Err(e) => {
                    log::error!("Failed to load image {}: {}", filename, e);
                    ImageSlot::Failed(e)
                }
            };
            self.slots.insert(filename, slot);
        }
    }
}
