// Copyright 2025 Pulvetech
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Drone photo texture cache and loading.
//!
//! Manages async loading of drone images referenced by `image_path`,
//! conversion to egui textures, and disk caching with SHA256-based
//! filenames. A generated placeholder is shown while a photo loads or when
//! a drone has none.

use log::warn;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Card image size used by the fleet panel.
const THUMB_WIDTH: u32 = 220;
const THUMB_HEIGHT: u32 = 140;

/// Disk cache for downloaded drone images
#[derive(Debug, Clone)]
pub struct ImageCache {
    cache_dir: PathBuf,
    pending_downloads: Arc<Mutex<HashSet<String>>>, // Track ongoing downloads
}

impl ImageCache {
    pub fn new() -> Result<Self, std::io::Error> {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("pulvetech-desktop")
            .join("drone_images");

        fs::create_dir_all(&cache_dir)?;

        Ok(Self {
            cache_dir,
            pending_downloads: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Get cache file path for a given URL
    fn get_cache_path(&self, url: &str) -> PathBuf {
        // Use SHA256 hash of URL as filename to avoid filesystem issues
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let hash = format!("{:x}", hasher.finalize());

        let ext = url.rsplit('.').next().unwrap_or("jpg");
        self.cache_dir.join(format!("{hash}.{ext}"))
    }

    /// Get cached image bytes
    pub fn get_cached_bytes(&self, url: &str) -> Option<Vec<u8>> {
        fs::read(self.get_cache_path(url)).ok()
    }

    /// Download and cache an image
    pub async fn download_and_cache(&self, url: String) -> Option<Vec<u8>> {
        {
            let mut pending = self.pending_downloads.lock().unwrap();
            if pending.contains(&url) {
                return None; // Already downloading
            }
            pending.insert(url.clone());
        }

        let result = self.download_image(&url).await;
        self.pending_downloads.lock().unwrap().remove(&url);

        match result {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Falha ao baixar imagem {url}: {e}");
                None
            }
        }
    }

    async fn download_image(
        &self,
        url: &str,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        let response = reqwest::get(url).await?;

        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()).into());
        }

        let bytes = response.bytes().await?.to_vec();
        fs::write(self.get_cache_path(url), &bytes)?;
        Ok(bytes)
    }
}

/// Manages loading drone photos into egui textures
pub struct DroneImageManager {
    cache: ImageCache,
    textures: Arc<Mutex<HashMap<String, egui::TextureHandle>>>,
    loading: Arc<Mutex<HashSet<String>>>,
    placeholder: Option<egui::TextureHandle>,
    runtime: tokio::runtime::Handle,
}

impl DroneImageManager {
    pub fn new(runtime: tokio::runtime::Handle) -> Result<Self, std::io::Error> {
        Ok(Self {
            cache: ImageCache::new()?,
            textures: Arc::new(Mutex::new(HashMap::new())),
            loading: Arc::new(Mutex::new(HashSet::new())),
            placeholder: None,
            runtime,
        })
    }

    /// Initialize placeholder texture (call once during UI setup)
    pub fn init_placeholder(&mut self, ctx: &egui::Context) {
        let width = THUMB_WIDTH as usize;
        let height = THUMB_HEIGHT as usize;
        let mut pixels = vec![egui::Color32::from_rgb(38, 48, 42); width * height];

        // Simple quadcopter silhouette: center body plus four rotor discs.
        let body = egui::Color32::from_rgb(0x4C, 0xAF, 0x50);
        let cx = width / 2;
        let cy = height / 2;
        for y in cy - 6..cy + 6 {
            for x in cx - 14..cx + 14 {
                pixels[y * width + x] = body;
            }
        }
        for (rx, ry) in [
            (cx - 40, cy - 28),
            (cx + 40, cy - 28),
            (cx - 40, cy + 28),
            (cx + 40, cy + 28),
        ] {
            for y in ry.saturating_sub(10)..(ry + 10).min(height) {
                for x in rx.saturating_sub(10)..(rx + 10).min(width) {
                    let dx = x as i32 - rx as i32;
                    let dy = y as i32 - ry as i32;
                    if dx * dx + dy * dy <= 100 {
                        pixels[y * width + x] = body;
                    }
                }
            }
        }

        let image = egui::ColorImage {
            size: [width, height],
            pixels,
            source_size: egui::Vec2::new(width as f32, height as f32),
        };

        self.placeholder = Some(ctx.load_texture(
            "drone_placeholder",
            image,
            egui::TextureOptions::LINEAR,
        ));
    }

    /// Get or start loading the texture for an image URL. Returns the
    /// placeholder until the download finishes.
    pub fn get_or_load_texture(
        &self,
        ctx: &egui::Context,
        url: &str,
        drone_id: i64,
    ) -> Option<egui::TextureHandle> {
        {
            let textures = self.textures.lock().unwrap();
            if let Some(texture) = textures.get(url) {
                return Some(texture.clone());
            }
        }

        if let Some(bytes) = self.cache.get_cached_bytes(url) {
            if let Some(texture) = Self::load_texture_from_bytes(ctx, &bytes, drone_id) {
                self.textures
                    .lock()
                    .unwrap()
                    .insert(url.to_string(), texture.clone());
                return Some(texture);
            }
        }

        {
            let loading = self.loading.lock().unwrap();
            if loading.contains(url) {
                return self.placeholder.clone(); // Still loading
            }
        }

        // Start download in the background
        self.loading.lock().unwrap().insert(url.to_string());
        let cache = self.cache.clone();
        let url_owned = url.to_string();
        let textures = self.textures.clone();
        let loading = self.loading.clone();
        let ctx_clone = ctx.clone();

        self.runtime.spawn(async move {
            if let Some(bytes) = cache.download_and_cache(url_owned.clone()).await {
                if let Some(texture) =
                    Self::load_texture_from_bytes(&ctx_clone, &bytes, drone_id)
                {
                    textures.lock().unwrap().insert(url_owned.clone(), texture);
                    ctx_clone.request_repaint(); // Request UI update
                }
            }
            loading.lock().unwrap().remove(&url_owned);
        });

        self.placeholder.clone()
    }

    fn load_texture_from_bytes(
        ctx: &egui::Context,
        bytes: &[u8],
        drone_id: i64,
    ) -> Option<egui::TextureHandle> {
        let image = image::load_from_memory(bytes).ok()?;
        let source_size = [image.width() as usize, image.height() as usize];

        let thumbnail = image.resize(
            THUMB_WIDTH,
            THUMB_HEIGHT,
            image::imageops::FilterType::Lanczos3,
        );
        let rgba = thumbnail.to_rgba8();

        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels: Vec<egui::Color32> = rgba
            .pixels()
            .map(|p| egui::Color32::from_rgba_premultiplied(p[0], p[1], p[2], p[3]))
            .collect();

        let color_image = egui::ColorImage {
            size,
            pixels,
            source_size: egui::Vec2::new(source_size[0] as f32, source_size[1] as f32),
        };

        Some(ctx.load_texture(
            format!("drone_photo_{drone_id}"),
            color_image,
            egui::TextureOptions::LINEAR,
        ))
    }

    /// Get placeholder texture
    pub fn get_placeholder(&self) -> Option<&egui::TextureHandle> {
        self.placeholder.as_ref()
    }
}

/// Turn a possibly relative server path (drone image, certificate file) into
/// an absolute URL against the API origin (the base URL minus its `/api`
/// path).
#[must_use]
pub fn resolve_server_url(api_base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let origin = api_base_url
        .strip_suffix("/api")
        .unwrap_or(api_base_url)
        .trim_end_matches('/');

    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_server_url_relative_paths() {
        assert_eq!(
            resolve_server_url("http://localhost:3000/api", "/uploads/t40.jpg"),
            "http://localhost:3000/uploads/t40.jpg"
        );
        assert_eq!(
            resolve_server_url("http://localhost:3000/api", "uploads/t40.jpg"),
            "http://localhost:3000/uploads/t40.jpg"
        );
    }

    #[test]
    fn test_resolve_server_url_absolute_passthrough() {
        assert_eq!(
            resolve_server_url("http://localhost:3000/api", "https://cdn.example/t40.jpg"),
            "https://cdn.example/t40.jpg"
        );
    }
}
