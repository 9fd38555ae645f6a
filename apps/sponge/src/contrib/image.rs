//! # Image Handler
//!
//! An HTTP-exposed controller that serves JPEGs out of the application's
//! image directory, with an optional crop-and-fit pipeline and an optional
//! disk cache.
//!
//! URLs are interpreted relative to the mount point:
//!
//! - `photo.jpg` — load, re-encode as JPEG and serve
//! - `crop/200x100/photo.jpg` — centered crop to the 200x100 aspect,
//!   resize, serve
//!
//! The cache is keyed by the raw request path, crop prefix included, and
//! checked before any image work. There is no eviction and no locking;
//! concurrent writers are last-writer-wins, which is fine for a cache of
//! derived files.

use crate::controller::{Controller, SpongeRequest, SpongeResponse};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use sponge_core::{RouteSpec, SpongeError, fit_box};
use std::path::{Component, Path, PathBuf};

// =============================================================================
// OPTIONS
// =============================================================================

/// Knobs for the [`picture`] pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PictureOptions {
    /// Crop the source to the target aspect before resizing.
    pub crop: bool,
    /// Paste the result centered on a canvas of the target size.
    pub center: bool,
    /// Canvas color when centering.
    pub background: [u8; 3],
}

impl Default for PictureOptions {
    fn default() -> Self {
        Self {
            crop: false,
            center: false,
            background: [255, 255, 255],
        }
    }
}

// =============================================================================
// IMAGE HELPERS
// =============================================================================

/// Load `path` under `base`, convert to RGB and re-encode as JPEG.
pub fn jpeg(base: &Path, path: &str) -> Result<Vec<u8>, SpongeError> {
    let full = safe_join(base, path)?;
    let rgb = load_rgb(&full)?;
    encode_jpeg(&rgb)
}

/// Load `path` under `base` and fit it to `width x height`.
///
/// With `crop`, the source is first cropped (centered) to the target
/// aspect via the integer fit geometry; the crop is then resized with
/// Lanczos3. With `center`, the resized image is pasted centered onto an
/// RGB canvas of exactly the target size.
pub fn picture(
    base: &Path,
    path: &str,
    width: u32,
    height: u32,
    options: PictureOptions,
) -> Result<Vec<u8>, SpongeError> {
    let full = safe_join(base, path)?;
    let mut rgb = load_rgb(&full)?;

    if options.crop {
        let window = fit_box(rgb.width(), rgb.height(), width, height);
        rgb = imageops::crop_imm(&rgb, window.x, window.y, window.width, window.height).to_image();
    }

    let resized = imageops::resize(&rgb, width.max(1), height.max(1), FilterType::Lanczos3);

    if options.center {
        let mut canvas = RgbImage::from_pixel(width.max(1), height.max(1), Rgb(options.background));
        let (x, y) = sponge_core::center_offsets(
            canvas.width(),
            canvas.height(),
            resized.width(),
            resized.height(),
        );
        imageops::overlay(&mut canvas, &resized, x, y);
        encode_jpeg(&canvas)
    } else {
        encode_jpeg(&resized)
    }
}

fn load_rgb(path: &Path) -> Result<RgbImage, SpongeError> {
    let image = image::open(path).map_err(|e| SpongeError::Image(e.to_string()))?;
    Ok(image.into_rgb8())
}

fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>, SpongeError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, 100);
    rgb.write_with_encoder(encoder)
        .map_err(|e| SpongeError::Image(e.to_string()))?;
    Ok(buffer)
}

/// Join a request path under a base directory, refusing traversal.
fn safe_join(base: &Path, path: &str) -> Result<PathBuf, SpongeError> {
    let relative = Path::new(path);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(SpongeError::Image(format!(
                    "refusing the path \"{path}\""
                )));
            }
        }
    }
    Ok(base.join(relative))
}

// =============================================================================
// THE HANDLER
// =============================================================================

/// Serves (optionally cropped, optionally cached) JPEGs over HTTP.
#[derive(Debug, Clone)]
pub struct ImageHandler {
    image_dir: PathBuf,
    cache_at: Option<PathBuf>,
}

impl ImageHandler {
    /// A handler over `image_dir`, caching derived files under `cache_at`.
    ///
    /// The cache directory must already exist; pointing the handler at a
    /// missing one is a configuration mistake, reported as such.
    pub fn new(image_dir: PathBuf, cache_at: Option<PathBuf>) -> Result<Self, SpongeError> {
        if let Some(cache) = &cache_at {
            if !cache.is_dir() {
                return Err(SpongeError::InvalidCachePath(cache.display().to_string()));
            }
        }
        Ok(Self {
            image_dir,
            cache_at,
        })
    }

    fn serve(&self, request: &SpongeRequest) -> Result<SpongeResponse, SpongeError> {
        let path = request.param("path").unwrap_or("").trim_matches('/');
        if path.is_empty() {
            return Ok(SpongeResponse::not_found("not found"));
        }

        // The cache key is the raw request path, crop prefix included, so
        // two crop sizes of one source cache independently.
        if let Some(cached) = self.cached(path)? {
            return Ok(SpongeResponse::jpeg(cached));
        }

        let body = match parse_crop(path) {
            Some((width, height, rest)) => picture(
                &self.image_dir,
                rest,
                width,
                height,
                PictureOptions {
                    crop: true,
                    center: true,
                    ..PictureOptions::default()
                },
            )?,
            None => jpeg(&self.image_dir, path)?,
        };

        self.store(path, &body)?;
        Ok(SpongeResponse::jpeg(body))
    }

    fn cached(&self, key: &str) -> Result<Option<Vec<u8>>, SpongeError> {
        let Some(cache) = &self.cache_at else {
            return Ok(None);
        };
        let file = safe_join(cache, key)?;
        if file.is_file() {
            let body = std::fs::read(&file).map_err(|e| SpongeError::Io(e.to_string()))?;
            Ok(Some(body))
        } else {
            Ok(None)
        }
    }

    fn store(&self, key: &str, body: &[u8]) -> Result<(), SpongeError> {
        let Some(cache) = &self.cache_at else {
            return Ok(());
        };
        let file = safe_join(cache, key)?;
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SpongeError::Io(e.to_string()))?;
        }
        std::fs::write(&file, body).map_err(|e| SpongeError::Io(e.to_string()))
    }
}

impl Controller for ImageHandler {
    fn routes(&self) -> Option<Vec<RouteSpec>> {
        Some(vec![
            RouteSpec::new("/", "serve"),
            RouteSpec::new("/{*path}", "serve"),
        ])
    }

    fn dispatch(
        &self,
        action: &str,
        request: &SpongeRequest,
    ) -> Result<SpongeResponse, SpongeError> {
        match action {
            "serve" => self.serve(request),
            other => Ok(SpongeResponse::not_found(format!(
                "no such action \"{other}\""
            ))),
        }
    }
}

/// Split a `crop/<W>x<H>/<rest...>` path into its parts.
///
/// The first segment must be the literal `crop`, the second `<digits>x
/// <digits>`, and at least one segment must follow; anything else is a
/// plain image path.
fn parse_crop(path: &str) -> Option<(u32, u32, &str)> {
    let rest = path.strip_prefix("crop/")?;
    let (size, tail) = rest.split_once('/')?;
    if tail.is_empty() {
        return None;
    }
    let (w, h) = size.split_once('x')?;
    if w.is_empty() || h.is_empty() {
        return None;
    }
    if !w.bytes().all(|b| b.is_ascii_digit()) || !h.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((w.parse().ok()?, h.parse().ok()?, tail))
}

// =============================================================================
// TESTS
// =============================================================================
