//! Thumbnails and the pluggable thumbnail resolver

use crate::error::GalleryError;
use crate::item::MediaItem;
use futures::future::BoxFuture;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// Decoded thumbnail, cheap to clone
#[derive(Debug, Clone)]
pub struct Thumbnail(Arc<RgbaImage>);

impl Thumbnail {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Flat square placeholder
    pub fn placeholder(size: u32, rgba: [u8; 4]) -> Self {
        let size = size.max(1);
        Self::new(RgbaImage::from_pixel(size, size, Rgba(rgba)))
    }

    /// Downscale to fit `max_dimension`, keeping aspect ratio
    pub fn from_image(image: &image::DynamicImage, max_dimension: u32) -> Self {
        Self::new(image.thumbnail(max_dimension, max_dimension).to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

/// Lazily produced thumbnail; nothing runs until it's polled
pub type ThumbnailSignal = BoxFuture<'static, Result<Thumbnail, GalleryError>>;

/// Maps an item to its thumbnail signal
pub type ThumbnailResolver = Arc<dyn Fn(&MediaItem) -> ThumbnailSignal + Send + Sync>;

/// Signal that resolves immediately
pub fn ready(result: Result<Thumbnail, GalleryError>) -> ThumbnailSignal {
    Box::pin(futures::future::ready(result))
}
