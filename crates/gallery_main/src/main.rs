//! PickerGallery - media picker gallery demo host
//!
//! Usage: picker_gallery [--moments] [--reduce-motion] <folder>

mod library;
mod session;

use anyhow::{bail, Result};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first, logging reads its filter
    let config = gallery_core::GalleryConfig::load().unwrap_or_default();

    gallery_log::init(&config.logging.filter)?;

    if let Err(e) = gallery_log::cleanup_old_logs(config.logging.retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("PickerGallery starting...");

    let mut options = session::SessionOptions {
        by_moments: false,
        reduce_motion: false,
    };
    let mut folder = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--moments" => options.by_moments = true,
            "--reduce-motion" => options.reduce_motion = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            path => folder = Some(PathBuf::from(path)),
        }
    }
    let folder = folder.unwrap_or_else(|| PathBuf::from("."));

    session::run(&config, &folder, options).await
}
