//! Folder-backed media library for the demo host

use anyhow::Result;
use chrono::{DateTime, Utc};
use gallery_core::{FetchResult, GalleryError, ItemId, MediaItem, Moment, MomentList, Thumbnail};
use image::ImageReader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Images found in a folder, with the file behind each item
pub struct Library {
    pub fetch_result: FetchResult,
    paths: HashMap<ItemId, PathBuf>,
}

impl Library {
    /// Scan a folder (non-recursive) for supported images, oldest first
    pub fn scan(folder: &Path) -> Result<Self> {
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(folder)? {
            let path = entry?.path();
            if !path.is_file() || !is_supported_image(&path) {
                continue;
            }

            let (width, height) = match image_dimensions(&path) {
                Ok(dims) => dims,
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            let created = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from);

            let id = ItemId::new(path.to_string_lossy());
            let mut item = MediaItem::photo(id.as_str(), width, height);
            item.created = created;
            entries.push((item, path));
        }

        entries.sort_by(|(a, _), (b, _)| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        tracing::info!("Found {} images in {:?}", entries.len(), folder);

        let paths = entries
            .iter()
            .map(|(item, path)| (item.id.clone(), path.clone()))
            .collect();
        let fetch_result = entries.into_iter().map(|(item, _)| item).collect();

        Ok(Self { fetch_result, paths })
    }

    pub fn path_of(&self, id: &ItemId) -> Option<&PathBuf> {
        self.paths.get(id)
    }

    /// Group items into one moment per calendar day
    pub fn moments_by_day(&self) -> MomentList {
        let mut days: Vec<(String, Vec<MediaItem>)> = Vec::new();

        for item in self.fetch_result.items() {
            let day = item
                .created
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Undated".to_string());

            match days.last_mut() {
                Some((title, items)) if *title == day => items.push(item.clone()),
                _ => days.push((day, vec![item.clone()])),
            }
        }

        let moments = days
            .into_iter()
            .map(|(title, items)| {
                let range = items
                    .first()
                    .and_then(|i| i.created)
                    .zip(items.last().and_then(|i| i.created));
                let moment = Moment::new(title, items);
                match range {
                    Some((start, end)) => moment.with_range(start, end),
                    None => moment,
                }
            })
            .collect();

        MomentList::new(moments)
    }
}

/// Decode a file and downscale it to fit `max_dimension`
pub fn load_thumbnail(path: &Path, max_dimension: u32) -> Result<Thumbnail, GalleryError> {
    tracing::debug!("Generating thumbnail: {:?}", path);

    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;

    Ok(Thumbnail::from_image(&img, max_dimension))
}

fn image_dimensions(path: &Path) -> Result<(u32, u32), GalleryError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Check if a file is a supported image format
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp"
            )
        })
        .unwrap_or(false)
}
