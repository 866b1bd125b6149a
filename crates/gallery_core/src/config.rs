//! Gallery configuration

use crate::error::GalleryError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main gallery configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub picker: PickerOptions,
    pub thumbnails: ThumbnailConfig,
    pub logging: LoggingConfig,
}

/// Per-gallery picker options.
///
/// Fixed at setup; the gallery never changes them afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    /// Captions can be attached to items
    pub has_captions: bool,
    /// Captions keep formatting entities; otherwise only the text is kept
    pub allow_caption_entities: bool,
    /// Self-destruct timer can be set on items
    pub has_timer: bool,
    /// Editor offers the crop tool only
    pub only_crop: bool,
    /// No captions when sending as file
    pub inhibit_document_captions: bool,
    /// Video mute toggle is unavailable
    pub inhibit_mute: bool,
    /// Items are sent as files instead of compressed media
    pub as_file: bool,
    /// Maximum number of selected items, 0 = unlimited
    pub items_limit: usize,
    /// Completion may be sent silently
    pub has_silent_posting: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            has_captions: true,
            allow_caption_entities: true,
            has_timer: false,
            only_crop: false,
            inhibit_document_captions: false,
            inhibit_mute: false,
            as_file: false,
            items_limit: 0,
            has_silent_posting: false,
        }
    }
}

impl PickerOptions {
    /// Whether captions can be edited under these options
    pub fn captions_enabled(&self) -> bool {
        self.has_captions && !(self.as_file && self.inhibit_document_captions)
    }

    /// Whether one more item may be selected when `selected` already are
    pub fn can_select_more(&self, selected: usize) -> bool {
        self.items_limit == 0 || selected < self.items_limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Edge length of the generated placeholder
    pub placeholder_size: u32,
    /// Placeholder fill, "#rrggbb"
    pub placeholder_color: String,
    /// Longest edge of resolved thumbnails
    pub max_dimension: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            placeholder_size: 64,
            placeholder_color: "#202020".to_string(),
            max_dimension: 256,
        }
    }
}

impl ThumbnailConfig {
    /// Parse `placeholder_color` into RGBA, opaque
    pub fn placeholder_rgba(&self) -> Option<[u8; 4]> {
        let hex = self.placeholder_color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?, 255])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Days to keep rolled log files
    pub retention_days: u32,
    /// Filter used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            retention_days: 7,
            filter: "info".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Load configuration from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, defaults if it doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)
                .map_err(|e| GalleryError::Config(format!("{}: {}", path.display(), e.message())))?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "PickerGallery", "PickerGallery")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}
