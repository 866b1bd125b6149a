//! Host-side collaborators the gallery talks to
//!
//! None of these are owned by the gallery. The host implements them and
//! passes them in at setup; the gallery only reads and reports through them.

use crate::controller::GalleryController;
use crate::item::{ItemId, MediaItem};
use crate::view::ScreenSize;
use std::sync::Arc;

/// Platform environment the gallery runs in
pub trait HostContext: Send + Sync {
    fn screen_size(&self) -> ScreenSize;

    /// Skip transition animations
    fn reduce_motion(&self) -> bool {
        false
    }
}

/// Parent controller that puts the gallery on screen
pub trait PresentationHost: Send + Sync {
    /// Show the gallery on top of the host's content
    fn present_gallery(&self, controller: Arc<GalleryController>);

    /// Remove the gallery once it finished transitioning out
    fn dismiss_gallery(&self, controller: &GalleryController);
}

/// Which items the user picked for sending
pub trait SelectionContext: Send + Sync {
    fn is_selected(&self, id: &ItemId) -> bool;
    fn selected_count(&self) -> usize;
    fn set_selected(&self, item: &MediaItem, selected: bool);
}

/// Caption formatting span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionEntity {
    pub kind: EntityKind,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Bold,
    Italic,
    Code,
    Mention,
    Hashtag,
    Url,
}

/// Caption attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caption {
    pub text: String,
    pub entities: Vec<CaptionEntity>,
}

impl Caption {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Per-item edits (captions, timers, mute) kept by the host
pub trait EditingContext: Send + Sync {
    fn caption(&self, id: &ItemId) -> Option<Caption>;
    fn set_caption(&self, id: &ItemId, caption: Option<Caption>);

    /// Self-destruct timeout in seconds
    fn timer(&self, id: &ItemId) -> Option<u32>;
    fn set_timer(&self, id: &ItemId, seconds: Option<u32>);

    fn is_muted(&self, id: &ItemId) -> bool;
    fn set_muted(&self, id: &ItemId, muted: bool);
}

/// Mention/hashtag completions offered while typing a caption
pub trait SuggestionContext: Send + Sync {
    fn suggestions(&self, query: &str) -> Vec<String>;
}
