//! Gallery error types

use crate::controller::PresentationPhase;
use crate::item::ItemId;
use thiserror::Error;

/// Main gallery error type
#[derive(Error, Debug)]
pub enum GalleryError {
    // ===== Setup errors (caller bug, reject) =====
    #[error("Item {0} is not part of the item source")]
    ItemNotInSource(ItemId),

    #[error("Configuration error: {0}")]
    Config(String),

    // ===== Recoverable (report, keep the gallery running) =====
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Cannot {action} while {from:?}")]
    InvalidTransition {
        from: PresentationPhase,
        action: &'static str,
    },

    #[error("Gallery is in preview mode")]
    PreviewMode,

    #[error("Editor is not available: {0}")]
    EditorUnavailable(String),

    #[error("Captions are disabled")]
    CaptionsDisabled,

    #[error("Self-destruct timer is disabled")]
    TimerDisabled,

    #[error("Muting is inhibited")]
    MuteInhibited,

    #[error("Selection limit of {0} items reached")]
    SelectionLimitReached(usize),

    #[error("No selection context")]
    NoSelectionContext,

    #[error("No editing context")]
    NoEditingContext,

    #[error("No thumbnail available for {0}")]
    ThumbnailUnavailable(ItemId),

    #[error("Thumbnail error: {0}")]
    Thumbnail(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Terminal (the gallery is gone) =====
    #[error("Gallery model has been released")]
    ModelReleased,
}

impl GalleryError {
    /// Can the gallery keep running after this error?
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            GalleryError::ItemNotInSource(_) | GalleryError::Config(_) | GalleryError::ModelReleased
        )
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::SelectionLimitReached(limit) => {
                format!("You can select up to {} items", limit)
            }
            GalleryError::ThumbnailUnavailable(_) | GalleryError::Thumbnail(_) => {
                "Preview is not available".to_string()
            }
            GalleryError::MuteInhibited => "Sound cannot be turned off for this item".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<image::ImageError> for GalleryError {
    fn from(e: image::ImageError) -> Self {
        GalleryError::Thumbnail(e.to_string())
    }
}
