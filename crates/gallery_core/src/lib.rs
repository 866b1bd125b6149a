//! PickerGallery Core
//!
//! This crate contains:
//! - Media items and the two item source shapes (fetch result, moment list)
//! - Gallery model and presented controller
//! - The host-facing gallery mixin
//! - Configuration
//! - Error types
//! - Thumbnails

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod event;
pub mod item;
pub mod mixin;
pub mod model;
pub mod source;
pub mod thumbnail;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{GalleryConfig, LoggingConfig, PickerOptions, ThumbnailConfig};
pub use context::{
    Caption, CaptionEntity, EditingContext, EntityKind, HostContext, PresentationHost,
    SelectionContext, SuggestionContext,
};
pub use controller::{EditorTools, GalleryController, InterfaceMode, PresentationPhase};
pub use error::GalleryError;
pub use event::GalleryEvent;
pub use item::{ItemId, MediaItem, MediaKind};
pub use mixin::{GalleryMixin, GallerySetup};
pub use model::GalleryModel;
pub use source::{FetchResult, ItemSource, Moment, MomentList, SourceKind};
pub use thumbnail::{Thumbnail, ThumbnailResolver, ThumbnailSignal};
pub use view::{Rect, ReferenceView, ScreenSize};
