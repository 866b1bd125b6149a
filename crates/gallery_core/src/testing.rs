//! In-memory collaborators for tests

use crate::context::{
    Caption, EditingContext, HostContext, PresentationHost, SelectionContext, SuggestionContext,
};
use crate::controller::GalleryController;
use crate::item::{ItemId, MediaItem};
use crate::source::{FetchResult, Moment, MomentList};
use crate::view::ScreenSize;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub fn photos(ids: &[&str]) -> Vec<MediaItem> {
    ids.iter().map(|id| MediaItem::photo(*id, 1200, 800)).collect()
}

pub fn fetch_result(ids: &[&str]) -> FetchResult {
    FetchResult::new(photos(ids))
}

pub fn moment_list(groups: &[(&str, &[&str])]) -> MomentList {
    MomentList::new(
        groups
            .iter()
            .map(|(title, ids)| Moment::new(*title, photos(ids)))
            .collect(),
    )
}

#[derive(Default)]
pub struct FakeHost {
    pub reduce_motion: bool,
}

impl HostContext for FakeHost {
    fn screen_size(&self) -> ScreenSize {
        ScreenSize {
            width: 390,
            height: 844,
        }
    }

    fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }
}

/// Counts presentations and dismissals
#[derive(Default)]
pub struct RecordingParent {
    pub presented: Mutex<Vec<uuid::Uuid>>,
    pub dismissed: Mutex<Vec<uuid::Uuid>>,
}

impl PresentationHost for RecordingParent {
    fn present_gallery(&self, controller: Arc<GalleryController>) {
        self.presented.lock().push(controller.id());
    }

    fn dismiss_gallery(&self, controller: &GalleryController) {
        self.dismissed.lock().push(controller.id());
    }
}

#[derive(Default)]
pub struct MemorySelection {
    selected: Mutex<HashSet<ItemId>>,
}

impl SelectionContext for MemorySelection {
    fn is_selected(&self, id: &ItemId) -> bool {
        self.selected.lock().contains(id)
    }

    fn selected_count(&self) -> usize {
        self.selected.lock().len()
    }

    fn set_selected(&self, item: &MediaItem, selected: bool) {
        let mut set = self.selected.lock();
        if selected {
            set.insert(item.id.clone());
        } else {
            set.remove(&item.id);
        }
    }
}

#[derive(Default)]
pub struct MemoryEditing {
    pub captions: Mutex<HashMap<ItemId, Caption>>,
    pub timers: Mutex<HashMap<ItemId, u32>>,
    pub muted: Mutex<HashSet<ItemId>>,
}

impl EditingContext for MemoryEditing {
    fn caption(&self, id: &ItemId) -> Option<Caption> {
        self.captions.lock().get(id).cloned()
    }

    fn set_caption(&self, id: &ItemId, caption: Option<Caption>) {
        let mut captions = self.captions.lock();
        match caption {
            Some(c) => captions.insert(id.clone(), c),
            None => captions.remove(id),
        };
    }

    fn timer(&self, id: &ItemId) -> Option<u32> {
        self.timers.lock().get(id).copied()
    }

    fn set_timer(&self, id: &ItemId, seconds: Option<u32>) {
        let mut timers = self.timers.lock();
        match seconds {
            Some(s) => timers.insert(id.clone(), s),
            None => timers.remove(id),
        };
    }

    fn is_muted(&self, id: &ItemId) -> bool {
        self.muted.lock().contains(id)
    }

    fn set_muted(&self, id: &ItemId, muted: bool) {
        let mut set = self.muted.lock();
        if muted {
            set.insert(id.clone());
        } else {
            set.remove(id);
        }
    }
}

pub struct StaticSuggestions(pub Vec<&'static str>);

impl SuggestionContext for StaticSuggestions {
    fn suggestions(&self, query: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|s| s.starts_with(query))
            .map(|s| s.to_string())
            .collect()
    }
}
