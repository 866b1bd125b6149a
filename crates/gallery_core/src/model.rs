//! Gallery model: the items on display and which one is focused

use crate::item::{ItemId, MediaItem};
use crate::source::SourceKind;

/// Backing state of a presented gallery
#[derive(Debug, Clone)]
pub struct GalleryModel {
    items: Vec<MediaItem>,
    focused: Option<usize>,
    source_kind: SourceKind,
}

impl GalleryModel {
    /// Create a model focused on `focus`; `None` if it isn't among `items`
    pub fn new(items: Vec<MediaItem>, focus: &ItemId, source_kind: SourceKind) -> Option<Self> {
        let index = items.iter().position(|item| &item.id == focus)?;
        Some(Self {
            items,
            focused: Some(index),
            source_kind,
        })
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&MediaItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_item(&self) -> Option<&MediaItem> {
        self.focused.and_then(|i| self.items.get(i))
    }

    /// Focus an index, clamped to the item range.
    /// Returns true when the focused item changed.
    pub fn set_focus(&mut self, index: usize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let index = index.min(self.items.len() - 1);
        let changed = self.focused != Some(index);
        self.focused = Some(index);
        changed
    }

    /// Move focus to the next item
    pub fn next(&mut self) -> bool {
        match self.focused {
            Some(i) if i + 1 < self.items.len() => self.set_focus(i + 1),
            _ => false,
        }
    }

    /// Move focus to the previous item
    pub fn prev(&mut self) -> bool {
        match self.focused {
            Some(i) if i > 0 => self.set_focus(i - 1),
            _ => false,
        }
    }

    /// Swap in a new item list and remap focus.
    ///
    /// The focused item keeps focus if it's still present. Otherwise the
    /// previous position is clamped into the new list, and an empty list
    /// leaves nothing focused. Returns true when the focused item changed.
    pub fn replace_items(&mut self, items: Vec<MediaItem>, source_kind: SourceKind) -> bool {
        let previous_id = self.focused_item().map(|item| item.id.clone());
        let previous_index = self.focused;

        self.items = items;
        self.source_kind = source_kind;

        self.focused = match (&previous_id, previous_index) {
            _ if self.items.is_empty() => None,
            (Some(id), _) if self.index_of(id).is_some() => self.index_of(id),
            (_, Some(index)) => Some(index.min(self.items.len() - 1)),
            (_, None) => Some(0),
        };

        let current_id = self.focused_item().map(|item| &item.id);
        current_id != previous_id.as_ref()
    }
}
