//! Item sources the gallery can be built from
//!
//! A gallery shows either a flat fetch result or a list of moments
//! (items grouped by capture time). The two shapes are variants of
//! [`ItemSource`], so exactly one of them backs any gallery.

use crate::item::{ItemId, MediaItem};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Flat, ordered collection of items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    items: Vec<MediaItem>,
}

impl FetchResult {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
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

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn into_items(self) -> Vec<MediaItem> {
        self.items
    }
}

impl FromIterator<MediaItem> for FetchResult {
    fn from_iter<I: IntoIterator<Item = MediaItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Items captured around the same time and place
#[derive(Debug, Clone, PartialEq)]
pub struct Moment {
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub items: Vec<MediaItem>,
}

impl Moment {
    pub fn new(title: impl Into<String>, items: Vec<MediaItem>) -> Self {
        Self {
            title: title.into(),
            start: None,
            end: None,
            items,
        }
    }

    pub fn with_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}

/// Moment-grouped item list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentList {
    moments: Vec<Moment>,
}

impl MomentList {
    pub fn new(moments: Vec<Moment>) -> Self {
        Self { moments }
    }

    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// Total item count across moments, duplicates included
    pub fn item_count(&self) -> usize {
        self.moments.iter().map(|m| m.items.len()).sum()
    }

    /// Items in moment order; an id seen in an earlier moment is skipped
    pub fn flatten(&self) -> Vec<MediaItem> {
        let mut seen = HashSet::new();
        self.moments
            .iter()
            .flat_map(|m| m.items.iter())
            .filter(|item| seen.insert(item.id.clone()))
            .cloned()
            .collect()
    }

    /// Find the moment containing an item
    pub fn moment_of(&self, id: &ItemId) -> Option<&Moment> {
        self.moments
            .iter()
            .find(|m| m.items.iter().any(|item| &item.id == id))
    }
}

/// Which shape the gallery items come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    FetchResult,
    MomentList,
}

/// The backing item source of a gallery
#[derive(Debug, Clone)]
pub enum ItemSource {
    /// Flat fetch result, optionally labelled with the recipient it's sent to
    Assets {
        fetch_result: FetchResult,
        recipient_name: Option<String>,
    },

    /// Items grouped by moment
    Moments(MomentList),
}

impl ItemSource {
    pub fn assets(fetch_result: FetchResult, recipient_name: Option<String>) -> Self {
        ItemSource::Assets {
            fetch_result,
            recipient_name,
        }
    }

    pub fn moments(moment_list: MomentList) -> Self {
        ItemSource::Moments(moment_list)
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ItemSource::Assets { .. } => SourceKind::FetchResult,
            ItemSource::Moments(_) => SourceKind::MomentList,
        }
    }

    pub fn recipient_name(&self) -> Option<&str> {
        match self {
            ItemSource::Assets { recipient_name, .. } => recipient_name.as_deref(),
            ItemSource::Moments(_) => None,
        }
    }

    /// Items in presentation order
    pub fn items(&self) -> Vec<MediaItem> {
        match self {
            ItemSource::Assets { fetch_result, .. } => fetch_result.items().to_vec(),
            ItemSource::Moments(list) => list.flatten(),
        }
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        match self {
            ItemSource::Assets { fetch_result, .. } => fetch_result.index_of(id).is_some(),
            ItemSource::Moments(list) => list.moment_of(id).is_some(),
        }
    }
}
