//! Gallery lifecycle events and the listener slots they're delivered to

use crate::item::MediaItem;
use crate::view::ReferenceView;

/// Something that happened in the gallery
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    ItemFocused(MediaItem),
    WillTransitionIn,
    WillTransitionOut,
    DidTransitionOut,
    Completed { item: MediaItem, silent: bool },
    EditorOpened,
    EditorClosed,
}

impl GalleryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GalleryEvent::ItemFocused(_) => "item_focused",
            GalleryEvent::WillTransitionIn => "will_transition_in",
            GalleryEvent::WillTransitionOut => "will_transition_out",
            GalleryEvent::DidTransitionOut => "did_transition_out",
            GalleryEvent::Completed { .. } => "complete_with_item",
            GalleryEvent::EditorOpened => "editor_opened",
            GalleryEvent::EditorClosed => "editor_closed",
        }
    }
}

type ItemCallback = Box<dyn Fn(&MediaItem) + Send + Sync>;
type Callback = Box<dyn Fn() + Send + Sync>;
type ReferenceViewCallback = Box<dyn Fn(&MediaItem) -> Option<ReferenceView> + Send + Sync>;
type CompleteCallback = Box<dyn Fn(&MediaItem, bool) + Send + Sync>;

/// One listener per named event; assigning a slot replaces its listener
#[derive(Default)]
pub struct GalleryCallbacks {
    pub(crate) item_focused: Option<ItemCallback>,
    pub(crate) will_transition_in: Option<Callback>,
    pub(crate) will_transition_out: Option<Callback>,
    pub(crate) did_transition_out: Option<Callback>,
    pub(crate) reference_view_for_item: Option<ReferenceViewCallback>,
    pub(crate) complete_with_item: Option<CompleteCallback>,
    pub(crate) editor_opened: Option<Callback>,
    pub(crate) editor_closed: Option<Callback>,
}

impl GalleryCallbacks {
    /// Deliver a push event to its slot. Returns false if the slot is empty.
    pub(crate) fn deliver(&self, event: &GalleryEvent) -> bool {
        fn call(slot: &Option<Callback>) -> bool {
            slot.as_ref().map(|f| f()).is_some()
        }

        match event {
            GalleryEvent::ItemFocused(item) => self.item_focused.as_ref().map(|f| f(item)).is_some(),
            GalleryEvent::WillTransitionIn => call(&self.will_transition_in),
            GalleryEvent::WillTransitionOut => call(&self.will_transition_out),
            GalleryEvent::DidTransitionOut => call(&self.did_transition_out),
            GalleryEvent::Completed { item, silent } => self
                .complete_with_item
                .as_ref()
                .map(|f| f(item, *silent))
                .is_some(),
            GalleryEvent::EditorOpened => call(&self.editor_opened),
            GalleryEvent::EditorClosed => call(&self.editor_closed),
        }
    }

    /// Pull the anchor view for an item from the host
    pub(crate) fn reference_view(&self, item: &MediaItem) -> Option<ReferenceView> {
        self.reference_view_for_item.as_ref().and_then(|f| f(item))
    }
}

impl std::fmt::Debug for GalleryCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryCallbacks")
            .field("item_focused", &self.item_focused.is_some())
            .field("will_transition_in", &self.will_transition_in.is_some())
            .field("will_transition_out", &self.will_transition_out.is_some())
            .field("did_transition_out", &self.did_transition_out.is_some())
            .field("reference_view_for_item", &self.reference_view_for_item.is_some())
            .field("complete_with_item", &self.complete_with_item.is_some())
            .field("editor_opened", &self.editor_opened.is_some())
            .field("editor_closed", &self.editor_closed.is_some())
            .finish()
    }
}
