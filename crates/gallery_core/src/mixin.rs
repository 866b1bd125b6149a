//! Gallery mixin: the host-facing side of a media picker gallery
//!
//! The host builds a [`GalleryMixin`] from a [`GallerySetup`], assigns the
//! listener slots it cares about, and calls [`GalleryMixin::present`]. From
//! there on the gallery controller queues lifecycle events, and every mixin
//! operation (or an explicit [`GalleryMixin::dispatch_pending`]) delivers them
//! to the listeners on the calling thread.
//!
//! The mixin never owns the [`GalleryModel`]. It keeps a weak handle that
//! stops resolving once the controller is dismissed; after that, queries
//! return `None` and commands report [`GalleryError::ModelReleased`].

use crate::config::PickerOptions;
use crate::context::{
    Caption, EditingContext, HostContext, PresentationHost, SelectionContext, SuggestionContext,
};
use crate::controller::{EditorTools, GalleryController, PresentationPhase};
use crate::error::GalleryError;
use crate::event::{GalleryCallbacks, GalleryEvent};
use crate::item::{ItemId, MediaItem};
use crate::model::GalleryModel;
use crate::source::{FetchResult, ItemSource, SourceKind};
use crate::thumbnail::{self, Thumbnail, ThumbnailResolver, ThumbnailSignal};
use crate::view::ReferenceView;
use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// Everything needed to build a gallery
pub struct GallerySetup {
    pub context: Arc<dyn HostContext>,
    pub parent: Arc<dyn PresentationHost>,
    /// Item the gallery opens on
    pub item: ItemId,
    pub source: ItemSource,
    /// Shown while the real thumbnail resolves
    pub thumbnail_image: Option<Thumbnail>,
    pub selection: Option<Arc<dyn SelectionContext>>,
    pub editing: Option<Arc<dyn EditingContext>>,
    pub suggestions: Option<Arc<dyn SuggestionContext>>,
    pub options: PickerOptions,
}

impl GallerySetup {
    pub fn new(
        context: Arc<dyn HostContext>,
        parent: Arc<dyn PresentationHost>,
        item: ItemId,
        source: ItemSource,
    ) -> Self {
        Self {
            context,
            parent,
            item,
            source,
            thumbnail_image: None,
            selection: None,
            editing: None,
            suggestions: None,
            options: PickerOptions::default(),
        }
    }

    pub fn with_thumbnail_image(mut self, image: Thumbnail) -> Self {
        self.thumbnail_image = Some(image);
        self
    }

    pub fn with_selection(mut self, selection: Arc<dyn SelectionContext>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_editing(mut self, editing: Arc<dyn EditingContext>) -> Self {
        self.editing = Some(editing);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Arc<dyn SuggestionContext>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub fn with_options(mut self, options: PickerOptions) -> Self {
        self.options = options;
        self
    }
}

/// Host-facing gallery coordinator
pub struct GalleryMixin {
    context: Arc<dyn HostContext>,
    parent: Arc<dyn PresentationHost>,
    controller: Arc<GalleryController>,
    events: Receiver<GalleryEvent>,
    gallery_model: Weak<RwLock<GalleryModel>>,

    placeholder: Option<Thumbnail>,
    thumbnail_resolver: Option<ThumbnailResolver>,

    selection: Option<Arc<dyn SelectionContext>>,
    editing: Option<Arc<dyn EditingContext>>,
    suggestions: Option<Arc<dyn SuggestionContext>>,

    options: PickerOptions,
    recipient_name: Option<String>,

    callbacks: GalleryCallbacks,
}

impl GalleryMixin {
    /// Build a gallery over `setup.source`, focused on `setup.item`.
    ///
    /// Fails with [`GalleryError::ItemNotInSource`] if the item isn't in the
    /// source, which includes an empty source.
    pub fn new(setup: GallerySetup) -> Result<Self, GalleryError> {
        let GallerySetup {
            context,
            parent,
            item,
            source,
            thumbnail_image,
            selection,
            editing,
            suggestions,
            options,
        } = setup;

        let recipient_name = source.recipient_name().map(str::to_owned);
        let model = GalleryModel::new(source.items(), &item, source.kind())
            .ok_or_else(|| GalleryError::ItemNotInSource(item.clone()))?;

        let (controller, events) = GalleryController::new(model);
        let gallery_model = controller.model_handle();

        tracing::debug!(
            controller = %controller.id(),
            item = %item,
            source = ?source.kind(),
            "Gallery created"
        );

        Ok(Self {
            context,
            parent,
            controller,
            events,
            gallery_model,
            placeholder: thumbnail_image,
            thumbnail_resolver: None,
            selection,
            editing,
            suggestions,
            options,
            recipient_name,
            callbacks: GalleryCallbacks::default(),
        })
    }

    // ========================================
    // Listener slots
    // ========================================

    pub fn set_item_focused(&mut self, f: impl Fn(&MediaItem) + Send + Sync + 'static) {
        self.callbacks.item_focused = Some(Box::new(f));
    }

    pub fn set_will_transition_in(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.callbacks.will_transition_in = Some(Box::new(f));
    }

    pub fn set_will_transition_out(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.callbacks.will_transition_out = Some(Box::new(f));
    }

    pub fn set_did_transition_out(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.callbacks.did_transition_out = Some(Box::new(f));
    }

    pub fn set_reference_view_for_item(
        &mut self,
        f: impl Fn(&MediaItem) -> Option<ReferenceView> + Send + Sync + 'static,
    ) {
        self.callbacks.reference_view_for_item = Some(Box::new(f));
    }

    pub fn set_complete_with_item(&mut self, f: impl Fn(&MediaItem, bool) + Send + Sync + 'static) {
        self.callbacks.complete_with_item = Some(Box::new(f));
    }

    pub fn set_editor_opened(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.callbacks.editor_opened = Some(Box::new(f));
    }

    pub fn set_editor_closed(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.callbacks.editor_closed = Some(Box::new(f));
    }

    // ========================================
    // Accessors
    // ========================================

    /// The model, if its owner still holds it
    pub fn gallery_model(&self) -> Option<Arc<RwLock<GalleryModel>>> {
        self.gallery_model.upgrade()
    }

    pub fn gallery_controller(&self) -> Arc<GalleryController> {
        self.controller.clone()
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    /// Only galleries built from a fetch result carry a recipient
    pub fn recipient_name(&self) -> Option<&str> {
        self.recipient_name.as_deref()
    }

    pub fn phase(&self) -> PresentationPhase {
        self.controller.phase()
    }

    pub fn is_preview_mode(&self) -> bool {
        self.controller.is_preview()
    }

    pub fn focused_item(&self) -> Option<MediaItem> {
        let model = self.gallery_model()?;
        let item = model.read().focused_item().cloned();
        item
    }

    // ========================================
    // Presentation
    // ========================================

    /// Put the gallery on screen
    pub fn present(&self) -> Result<(), GalleryError> {
        self.controller.begin_transition_in()?;
        self.dispatch_pending();

        tracing::debug!(screen = ?self.context.screen_size(), "Presenting gallery");
        self.parent.present_gallery(self.controller.clone());

        if self.context.reduce_motion() {
            self.controller.finish_transition_in()?;
        }

        self.dispatch_pending();
        Ok(())
    }

    /// Start taking the gallery off screen
    pub fn dismiss(&self) -> Result<(), GalleryError> {
        self.controller.begin_dismiss()?;
        self.finish_dismiss_if_instant()?;
        self.dispatch_pending();
        Ok(())
    }

    /// Switch into preview mode; calling it again has no further effect
    pub fn set_preview_mode(&self) {
        self.controller.set_preview_mode();
    }

    /// Deliver queued controller events to their listeners, in order.
    /// Returns how many events were handled.
    pub fn dispatch_pending(&self) -> usize {
        let mut handled = 0;
        for event in self.events.try_iter() {
            if event == GalleryEvent::DidTransitionOut {
                self.parent.dismiss_gallery(&self.controller);
            }
            if !self.callbacks.deliver(&event) {
                tracing::trace!(event = event.name(), "No listener assigned");
            }
            handled += 1;
        }
        handled
    }

    fn finish_dismiss_if_instant(&self) -> Result<(), GalleryError> {
        if self.context.reduce_motion() {
            self.controller.finish_dismiss()?;
        }
        Ok(())
    }

    // ========================================
    // Items
    // ========================================

    /// Replace the backing items with a new fetch result.
    ///
    /// Focus stays on the same item when it's still present, otherwise the
    /// previous position is clamped into the new list.
    pub fn update_with_fetch_result(&self, fetch_result: FetchResult) {
        match self
            .controller
            .replace_items(fetch_result.into_items(), SourceKind::FetchResult)
        {
            Ok(_) => {
                self.dispatch_pending();
            }
            Err(GalleryError::ModelReleased) => {
                tracing::debug!("Ignoring fetch result update, gallery model is gone");
            }
            Err(e) => tracing::warn!("Fetch result update failed: {}", e),
        }
    }

    /// Move focus to an item
    pub fn focus_item(&self, id: &ItemId) -> Result<bool, GalleryError> {
        let changed = self.controller.focus_item(id)?;
        self.dispatch_pending();
        Ok(changed)
    }

    /// Anchor view of the focused item
    pub fn current_reference_view(&self) -> Option<ReferenceView> {
        let item = self.focused_item()?;
        self.callbacks.reference_view(&item)
    }

    /// Anchor view of any item in the gallery
    pub fn reference_view_for(&self, id: &ItemId) -> Option<ReferenceView> {
        let item = self.item(id).ok()?;
        self.callbacks.reference_view(&item)
    }

    fn item(&self, id: &ItemId) -> Result<MediaItem, GalleryError> {
        let model = self.gallery_model().ok_or(GalleryError::ModelReleased)?;
        let item = model.read().item(id).cloned();
        item.ok_or_else(|| GalleryError::ItemNotFound(id.clone()))
    }

    // ========================================
    // Thumbnails
    // ========================================

    /// Install the thumbnail resolver, replacing any previous one
    pub fn set_thumbnail_resolver<F>(&mut self, resolver: F)
    where
        F: Fn(&MediaItem) -> ThumbnailSignal + Send + Sync + 'static,
    {
        self.thumbnail_resolver = Some(Arc::new(resolver));
    }

    /// Thumbnail of an item: the resolver's signal, else the placeholder
    pub fn thumbnail_for(&self, id: &ItemId) -> ThumbnailSignal {
        let item = match self.item(id) {
            Ok(item) => item,
            Err(e) => return thumbnail::ready(Err(e)),
        };

        match (&self.thumbnail_resolver, &self.placeholder) {
            (Some(resolver), _) => resolver(&item),
            (None, Some(placeholder)) => thumbnail::ready(Ok(placeholder.clone())),
            (None, None) => thumbnail::ready(Err(GalleryError::ThumbnailUnavailable(item.id))),
        }
    }

    pub fn placeholder(&self) -> Option<&Thumbnail> {
        self.placeholder.as_ref()
    }

    // ========================================
    // Selection & completion
    // ========================================

    /// Flip an item's selection. Returns the new state.
    pub fn toggle_selection(&self, id: &ItemId) -> Result<bool, GalleryError> {
        let selection = self.selection.as_ref().ok_or(GalleryError::NoSelectionContext)?;
        let item = self.item(id)?;

        if selection.is_selected(id) {
            selection.set_selected(&item, false);
            return Ok(false);
        }

        if !self.options.can_select_more(selection.selected_count()) {
            return Err(GalleryError::SelectionLimitReached(self.options.items_limit));
        }
        selection.set_selected(&item, true);
        Ok(true)
    }

    /// Confirm the focused item and start dismissing.
    ///
    /// An empty selection gets the focused item added first. A silent
    /// request is sent normally when silent posting isn't available.
    pub fn complete(&self, silent: bool) -> Result<(), GalleryError> {
        let silent = if silent && !self.options.has_silent_posting {
            tracing::warn!("Silent posting unavailable, completing normally");
            false
        } else {
            silent
        };

        let item = self.controller.complete(silent)?;
        if let Some(selection) = &self.selection {
            if selection.selected_count() == 0 {
                selection.set_selected(&item, true);
            }
        }

        self.finish_dismiss_if_instant()?;
        self.dispatch_pending();
        Ok(())
    }

    // ========================================
    // Editing
    // ========================================

    /// Open the editor on the focused item
    pub fn open_editor(&self) -> Result<EditorTools, GalleryError> {
        if self.editing.is_none() {
            return Err(GalleryError::NoEditingContext);
        }
        let tools = self.controller.open_editor(self.options.only_crop)?;
        self.dispatch_pending();
        Ok(tools)
    }

    pub fn close_editor(&self) -> Result<(), GalleryError> {
        self.controller.close_editor()?;
        self.dispatch_pending();
        Ok(())
    }

    /// Set or clear an item's caption
    pub fn set_caption(&self, id: &ItemId, caption: Option<Caption>) -> Result<(), GalleryError> {
        if !self.options.captions_enabled() {
            return Err(GalleryError::CaptionsDisabled);
        }
        let editing = self.editing.as_ref().ok_or(GalleryError::NoEditingContext)?;
        self.item(id)?;

        let caption = caption
            .filter(|c| !c.is_empty())
            .map(|mut c| {
                if !self.options.allow_caption_entities {
                    c.entities.clear();
                }
                c
            });
        editing.set_caption(id, caption);
        Ok(())
    }

    /// Set or clear an item's self-destruct timer
    pub fn set_timer(&self, id: &ItemId, seconds: Option<u32>) -> Result<(), GalleryError> {
        if !self.options.has_timer {
            return Err(GalleryError::TimerDisabled);
        }
        let editing = self.editing.as_ref().ok_or(GalleryError::NoEditingContext)?;
        self.item(id)?;

        editing.set_timer(id, seconds.filter(|s| *s > 0));
        Ok(())
    }

    /// Mute or unmute a video
    pub fn set_muted(&self, id: &ItemId, muted: bool) -> Result<(), GalleryError> {
        if self.options.inhibit_mute {
            return Err(GalleryError::MuteInhibited);
        }
        let editing = self.editing.as_ref().ok_or(GalleryError::NoEditingContext)?;
        let item = self.item(id)?;
        if !item.is_playable() {
            return Err(GalleryError::EditorUnavailable("item has no sound".into()));
        }

        editing.set_muted(id, muted);
        Ok(())
    }

    /// Completions for the caption being typed
    pub fn caption_suggestions(&self, query: &str) -> Vec<String> {
        match &self.suggestions {
            Some(suggestions) if self.options.captions_enabled() => suggestions.suggestions(query),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Debug for GalleryMixin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryMixin")
            .field("controller", &self.controller)
            .field("options", &self.options)
            .field("recipient_name", &self.recipient_name)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CaptionEntity, EntityKind};
    use crate::source::MomentList;
    use crate::testing::*;
    use crate::view::Rect;
    use futures::executor::block_on;
    use parking_lot::Mutex;
    use std::time::Duration;

    struct Harness {
        mixin: GalleryMixin,
        parent: Arc<RecordingParent>,
        log: Arc<Mutex<Vec<String>>>,
    }

    fn setup(source: ItemSource, focus: &str) -> GallerySetup {
        GallerySetup::new(
            Arc::new(FakeHost::default()),
            Arc::new(RecordingParent::default()),
            ItemId::from(focus),
            source,
        )
    }

    /// Mixin with every slot recording into `log`; reference views are
    /// tagged with the item's index in `ids`.
    fn harness(setup: GallerySetup, ids: &'static [&'static str]) -> Harness {
        let parent = Arc::new(RecordingParent::default());
        let setup = GallerySetup {
            parent: parent.clone(),
            ..setup
        };
        let mut mixin = GalleryMixin::new(setup).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        mixin.set_item_focused(move |item| sink.lock().push(format!("focused:{}", item.id)));
        let sink = log.clone();
        mixin.set_will_transition_in(move || sink.lock().push("will_in".into()));
        let sink = log.clone();
        mixin.set_will_transition_out(move || sink.lock().push("will_out".into()));
        let sink = log.clone();
        mixin.set_did_transition_out(move || sink.lock().push("did_out".into()));
        let sink = log.clone();
        mixin.set_complete_with_item(move |item, silent| {
            sink.lock().push(format!("complete:{}:{}", item.id, silent))
        });
        let sink = log.clone();
        mixin.set_editor_opened(move || sink.lock().push("editor_opened".into()));
        let sink = log.clone();
        mixin.set_editor_closed(move || sink.lock().push("editor_closed".into()));
        mixin.set_reference_view_for_item(move |item| {
            let index = ids.iter().position(|id| *id == item.id.as_str())?;
            Some(ReferenceView::new(index as u64, Rect::new(0.0, index as f32 * 100.0, 100.0, 100.0)))
        });

        Harness { mixin, parent, log }
    }

    fn presented(setup: GallerySetup, ids: &'static [&'static str]) -> Harness {
        let h = harness(setup, ids);
        h.mixin.present().unwrap();
        h.mixin.gallery_controller().finish_transition_in().unwrap();
        h.log.lock().clear();
        h
    }

    const IDS: &[&str] = &["a", "b", "c"];

    #[test]
    fn test_fetch_result_reference_view_matches_initial_item() {
        let source = ItemSource::assets(fetch_result(IDS), Some("Alice".into()));
        let h = harness(setup(source, "b"), IDS);

        assert_eq!(h.mixin.current_reference_view().map(|v| v.tag), Some(1));
        assert_eq!(h.mixin.recipient_name(), Some("Alice"));
        assert_eq!(h.mixin.phase(), PresentationPhase::Idle);
        assert!(h.log.lock().is_empty());
    }

    #[test]
    fn test_moment_list_has_no_recipient() {
        let source = ItemSource::moments(moment_list(&[("Day 1", &["a", "b"]), ("Day 2", &["c"])]));
        let h = harness(setup(source, "c"), IDS);

        assert_eq!(h.mixin.recipient_name(), None);
        assert_eq!(h.mixin.current_reference_view().map(|v| v.tag), Some(2));
        let model = h.mixin.gallery_model().unwrap();
        assert_eq!(model.read().len(), 3);
        assert_eq!(model.read().source_kind(), SourceKind::MomentList);
    }

    #[test]
    fn test_item_not_in_source_is_rejected() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let err = GalleryMixin::new(setup(source, "zz")).unwrap_err();
        assert!(matches!(err, GalleryError::ItemNotInSource(id) if id.as_str() == "zz"));

        let empty = ItemSource::moments(MomentList::default());
        assert!(GalleryMixin::new(setup(empty, "a")).is_err());
    }

    #[test]
    fn test_present_fires_will_transition_in() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = harness(setup(source, "a"), IDS);

        h.mixin.present().unwrap();
        assert_eq!(*h.log.lock(), vec!["will_in".to_string()]);
        assert_eq!(h.parent.presented.lock().len(), 1);
        assert_eq!(h.mixin.phase(), PresentationPhase::TransitioningIn);

        assert!(matches!(
            h.mixin.present(),
            Err(GalleryError::InvalidTransition { .. })
        ));
    }

    struct JournalParent(Arc<Mutex<Vec<String>>>);

    impl PresentationHost for JournalParent {
        fn present_gallery(&self, _controller: Arc<GalleryController>) {
            self.0.lock().push("parent_present".into());
        }

        fn dismiss_gallery(&self, _controller: &GalleryController) {
            self.0.lock().push("parent_dismiss".into());
        }
    }

    #[test]
    fn test_will_transition_in_precedes_parent_present() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let source = ItemSource::assets(fetch_result(IDS), None);
        let setup = GallerySetup {
            parent: Arc::new(JournalParent(journal.clone())),
            ..setup(source, "a")
        };
        let mut mixin = GalleryMixin::new(setup).unwrap();
        let sink = journal.clone();
        mixin.set_will_transition_in(move || sink.lock().push("will_in".into()));

        mixin.present().unwrap();
        assert_eq!(*journal.lock(), vec!["will_in", "parent_present"]);
    }

    #[test]
    fn test_reduced_motion_presents_immediately() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let setup = GallerySetup {
            context: Arc::new(FakeHost { reduce_motion: true }),
            ..setup(source, "a")
        };
        let h = harness(setup, IDS);

        h.mixin.present().unwrap();
        assert_eq!(h.mixin.phase(), PresentationPhase::Presented);

        h.mixin.dismiss().unwrap();
        assert_eq!(h.mixin.phase(), PresentationPhase::Dismissed);
        assert_eq!(h.parent.dismissed.lock().len(), 1);
        assert_eq!(*h.log.lock(), vec!["will_in", "will_out", "did_out"]);
    }

    #[test]
    fn test_item_focused_once_per_change() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "a"), IDS);

        assert!(h.mixin.focus_item(&ItemId::from("c")).unwrap());
        assert!(!h.mixin.focus_item(&ItemId::from("c")).unwrap());

        // Host-driven focus changes reach the listener on the next dispatch
        let controller = h.mixin.gallery_controller();
        controller.focus_prev().unwrap();
        assert_eq!(h.mixin.dispatch_pending(), 1);

        assert_eq!(*h.log.lock(), vec!["focused:c", "focused:b"]);
        assert_eq!(h.mixin.current_reference_view().map(|v| v.tag), Some(1));
    }

    #[test]
    fn test_focus_not_reported_before_present() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = harness(setup(source, "a"), IDS);

        assert!(h.mixin.focus_item(&ItemId::from("b")).unwrap());
        assert!(h.log.lock().is_empty());
        assert_eq!(h.mixin.current_reference_view().map(|v| v.tag), Some(1));
    }

    #[test]
    fn test_preview_mode_idempotent() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "a").with_editing(Arc::new(MemoryEditing::default())), IDS);

        h.mixin.set_preview_mode();
        let once = (h.mixin.is_preview_mode(), h.mixin.phase());
        h.mixin.set_preview_mode();
        assert_eq!((h.mixin.is_preview_mode(), h.mixin.phase()), once);
        assert!(h.mixin.is_preview_mode());

        assert!(matches!(h.mixin.open_editor(), Err(GalleryError::PreviewMode)));
        assert!(h.log.lock().is_empty());
    }

    #[test]
    fn test_update_keeps_focused_item() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "b"), &["x", "b", "y"]);

        h.mixin.update_with_fetch_result(fetch_result(&["x", "b", "y"]));
        assert_eq!(h.mixin.current_reference_view().map(|v| v.tag), Some(1));
        assert!(h.log.lock().is_empty());
    }

    #[test]
    fn test_update_remaps_missing_focus() {
        let source = ItemSource::moments(moment_list(&[("m", &["a", "b", "c"])]));
        let h = presented(setup(source, "c"), &["p", "q"]);

        h.mixin.update_with_fetch_result(fetch_result(&["p", "q"]));
        assert_eq!(h.mixin.current_reference_view().map(|v| v.tag), Some(1));
        assert_eq!(*h.log.lock(), vec!["focused:q"]);

        let model = h.mixin.gallery_model().unwrap();
        assert_eq!(model.read().source_kind(), SourceKind::FetchResult);
    }

    #[test]
    fn test_update_to_empty_clears_reference_view() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "a"), IDS);

        h.mixin.update_with_fetch_result(FetchResult::default());
        assert!(h.mixin.current_reference_view().is_none());
        assert!(h.mixin.focused_item().is_none());
    }

    #[test]
    fn test_model_release_is_tolerated() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "a"), IDS);

        h.mixin.dismiss().unwrap();
        h.mixin.gallery_controller().finish_dismiss().unwrap();
        assert_eq!(h.mixin.dispatch_pending(), 1);

        assert!(h.mixin.gallery_model().is_none());
        assert!(h.mixin.current_reference_view().is_none());
        h.mixin.update_with_fetch_result(fetch_result(&["z"]));
        assert!(h.mixin.gallery_model().is_none());
        assert!(matches!(
            block_on(h.mixin.thumbnail_for(&ItemId::from("a"))),
            Err(GalleryError::ModelReleased)
        ));
        assert_eq!(*h.log.lock(), vec!["will_out", "did_out"]);
        assert_eq!(h.parent.dismissed.lock().len(), 1);
    }

    #[test]
    fn test_complete_selects_focused_item() {
        let selection = Arc::new(MemorySelection::default());
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut options = PickerOptions::default();
        options.has_silent_posting = true;
        let h = presented(
            setup(source, "b").with_selection(selection.clone()).with_options(options),
            IDS,
        );

        h.mixin.complete(true).unwrap();
        assert!(selection.is_selected(&ItemId::from("b")));
        assert_eq!(*h.log.lock(), vec!["complete:b:true", "will_out"]);
        assert_eq!(h.mixin.phase(), PresentationPhase::TransitioningOut);
    }

    #[test]
    fn test_complete_keeps_existing_selection() {
        let selection = Arc::new(MemorySelection::default());
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "b").with_selection(selection.clone()), IDS);

        h.mixin.toggle_selection(&ItemId::from("a")).unwrap();
        h.mixin.complete(false).unwrap();
        assert!(!selection.is_selected(&ItemId::from("b")));
        assert_eq!(selection.selected_count(), 1);
    }

    #[test]
    fn test_silent_completion_downgraded() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "a"), IDS);

        h.mixin.complete(true).unwrap();
        assert_eq!(h.log.lock()[0], "complete:a:false");
    }

    #[test]
    fn test_complete_requires_presented() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = harness(setup(source, "a"), IDS);
        assert!(h.mixin.complete(false).is_err());
        assert!(h.log.lock().is_empty());
    }

    #[test]
    fn test_complete_after_dismiss_leaves_selection_alone() {
        let selection = Arc::new(MemorySelection::default());
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "b").with_selection(selection.clone()), IDS);

        h.mixin.gallery_controller().begin_dismiss().unwrap();
        assert!(matches!(
            h.mixin.complete(false),
            Err(GalleryError::InvalidTransition { .. })
        ));
        assert_eq!(selection.selected_count(), 0);

        h.mixin.dispatch_pending();
        assert_eq!(*h.log.lock(), vec!["will_out"]);
    }

    #[test]
    fn test_selection_limit() {
        let selection = Arc::new(MemorySelection::default());
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut options = PickerOptions::default();
        options.items_limit = 2;
        let h = harness(
            setup(source, "a").with_selection(selection.clone()).with_options(options),
            IDS,
        );

        assert!(h.mixin.toggle_selection(&ItemId::from("a")).unwrap());
        assert!(h.mixin.toggle_selection(&ItemId::from("b")).unwrap());
        assert!(matches!(
            h.mixin.toggle_selection(&ItemId::from("c")),
            Err(GalleryError::SelectionLimitReached(2))
        ));
        assert!(!h.mixin.toggle_selection(&ItemId::from("a")).unwrap());
        assert!(h.mixin.toggle_selection(&ItemId::from("c")).unwrap());
    }

    #[test]
    fn test_toggle_selection_without_context() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = harness(setup(source, "a"), IDS);
        assert!(matches!(
            h.mixin.toggle_selection(&ItemId::from("a")),
            Err(GalleryError::NoSelectionContext)
        ));
    }

    #[test]
    fn test_editor_events_and_crop_only() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut options = PickerOptions::default();
        options.only_crop = true;
        let h = presented(
            setup(source, "a")
                .with_editing(Arc::new(MemoryEditing::default()))
                .with_options(options),
            IDS,
        );

        assert_eq!(h.mixin.open_editor().unwrap(), EditorTools::CropOnly);
        h.mixin.close_editor().unwrap();
        assert_eq!(*h.log.lock(), vec!["editor_opened", "editor_closed"]);
    }

    #[test]
    fn test_editor_requires_editing_context() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = presented(setup(source, "a"), IDS);
        assert!(matches!(h.mixin.open_editor(), Err(GalleryError::NoEditingContext)));
    }

    #[test]
    fn test_captions() {
        let editing = Arc::new(MemoryEditing::default());
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut options = PickerOptions::default();
        options.allow_caption_entities = false;
        let h = harness(setup(source, "a").with_editing(editing.clone()).with_options(options), IDS);

        let caption = Caption {
            text: "hello world".into(),
            entities: vec![CaptionEntity {
                kind: EntityKind::Bold,
                offset: 0,
                length: 5,
            }],
        };
        h.mixin.set_caption(&ItemId::from("a"), Some(caption)).unwrap();
        assert_eq!(editing.caption(&ItemId::from("a")), Some(Caption::plain("hello world")));

        // Blank captions clear
        h.mixin.set_caption(&ItemId::from("a"), Some(Caption::plain("  "))).unwrap();
        assert_eq!(editing.caption(&ItemId::from("a")), None);

        assert!(matches!(
            h.mixin.set_caption(&ItemId::from("nope"), None),
            Err(GalleryError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_document_captions_inhibited() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut options = PickerOptions::default();
        options.as_file = true;
        options.inhibit_document_captions = true;
        let h = harness(
            setup(source, "a")
                .with_editing(Arc::new(MemoryEditing::default()))
                .with_suggestions(Arc::new(StaticSuggestions(vec!["@alice"])))
                .with_options(options),
            IDS,
        );

        assert!(matches!(
            h.mixin.set_caption(&ItemId::from("a"), Some(Caption::plain("x"))),
            Err(GalleryError::CaptionsDisabled)
        ));
        assert!(h.mixin.caption_suggestions("@a").is_empty());
    }

    #[test]
    fn test_caption_suggestions() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = harness(
            setup(source, "a").with_suggestions(Arc::new(StaticSuggestions(vec!["@alice", "@bob"]))),
            IDS,
        );
        assert_eq!(h.mixin.caption_suggestions("@b"), vec!["@bob".to_string()]);
    }

    #[test]
    fn test_timer_and_mute() {
        let editing = Arc::new(MemoryEditing::default());
        let items = vec![
            MediaItem::photo("p", 10, 10),
            MediaItem::video("v", 10, 10, Duration::from_secs(4)),
        ];
        let source = ItemSource::assets(FetchResult::new(items), None);
        let mut options = PickerOptions::default();
        options.has_timer = true;
        let h = harness(setup(source, "p").with_editing(editing.clone()).with_options(options), &["p", "v"]);

        h.mixin.set_timer(&ItemId::from("p"), Some(10)).unwrap();
        assert_eq!(editing.timer(&ItemId::from("p")), Some(10));
        h.mixin.set_timer(&ItemId::from("p"), Some(0)).unwrap();
        assert_eq!(editing.timer(&ItemId::from("p")), None);

        h.mixin.set_muted(&ItemId::from("v"), true).unwrap();
        assert!(editing.is_muted(&ItemId::from("v")));
        assert!(h.mixin.set_muted(&ItemId::from("p"), true).is_err());
    }

    #[test]
    fn test_timer_and_mute_disabled() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut options = PickerOptions::default();
        options.inhibit_mute = true;
        let h = harness(
            setup(source, "a")
                .with_editing(Arc::new(MemoryEditing::default()))
                .with_options(options),
            IDS,
        );

        assert!(matches!(
            h.mixin.set_timer(&ItemId::from("a"), Some(5)),
            Err(GalleryError::TimerDisabled)
        ));
        assert!(matches!(
            h.mixin.set_muted(&ItemId::from("a"), true),
            Err(GalleryError::MuteInhibited)
        ));
    }

    #[test]
    fn test_thumbnail_resolution() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut h = harness(
            setup(source, "a").with_thumbnail_image(Thumbnail::placeholder(4, [0, 0, 0, 255])),
            IDS,
        );

        let thumb = block_on(h.mixin.thumbnail_for(&ItemId::from("b"))).unwrap();
        assert_eq!(thumb.width(), 4);

        h.mixin.set_thumbnail_resolver(|item| {
            let size = if item.id.as_str() == "c" { 16 } else { 8 };
            thumbnail::ready(Ok(Thumbnail::placeholder(size, [255; 4])))
        });
        assert_eq!(block_on(h.mixin.thumbnail_for(&ItemId::from("c"))).unwrap().width(), 16);

        // Replaces the previous resolver
        h.mixin.set_thumbnail_resolver(|item| {
            thumbnail::ready(Err(GalleryError::ThumbnailUnavailable(item.id.clone())))
        });
        assert!(block_on(h.mixin.thumbnail_for(&ItemId::from("c"))).is_err());
        assert!(matches!(
            block_on(h.mixin.thumbnail_for(&ItemId::from("zz"))),
            Err(GalleryError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_no_thumbnail_source() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = harness(setup(source, "a"), IDS);
        assert!(matches!(
            block_on(h.mixin.thumbnail_for(&ItemId::from("a"))),
            Err(GalleryError::ThumbnailUnavailable(_))
        ));
    }

    #[test]
    fn test_reference_view_for_any_item() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let h = harness(setup(source, "a"), IDS);
        let view = h.mixin.reference_view_for(&ItemId::from("c")).unwrap();
        assert_eq!(view.frame.y, 200.0);
        assert!(h.mixin.reference_view_for(&ItemId::from("zz")).is_none());
    }

    #[test]
    fn test_slots_replace_previous_listener() {
        let source = ItemSource::assets(fetch_result(IDS), None);
        let mut h = harness(setup(source, "a"), IDS);
        let hits = Arc::new(Mutex::new(0));
        let counter = hits.clone();
        h.mixin.set_will_transition_in(move || *counter.lock() += 1);

        h.mixin.present().unwrap();
        assert_eq!(*hits.lock(), 1);
        assert!(h.log.lock().is_empty());
    }
}
