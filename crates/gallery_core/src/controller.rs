//! Presented gallery controller
//!
//! The controller is the object the host actually puts on screen. It owns
//! the [`GalleryModel`] until it finishes transitioning out, tracks the
//! presentation phase, and queues a [`GalleryEvent`] for every change so the
//! mixin can hand them to the host's listeners.

use crate::error::GalleryError;
use crate::event::GalleryEvent;
use crate::item::{ItemId, MediaItem};
use crate::model::GalleryModel;
use crate::source::SourceKind;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Where the gallery is in its on-screen lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationPhase {
    #[default]
    Idle,
    TransitioningIn,
    Presented,
    TransitioningOut,
    Dismissed,
}

impl PresentationPhase {
    /// Focus changes are reported only while the gallery is coming in or shown
    pub fn reports_focus(self) -> bool {
        matches!(self, PresentationPhase::TransitioningIn | PresentationPhase::Presented)
    }
}

/// Interface mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterfaceMode {
    #[default]
    Normal,
    /// Reduced-interaction peek; no editor, no toolbar
    Preview,
}

/// Tools offered by the item editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTools {
    Full,
    CropOnly,
}

#[derive(Debug, Default)]
struct ControllerState {
    phase: PresentationPhase,
    mode: InterfaceMode,
    editor: Option<EditorTools>,
}

/// Presented gallery controller
pub struct GalleryController {
    id: Uuid,

    /// Strong owner of the model; cleared when the gallery is gone
    model: RwLock<Option<Arc<RwLock<GalleryModel>>>>,

    state: RwLock<ControllerState>,

    events: Sender<GalleryEvent>,
}

impl GalleryController {
    /// Create a controller owning `model`, plus the receiving end of its events
    pub fn new(model: GalleryModel) -> (Arc<Self>, Receiver<GalleryEvent>) {
        let (events, rx) = crossbeam_channel::unbounded();
        let controller = Arc::new(Self {
            id: Uuid::new_v4(),
            model: RwLock::new(Some(Arc::new(RwLock::new(model)))),
            state: RwLock::new(ControllerState::default()),
            events,
        });
        (controller, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> PresentationPhase {
        self.state.read().phase
    }

    pub fn mode(&self) -> InterfaceMode {
        self.state.read().mode
    }

    pub fn is_preview(&self) -> bool {
        self.mode() == InterfaceMode::Preview
    }

    /// Tools of the open editor, `None` when closed
    pub fn editor(&self) -> Option<EditorTools> {
        self.state.read().editor
    }

    /// Strong handle to the model, while the controller still owns one
    pub fn model(&self) -> Option<Arc<RwLock<GalleryModel>>> {
        self.model.read().clone()
    }

    /// Non-owning handle to the model
    pub fn model_handle(&self) -> Weak<RwLock<GalleryModel>> {
        self.model
            .read()
            .as_ref()
            .map(Arc::downgrade)
            .unwrap_or_default()
    }

    pub fn focused_item(&self) -> Option<MediaItem> {
        let model = self.model()?;
        let item = model.read().focused_item().cloned();
        item
    }

    // ========================================
    // Presentation
    // ========================================

    /// Idle -> TransitioningIn
    pub fn begin_transition_in(&self) -> Result<(), GalleryError> {
        self.transition(PresentationPhase::Idle, PresentationPhase::TransitioningIn, "present")?;
        self.emit(GalleryEvent::WillTransitionIn);
        Ok(())
    }

    /// TransitioningIn -> Presented
    pub fn finish_transition_in(&self) -> Result<(), GalleryError> {
        self.transition(
            PresentationPhase::TransitioningIn,
            PresentationPhase::Presented,
            "finish transition in",
        )
    }

    /// TransitioningIn | Presented -> TransitioningOut, closing the editor first
    pub fn begin_dismiss(&self) -> Result<(), GalleryError> {
        let editor_was_open = {
            let mut state = self.state.write();
            if !state.phase.reports_focus() {
                return Err(GalleryError::InvalidTransition {
                    from: state.phase,
                    action: "dismiss",
                });
            }
            state.phase = PresentationPhase::TransitioningOut;
            state.editor.take().is_some()
        };

        tracing::debug!(controller = %self.id, "Gallery transitioning out");
        if editor_was_open {
            self.emit(GalleryEvent::EditorClosed);
        }
        self.emit(GalleryEvent::WillTransitionOut);
        Ok(())
    }

    /// TransitioningOut -> Dismissed; releases the model
    pub fn finish_dismiss(&self) -> Result<(), GalleryError> {
        self.transition(
            PresentationPhase::TransitioningOut,
            PresentationPhase::Dismissed,
            "finish dismiss",
        )?;

        self.model.write().take();
        tracing::debug!(controller = %self.id, "Gallery model released");

        self.emit(GalleryEvent::DidTransitionOut);
        Ok(())
    }

    /// Switch to preview mode. Returns true if the mode changed.
    pub fn set_preview_mode(&self) -> bool {
        let mut state = self.state.write();
        if state.mode == InterfaceMode::Preview {
            return false;
        }
        state.mode = InterfaceMode::Preview;
        tracing::debug!(controller = %self.id, "Gallery switched to preview mode");
        true
    }

    // ========================================
    // Focus
    // ========================================

    /// Focus the item at `index` (clamped). Returns true if focus moved.
    pub fn focus_index(&self, index: usize) -> Result<bool, GalleryError> {
        self.update_focus(|model| Ok(model.set_focus(index)))
    }

    /// Focus an item by id
    pub fn focus_item(&self, id: &ItemId) -> Result<bool, GalleryError> {
        self.update_focus(|model| {
            let index = model
                .index_of(id)
                .ok_or_else(|| GalleryError::ItemNotFound(id.clone()))?;
            Ok(model.set_focus(index))
        })
    }

    pub fn focus_next(&self) -> Result<bool, GalleryError> {
        self.update_focus(|model| Ok(model.next()))
    }

    pub fn focus_prev(&self) -> Result<bool, GalleryError> {
        self.update_focus(|model| Ok(model.prev()))
    }

    /// Replace the items and remap focus (see [`GalleryModel::replace_items`])
    pub fn replace_items(
        &self,
        items: Vec<MediaItem>,
        source_kind: SourceKind,
    ) -> Result<bool, GalleryError> {
        self.update_focus(|model| Ok(model.replace_items(items, source_kind)))
    }

    fn update_focus<F>(&self, f: F) -> Result<bool, GalleryError>
    where
        F: FnOnce(&mut GalleryModel) -> Result<bool, GalleryError>,
    {
        let model = self.model().ok_or(GalleryError::ModelReleased)?;

        let focused = {
            let mut model = model.write();
            if !f(&mut *model)? {
                return Ok(false);
            }
            model.focused_item().cloned()
        };

        if let Some(item) = focused {
            if self.phase().reports_focus() {
                tracing::debug!(controller = %self.id, item = %item.id, "Item focused");
                self.emit(GalleryEvent::ItemFocused(item));
            }
        }
        Ok(true)
    }

    // ========================================
    // Editor & completion
    // ========================================

    /// Open the editor on the focused item
    pub fn open_editor(&self, only_crop: bool) -> Result<EditorTools, GalleryError> {
        if self.focused_item().is_none() {
            return Err(GalleryError::EditorUnavailable("nothing is focused".into()));
        }

        let tools = {
            let mut state = self.state.write();
            if state.mode == InterfaceMode::Preview {
                return Err(GalleryError::PreviewMode);
            }
            if state.phase != PresentationPhase::Presented {
                return Err(GalleryError::InvalidTransition {
                    from: state.phase,
                    action: "open editor",
                });
            }
            if state.editor.is_some() {
                return Err(GalleryError::EditorUnavailable("editor is already open".into()));
            }
            let tools = if only_crop {
                EditorTools::CropOnly
            } else {
                EditorTools::Full
            };
            state.editor = Some(tools);
            tools
        };

        self.emit(GalleryEvent::EditorOpened);
        Ok(tools)
    }

    pub fn close_editor(&self) -> Result<(), GalleryError> {
        if self.state.write().editor.take().is_none() {
            return Err(GalleryError::EditorUnavailable("editor is not open".into()));
        }
        self.emit(GalleryEvent::EditorClosed);
        Ok(())
    }

    /// Confirm the focused item and start dismissing
    pub fn complete(&self, silent: bool) -> Result<MediaItem, GalleryError> {
        let item = self.focused_item().ok_or(GalleryError::ModelReleased)?;

        let editor_was_open = {
            let mut state = self.state.write();
            if state.phase != PresentationPhase::Presented {
                return Err(GalleryError::InvalidTransition {
                    from: state.phase,
                    action: "complete",
                });
            }
            state.phase = PresentationPhase::TransitioningOut;
            state.editor.take().is_some()
        };

        if editor_was_open {
            self.emit(GalleryEvent::EditorClosed);
        }
        tracing::debug!(controller = %self.id, item = %item.id, silent, "Gallery completed");
        self.emit(GalleryEvent::Completed {
            item: item.clone(),
            silent,
        });
        self.emit(GalleryEvent::WillTransitionOut);
        Ok(item)
    }

    fn transition(
        &self,
        from: PresentationPhase,
        to: PresentationPhase,
        action: &'static str,
    ) -> Result<(), GalleryError> {
        let mut state = self.state.write();
        if state.phase != from {
            return Err(GalleryError::InvalidTransition {
                from: state.phase,
                action,
            });
        }
        state.phase = to;
        tracing::debug!(controller = %self.id, ?to, "Gallery phase changed");
        Ok(())
    }

    fn emit(&self, event: GalleryEvent) {
        // Nobody listening once the mixin is gone
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for GalleryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryController")
            .field("id", &self.id)
            .field("state", &*self.state.read())
            .field("has_model", &self.model.read().is_some())
            .finish()
    }
}
