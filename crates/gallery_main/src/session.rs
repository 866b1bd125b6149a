//! Scripted gallery session driven by a console host

use crate::library::{self, Library};
use anyhow::{Context, Result};
use gallery_core::{
    GalleryConfig, GalleryController, GalleryError, GalleryMixin, GallerySetup, HostContext, ItemId,
    ItemSource, MediaItem, PresentationHost, Rect, ReferenceView, ScreenSize, SelectionContext,
    Thumbnail, ThumbnailSignal,
};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Host that logs what a real UI would do
struct ConsoleHost {
    reduce_motion: bool,
}

impl HostContext for ConsoleHost {
    fn screen_size(&self) -> ScreenSize {
        ScreenSize {
            width: 1280,
            height: 720,
        }
    }

    fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }
}

impl PresentationHost for ConsoleHost {
    fn present_gallery(&self, controller: Arc<GalleryController>) {
        tracing::info!("Presenting gallery {}", controller.id());
    }

    fn dismiss_gallery(&self, controller: &GalleryController) {
        tracing::info!("Removed gallery {}", controller.id());
    }
}

/// Picked items, in pick order
#[derive(Default)]
struct PickedItems(Mutex<Vec<ItemId>>);

impl SelectionContext for PickedItems {
    fn is_selected(&self, id: &ItemId) -> bool {
        self.0.lock().contains(id)
    }

    fn selected_count(&self) -> usize {
        self.0.lock().len()
    }

    fn set_selected(&self, item: &MediaItem, selected: bool) {
        let mut picked = self.0.lock();
        picked.retain(|id| id != &item.id);
        if selected {
            picked.push(item.id.clone());
        }
    }
}

/// Options for a session run
pub struct SessionOptions {
    pub by_moments: bool,
    pub reduce_motion: bool,
}

/// Open a gallery over `folder`, page through it, pick a few items and send
pub async fn run(config: &GalleryConfig, folder: &Path, options: SessionOptions) -> Result<()> {
    let library = Arc::new(Library::scan(folder)?);
    let first = library
        .fetch_result
        .get(0)
        .map(|item| item.id.clone())
        .with_context(|| format!("No images in {:?}", folder))?;

    let source = if options.by_moments {
        ItemSource::moments(library.moments_by_day())
    } else {
        let name = folder.file_name().map(|n| n.to_string_lossy().into_owned());
        ItemSource::assets(library.fetch_result.clone(), name)
    };

    let host = Arc::new(ConsoleHost {
        reduce_motion: options.reduce_motion,
    });
    let picked = Arc::new(PickedItems::default());

    let mut setup = GallerySetup::new(host.clone(), host, first, source)
        .with_selection(picked.clone())
        .with_options(config.picker);
    if let Some(rgba) = config.thumbnails.placeholder_rgba() {
        setup = setup.with_thumbnail_image(Thumbnail::placeholder(
            config.thumbnails.placeholder_size,
            rgba,
        ));
    }

    let mut mixin = GalleryMixin::new(setup)?;
    wire_listeners(&mut mixin);

    let resolver_library = library.clone();
    let max_dimension = config.thumbnails.max_dimension;
    mixin.set_thumbnail_resolver(move |item| {
        let path = resolver_library.path_of(&item.id).cloned();
        let id = item.id.clone();
        let signal: ThumbnailSignal = Box::pin(async move {
            let path = path.ok_or(GalleryError::ItemNotFound(id))?;
            tokio::task::spawn_blocking(move || library::load_thumbnail(&path, max_dimension))
                .await
                .map_err(|e| GalleryError::Thumbnail(e.to_string()))?
        });
        signal
    });

    mixin.present()?;
    let controller = mixin.gallery_controller();
    if !options.reduce_motion {
        controller.finish_transition_in()?;
    }

    // Page through everything, picking every other item
    let items: Vec<ItemId> = match mixin.gallery_model() {
        Some(model) => model.read().items().iter().map(|i| i.id.clone()).collect(),
        None => Vec::new(),
    };
    for (index, id) in items.iter().enumerate() {
        mixin.focus_item(id)?;
        if let Some(view) = mixin.current_reference_view() {
            tracing::debug!("Anchor view {} at {:?}", view.tag, view.frame.center());
        }

        match mixin.thumbnail_for(id).await {
            Ok(thumb) => tracing::info!("Thumbnail {}x{} for {}", thumb.width(), thumb.height(), id),
            Err(e) => tracing::warn!("{}", e.user_message()),
        }

        if index % 2 == 0 {
            if let Err(e) = mixin.toggle_selection(id) {
                tracing::warn!("{}", e.user_message());
            }
        }
    }

    mixin.complete(true)?;
    if !options.reduce_motion {
        controller.finish_dismiss()?;
        mixin.dispatch_pending();
    }

    tracing::info!("Picked {} items", picked.selected_count());
    for id in picked.0.lock().iter() {
        println!("{}", id);
    }
    Ok(())
}

fn wire_listeners(mixin: &mut GalleryMixin) {
    mixin.set_will_transition_in(|| tracing::info!("Gallery transitioning in"));
    mixin.set_will_transition_out(|| tracing::info!("Gallery transitioning out"));
    mixin.set_did_transition_out(|| tracing::info!("Gallery gone"));
    mixin.set_item_focused(|item| tracing::info!("Focused {}", item.id));
    mixin.set_complete_with_item(|item, silent| {
        tracing::info!("Send {} (silent: {})", item.id, silent);
    });
    mixin.set_editor_opened(|| tracing::info!("Editor opened"));
    mixin.set_editor_closed(|| tracing::info!("Editor closed"));

    // Grid of 4 columns, 160px cells
    mixin.set_reference_view_for_item(|item| {
        let tag = item.created.map(|t| t.timestamp() as u64).unwrap_or_default();
        let cell = (tag % 16) as f32;
        Some(ReferenceView::new(
            tag,
            Rect::new((cell % 4.0) * 160.0, (cell / 4.0).floor() * 160.0, 160.0, 160.0),
        ))
    });
}
