//! Drag-and-drop and click-to-place controller

use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::document::DocumentKind;
use crate::geometry::{self, Rect};
use crate::palette::FieldKind;
use crate::state::MappingState;

/// Guidance shown when the palette is used before any document is loaded
const NO_DOCUMENT_GUIDANCE: &str = "Load a document before placing fields";

/// Translates drag and click gestures into state transitions
///
/// Shares the session state with the [`MappingEngine`](crate::document::MappingEngine);
/// the currently dragged kind is controller-local because it only lives for
/// the duration of one gesture.
pub struct InteractionController {
    state: Arc<RwLock<MappingState>>,
    config: EngineConfig,
    active_drag: Mutex<Option<FieldKind>>,
}

impl InteractionController {
    pub fn new(state: Arc<RwLock<MappingState>>, config: EngineConfig) -> Self {
        Self {
            state,
            config,
            active_drag: Mutex::new(None),
        }
    }

    /// Begin a drag from the palette. Returns the payload to hand to the
    /// platform transfer mechanism.
    pub fn drag_start(&self, kind: FieldKind) -> String {
        *self.active_drag.lock().unwrap() = Some(kind);
        kind.as_token().to_string()
    }

    /// End a drag (drop or cancel); clears the recorded kind
    pub fn drag_end(&self) {
        *self.active_drag.lock().unwrap() = None;
    }

    /// Kind currently being dragged, if any
    pub fn active_drag(&self) -> Option<FieldKind> {
        *self.active_drag.lock().unwrap()
    }

    /// Pointer dragged over a page. Returns whether the page should signal
    /// "droppable"; unknown payloads are ignored entirely, with no visual
    /// feedback and no state change.
    pub async fn drag_over(&self, page_number: u32, payload: &str) -> bool {
        if FieldKind::from_token(payload).is_none() {
            return false;
        }
        self.state.write().await.drop_target_page = Some(page_number);
        true
    }

    /// Pointer left a page element during a drag.
    ///
    /// `pointer_still_inside` is the presentation layer's containment check
    /// against the page's bounding element; moving between nested children
    /// of the same page must not clear the hover indicator.
    pub async fn drag_leave(&self, page_number: u32, pointer_still_inside: bool) {
        if pointer_still_inside {
            return;
        }
        let mut state = self.state.write().await;
        if state.drop_target_page == Some(page_number) {
            state.drop_target_page = None;
        }
    }

    /// Drop onto a page: decode the payload, normalize the drop point
    /// against the page's bounding rect, clear the hover indicator, and
    /// place the field centered on the point.
    pub async fn drop(
        &self,
        page_number: u32,
        payload: &str,
        client_x: f32,
        client_y: f32,
        page_rect: Rect,
    ) -> Option<Uuid> {
        let kind = FieldKind::from_token(payload)?;
        let point = geometry::normalized_point(client_x, client_y, &page_rect);

        let mut state = self.state.write().await;
        state.drop_target_page = None;
        state.place_on_page(kind, page_number, point.x, point.y)
    }

    /// Palette click without a drag.
    ///
    /// Word mode inserts into the transcript; with no document loaded this
    /// only surfaces a guidance message; otherwise the field stacks
    /// downward on the active page, centered horizontally.
    pub async fn click_place(&self, kind: FieldKind) -> Option<Uuid> {
        let mut state = self.state.write().await;

        if state.mode == Some(DocumentKind::Docx) {
            return Some(state.place_in_docx(kind, &self.config));
        }

        if state.pages.is_empty() {
            state.message = Some(NO_DOCUMENT_GUIDANCE.to_string());
            return None;
        }

        let page = if state.page(state.active_page).is_some() {
            state.active_page
        } else {
            state.pages[0].page_number
        };
        let stacked = state.registry.fields_on_page(page);
        let y = self.config.click_stack.offset(stacked);
        state.place_on_page(kind, page, 0.5, y)
    }
}
