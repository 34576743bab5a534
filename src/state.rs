//! Mapping session state
//!
//! One explicit state object ties the whole session together: document
//! mode, per-page view state, the text-run overlay, the Word HTML buffer,
//! and the field registry. All placement and editing flows are transitions
//! on this object, so the core is testable without any rendering surface.
//!
//! Collections are always replaced wholesale, never mutated item by item
//! during a load, so a reader never observes a torn page or run list.

use uuid::Uuid;

use crate::config::EngineConfig;
use crate::document::{DocumentKind, EditableTextRun, PageView};
use crate::fields::{self, FieldPatch, FieldRegistry};
use crate::geometry::{self, clamp};
use crate::palette::FieldKind;

/// Shared session state for one mapping session
#[derive(Debug, Default)]
pub struct MappingState {
    /// Loaded document kind; `None` until a file is processed
    pub mode: Option<DocumentKind>,
    /// Suggested document name derived from the file name
    pub document_name: Option<String>,
    /// True while a load is in flight
    pub loading: bool,
    /// Transient user-facing message (errors, guidance, caveats)
    pub message: Option<String>,
    /// Rendered pages, PDF mode only
    pub pages: Vec<PageView>,
    /// Extracted text overlay, PDF mode only
    pub text_runs: Vec<EditableTextRun>,
    /// Editable HTML transcript, Word mode only
    pub docx_html: String,
    /// Caret position in `docx_html`, reported by the presentation layer
    pub docx_cursor: usize,
    /// 1-based active page; stays 1 when no document is loaded
    pub active_page: u32,
    /// Page currently hovered by a drag, if any
    pub drop_target_page: Option<u32>,
    /// Placed fields
    pub registry: FieldRegistry,
}

impl MappingState {
    pub fn new() -> Self {
        Self {
            active_page: 1,
            ..Default::default()
        }
    }

    /// Look up a page by number
    pub fn page(&self, page_number: u32) -> Option<&PageView> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    // ========================================================================
    // Document transitions
    // ========================================================================

    /// Reset every piece of document and field state to its empty form
    pub fn reset(&mut self) {
        self.mode = None;
        self.document_name = None;
        self.loading = false;
        self.message = None;
        self.pages = Vec::new();
        self.text_runs = Vec::new();
        self.docx_html = String::new();
        self.docx_cursor = 0;
        self.active_page = 1;
        self.drop_target_page = None;
        self.registry.clear();
    }

    /// Publish a fully loaded PDF: page and run lists land atomically,
    /// Word state and fields are cleared, the first page becomes active.
    pub fn publish_pdf(&mut self, pages: Vec<PageView>, text_runs: Vec<EditableTextRun>) {
        self.mode = Some(DocumentKind::Pdf);
        self.pages = pages;
        self.text_runs = text_runs;
        self.docx_html = String::new();
        self.docx_cursor = 0;
        self.registry.clear();
        self.active_page = 1;
        self.drop_target_page = None;
    }

    /// Publish a converted Word document, clearing all PDF state
    pub fn publish_docx(&mut self, html: String) {
        self.mode = Some(DocumentKind::Docx);
        self.pages = Vec::new();
        self.text_runs = Vec::new();
        self.docx_html = html;
        self.docx_cursor = 0;
        self.registry.clear();
        self.active_page = 1;
        self.drop_target_page = None;
    }

    // ========================================================================
    // Field placement
    // ========================================================================

    /// Place a field of `kind` on a page so that `(nx, ny)` is its center.
    ///
    /// Silent no-op when the page does not exist. The field is clamped to
    /// stay fully inside the page, appended, selected, and the drop page
    /// becomes active.
    pub fn place_on_page(&mut self, kind: FieldKind, page_number: u32, nx: f32, ny: f32) -> Option<Uuid> {
        let page = match self.page(page_number) {
            Some(page) => *page,
            None => {
                tracing::debug!(page_number, "Ignoring placement on missing page");
                return None;
            }
        };

        let size = geometry::default_field_size(kind);
        let x = clamp(nx - size.width / 2.0, 0.0, 1.0 - size.width);
        let y = clamp(ny - size.height / 2.0, 0.0, 1.0 - size.height);

        let id = self.registry.create_field(
            kind,
            page_number,
            x,
            y,
            size.width,
            size.height,
            page.width,
            page.height,
        );
        self.active_page = page_number;
        Some(id)
    }

    /// Place a field into the Word transcript.
    ///
    /// Word mode has no pixel-accurate page geometry, so fields stack
    /// vertically from a top margin on a single nominal page, and the
    /// field's placeholder token is spliced into the HTML buffer at the
    /// caret so the generated document can find it.
    pub fn place_in_docx(&mut self, kind: FieldKind, config: &EngineConfig) -> Uuid {
        let size = geometry::default_field_size(kind);
        let n = self.registry.len();
        let y = clamp(config.docx_stack.offset(n), 0.0, 1.0 - size.height);
        let x = clamp(0.5 - size.width / 2.0, 0.0, 1.0 - size.width);

        let id = self.registry.create_field(
            kind,
            1,
            x,
            y,
            size.width,
            size.height,
            config.docx_page_width,
            config.docx_page_height,
        );

        // create_field selects the new field, so this cannot miss
        let token = self
            .registry
            .selected_field()
            .map(|field| fields::placeholder_token(&field.name));
        if let Some(token) = token {
            self.insert_docx_placeholder(&token);
        }
        id
    }

    fn insert_docx_placeholder(&mut self, token: &str) {
        let mut pos = self.docx_cursor.min(self.docx_html.len());
        while pos > 0 && !self.docx_html.is_char_boundary(pos) {
            pos -= 1;
        }
        let escaped = html_escape::encode_text(token).to_string();
        self.docx_html.insert_str(pos, &escaped);
        self.docx_cursor = pos + escaped.len();
    }

    // ========================================================================
    // Field editing
    // ========================================================================

    /// Merge a partial patch into the selected field; no-op when nothing
    /// is selected
    pub fn update_selected(&mut self, patch: FieldPatch) {
        match self.registry.selected_field_mut() {
            Some(field) => fields::apply_patch(field, patch),
            None => tracing::debug!("Ignoring field patch with no selection"),
        }
    }

    /// Remove a field, with the registry's selection fallback
    pub fn remove_field(&mut self, id: Uuid) {
        self.registry.remove_field(id);
    }

    // ========================================================================
    // Text-run editing
    // ========================================================================

    /// Mutate one extracted text run's content. Position, size, and page
    /// membership never change after extraction.
    pub fn edit_text_run(&mut self, page_number: u32, index: u32, text: String) {
        match self
            .text_runs
            .iter_mut()
            .find(|r| r.page_number == page_number && r.index == index)
        {
            Some(run) => run.text = text,
            None => tracing::debug!(page_number, index, "Ignoring edit of unknown text run"),
        }
    }

    /// Presentation layer reports the Word caret position
    pub fn set_docx_cursor(&mut self, pos: usize) {
        self.docx_cursor = pos;
    }
}
