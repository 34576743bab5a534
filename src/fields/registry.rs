//! Field registry
//!
//! In-memory ordered collection of placed fields with selection tracking
//! and collision-resistant name synthesis. All placement policy (where a
//! field lands on a page) lives in `state`; the registry only owns the
//! collection itself.

use chrono::Utc;
use uuid::Uuid;

use super::naming::normalize_name;
use super::types::MappedField;
use crate::palette::{self, FieldKind};

/// Ordered collection of mapped fields plus the current selection
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<MappedField>,
    selected: Option<Uuid>,
    /// Running counter feeding generated names; resets with the registry
    name_counter: u32,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully populated field and append it to the registry.
    ///
    /// The label comes from the palette catalog (falling back to the raw
    /// kind token); the name is synthesized from `label + counter` through
    /// the normalization routine, with a numbered fallback so it is never
    /// empty. The new field becomes the selection.
    #[allow(clippy::too_many_arguments)]
    pub fn create_field(
        &mut self,
        kind: FieldKind,
        page: u32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        page_width: f32,
        page_height: f32,
    ) -> Uuid {
        self.name_counter += 1;
        let label = palette::label_for(kind);
        let mut name = normalize_name(&format!("{} {}", label, self.name_counter));
        if name.is_empty() {
            name = format!("FIELD_{}", self.name_counter);
        }

        let field = MappedField {
            id: Uuid::new_v4(),
            kind,
            label,
            name,
            required: false,
            help_text: String::new(),
            options: Vec::new(),
            page,
            x,
            y,
            width,
            height,
            page_width,
            page_height,
            created_at: Utc::now(),
        };

        let id = field.id;
        tracing::debug!(field_id = %id, kind = kind.as_token(), page, "Created mapped field");
        self.fields.push(field);
        self.selected = Some(id);
        id
    }

    /// Remove a field by identity.
    ///
    /// If the removed field was selected, selection falls to the new first
    /// field, or to none when the registry is empty.
    pub fn remove_field(&mut self, id: Uuid) {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        if self.fields.len() == before {
            return;
        }
        if self.selected == Some(id) {
            self.selected = self.fields.first().map(|f| f.id);
        }
        tracing::debug!(field_id = %id, remaining = self.fields.len(), "Removed mapped field");
    }

    /// Select a field; silently ignored for unknown ids
    pub fn select(&mut self, id: Uuid) {
        if self.fields.iter().any(|f| f.id == id) {
            self.selected = Some(id);
        }
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn selected_field(&self) -> Option<&MappedField> {
        let id = self.selected?;
        self.fields.iter().find(|f| f.id == id)
    }

    pub(crate) fn selected_field_mut(&mut self) -> Option<&mut MappedField> {
        let id = self.selected?;
        self.fields.iter_mut().find(|f| f.id == id)
    }

    pub fn fields(&self) -> &[MappedField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields already placed on a page (drives stacking offsets)
    pub fn fields_on_page(&self, page: u32) -> usize {
        self.fields.iter().filter(|f| f.page == page).count()
    }

    /// Drop every field, the selection, and the name counter; a cleared
    /// registry belongs to a fresh document and names start at 1 again.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.selected = None;
        self.name_counter = 0;
    }
}
