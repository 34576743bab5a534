//! Field palette
//!
//! The fixed, ordered catalog of field kinds offered to the user. The
//! registry looks up display labels by kind and falls back to the raw kind
//! token when no catalog entry exists.

use serde::{Deserialize, Serialize};

/// Kind of a placeable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Textarea,
    Date,
    Select,
    Checkbox,
    Radio,
    Email,
    Number,
    Signature,
}

impl FieldKind {
    /// Stable token used in drag payloads and serialized output
    pub fn as_token(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Textarea => "textarea",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Signature => "signature",
        }
    }

    /// Decode a kind from its token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "string" => Some(FieldKind::String),
            "textarea" => Some(FieldKind::Textarea),
            "date" => Some(FieldKind::Date),
            "select" => Some(FieldKind::Select),
            "checkbox" => Some(FieldKind::Checkbox),
            "radio" => Some(FieldKind::Radio),
            "email" => Some(FieldKind::Email),
            "number" => Some(FieldKind::Number),
            "signature" => Some(FieldKind::Signature),
            _ => None,
        }
    }

    /// Whether this kind carries an ordered list of options
    pub fn has_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio)
    }
}

/// One palette catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub kind: FieldKind,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// The fixed, ordered palette catalog
pub fn palette() -> &'static [PaletteEntry] {
    static CATALOG: &[PaletteEntry] = &[
        PaletteEntry {
            kind: FieldKind::String,
            label: "Text",
            description: Some("Single-line text entry"),
        },
        PaletteEntry {
            kind: FieldKind::Textarea,
            label: "Text area",
            description: Some("Multi-line text entry"),
        },
        PaletteEntry {
            kind: FieldKind::Date,
            label: "Date",
            description: Some("Calendar date"),
        },
        PaletteEntry {
            kind: FieldKind::Select,
            label: "Dropdown",
            description: Some("Pick one option from a list"),
        },
        PaletteEntry {
            kind: FieldKind::Checkbox,
            label: "Checkbox",
            description: None,
        },
        PaletteEntry {
            kind: FieldKind::Radio,
            label: "Radio group",
            description: Some("Pick one of several visible options"),
        },
        PaletteEntry {
            kind: FieldKind::Email,
            label: "Email",
            description: None,
        },
        PaletteEntry {
            kind: FieldKind::Number,
            label: "Number",
            description: None,
        },
        PaletteEntry {
            kind: FieldKind::Signature,
            label: "Signature",
            description: Some("Signer's signature box"),
        },
    ];
    CATALOG
}

/// Display label for a kind, falling back to the raw token when the
/// catalog has no entry for it.
pub fn label_for(kind: FieldKind) -> String {
    palette()
        .iter()
        .find(|entry| entry.kind == kind)
        .map(|entry| entry.label.to_string())
        .unwrap_or_else(|| kind.as_token().to_string())
}
