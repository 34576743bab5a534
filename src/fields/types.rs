//! Mapped field types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::palette::FieldKind;

/// A user-placed form field
///
/// Position and size are normalized: each is a fraction in `[0, 1]` of the
/// containing page's content box, not pixels. `page_width`/`page_height`
/// capture the page's pixel dimensions at creation time so a downstream
/// generator can denormalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedField {
    /// Unique field ID
    pub id: Uuid,
    /// Field kind (palette type)
    pub kind: FieldKind,
    /// Human-readable label
    pub label: String,
    /// Machine-safe identifier, generated from the label
    pub name: String,
    /// Whether the signer must fill this field
    pub required: bool,
    /// Help text shown to the signer
    pub help_text: String,
    /// Ordered options, meaningful only for choice kinds
    pub options: Vec<String>,
    /// 1-based page the field sits on (always 1 in Word mode)
    pub page: u32,
    /// Normalized left edge
    pub x: f32,
    /// Normalized top edge
    pub y: f32,
    /// Normalized width
    pub width: f32,
    /// Normalized height
    pub height: f32,
    /// Page pixel width at creation time
    pub page_width: f32,
    /// Page pixel height at creation time
    pub page_height: f32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Partial patch merged into the selected field by the editing surface
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    pub label: Option<String>,
    pub name: Option<String>,
    pub required: Option<bool>,
    pub help_text: Option<String>,
    pub options: Option<Vec<String>>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_serializes_camel_case_for_downstream_consumers() {
        let field = MappedField {
            id: Uuid::new_v4(),
            kind: FieldKind::Select,
            label: "Dropdown".to_string(),
            name: "DROPDOWN_1".to_string(),
            required: true,
            help_text: "Pick one".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            page: 2,
            x: 0.39,
            y: 0.1675,
            width: 0.28,
            height: 0.065,
            page_width: 820.0,
            page_height: 1060.0,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["kind"], "select");
        assert_eq!(json["helpText"], "Pick one");
        assert_eq!(json["pageWidth"], 820.0);
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["options"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: FieldPatch =
            serde_json::from_str(r#"{"label":"Cedula","width":0.5}"#).unwrap();
        assert_eq!(patch.label.as_deref(), Some("Cedula"));
        assert_eq!(patch.width, Some(0.5));
        assert!(patch.x.is_none());
        assert!(patch.options.is_none());
    }
}
