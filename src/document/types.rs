//! Core document types

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::traits::PdfSource;

/// Document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detect kind from a declared MIME type
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/msword" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Detect kind from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// A raw file handed to the pipeline
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name, extension included
    pub name: String,
    /// Declared media type, may be empty
    pub mime_type: String,
    /// File bytes
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// File name with the extension stripped, used as the suggested
    /// document name
    pub fn stem(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => self.name.clone(),
        }
    }

    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// One rendered page of a paginated document
///
/// `width`/`height` are pixel dimensions at `scale`, which is the ratio
/// applied to the page's native size to fit the engine's target width.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// 1-based, contiguous page number
    pub page_number: u32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

/// One piece of extracted text overlaid on a PDF page for optional
/// in-place correction. Not a mapped field; never persisted.
///
/// Position and size share the pixel space of the page's [`PageView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableTextRun {
    pub page_number: u32,
    /// Sequence within the page
    pub index: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub text: String,
}

/// One positioned text fragment from a PDF page's content stream
///
/// `transform` is the fragment's affine matrix `[a, b, c, d, e, f]` in the
/// page's native, bottom-up coordinate space; `width` is the reported
/// fragment width in native units.
#[derive(Debug, Clone)]
pub struct TextFragment {
    pub text: String,
    pub transform: [f32; 6],
    pub width: f32,
}

/// Converter output for one PDF page, in native units
#[derive(Debug, Clone)]
pub struct PdfPageContent {
    pub width: f32,
    pub height: f32,
    pub fragments: Vec<TextFragment>,
}

/// An opened PDF document handle plus the converter's standing caveat
/// that visual fidelity may be lost.
pub struct OpenedPdf {
    pub source: Arc<dyn PdfSource>,
    pub caveat: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(DocumentKind::from_mime("application/pdf"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::from_mime("application/msword"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_mime("image/png"), None);
        assert_eq!(DocumentKind::from_mime(""), None);
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_extension("doc"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_extension("txt"), None);
    }

    #[test]
    fn test_source_file_stem() {
        let file = SourceFile::new("contract.final.pdf", "application/pdf", vec![]);
        assert_eq!(file.stem(), "contract.final");
        assert_eq!(file.extension(), Some("pdf"));

        let bare = SourceFile::new("contract", "", vec![]);
        assert_eq!(bare.stem(), "contract");
        assert_eq!(bare.extension(), None);
    }
}
