//! Document seams
//!
//! Format-agnostic interfaces for the external conversion service and the
//! presentation layer. The pipeline drives these; it never touches bytes
//! or surfaces directly.

use async_trait::async_trait;

use super::error::Result;
use super::types::{OpenedPdf, PdfPageContent};

/// External document-conversion service
///
/// Given file bytes, returns normalized content: a paged handle with text
/// streams for PDF, a single HTML transcript for Word. Fails with a
/// descriptive error when the format is unrecognized or corrupt.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Open a PDF and return a paged source handle
    async fn open_pdf(&self, bytes: &[u8]) -> Result<OpenedPdf>;

    /// Convert a Word document to HTML
    async fn convert_docx(&self, bytes: &[u8]) -> Result<String>;
}

/// An opened, paged PDF document
#[async_trait]
pub trait PdfSource: Send + Sync {
    /// Total number of pages
    fn page_count(&self) -> u32;

    /// Fetch one page's native dimensions and text-content stream
    /// (1-based page numbers)
    async fn page(&self, page_number: u32) -> Result<PdfPageContent>;
}

/// Presentation rendering collaborator
///
/// Owns one drawing surface per page (PDF mode) and the editable rich-text
/// element (Word mode). Surface allocation is asynchronous on the
/// presentation side, so the pipeline polls `surface_ready` before asking
/// for rasterization.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Whether a drawing surface exists for the page yet
    fn surface_ready(&self, page_number: u32) -> bool;

    /// Rasterize one page into its surface at the given scale
    async fn render_page(&self, page_number: u32, scale: f32) -> Result<()>;

    /// Push HTML into the editable Word surface
    async fn mount_editable(&self, html: &str) -> Result<()>;
}
