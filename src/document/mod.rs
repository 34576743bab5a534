//! Document load/render pipeline
//!
//! Accepts a raw file, classifies it as PDF or Word, drives the external
//! converter, and publishes per-page view state (PDF) or an editable HTML
//! transcript (Word) into the shared [`MappingState`](crate::state::MappingState).
//!
//! Byte-level parsing and rasterization stay behind two narrow seams:
//! [`DocumentConverter`] turns file bytes into normalized content, and
//! [`PageRenderer`] owns whatever presentation surface actually draws the
//! pages. The core never depends on a specific rendering API.

mod error;
mod pipeline;
mod text_layer;
mod traits;
mod types;

pub use error::{DocumentError, Result};
pub use pipeline::{LoadOutcome, LoadToken, MappingEngine};
pub use text_layer::build_text_runs;
pub use traits::{DocumentConverter, PageRenderer, PdfSource};
pub use types::{
    DocumentKind, EditableTextRun, OpenedPdf, PageView, PdfPageContent, SourceFile, TextFragment,
};
