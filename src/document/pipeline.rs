//! Load pipeline
//!
//! Drives a document from raw bytes to published session state. All
//! asynchronous work is cooperatively cancellable: each load acquires a
//! [`LoadToken`] from a monotonic epoch counter, and every resumption after
//! an `.await` checks the token before touching shared state. A superseded
//! load returns without side effects and leaves cleanup to its successor.
//!
//! Failures never escape [`MappingEngine::process_file`]: recovery is
//! always "reset to empty, surface a message", never a half-loaded
//! document.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::EngineConfig;
use crate::fields::MappedField;
use crate::state::MappingState;

use super::error::Result;
use super::text_layer::build_text_runs;
use super::traits::{DocumentConverter, PageRenderer};
use super::types::{DocumentKind, PageView, SourceFile};

/// How a load ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Completed,
    /// A newer load started while this one was in flight; shared state was
    /// left untouched. Not an error.
    Superseded,
}

/// Cancellation token for one load
///
/// Captures the epoch counter at acquisition; the token goes stale as soon
/// as any other load (or a clear) bumps the counter. Cancellation is
/// level-triggered: work already past its last check runs to completion.
pub struct LoadToken {
    epoch: u64,
    live: Arc<AtomicU64>,
}

impl LoadToken {
    fn acquire(live: &Arc<AtomicU64>) -> Self {
        let epoch = live.fetch_add(1, Ordering::SeqCst) + 1;
        Self {
            epoch,
            live: live.clone(),
        }
    }

    pub fn is_current(&self) -> bool {
        self.live.load(Ordering::SeqCst) == self.epoch
    }
}

enum SurfaceWait {
    Ready,
    Missing,
    Superseded,
}

/// The document load/render engine
///
/// Owns the shared [`MappingState`] and the two external collaborators:
/// the byte-level converter and the presentation renderer.
pub struct MappingEngine {
    state: Arc<RwLock<MappingState>>,
    epoch: Arc<AtomicU64>,
    converter: Arc<dyn DocumentConverter>,
    renderer: Arc<dyn PageRenderer>,
    config: EngineConfig,
}

impl MappingEngine {
    pub fn new(
        converter: Arc<dyn DocumentConverter>,
        renderer: Arc<dyn PageRenderer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(MappingState::new())),
            epoch: Arc::new(AtomicU64::new(0)),
            converter,
            renderer,
            config,
        }
    }

    /// Handle to the shared session state
    pub fn state(&self) -> Arc<RwLock<MappingState>> {
        self.state.clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The primary output: the ordered list of mapped fields, ready for a
    /// downstream template/document generator
    pub async fn mapped_fields(&self) -> Vec<MappedField> {
        self.state.read().await.registry.fields().to_vec()
    }

    /// Process a raw file: classify, dispatch to the matching loader, and
    /// absorb every failure into a clean, messaged reset.
    pub async fn process_file(&self, file: SourceFile) {
        let kind = DocumentKind::from_mime(&file.mime_type)
            .or_else(|| file.extension().and_then(DocumentKind::from_extension));
        let Some(kind) = kind else {
            tracing::warn!(file_name = %file.name, mime = %file.mime_type, "Unsupported document format");
            // A format failure is still a reload: invalidate in-flight
            // loads so none of them publishes over the reset
            self.epoch.fetch_add(1, Ordering::SeqCst);
            let mut state = self.state.write().await;
            state.reset();
            state.message = Some(format!("Unsupported file type: {}", file.name));
            return;
        };

        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.message = None;
            state.document_name = Some(file.stem());
        }

        let result = match kind {
            DocumentKind::Pdf => self.load_pdf(&file.bytes).await,
            DocumentKind::Docx => self.load_docx(&file.bytes).await,
        };

        match result {
            Ok(LoadOutcome::Completed) => {
                tracing::info!(file_name = %file.name, kind = ?kind, "Document loaded");
            }
            Ok(LoadOutcome::Superseded) => {
                tracing::debug!(file_name = %file.name, "Load superseded; state belongs to the newer load");
            }
            Err(err) => {
                // Loaders surface a stale failure as `Superseded`, so an
                // error here always belongs to the current load
                tracing::warn!(file_name = %file.name, error = %err, "Document load failed");
                let mut state = self.state.write().await;
                state.reset();
                state.message = Some(format!("Could not load the document: {}", err));
            }
        }
    }

    /// Clear the session: invalidate all in-flight loads and reset every
    /// piece of document and field state.
    pub async fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        state.reset();
        tracing::debug!("Cleared mapping session");
    }

    /// Load a PDF; a failure that happens after this load was itself
    /// superseded is reported as `Superseded`, not as an error, so the
    /// caller's rollback never touches a successor's state.
    async fn load_pdf(&self, bytes: &[u8]) -> Result<LoadOutcome> {
        let token = LoadToken::acquire(&self.epoch);
        match self.load_pdf_pages(bytes, &token).await {
            Err(err) if !token.is_current() => {
                tracing::debug!(error = %err, "Superseded PDF load failed; ignoring");
                Ok(LoadOutcome::Superseded)
            }
            other => other,
        }
    }

    async fn load_pdf_pages(&self, bytes: &[u8], token: &LoadToken) -> Result<LoadOutcome> {
        let opened = self.converter.open_pdf(bytes).await?;
        if !token.is_current() {
            return Ok(LoadOutcome::Superseded);
        }

        let page_count = opened.source.page_count();
        let mut pages = Vec::with_capacity(page_count as usize);
        let mut text_runs = Vec::new();

        for page_number in 1..=page_count {
            let content = opened.source.page(page_number).await?;
            if !token.is_current() {
                return Ok(LoadOutcome::Superseded);
            }

            let scale = if content.width > 0.0 {
                self.config.target_page_width / content.width
            } else {
                1.0
            };
            let view = PageView {
                page_number,
                width: content.width * scale,
                height: content.height * scale,
                scale,
            };
            text_runs.extend(build_text_runs(&content, &view));
            pages.push(view);
        }

        let render_plan: Vec<(u32, f32)> = pages.iter().map(|p| (p.page_number, p.scale)).collect();

        // Publish the complete page and run lists in one transition, under
        // the same lock as the final staleness check
        {
            let mut state = self.state.write().await;
            if !token.is_current() {
                return Ok(LoadOutcome::Superseded);
            }
            state.publish_pdf(pages, text_runs);
            state.message = opened.caveat.clone();
            state.loading = false;
            tracing::info!(page_count, "Published PDF pages");
        }

        // Rasterize each page once the presentation layer has a surface
        // for it; a surface that never shows up is skipped, not fatal
        for (page_number, scale) in render_plan {
            match self.wait_for_surface(page_number, token).await {
                SurfaceWait::Superseded => return Ok(LoadOutcome::Superseded),
                SurfaceWait::Missing => {
                    tracing::debug!(page_number, "No surface for page; skipping rasterization");
                    continue;
                }
                SurfaceWait::Ready => {}
            }
            self.renderer.render_page(page_number, scale).await?;
        }

        Ok(LoadOutcome::Completed)
    }

    /// Load a Word document. The epoch is bumped only after conversion
    /// succeeds, so a conversion failure is judged against the epoch seen
    /// on entry: if anything bumped it in the meantime, a newer load owns
    /// the state and the failure is swallowed as `Superseded`.
    async fn load_docx(&self, bytes: &[u8]) -> Result<LoadOutcome> {
        let entry_epoch = self.epoch.load(Ordering::SeqCst);
        let html = match self.converter.convert_docx(bytes).await {
            Ok(html) => html,
            Err(err) => {
                if self.epoch.load(Ordering::SeqCst) == entry_epoch {
                    return Err(err);
                }
                tracing::debug!(error = %err, "Superseded Word conversion failed; ignoring");
                return Ok(LoadOutcome::Superseded);
            }
        };
        let token = LoadToken::acquire(&self.epoch);
        match self.publish_docx(html, &token).await {
            Err(err) if !token.is_current() => {
                tracing::debug!(error = %err, "Superseded Word load failed; ignoring");
                Ok(LoadOutcome::Superseded)
            }
            other => other,
        }
    }

    async fn publish_docx(&self, html: String, token: &LoadToken) -> Result<LoadOutcome> {
        let html = if html.trim().is_empty() {
            "<p></p>".to_string()
        } else {
            html
        };

        {
            let mut state = self.state.write().await;
            if !token.is_current() {
                return Ok(LoadOutcome::Superseded);
            }
            state.publish_docx(html.clone());
            state.loading = false;
            tracing::info!(html_len = html.len(), "Published Word transcript");
        }

        // Give the presentation layer a chance to mount the editable
        // surface before pushing content into it
        tokio::task::yield_now().await;
        if !token.is_current() {
            return Ok(LoadOutcome::Superseded);
        }
        self.renderer.mount_editable(&html).await?;

        Ok(LoadOutcome::Completed)
    }

    async fn wait_for_surface(&self, page_number: u32, token: &LoadToken) -> SurfaceWait {
        for _ in 0..self.config.surface_poll_attempts {
            if !token.is_current() {
                return SurfaceWait::Superseded;
            }
            if self.renderer.surface_ready(page_number) {
                return SurfaceWait::Ready;
            }
            tokio::time::sleep(Duration::from_millis(self.config.surface_poll_delay_ms)).await;
        }
        if self.renderer.surface_ready(page_number) {
            SurfaceWait::Ready
        } else {
            SurfaceWait::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::error::DocumentError;
    use crate::document::traits::PdfSource;
    use crate::document::types::{OpenedPdf, PdfPageContent, TextFragment};
    use crate::palette::FieldKind;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct FakePdf {
        pages: Vec<PdfPageContent>,
    }

    #[async_trait]
    impl PdfSource for FakePdf {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        async fn page(&self, page_number: u32) -> Result<PdfPageContent> {
            self.pages
                .get(page_number as usize - 1)
                .cloned()
                .ok_or(DocumentError::PageNotFound(page_number))
        }
    }

    #[derive(Default)]
    struct FakeConverter {
        pdf_page_count: usize,
        fail: bool,
        docx_fail: bool,
        /// When set, the first converter call parks on this gate
        gate: Mutex<Option<Arc<Notify>>>,
        caveat: Option<String>,
        docx_html: String,
    }

    #[async_trait]
    impl DocumentConverter for FakeConverter {
        async fn open_pdf(&self, _bytes: &[u8]) -> Result<OpenedPdf> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(DocumentError::Conversion("broken file".to_string()));
            }
            let pages = (0..self.pdf_page_count)
                .map(|i| PdfPageContent {
                    width: 612.0,
                    height: 792.0,
                    fragments: vec![TextFragment {
                        text: format!("page {}", i + 1),
                        transform: [12.0, 0.0, 0.0, 12.0, 72.0, 700.0],
                        width: 40.0,
                    }],
                })
                .collect();
            Ok(OpenedPdf {
                source: Arc::new(FakePdf { pages }),
                caveat: self.caveat.clone(),
            })
        }

        async fn convert_docx(&self, _bytes: &[u8]) -> Result<String> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if self.docx_fail {
                return Err(DocumentError::Conversion("broken file".to_string()));
            }
            Ok(self.docx_html.clone())
        }
    }

    #[derive(Default)]
    struct FakeRenderer {
        ready: Mutex<HashSet<u32>>,
        all_ready: bool,
        rendered: Mutex<Vec<(u32, f32)>>,
        mounted: Mutex<Vec<String>>,
    }

    impl FakeRenderer {
        fn every_surface_ready() -> Self {
            Self {
                all_ready: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PageRenderer for FakeRenderer {
        fn surface_ready(&self, page_number: u32) -> bool {
            self.all_ready || self.ready.lock().unwrap().contains(&page_number)
        }

        async fn render_page(&self, page_number: u32, scale: f32) -> Result<()> {
            self.rendered.lock().unwrap().push((page_number, scale));
            Ok(())
        }

        async fn mount_editable(&self, html: &str) -> Result<()> {
            self.mounted.lock().unwrap().push(html.to_string());
            Ok(())
        }
    }

    fn fast_config() -> EngineConfig {
        EngineConfig {
            surface_poll_attempts: 2,
            surface_poll_delay_ms: 1,
            ..Default::default()
        }
    }

    fn pdf_file(name: &str) -> SourceFile {
        SourceFile::new(name, "application/pdf", vec![0x25, 0x50, 0x44, 0x46])
    }

    #[tokio::test]
    async fn test_pdf_load_publishes_pages_in_order() {
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 3,
            caveat: Some("Visual fidelity may be lost".to_string()),
            ..Default::default()
        });
        let renderer = Arc::new(FakeRenderer::every_surface_ready());
        let engine = MappingEngine::new(converter, renderer.clone(), fast_config());

        engine.process_file(pdf_file("contract.pdf")).await;

        let state = engine.state();
        let state = state.read().await;
        assert_eq!(state.mode, Some(DocumentKind::Pdf));
        assert_eq!(state.document_name.as_deref(), Some("contract"));
        assert!(!state.loading);
        assert_eq!(state.message.as_deref(), Some("Visual fidelity may be lost"));

        let numbers: Vec<u32> = state.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        let scale = 820.0 / 612.0;
        for page in &state.pages {
            assert!((page.scale - scale).abs() < 1e-6);
            assert!((page.width - 820.0).abs() < 1e-3);
            assert!((page.height - 792.0 * scale).abs() < 1e-3);
        }
        assert_eq!(state.text_runs.len(), 3);
        assert_eq!(state.active_page, 1);

        let rendered = renderer.rendered.lock().unwrap();
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0].0, 1);
        assert!((rendered[0].1 - scale).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unsupported_format_resets_with_message() {
        let engine = MappingEngine::new(
            Arc::new(FakeConverter::default()),
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        );

        engine
            .process_file(SourceFile::new("notes.txt", "text/plain", vec![1, 2, 3]))
            .await;

        let state = engine.state();
        let state = state.read().await;
        assert!(state.mode.is_none());
        assert!(state.pages.is_empty());
        assert!(state.registry.is_empty());
        assert!(state.message.as_deref().unwrap().contains("notes.txt"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_extension_fallback_classification() {
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 1,
            ..Default::default()
        });
        let engine = MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        );

        // Empty MIME type; the extension decides
        engine
            .process_file(SourceFile::new("scan.PDF", "", vec![]))
            .await;

        let state = engine.state();
        assert_eq!(state.read().await.mode, Some(DocumentKind::Pdf));
    }

    #[tokio::test]
    async fn test_conversion_failure_rolls_back_to_empty() {
        let converter = Arc::new(FakeConverter {
            fail: true,
            ..Default::default()
        });
        let engine = MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        );

        engine.process_file(pdf_file("bad.pdf")).await;

        let state = engine.state();
        let state = state.read().await;
        assert!(state.mode.is_none());
        assert!(state.pages.is_empty());
        assert!(state.document_name.is_none());
        assert!(!state.loading);
        assert!(state.message.as_deref().unwrap().contains("Could not load"));
    }

    #[tokio::test]
    async fn test_docx_conversion_failure_rolls_back_to_empty() {
        let converter = Arc::new(FakeConverter {
            docx_fail: true,
            ..Default::default()
        });
        let engine = MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        );

        engine
            .process_file(SourceFile::new("bad.docx", "application/msword", vec![]))
            .await;

        let state = engine.state();
        let state = state.read().await;
        assert!(state.mode.is_none());
        assert!(state.docx_html.is_empty());
        assert!(state.document_name.is_none());
        assert!(!state.loading);
        assert!(state.message.as_deref().unwrap().contains("Could not load"));
    }

    #[tokio::test]
    async fn test_superseded_docx_failure_leaves_successor_intact() {
        let gate = Arc::new(Notify::new());
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 2,
            docx_fail: true,
            gate: Mutex::new(Some(gate.clone())),
            ..Default::default()
        });
        let engine = Arc::new(MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        ));

        // First load parks inside the Word converter
        let first = {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .process_file(SourceFile::new("broken.docx", "application/msword", vec![]))
                    .await
            })
        };
        tokio::task::yield_now().await;

        // A PDF load supersedes it and publishes
        engine.process_file(pdf_file("contract.pdf")).await;

        // Release the parked load; its conversion error belongs to a
        // superseded load and must not roll back the published state
        gate.notify_one();
        first.await.unwrap();

        let state = engine.state();
        let state = state.read().await;
        assert_eq!(state.mode, Some(DocumentKind::Pdf));
        assert_eq!(state.document_name.as_deref(), Some("contract"));
        assert_eq!(state.pages.len(), 2);
        assert!(state.message.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_unsupported_file_invalidates_inflight_load() {
        let gate = Arc::new(Notify::new());
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 3,
            gate: Mutex::new(Some(gate.clone())),
            ..Default::default()
        });
        let engine = Arc::new(MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        ));

        let load = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.process_file(pdf_file("doc.pdf")).await })
        };
        tokio::task::yield_now().await;

        // The unsupported drop resets the session; the parked PDF load
        // must come back stale and leave the reset alone
        engine
            .process_file(SourceFile::new("notes.txt", "text/plain", vec![1, 2, 3]))
            .await;
        gate.notify_one();
        load.await.unwrap();

        let state = engine.state();
        let state = state.read().await;
        assert!(state.mode.is_none());
        assert!(state.pages.is_empty());
        assert!(state.message.as_deref().unwrap().contains("notes.txt"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_superseding_load_wins() {
        let gate = Arc::new(Notify::new());
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 5,
            gate: Mutex::new(Some(gate.clone())),
            ..Default::default()
        });
        let renderer = Arc::new(FakeRenderer::every_surface_ready());
        let engine = Arc::new(MappingEngine::new(converter, renderer, fast_config()));

        // First load parks inside the converter
        let first = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.process_file(pdf_file("first.pdf")).await })
        };
        tokio::task::yield_now().await;

        // Second load runs to completion; the gate only applied to the
        // first call
        engine.process_file(pdf_file("second.pdf")).await;

        // Release the first load; it must notice it was superseded and
        // leave the second load's state alone
        gate.notify_one();
        first.await.unwrap();

        let state = engine.state();
        let state = state.read().await;
        assert_eq!(state.document_name.as_deref(), Some("second"));
        assert_eq!(state.pages.len(), 5);
        assert!(!state.loading);
        assert_eq!(state.mode, Some(DocumentKind::Pdf));
    }

    #[tokio::test]
    async fn test_clear_invalidates_inflight_load() {
        let gate = Arc::new(Notify::new());
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 2,
            gate: Mutex::new(Some(gate.clone())),
            ..Default::default()
        });
        let engine = Arc::new(MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        ));

        let load = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.process_file(pdf_file("doc.pdf")).await })
        };
        tokio::task::yield_now().await;

        engine.clear().await;
        gate.notify_one();
        load.await.unwrap();

        let state = engine.state();
        let state = state.read().await;
        assert!(state.mode.is_none());
        assert!(state.pages.is_empty());
        assert!(state.document_name.is_none());
    }

    #[tokio::test]
    async fn test_docx_load_mounts_transcript() {
        let converter = Arc::new(FakeConverter {
            docx_html: "<p>Contrato</p>".to_string(),
            ..Default::default()
        });
        let renderer = Arc::new(FakeRenderer::every_surface_ready());
        let engine = MappingEngine::new(converter, renderer.clone(), fast_config());

        engine
            .process_file(SourceFile::new(
                "contrato.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                vec![0x50, 0x4b],
            ))
            .await;

        let state = engine.state();
        let state = state.read().await;
        assert_eq!(state.mode, Some(DocumentKind::Docx));
        assert_eq!(state.docx_html, "<p>Contrato</p>");
        assert!(state.pages.is_empty());
        assert!(!state.loading);

        let mounted = renderer.mounted.lock().unwrap();
        assert_eq!(mounted.as_slice(), ["<p>Contrato</p>"]);
    }

    #[tokio::test]
    async fn test_empty_docx_conversion_yields_empty_paragraph() {
        let converter = Arc::new(FakeConverter::default());
        let engine = MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        );

        engine
            .process_file(SourceFile::new("blank.doc", "application/msword", vec![]))
            .await;

        let state = engine.state();
        assert_eq!(state.read().await.docx_html, "<p></p>");
    }

    #[tokio::test]
    async fn test_missing_surface_is_skipped_silently() {
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 2,
            ..Default::default()
        });
        let renderer = Arc::new(FakeRenderer::default());
        renderer.ready.lock().unwrap().insert(1);
        let engine = MappingEngine::new(converter, renderer.clone(), fast_config());

        engine.process_file(pdf_file("doc.pdf")).await;

        let state = engine.state();
        let state = state.read().await;
        // Page list is complete even though page 2 never got a surface
        assert_eq!(state.pages.len(), 2);
        assert!(state.message.is_none());

        let rendered = renderer.rendered.lock().unwrap();
        let pages: Vec<u32> = rendered.iter().map(|(n, _)| *n).collect();
        assert_eq!(pages, vec![1]);
    }

    #[tokio::test]
    async fn test_reload_clears_previous_fields() {
        let converter = Arc::new(FakeConverter {
            pdf_page_count: 2,
            ..Default::default()
        });
        let engine = MappingEngine::new(
            converter,
            Arc::new(FakeRenderer::every_surface_ready()),
            fast_config(),
        );

        engine.process_file(pdf_file("one.pdf")).await;
        {
            let state = engine.state();
            let mut state = state.write().await;
            state.place_on_page(FieldKind::String, 1, 0.5, 0.5);
        }
        assert_eq!(engine.mapped_fields().await.len(), 1);

        engine.process_file(pdf_file("two.pdf")).await;
        assert!(engine.mapped_fields().await.is_empty());
    }
}
