//! Refresh Controller
//!
//! Owns the result set for the tracked document and decides when to rescan:
//! immediately when focus moves to another document, and after a quiet period
//! when the tracked document is being edited.
//!
//! Debounce timer transitions:
//!
//! ```text
//! idle    --edit of tracked doc-->  pending  (armed)
//! pending --edit of tracked doc-->  pending  (re-armed, delay restarts)
//! pending --timer fires--------->  idle     (scan)
//! pending --close / focus change-> idle     (cancelled, no scan from the timer)
//! ```

use std::future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Sleep;

use crate::config::PanelConfig;
use crate::host::{DocumentHost, PanelView};
use crate::scanner::{scan, Occurrence};

use super::render::render;

/// Occurrences of one scan together with the document they belong to.
///
/// Replaced wholesale on every scan; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    path: Option<String>,
    occurrences: Vec<Occurrence>,
}

impl ResultSet {
    pub fn new(path: Option<String>, occurrences: Vec<Occurrence>) -> Self {
        Self { path, occurrences }
    }

    /// No trackable document
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Occurrence> {
        self.occurrences.iter()
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

pub struct RefreshController<H: DocumentHost + ?Sized, V: PanelView> {
    host: Arc<H>,
    view: V,
    config: PanelConfig,
    tracked_path: Option<String>,
    results: ResultSet,
    /// Armed debounce timer; `None` while idle
    pending: Option<Pin<Box<Sleep>>>,
    scan_count: u64,
}

impl<H: DocumentHost + ?Sized, V: PanelView> RefreshController<H, V> {
    pub fn new(host: Arc<H>, view: V, config: PanelConfig) -> Self {
        Self {
            host,
            view,
            config,
            tracked_path: None,
            results: ResultSet::empty(),
            pending: None,
            scan_count: 0,
        }
    }

    pub fn tracked_path(&self) -> Option<&str> {
        self.tracked_path.as_deref()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of scans started so far
    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn debounce_delay(&self) -> Duration {
        self.config.debounce()
    }

    /// A different document (or none) became active: rescan right away.
    pub async fn on_document_focus_changed(&mut self) {
        self.cancel_pending();
        self.scan_active().await;
    }

    /// Some document was modified. Only edits to the tracked document arm
    /// (or re-arm) the debounce timer; anything else is ignored.
    pub fn on_document_edited(&mut self, path: &str) {
        if self.tracked_path.as_deref() != Some(path) {
            tracing::trace!("Ignoring edit of untracked document {}", path);
            return;
        }

        let delay = self.config.debounce();
        self.pending = Some(Box::pin(tokio::time::sleep(delay)));
        tracing::debug!("Rescan of {} scheduled in {:?}", path, delay);
    }

    /// Cancel any pending rescan
    pub fn close(&mut self) {
        self.cancel_pending();
    }

    /// Resolves when the armed debounce timer fires. Never resolves while idle.
    pub async fn debounce_elapsed(&mut self) {
        match self.pending.as_mut() {
            Some(timer) => timer.as_mut().await,
            None => future::pending::<()>().await,
        }
    }

    /// Run the rescan the debounce timer was armed for. Reads the text as it
    /// is now, not as it was when the timer was armed.
    pub async fn on_debounce_fired(&mut self) {
        self.pending = None;
        self.scan_active().await;
    }

    fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Pending rescan cancelled");
        }
    }

    async fn scan_active(&mut self) {
        self.scan_count += 1;

        let document = self
            .host
            .active_document()
            .filter(|doc| self.config.is_trackable(&doc.kind));

        let Some(document) = document else {
            self.commit(ResultSet::empty());
            return;
        };

        self.tracked_path = Some(document.path.clone());

        // `&mut self` is held across the read, so no other transition can
        // retarget the controller before this result is committed
        let text = match self.host.read_document_text(&document.path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", document.path, e);
                self.commit(ResultSet::empty());
                return;
            }
        };

        let occurrences = scan(&text);
        tracing::debug!(
            "Scanned {}: {} tags",
            document.path,
            occurrences.len()
        );
        self.commit(ResultSet::new(Some(document.path), occurrences));
    }

    fn commit(&mut self, results: ResultSet) {
        self.tracked_path = results.path().map(str::to_string);
        self.results = results;
        self.view.render(&render(&self.results));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TroubleError};
    use crate::host::ActiveDocument;
    use crate::panel::PanelContent;
    use crate::scanner::TagKind;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockHost {
        active: Mutex<Option<ActiveDocument>>,
        texts: Mutex<HashMap<String, String>>,
        reads: AtomicUsize,
    }

    impl MockHost {
        fn with_document(path: &str, text: &str) -> Arc<Self> {
            let host = Arc::new(Self::default());
            host.set_text(path, text);
            host.focus(path);
            host
        }

        fn focus(&self, path: &str) {
            let kind = path.rsplit('.').next().unwrap_or_default();
            *self.active.lock() = Some(ActiveDocument::new(path, kind));
        }

        fn set_text(&self, path: &str, text: &str) {
            self.texts.lock().insert(path.to_string(), text.to_string());
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentHost for MockHost {
        fn active_document(&self) -> Option<ActiveDocument> {
            self.active.lock().clone()
        }

        async fn read_document_text(&self, path: &str) -> Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.texts
                .lock()
                .get(path)
                .cloned()
                .ok_or_else(|| TroubleError::DocumentRead(path.to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingView {
        renders: Vec<PanelContent>,
    }

    impl PanelView for RecordingView {
        fn render(&mut self, content: &PanelContent) {
            self.renders.push(content.clone());
        }
    }

    fn controller(host: Arc<MockHost>) -> RefreshController<MockHost, RecordingView> {
        RefreshController::new(host, RecordingView::default(), PanelConfig::default())
    }

    #[tokio::test]
    async fn test_focus_change_scans_active_document() {
        let host = MockHost::with_document("notes/a.md", "#TODO one\n#BUG two");
        let mut ctl = controller(host.clone());

        ctl.on_document_focus_changed().await;

        assert_eq!(ctl.tracked_path(), Some("notes/a.md"));
        assert_eq!(ctl.results().len(), 2);
        assert_eq!(ctl.results().occurrences()[1].kind, TagKind::Bug);
        assert_eq!(ctl.scan_count(), 1);
        assert_eq!(ctl.view().renders.len(), 1);
        assert_eq!(ctl.view().renders[0].filename.as_deref(), Some("a.md"));
    }

    #[tokio::test]
    async fn test_focus_change_without_document_clears_state() {
        let host = MockHost::with_document("a.md", "#TODO one");
        let mut ctl = controller(host.clone());
        ctl.on_document_focus_changed().await;

        *host.active.lock() = None;
        ctl.on_document_focus_changed().await;

        assert_eq!(ctl.tracked_path(), None);
        assert!(ctl.results().is_empty());
        assert_eq!(ctl.results().path(), None);
        assert_eq!(ctl.view().renders.last().unwrap().filename, None);
    }

    #[tokio::test]
    async fn test_focus_change_to_untrackable_kind() {
        let host = MockHost::with_document("a.md", "#TODO one");
        host.set_text("diagram.canvas", "#TODO hidden");
        let mut ctl = controller(host.clone());
        ctl.on_document_focus_changed().await;

        host.focus("diagram.canvas");
        ctl.on_document_focus_changed().await;

        assert_eq!(ctl.tracked_path(), None);
        assert!(ctl.results().is_empty());
        assert_eq!(host.reads(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_yields_no_document() {
        let host = Arc::new(MockHost::default());
        host.focus("missing.md");
        let mut ctl = controller(host.clone());

        ctl.on_document_focus_changed().await;

        assert_eq!(ctl.tracked_path(), None);
        assert!(ctl.results().is_empty());
        assert_eq!(ctl.view().renders.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_arms_debounce() {
        let host = MockHost::with_document("a.md", "#TODO one");
        let mut ctl = controller(host.clone());
        ctl.on_document_focus_changed().await;

        ctl.on_document_edited("a.md");
        assert!(ctl.is_pending());
        assert_eq!(ctl.scan_count(), 1);

        host.set_text("a.md", "#TODO one\n#FIXME two");
        let start = tokio::time::Instant::now();
        ctl.debounce_elapsed().await;
        assert!(start.elapsed() >= Duration::from_millis(300));

        ctl.on_debounce_fired().await;
        assert!(!ctl.is_pending());
        assert_eq!(ctl.scan_count(), 2);
        assert_eq!(ctl.results().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_edits_scan_once() {
        let host = MockHost::with_document("a.md", "#TODO one");
        let mut ctl = controller(host.clone());
        ctl.on_document_focus_changed().await;

        for _ in 0..5 {
            ctl.on_document_edited("a.md");
            tokio::time::advance(Duration::from_millis(50)).await;
        }

        // Last edit re-armed the timer, so the first 250ms of it are left
        let waited = tokio::time::timeout(Duration::from_millis(249), ctl.debounce_elapsed()).await;
        assert!(waited.is_err());
        assert_eq!(ctl.scan_count(), 1);

        ctl.debounce_elapsed().await;
        ctl.on_debounce_fired().await;
        assert_eq!(ctl.scan_count(), 2);
        assert_eq!(host.reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_change_cancels_pending() {
        let host = MockHost::with_document("a.md", "#TODO one");
        host.set_text("b.md", "#NOTE other");
        let mut ctl = controller(host.clone());
        ctl.on_document_focus_changed().await;

        ctl.on_document_edited("a.md");
        assert!(ctl.is_pending());

        host.focus("b.md");
        ctl.on_document_focus_changed().await;

        assert!(!ctl.is_pending());
        assert_eq!(ctl.scan_count(), 2);
        assert_eq!(ctl.tracked_path(), Some("b.md"));

        let waited = tokio::time::timeout(Duration::from_secs(5), ctl.debounce_elapsed()).await;
        assert!(waited.is_err());
        assert_eq!(ctl.scan_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_of_untracked_document_is_noop() {
        let host = MockHost::with_document("a.md", "#TODO one");
        let mut ctl = controller(host.clone());
        ctl.on_document_focus_changed().await;
        let before = ctl.results().clone();

        ctl.on_document_edited("b.md");

        assert!(!ctl.is_pending());
        assert_eq!(ctl.scan_count(), 1);
        assert_eq!(ctl.tracked_path(), Some("a.md"));
        assert_eq!(ctl.results(), &before);
        assert_eq!(ctl.view().renders.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_before_any_scan_is_noop() {
        let host = MockHost::with_document("a.md", "#TODO one");
        let mut ctl = controller(host);

        ctl.on_document_edited("a.md");
        assert!(!ctl.is_pending());
        assert_eq!(ctl.scan_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending() {
        let host = MockHost::with_document("a.md", "#TODO one");
        let mut ctl = controller(host);
        ctl.on_document_focus_changed().await;

        ctl.on_document_edited("a.md");
        ctl.close();

        assert!(!ctl.is_pending());
        let waited = tokio::time::timeout(Duration::from_secs(1), ctl.debounce_elapsed()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_always_belong_to_tracked_document() {
        let host = MockHost::with_document("a.md", "#TODO a");
        host.set_text("b.md", "#BUG b");
        let mut ctl = controller(host.clone());
        ctl.on_document_focus_changed().await;

        // Edit of a.md pending while focus moves to b.md, then back and forth
        ctl.on_document_edited("a.md");
        host.focus("b.md");
        ctl.on_document_focus_changed().await;
        assert_eq!(ctl.results().path(), ctl.tracked_path());
        assert_eq!(ctl.results().occurrences()[0].kind, TagKind::Bug);

        ctl.on_document_edited("a.md");
        assert!(!ctl.is_pending());

        ctl.on_document_edited("b.md");
        host.focus("a.md");
        ctl.debounce_elapsed().await;
        ctl.on_debounce_fired().await;

        // The rescan reads whatever is active when the timer fires
        assert_eq!(ctl.tracked_path(), Some("a.md"));
        assert_eq!(ctl.results().path(), Some("a.md"));
        assert_eq!(ctl.results().occurrences()[0].kind, TagKind::Todo);
        for content in &ctl.view().renders {
            assert_eq!(content.rows().is_empty(), content.filename.is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_debounce_delay() {
        let host = MockHost::with_document("a.md", "#TODO one");
        let config = PanelConfig {
            debounce_ms: 1000,
            ..PanelConfig::default()
        };
        let mut ctl = RefreshController::new(host, RecordingView::default(), config);
        ctl.on_document_focus_changed().await;
        assert_eq!(ctl.debounce_delay(), Duration::from_millis(1000));

        ctl.on_document_edited("a.md");
        let waited = tokio::time::timeout(Duration::from_millis(999), ctl.debounce_elapsed()).await;
        assert!(waited.is_err());
    }
}
