//! Filesystem-backed host
//!
//! Treats one file on disk as the active document and turns `notify` change
//! events into [`HostEvent::DocumentModified`]. Used by the `watch` command.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;

use super::events::{EventBus, HostEvent};
use super::{ActiveDocument, DocumentHost};
use crate::error::{Result, TroubleError};

/// Host whose active document is a single file
#[derive(Debug, Default)]
pub struct FsHost {
    active: RwLock<Option<PathBuf>>,
}

impl FsHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` the active document. Returns the canonical path that
    /// identifies it from now on.
    pub fn open(&self, path: &Path) -> Result<PathBuf> {
        let canonical = std::fs::canonicalize(path)?;
        *self.active.write() = Some(canonical.clone());
        Ok(canonical)
    }

    /// Leave the host without an active document
    pub fn close_document(&self) {
        *self.active.write() = None;
    }
}

fn document_for(path: &Path) -> ActiveDocument {
    let kind = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    ActiveDocument::new(path.to_string_lossy(), kind)
}

#[async_trait]
impl DocumentHost for FsHost {
    fn active_document(&self) -> Option<ActiveDocument> {
        self.active.read().as_deref().map(document_for)
    }

    async fn read_document_text(&self, path: &str) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TroubleError::DocumentRead(format!("{}: {}", path, e)))
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Publishes a `DocumentModified` event for every file changed in a directory
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch the directory containing `file`. The directory is watched rather
    /// than the file so saves that replace the file are still seen.
    pub fn new(file: &Path, bus: EventBus) -> Result<Self> {
        let dir = file
            .parent()
            .ok_or_else(|| TroubleError::Watcher(format!("{} has no parent", file.display())))?
            .to_path_buf();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) if is_content_change(&event.kind) => {
                    for path in event.paths {
                        bus.publish(HostEvent::DocumentModified {
                            path: path.to_string_lossy().to_string(),
                        });
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Watch error: {}", e),
            },
        )
        .map_err(|e| TroubleError::Watcher(e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| TroubleError::Watcher(e.to_string()))?;

        tracing::debug!("Watching {}", dir.display());

        Ok(Self { _watcher: watcher })
    }
}
