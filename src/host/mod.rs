//! Host editor surface
//!
//! The panel never talks to an editor directly. Everything it needs from the
//! host (the active document, its text, change notifications, a place to
//! render rows and a cursor to move) goes through the traits in this module.

pub mod events;
pub mod fs;

use async_trait::async_trait;

use crate::error::Result;
use crate::panel::PanelContent;

pub use events::{EventBus, HostEvent, Subscription};
pub use fs::{FileWatcher, FsHost};

/// The document the host reports as active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    /// Host identity of the document
    pub path: String,
    /// Document type, the file extension for file-backed hosts
    pub kind: String,
}

impl ActiveDocument {
    pub fn new(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }
}

/// Read access to the host's documents
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Currently active document, if any
    fn active_document(&self) -> Option<ActiveDocument>;

    /// Full text of a document
    async fn read_document_text(&self, path: &str) -> Result<String>;
}

/// Panel surface the host renders rows into
pub trait PanelView: Send {
    fn render(&mut self, content: &PanelContent);
}

/// An editor surface that can take a cursor position
pub trait LineEditor {
    fn set_cursor(&mut self, line: usize, column: usize);
    fn scroll_into_view(&mut self, line: usize);
    fn focus(&mut self);
}

/// Gives access to the editor the user most recently worked in
pub trait EditorWorkspace {
    fn focused_editor(&mut self) -> Option<&mut dyn LineEditor>;
}

/// Move the cursor of the focused editor to `line`/`column`, scroll it into
/// view and focus the editor.
///
/// Returns `false` without doing anything when no editor is focused.
pub fn move_cursor_and_focus<W>(workspace: &mut W, line: usize, column: usize) -> bool
where
    W: EditorWorkspace + ?Sized,
{
    let Some(editor) = workspace.focused_editor() else {
        tracing::debug!("No focused editor, skipping jump to line {}", line);
        return false;
    };

    editor.set_cursor(line, column);
    editor.scroll_into_view(line);
    editor.focus();
    true
}
