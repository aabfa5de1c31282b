use crate::host::{move_cursor_and_focus, EditorWorkspace};
use crate::scanner::{Occurrence, TagKind, TagStyle};

use super::controller::ResultSet;

/// Message shown when the tracked document has no tags
pub const EMPTY_MESSAGE: &str = "No tags found";

/// One clickable row of the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub kind: TagKind,
    pub style: &'static TagStyle,
    /// `:<line+1>`
    pub position: String,
    pub context: String,
    /// Jump target (0-based)
    pub line: usize,
}

impl PanelRow {
    fn from_occurrence(occurrence: &Occurrence) -> Self {
        Self {
            kind: occurrence.kind,
            style: occurrence.kind.style(),
            position: occurrence.position_label(),
            context: occurrence.context.clone(),
            line: occurrence.line,
        }
    }

    /// Jump to this row's line. Best effort: does nothing when no editor is
    /// focused.
    pub fn activate<W>(&self, workspace: &mut W) -> bool
    where
        W: EditorWorkspace + ?Sized,
    {
        move_cursor_and_focus(workspace, self.line, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    Rows(Vec<PanelRow>),
    Empty(&'static str),
}

/// Everything the panel displays for one result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    /// Last path segment of the tracked document, absent when nothing is tracked
    pub filename: Option<String>,
    pub body: PanelBody,
}

impl PanelContent {
    pub fn rows(&self) -> &[PanelRow] {
        match &self.body {
            PanelBody::Rows(rows) => rows,
            PanelBody::Empty(_) => &[],
        }
    }
}

/// Turn a result set into panel content
pub fn render(results: &ResultSet) -> PanelContent {
    let filename = results
        .path()
        .map(|path| path.rsplit('/').next().unwrap_or(path).to_string());

    let body = if results.is_empty() {
        PanelBody::Empty(EMPTY_MESSAGE)
    } else {
        PanelBody::Rows(results.iter().map(PanelRow::from_occurrence).collect())
    };

    PanelContent { filename, body }
}
