use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TroubleError;

/// Marker keyword recognised after a `#`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TagKind {
    Todo,
    Fixme,
    Bug,
    Note,
    Warn,
}

/// Display style for a tag label in the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagStyle {
    /// Text shown in the label
    pub label: &'static str,
    /// Label color as `#rrggbb`
    pub color: &'static str,
    /// SGR foreground code used by terminal views
    pub ansi: u8,
    /// CSS class carried by the label element
    pub css_class: &'static str,
}

const TODO_STYLE: TagStyle = TagStyle {
    label: "TODO",
    color: "#4f8ff7",
    ansi: 34,
    css_class: "trouble-tags-label-todo",
};

const FIXME_STYLE: TagStyle = TagStyle {
    label: "FIXME",
    color: "#f59e0b",
    ansi: 33,
    css_class: "trouble-tags-label-fixme",
};

const BUG_STYLE: TagStyle = TagStyle {
    label: "BUG",
    color: "#ef4444",
    ansi: 31,
    css_class: "trouble-tags-label-bug",
};

const NOTE_STYLE: TagStyle = TagStyle {
    label: "NOTE",
    color: "#22c55e",
    ansi: 32,
    css_class: "trouble-tags-label-note",
};

const WARN_STYLE: TagStyle = TagStyle {
    label: "WARN",
    color: "#eab308",
    ansi: 93,
    css_class: "trouble-tags-label-warn",
};

impl TagKind {
    pub const ALL: [TagKind; 5] = [
        TagKind::Todo,
        TagKind::Fixme,
        TagKind::Bug,
        TagKind::Note,
        TagKind::Warn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Todo => "TODO",
            TagKind::Fixme => "FIXME",
            TagKind::Bug => "BUG",
            TagKind::Note => "NOTE",
            TagKind::Warn => "WARN",
        }
    }

    pub fn style(&self) -> &'static TagStyle {
        match self {
            TagKind::Todo => &TODO_STYLE,
            TagKind::Fixme => &FIXME_STYLE,
            TagKind::Bug => &BUG_STYLE,
            TagKind::Note => &NOTE_STYLE,
            TagKind::Warn => &WARN_STYLE,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TagKind {
    type Err = TroubleError;

    /// Keywords are matched exactly; `todo` is not `TODO`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TroubleError::UnknownTag(s.to_string()))
    }
}
