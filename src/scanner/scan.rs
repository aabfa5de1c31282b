//! Tag marker extraction
//!
//! Finds `#TODO`, `#FIXME`, `#BUG`, `#NOTE` and `#WARN` markers line by line and
//! captures the text that follows each marker as its context.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::tags::TagKind;

// ASCII word boundary: `#TODO修复` is a tag, `#TODOS` and `#TODO_x` are not
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#(TODO|FIXME|BUG|NOTE|WARN)(?-u:\b)").expect("tag pattern is valid")
});

/// A single tag marker found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Tag keyword
    pub kind: TagKind,
    /// Line number (0-based)
    pub line: usize,
    /// Text following the marker, or the whole trimmed line when nothing follows
    pub context: String,
}

impl Occurrence {
    /// Position indicator shown in the panel (`:<line+1>`)
    pub fn position_label(&self) -> String {
        format!(":{}", self.line + 1)
    }
}

/// Whitespace including the byte-order mark, which `char::is_whitespace` skips
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn is_separator(c: char) -> bool {
    is_blank(c) || matches!(c, ':' | '\u{2014}' | '\u{2013}' | '-')
}

fn extract_context(tail: &str, line: &str) -> String {
    let context = tail.trim_start_matches(is_separator).trim_matches(is_blank);
    if context.is_empty() {
        line.trim_matches(is_blank).to_string()
    } else {
        context.to_string()
    }
}

/// Scan document text for tag markers.
///
/// Lines are split on `\n` only, so a trailing `\r` stays part of the line.
/// Occurrences come out in line order, then left to right within a line. The
/// context of a marker ends where the next marker on the same line starts.
pub fn scan(text: &str) -> Vec<Occurrence> {
    let mut hits = Vec::new();

    for (line_no, line) in text.split('\n').enumerate() {
        let matches: Vec<_> = TAG_PATTERN.captures_iter(line).collect();

        for (i, caps) in matches.iter().enumerate() {
            let (Some(marker), Some(keyword)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(kind) = keyword.as_str().parse::<TagKind>() else {
                continue;
            };

            let end = matches
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|next| next.start())
                .unwrap_or(line.len());

            hits.push(Occurrence {
                kind,
                line: line_no,
                context: extract_context(&line[marker.end()..end], line),
            });
        }
    }

    hits
}
