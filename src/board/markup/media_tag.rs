//! # Media Tag Codec
//!
//! Inline catalog references use a positional, colon-delimited grammar:
//!
//! ```text
//! [MEDIA:<type>:<source>:<source_id>:<title>:<status>]
//! ```
//!
//! Only the title may carry a colon, written as `\:` (a literal backslash is
//! `\\`). Every other field forbids `:` and `]`.

use crate::board::models::{MediaReference, MediaType};
use regex::Regex;
use std::sync::LazyLock;

/// Status written when the catalog entry has none
pub const DEFAULT_STATUS: &str = "planned";

static MEDIA_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[MEDIA:(?P<type>[^:\]]+):(?P<source>[^:\]]+):(?P<id>[^:\]]+):(?P<title>(?:\\[:\\]|[^:\]\\])*):(?P<status>[^:\]]+)\]",
    )
    .unwrap()
});

/// Piece of decoded text
#[derive(Debug, Clone, PartialEq)]
pub enum TagSegment<'a> {
    Text(&'a str),
    Media(MediaReference),
}

/// Replace characters a positional field cannot hold
fn sanitize_field(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c == ':' || c == ']' { '_' } else { c })
        .collect()
}

fn escape_title(title: &str) -> String {
    let mut escaped = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ':' => escaped.push_str("\\:"),
            ']' => escaped.push(')'),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_title(raw: &str) -> String {
    let mut title = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                title.push(next);
            }
        } else {
            title.push(c);
        }
    }
    title
}

/// Encode a reference as an inline tag
pub fn encode(reference: &MediaReference) -> String {
    let status = sanitize_field(&reference.status);
    let status = if status.is_empty() {
        DEFAULT_STATUS.to_string()
    } else {
        status
    };

    format!(
        "[MEDIA:{}:{}:{}:{}:{}]",
        reference.media_type,
        sanitize_field(&reference.source),
        sanitize_field(&reference.source_id),
        escape_title(&reference.title),
        status
    )
}

/// Split text into plain segments and media references.
///
/// Matches are found left to right without overlap. A tag with an unknown
/// media type is left in the surrounding text.
pub fn decode(text: &str) -> Vec<TagSegment<'_>> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in MEDIA_TAG_RE.captures_iter(text) {
        let Ok(media_type) = caps["type"].parse::<MediaType>() else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if whole.start() > last_end {
            segments.push(TagSegment::Text(&text[last_end..whole.start()]));
        }
        segments.push(TagSegment::Media(MediaReference {
            media_type,
            source: caps["source"].to_string(),
            source_id: caps["id"].to_string(),
            title: unescape_title(&caps["title"]),
            status: caps["status"].to_string(),
        }));
        last_end = whole.end();
    }

    if last_end < text.len() {
        segments.push(TagSegment::Text(&text[last_end..]));
    }
    segments
}
