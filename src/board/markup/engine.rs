//! # Markup Engine
//!
//! Turns raw post text into display markup through a fixed pipeline:
//!
//! 1. escape `<` and `>`
//! 2. media tags become links to the internal detail route
//! 3. `[label](url)` becomes an anchor
//! 4. video links become an embedded player
//! 5. newlines become `<br>`
//!
//! Escaping is the only sanitization step. Every later stage works on the
//! text pieces left by the stages before it and never looks inside markup
//! the engine generated itself.

use super::media_tag::{self, TagSegment};
use super::video::{VideoLink, VIDEO_URL_RE};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?P<label>.+?)\]\((?P<url>[^)]+)\)").unwrap());

/// Rendered, display-ready markup. Never feed it back into `render`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayFragment(String);

impl DisplayFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of a pipeline stage
#[derive(Debug)]
enum Piece {
    /// Escaped user text, still open to later stages
    Text(String),
    /// Engine-generated markup
    Markup(String),
}

/// Escape the two characters that could open or close an element
pub fn escape_angle_brackets(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Only web and site-relative targets become anchors
fn is_linkable(url: &str) -> bool {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || url.starts_with('/')
}

fn href_value(url: &str) -> String {
    url.trim().replace('"', "%22")
}

/// Apply `stage` to every text piece, passing markup through untouched
fn run_stage(pieces: Vec<Piece>, stage: impl Fn(&str, &mut Vec<Piece>)) -> Vec<Piece> {
    let mut output = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match piece {
            Piece::Text(text) => stage(&text, &mut output),
            markup => output.push(markup),
        }
    }
    output
}

/// Split `text` on every regex match, letting `replace` decide whether a
/// match becomes markup. Declined matches stay text.
fn replace_matches(
    text: &str,
    regex: &Regex,
    output: &mut Vec<Piece>,
    replace: impl Fn(&regex::Captures<'_>) -> Option<String>,
) {
    let mut last_end = 0;
    for caps in regex.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some(markup) = replace(&caps) else {
            continue;
        };
        if whole.start() > last_end {
            output.push(Piece::Text(text[last_end..whole.start()].to_string()));
        }
        output.push(Piece::Markup(markup));
        last_end = whole.end();
    }
    if last_end < text.len() {
        output.push(Piece::Text(text[last_end..].to_string()));
    }
}

fn media_stage(text: &str, output: &mut Vec<Piece>) {
    for segment in media_tag::decode(text) {
        match segment {
            TagSegment::Text(plain) => output.push(Piece::Text(plain.to_string())),
            TagSegment::Media(reference) => output.push(Piece::Markup(format!(
                "<a class=\"media-tag\" href=\"{}\">{}</a>",
                href_value(&reference.detail_path()),
                reference.title
            ))),
        }
    }
}

fn link_stage(text: &str, output: &mut Vec<Piece>) {
    replace_matches(text, &LINK_RE, output, |caps| {
        let url = &caps["url"];
        if !is_linkable(url) {
            return None;
        }
        let target = if url.trim().starts_with('/') {
            ""
        } else {
            " target=\"_blank\" rel=\"noopener\""
        };
        Some(format!(
            "<a href=\"{}\"{target}>{}</a>",
            href_value(url),
            &caps["label"]
        ))
    });
}

fn video_stage(text: &str, output: &mut Vec<Piece>) {
    replace_matches(text, &VIDEO_URL_RE, output, |caps| {
        Some(VideoLink::from_captures(caps).player_html())
    });
}

fn line_break_stage(text: &str, output: &mut Vec<Piece>) {
    output.push(Piece::Text(text.replace("\r\n", "<br>").replace('\n', "<br>")));
}

/// Pure transform from raw text to display markup
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupEngine;

impl MarkupEngine {
    pub fn new() -> Self {
        Self
    }

    /// Render raw text. Malformed tags and links stay literal; never fails.
    pub fn render(&self, raw: &str) -> DisplayFragment {
        let pieces = vec![Piece::Text(escape_angle_brackets(raw))];
        let pieces = run_stage(pieces, media_stage);
        let pieces = run_stage(pieces, link_stage);
        let pieces = run_stage(pieces, video_stage);
        let pieces = run_stage(pieces, line_break_stage);

        let html = pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Text(text) | Piece::Markup(text) => text,
            })
            .collect::<String>();
        DisplayFragment(html)
    }
}

/// Render with the default engine
pub fn render(raw: &str) -> DisplayFragment {
    MarkupEngine::new().render(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_should_only_escape_and_break_lines() {
        let raw = "a <b> & \"c\"\nnext > line\r\nlast";
        assert_eq!(
            render(raw).as_str(),
            "a &lt;b&gt; & \"c\"<br>next &gt; line<br>last"
        );
    }

    #[test]
    fn script_tags_should_be_neutralized() {
        let html = render("<script>alert(1)</script>");
        assert_eq!(html.as_str(), "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn media_tag_and_short_video_link_should_render_together() {
        let html = render(
            "Check [MEDIA:movie:tmdb:603:The Matrix:completed] out https://youtu.be/abc123?t=90",
        );
        assert_eq!(
            html.as_str(),
            "Check <a class=\"media-tag\" href=\"/tmdb/movie/603/\">The Matrix</a> out \
             <iframe class=\"video-embed\" width=\"560\" height=\"315\" \
             src=\"https://www.youtube.com/embed/abc123?start=90\" frameborder=\"0\" \
             allowfullscreen></iframe>"
        );
    }

    #[test]
    fn season_tags_should_link_to_season_route() {
        let html = render("[MEDIA:tv:tmdb:1399_s2:Game of Thrones\\: S2:ongoing]");
        assert_eq!(
            html.as_str(),
            "<a class=\"media-tag\" href=\"/tmdb/season/1399/2/\">Game of Thrones: S2</a>"
        );
    }

    #[test]
    fn quotes_in_media_tag_fields_should_stay_inside_href() {
        let html = render("[MEDIA:movie:x\" onmouseover=\"alert(1):603:T:completed]");
        assert_eq!(
            html.as_str(),
            "<a class=\"media-tag\" href=\"/x%22 onmouseover=%22alert(1)/movie/603/\">T</a>"
        );
    }

    #[test]
    fn text_after_video_link_should_be_kept() {
        let html = render("watch https://youtu.be/abc123&then <b>bold</b> end");
        assert_eq!(
            html.as_str(),
            "watch <iframe class=\"video-embed\" width=\"560\" height=\"315\" \
             src=\"https://www.youtube.com/embed/abc123\" frameborder=\"0\" \
             allowfullscreen></iframe>&then &lt;b&gt;bold&lt;/b&gt; end"
        );
    }

    #[test]
    fn trailing_punctuation_after_timed_video_link_should_be_kept() {
        let html = render("(see https://youtu.be/abc?t=90).");
        assert!(html.as_str().starts_with("(see <iframe"));
        assert!(html.as_str().contains("embed/abc?start=90"));
        assert!(html.as_str().ends_with("</iframe>)."));
    }

    #[test]
    fn markdown_links_should_become_anchors() {
        let html = render("see [the docs](https://example.com/a?b=1) and [home](/lists/)");
        assert_eq!(
            html.as_str(),
            "see <a href=\"https://example.com/a?b=1\" target=\"_blank\" rel=\"noopener\">the docs</a> \
             and <a href=\"/lists/\">home</a>"
        );
    }

    #[test]
    fn unsafe_link_targets_should_stay_literal() {
        let raw = "[click](javascript:alert(1))";
        assert_eq!(render(raw).as_str(), raw);
    }

    #[test]
    fn quotes_in_link_urls_should_not_break_out_of_href() {
        let html = render("[x](https://a.example/\"onmouseover=\"y)");
        assert!(html.as_str().contains("href=\"https://a.example/%22onmouseover=%22y\""));
    }

    #[test]
    fn video_link_inside_markdown_link_should_not_embed() {
        let html = render("[trailer](https://youtu.be/abc)");
        assert_eq!(
            html.as_str(),
            "<a href=\"https://youtu.be/abc\" target=\"_blank\" rel=\"noopener\">trailer</a>"
        );
    }

    #[test]
    fn watch_links_should_embed() {
        let html = render("https://www.youtube.com/watch?v=xyz&t=5");
        assert!(html
            .as_str()
            .contains("src=\"https://www.youtube.com/embed/xyz?start=5\""));
    }

    #[test]
    fn malformed_constructs_should_stay_literal() {
        let raw = "[MEDIA:movie:tmdb] [label](  [unclosed";
        assert_eq!(render(raw).as_str(), raw);
    }

    #[test]
    fn escaped_text_inside_titles_should_not_be_escaped_twice() {
        let html = render("[MEDIA:book:ol:1:<Title>:read]");
        assert_eq!(
            html.as_str(),
            "<a class=\"media-tag\" href=\"/ol/book/1/\">&lt;Title&gt;</a>"
        );
    }
}
