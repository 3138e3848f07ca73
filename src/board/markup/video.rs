//! # Video Embeds
//!
//! Recognizes video-sharing links in both the `watch?v=` and the short-link
//! form and turns them into a fixed-size player. Only `key=value` query
//! pairs belong to the link; anything after them stays surrounding text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const PLAYER_WIDTH: u32 = 560;
pub const PLAYER_HEIGHT: u32 = 315;

pub(crate) static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:(?:www\.|m\.)?youtube\.com/watch\?v=|youtu\.be/)(?P<id>[A-Za-z0-9_-]+)(?P<query>(?:[?&][A-Za-z0-9_.%-]+=[A-Za-z0-9_.%-]*)*)",
    )
    .unwrap()
});

/// A recognized video link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink {
    pub video_id: String,
    pub start_seconds: Option<u32>,
}

/// Pull `t=<seconds>` (optionally suffixed with `s`) out of a query string
fn start_time(query: &str) -> Option<u32> {
    query
        .split(['?', '&'])
        .filter_map(|pair| pair.strip_prefix("t="))
        .find_map(|value| value.trim_end_matches('s').parse().ok())
}

impl VideoLink {
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            video_id: caps["id"].to_string(),
            start_seconds: caps.name("query").and_then(|q| start_time(q.as_str())),
        }
    }

    /// Parse a single URL
    pub fn parse(url: &str) -> Option<Self> {
        let caps = VIDEO_URL_RE.captures(url)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != url.len() {
            return None;
        }
        Some(Self::from_captures(&caps))
    }

    pub fn embed_url(&self) -> String {
        match self.start_seconds {
            Some(start) => format!("https://www.youtube.com/embed/{}?start={start}", self.video_id),
            None => format!("https://www.youtube.com/embed/{}", self.video_id),
        }
    }

    /// Player markup sized to the fixed embed box
    pub fn player_html(&self) -> String {
        format!(
            "<iframe class=\"video-embed\" width=\"{PLAYER_WIDTH}\" height=\"{PLAYER_HEIGHT}\" src=\"{}\" frameborder=\"0\" allowfullscreen></iframe>",
            self.embed_url()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_link_should_carry_start_time() {
        let link = VideoLink::parse("https://youtu.be/abc123?t=90").unwrap();
        assert_eq!(link.video_id, "abc123");
        assert_eq!(link.start_seconds, Some(90));
        assert_eq!(link.embed_url(), "https://www.youtube.com/embed/abc123?start=90");
    }

    #[test]
    fn watch_link_should_parse_with_and_without_time() {
        let plain = VideoLink::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(plain.video_id, "dQw4w9WgXcQ");
        assert_eq!(plain.start_seconds, None);

        let timed = VideoLink::parse("http://youtube.com/watch?v=xyz&t=42s").unwrap();
        assert_eq!(timed.start_seconds, Some(42));
    }

    #[test]
    fn other_urls_should_not_parse() {
        assert!(VideoLink::parse("https://vimeo.com/123").is_none());
        assert!(VideoLink::parse("see https://youtu.be/abc").is_none());
    }

    #[test]
    fn query_should_stop_at_non_parameter_text() {
        let caps = VIDEO_URL_RE
            .captures("https://youtu.be/abc?si=x1&t=7&lt;b&gt;")
            .unwrap();
        assert_eq!(&caps[0], "https://youtu.be/abc?si=x1&t=7");
        assert_eq!(VideoLink::from_captures(&caps).start_seconds, Some(7));

        let bare = VIDEO_URL_RE.captures("https://youtu.be/abc&then").unwrap();
        assert_eq!(&bare[0], "https://youtu.be/abc");
    }

    #[test]
    fn player_should_use_fixed_box() {
        let html = VideoLink::parse("https://youtu.be/abc").unwrap().player_html();
        assert!(html.contains("width=\"560\""));
        assert!(html.contains("height=\"315\""));
        assert!(html.contains("src=\"https://www.youtube.com/embed/abc\""));
    }
}
