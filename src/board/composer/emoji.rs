//! Fixed emoji palette offered by the composer.

pub const EMOJI_PALETTE: &[&str] = &[
    "😀", "😁", "😂", "🤣", "😃", "😄", "😅", "😆", "😉", "😊", "😍", "😘", "😜", "🤔", "😎",
    "😢", "😭", "😡", "👍", "👎", "🙏", "🔥", "🎉", "💯", "🥳", "😇", "🤩", "😏", "😬", "😴",
    "🤗", "😱", "🥺", "😤", "😈", "💖", "💔", "💙", "⭐", "🌟", "✨", "⚡", "🍶", "🍺", "🍻",
    "🥂", "🍷", "🧂",
];

/// Palette entry at `index`
pub fn emoji_at(index: usize) -> Option<&'static str> {
    EMOJI_PALETTE.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_lookup_should_be_bounded() {
        assert_eq!(emoji_at(0), Some("😀"));
        assert_eq!(emoji_at(EMOJI_PALETTE.len()), None);
    }
}
