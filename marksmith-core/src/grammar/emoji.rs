//! Emoji shortcodes (`:name:`) resolved against a fixed vocabulary.

use crate::ast::nodes::Node;
use crate::grammar::RuleMatch;
use once_cell::sync::Lazy;
use regex::Regex;

static SHORTCODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:([a-z0-9_+\-]+):").unwrap());

const EMOJI: &[(&str, &str)] = &[
    ("+1", "👍"),
    ("-1", "👎"),
    ("100", "💯"),
    ("bell", "🔔"),
    ("book", "📖"),
    ("boom", "💥"),
    ("bug", "🐛"),
    ("bulb", "💡"),
    ("calendar", "📆"),
    ("check", "✔️"),
    ("clap", "👏"),
    ("coffee", "☕"),
    ("construction", "🚧"),
    ("cry", "😢"),
    ("eyes", "👀"),
    ("fire", "🔥"),
    ("gear", "⚙️"),
    ("grin", "😁"),
    ("heart", "❤️"),
    ("heavy_check_mark", "✔️"),
    ("hourglass", "⌛"),
    ("info", "ℹ️"),
    ("joy", "😂"),
    ("key", "🔑"),
    ("laughing", "😆"),
    ("link", "🔗"),
    ("lock", "🔒"),
    ("memo", "📝"),
    ("muscle", "💪"),
    ("ok_hand", "👌"),
    ("package", "📦"),
    ("pencil", "📝"),
    ("point_right", "👉"),
    ("pushpin", "📌"),
    ("question", "❓"),
    ("rocket", "🚀"),
    ("sad", "😞"),
    ("smile", "😄"),
    ("smiley", "😃"),
    ("sparkles", "✨"),
    ("star", "⭐"),
    ("tada", "🎉"),
    ("thinking", "🤔"),
    ("thumbsdown", "👎"),
    ("thumbsup", "👍"),
    ("warning", "⚠️"),
    ("wave", "👋"),
    ("white_check_mark", "✅"),
    ("wink", "😉"),
    ("wrench", "🔧"),
    ("x", "❌"),
    ("zap", "⚡"),
];

pub fn lookup(name: &str) -> Option<&'static str> {
    EMOJI
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, glyph)| *glyph)
}

/// Unknown names decline so the text stays literal.
pub fn tokenize(input: &str) -> Option<RuleMatch> {
    let caps = SHORTCODE.captures(input)?;
    let whole = caps.get(0)?;
    let name = &caps[1];
    let glyph = lookup(name)?;
    Some(RuleMatch {
        node: Node::Emoji {
            name: name.to_string(),
            glyph: glyph.to_string(),
            raw: whole.as_str().to_string(),
        },
        consumed: whole.end(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shortcode() {
        let m = tokenize(":rocket: launch").unwrap();
        assert_eq!(m.consumed, 8);
        assert!(matches!(m.node, Node::Emoji { ref glyph, .. } if glyph == "🚀"));
    }

    #[test]
    fn test_unknown_or_malformed_shortcode_declines() {
        assert!(tokenize(":not_an_emoji:").is_none());
        assert!(tokenize(":smile").is_none());
        assert!(tokenize("10:30:00").is_none());
    }

    #[test]
    fn test_vocabulary_names_are_unique() {
        let mut names: Vec<_> = EMOJI.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EMOJI.len());
    }
}
