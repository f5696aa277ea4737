//! Video thumbnails: `@[youtube-thumbnail](URL)`.

use crate::ast::nodes::Node;
use crate::grammar::RuleMatch;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static THUMBNAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@\[youtube-thumbnail\]\(\s*<?([^()\s<>]+)>?\s*\)").unwrap());

pub fn tokenize(input: &str) -> Option<RuleMatch> {
    let caps = THUMBNAIL.captures(input)?;
    let whole = caps.get(0)?;
    let url = caps[1].to_string();
    let video_id = extract_video_id(&url)?;
    Some(RuleMatch {
        node: Node::VideoThumbnail {
            video_id,
            url,
            raw: whole.as_str().to_string(),
        },
        consumed: whole.end(),
    })
}

/// Video id from a `watch?v=ID`, `youtu.be/ID` or `/embed/ID` URL.
///
/// Scheme-less URLs are accepted. Anything else yields `None` and the
/// construct stays literal text.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw)
        .or_else(|_| Url::parse(&format!("https://{raw}")))
        .ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.");

    let candidate = if host == "youtu.be" {
        parsed.path_segments()?.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        let mut segments = parsed.path_segments()?;
        match segments.next() {
            Some("watch") => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed") | Some("shorts") => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    candidate.filter(|id| is_video_id(id))
}

fn is_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
