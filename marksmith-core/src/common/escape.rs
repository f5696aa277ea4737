//! HTML escaping helpers shared by the serializer and the substitution pass.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap());

/// Escape text content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape Markdown text, keeping well-formed entity references intact.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find(|c: char| matches!(c, '&' | '<' | '>' | '"')) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match tail.as_bytes()[0] {
            b'&' => match ENTITY_RE.find(tail) {
                Some(entity) => {
                    out.push_str(entity.as_str());
                    rest = &tail[entity.end()..];
                    continue;
                }
                None => out.push_str("&amp;"),
            },
            b'<' => out.push_str("&lt;"),
            b'>' => out.push_str("&gt;"),
            _ => out.push_str("&quot;"),
        }
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

/// Bytes percent-encoded in `href`/`src` values. `%` stays so existing
/// escapes survive; non-ASCII is always encoded.
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'`');

/// Percent-encode characters that are not valid in an `href`/`src` value.
pub fn escape_url(url: &str) -> String {
    utf8_percent_encode(url, URL_UNSAFE)
        .to_string()
        .replace('&', "&amp;")
}
