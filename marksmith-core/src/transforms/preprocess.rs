//! Input normalization ahead of tokenization.
//!
//! - CRLF/CR line endings become LF and leading tabs expand to spaces.
//! - Task bullets written as `• [ ]`, or without the space after the bullet
//!   (`-[x]`), are rewritten to the `- [ ]` form the grammar expects.
//! - `$$ expr $$` on one line, and `$$expr` ... `expr$$` split across
//!   lines, are rewrapped so each `$$` sits on its own line.
//!
//! Fenced code regions are copied through untouched.

use crate::formats::markdown::{expand_leading_tabs, normalize_newlines};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static ROUND_BULLET_TASK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)•[ \t]*\[([ xX])\]").unwrap());
static UNSPACED_TASK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*+])\[([ xX])\]").unwrap());
static SINGLE_LINE_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)\$\$(.*[^\s$].*?)\$\$\s*$").unwrap());

const DELIMITER: &str = "$$";

pub fn preprocess(markdown: &str) -> String {
    let source = normalize_newlines(markdown);
    let lines: Vec<Cow<'_, str>> = source.split('\n').map(expand_leading_tabs).collect();

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fence: Option<(char, usize)> = None;
    let mut in_split_math = false;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some((marker, length)) = fence {
            if is_fence_of(trimmed, marker, length) {
                fence = None;
            }
            out.push(line.to_string());
            continue;
        }
        if let Some(opened) = fence_open(trimmed) {
            fence = Some(opened);
            out.push(line.to_string());
            continue;
        }

        let indent = &line[..line.len() - line.trim_start().len()];

        if in_split_math {
            if trimmed == DELIMITER {
                in_split_math = false;
                out.push(line.to_string());
            } else if let Some(body) = trimmed.strip_suffix(DELIMITER) {
                in_split_math = false;
                out.push(format!("{indent}{}", body.trim_end()));
                out.push(format!("{indent}{DELIMITER}"));
            } else {
                out.push(line.to_string());
            }
            continue;
        }

        if let Some(caps) = SINGLE_LINE_MATH
            .captures(line)
            .filter(|caps| !caps[2].contains(DELIMITER))
        {
            let body = caps[2].trim();
            out.push(format!("{indent}{DELIMITER}"));
            out.push(format!("{indent}{body}"));
            out.push(format!("{indent}{DELIMITER}"));
            continue;
        }

        if let Some(body) = trimmed.strip_prefix(DELIMITER) {
            let body = body.trim();
            if !body.is_empty() && !body.contains(DELIMITER) && closes_later(&lines[index + 1..]) {
                in_split_math = true;
                out.push(format!("{indent}{DELIMITER}"));
                out.push(format!("{indent}{body}"));
                continue;
            }
        }

        out.push(collapse_task_bullet(line).into_owned());
    }

    out.join("\n")
}

/// Normalize variant task bullet spellings to `- [ ]`.
pub fn collapse_task_bullet(line: &str) -> Cow<'_, str> {
    if let Some(caps) = ROUND_BULLET_TASK.captures(line) {
        let end = caps.get(0).map_or(0, |m| m.end());
        return Cow::Owned(format!("{}- [{}]{}", &caps[1], &caps[2], &line[end..]));
    }
    if let Some(caps) = UNSPACED_TASK.captures(line) {
        let end = caps.get(0).map_or(0, |m| m.end());
        return Cow::Owned(format!(
            "{}{} [{}]{}",
            &caps[1],
            &caps[2],
            &caps[3],
            &line[end..]
        ));
    }
    Cow::Borrowed(line)
}

/// A later line of the same paragraph ends with `$$`.
fn closes_later(rest: &[Cow<'_, str>]) -> bool {
    for line in rest {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }
        if trimmed.ends_with(DELIMITER) {
            return true;
        }
    }
    false
}

fn fence_open(trimmed: &str) -> Option<(char, usize)> {
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let length = trimmed.chars().take_while(|c| *c == marker).count();
    (length >= 3).then_some((marker, length))
}

fn is_fence_of(trimmed: &str, marker: char, length: usize) -> bool {
    let run = trimmed.chars().take_while(|c| *c == marker).count();
    run >= length && trimmed[run..].trim().is_empty()
}
