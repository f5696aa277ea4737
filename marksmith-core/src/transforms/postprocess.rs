//! Output normalization after rendering.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ABSOLUTE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a href="(https?://[^"]*)"([^>]*)>"#).unwrap());
static IMAGE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<img ([^>]*?)\s*/?>").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static VERBATIM_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)<pre\b.*?</pre>",
        r#"|<script\b.*?</script>"#,
        r#"|<div class="mermaid"[^>]*>.*?</div>"#
    ))
    .unwrap()
});

/// Switches applied by [`postprocess`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostprocessOptions {
    pub external_links_new_tab: bool,
    pub lazy_images: bool,
}

pub fn postprocess(html: &str, options: PostprocessOptions) -> String {
    let mut output = html.to_string();

    if options.external_links_new_tab {
        output = ABSOLUTE_LINK
            .replace_all(&output, |caps: &Captures<'_>| {
                if caps[2].contains("target=") {
                    caps[0].to_string()
                } else {
                    format!(
                        "<a href=\"{}\"{} target=\"_blank\" rel=\"noopener noreferrer\">",
                        &caps[1], &caps[2]
                    )
                }
            })
            .into_owned();
    }

    if options.lazy_images {
        output = IMAGE_TAG
            .replace_all(&output, |caps: &Captures<'_>| {
                if caps[1].contains("loading=") {
                    caps[0].to_string()
                } else {
                    format!("<img {} loading=\"lazy\" />", &caps[1])
                }
            })
            .into_owned();
    }

    let mut output = collapse_blank_runs(&output);
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

/// Collapse three or more newlines to one blank line, outside `<pre>`,
/// `<script>` and mermaid blocks.
fn collapse_blank_runs(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for block in VERBATIM_BLOCK.find_iter(html) {
        out.push_str(&BLANK_RUN.replace_all(&html[last..block.start()], "\n\n"));
        out.push_str(block.as_str());
        last = block.end();
    }
    out.push_str(&BLANK_RUN.replace_all(&html[last..], "\n\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_only_normalize_whitespace() {
        let html = "<p>a</p>\n\n\n\n<p>b</p>";
        assert_eq!(
            postprocess(html, PostprocessOptions::default()),
            "<p>a</p>\n\n<p>b</p>\n"
        );
    }

    #[test]
    fn test_preformatted_blank_lines_survive() {
        let html = "<pre><code>a\n\n\n\nb\n</code></pre>\n";
        assert_eq!(postprocess(html, PostprocessOptions::default()), html);
    }

    #[test]
    fn test_script_and_diagram_blank_lines_survive() {
        let html = "<div class=\"mermaid\" id=\"mermaid-0\">graph TD\n\n\n\nA</div>\n\n\n\
                    <script>let a;\n\n\n\nlet b;</script>\n";
        assert_eq!(
            postprocess(html, PostprocessOptions::default()),
            "<div class=\"mermaid\" id=\"mermaid-0\">graph TD\n\n\n\nA</div>\n\n\
             <script>let a;\n\n\n\nlet b;</script>\n"
        );
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        let options = PostprocessOptions {
            external_links_new_tab: true,
            ..Default::default()
        };
        let html = "<a href=\"https://x.org\">x</a> <a href=\"#fn1\">1</a>\n";
        assert_eq!(
            postprocess(html, options),
            "<a href=\"https://x.org\" target=\"_blank\" rel=\"noopener noreferrer\">x</a> <a href=\"#fn1\">1</a>\n"
        );
    }

    #[test]
    fn test_lazy_images() {
        let options = PostprocessOptions {
            lazy_images: true,
            ..Default::default()
        };
        assert_eq!(
            postprocess("<img src=\"a.png\" alt=\"a\" />\n", options),
            "<img src=\"a.png\" alt=\"a\" loading=\"lazy\" />\n"
        );
    }

    #[test]
    fn test_empty_output_stays_empty() {
        assert_eq!(postprocess("", PostprocessOptions::default()), "");
    }
}
