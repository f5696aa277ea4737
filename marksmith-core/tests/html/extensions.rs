//! Extended inline syntax, footnotes, raw HTML and output options

use crate::common::{attr, elements, parse_html, text_content};
use marksmith_core::{render, Renderer, RendererOptions};

#[test]
fn test_sub_sup_highlight() {
    assert_eq!(
        render("H~2~O, x^2^ and ==hot=="),
        "<p>H<sub>2</sub>O, x<sup>2</sup> and <mark>hot</mark></p>\n"
    );
}

#[test]
fn test_carets_around_spaces_stay_text() {
    assert_eq!(render("x^2 + y^2"), "<p>x^2 + y^2</p>\n");
    assert_eq!(render("a^b^ + c^d^"), "<p>a<sup>b</sup> + c<sup>d</sup></p>\n");
}

#[test]
fn test_double_tilde_is_strikethrough() {
    assert_eq!(render("~~gone~~"), "<p><del>gone</del></p>\n");
}

#[test]
fn test_nested_inline_extensions() {
    assert_eq!(
        render("==**very** hot=="),
        "<p><mark><strong>very</strong> hot</mark></p>\n"
    );
}

#[test]
fn test_emoji_vocabulary() {
    assert_eq!(render(":rocket: launch"), "<p>🚀 launch</p>\n");
    assert_eq!(render(":not_an_emoji:"), "<p>:not_an_emoji:</p>\n");
}

#[test]
fn test_video_thumbnail() {
    let html = render("@[youtube-thumbnail](https://www.youtube.com/watch?v=dQw4w9WgXcQ)");
    let dom = parse_html(&html);
    let link = &elements(&dom, "a")[0];
    assert_eq!(
        attr(link, "href").as_deref(),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );
    let image = &elements(&dom, "img")[0];
    assert_eq!(
        attr(image, "src").as_deref(),
        Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
    );
}

#[test]
fn test_short_video_url() {
    let html = render("@[youtube-thumbnail](https://youtu.be/abc_DEF-123)");
    assert!(html.contains("img.youtube.com/vi/abc_DEF-123/"));
}

#[test]
fn test_malformed_video_url_falls_back_to_link() {
    assert_eq!(
        render("@[youtube-thumbnail](https://example.com/x)"),
        "<p>@<a href=\"https://example.com/x\">youtube-thumbnail</a></p>\n"
    );
}

#[test]
fn test_footnotes_section() {
    let source = "First[^one] second[^two] again[^one].\n\n[^two]: Two.\n[^one]: One.";
    let dom = parse_html(&render(source));

    let refs: Vec<_> = elements(&dom, "sup")
        .iter()
        .map(|sup| text_content(sup))
        .collect();
    assert_eq!(refs, vec!["1", "2", "1"]);

    let section = &elements(&dom, "section")[0];
    assert_eq!(attr(section, "class").as_deref(), Some("footnotes"));
    let notes: Vec<_> = elements(&dom, "li")
        .iter()
        .map(|li| (attr(li, "id").unwrap_or_default(), text_content(li).trim().to_string()))
        .collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].0, "fn-1");
    assert!(notes[0].1.starts_with("One."));
    assert_eq!(notes[1].0, "fn-2");
    assert!(notes[1].1.starts_with("Two."));
}

#[test]
fn test_unreferenced_footnote_is_dropped() {
    assert_eq!(render("text\n\n[^x]: never used"), "<p>text</p>\n");
}

#[test]
fn test_raw_html_is_not_escaped() {
    assert_eq!(
        render("<details>\n<summary>More</summary>\n</details>"),
        "<details>\n<summary>More</summary>\n</details>\n"
    );
    assert_eq!(render("a <kbd>Ctrl</kbd> b"), "<p>a <kbd>Ctrl</kbd> b</p>\n");
}

#[test]
fn test_links_and_images() {
    assert_eq!(
        render("[site](https://x.org \"Title\") ![logo](l.png)"),
        "<p><a href=\"https://x.org\" title=\"Title\">site</a> <img src=\"l.png\" alt=\"logo\" /></p>\n"
    );
    assert_eq!(
        render("see https://x.org."),
        "<p>see <a href=\"https://x.org\">https://x.org</a>.</p>\n"
    );
}

#[test]
fn test_output_options() {
    let renderer = Renderer::new(RendererOptions {
        external_links_new_tab: true,
        lazy_images: true,
        ..Default::default()
    });
    let html = renderer.render("[a](https://a.org) [b](#b) ![i](i.png)");
    assert!(html.contains(
        "<a href=\"https://a.org\" target=\"_blank\" rel=\"noopener noreferrer\">a</a>"
    ));
    assert!(html.contains("<a href=\"#b\">b</a>"));
    assert!(html.contains("<img src=\"i.png\" alt=\"i\" loading=\"lazy\" />"));
}

#[test]
fn test_entities_and_escapes() {
    assert_eq!(render("&copy; \\*not em\\* a<b"), "<p>&copy; *not em* a&lt;b</p>\n");
}
