//! Property tests over arbitrary Markdown-ish input

use crate::common::{elements, parse_html};
use marksmith_core::{render, Renderer};
use proptest::prelude::*;

fn markdownish() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "# ", "## ", "- ", "- [x] ", "1. ", "> ", "```", "~~~", "$$", "$", "**", "*", "_", "~~",
        "~", "^", "==", "[^1]", "[^1]: ", "|", "---", ":smile:", "<div>", "</div>", "\n", "\n\n",
        "text", " ", "\t", "\\", "`", "[a](b)", "@[youtube-thumbnail](", ")",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_render_is_total(source in any::<String>()) {
        let html = render(&source);
        prop_assert!(html.is_empty() || html.ends_with('\n'));
    }

    #[test]
    fn test_render_is_deterministic(source in markdownish()) {
        let renderer = Renderer::default();
        prop_assert_eq!(renderer.render(&source), renderer.render(&source));
    }

    #[test]
    fn test_render_never_reports_failure(source in markdownish()) {
        let html = render(&source);
        prop_assert!(!html.contains("marksmith-error"), "failed on {:?}: {}", source, html);
    }

    #[test]
    fn test_heading_levels(level in 1usize..=6, title in "[a-z]{1,12}") {
        let html = render(&format!("{} {}", "#".repeat(level), title));
        let dom = parse_html(&html);
        let tag = format!("h{level}");
        prop_assert_eq!(elements(&dom, &tag).len(), 1);
    }
}
