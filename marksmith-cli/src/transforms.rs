//! Inspect transforms
//!
//! Each transform renders one view of the parsed document:
//!
//! - `ast-treeviz`: tree visualization with Unicode icons (default)
//! - `ast-json`: the document tree and its metadata as JSON
//! - `metadata-json`: only the annotator's metadata as JSON
//!
//! ## Extra Parameters
//!
//! - `pretty`: "false" switches JSON output to a single line
//!
//! Example: `marksmith inspect notes.md ast-json --extra-pretty false`

use marksmith_core::formats::to_treeviz;
use marksmith_core::Renderer;
use serde::Serialize;
use std::collections::HashMap;

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["ast-treeviz", "ast-json", "metadata-json"];

/// Parse `source` with `renderer` and apply the named transform
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    renderer: &Renderer,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    let pretty = extra_params
        .get("pretty")
        .map_or(true, |value| value != "false");
    let document = renderer.parse(source);

    match transform_name {
        "ast-treeviz" => Ok(to_treeviz(&document)),
        "ast-json" => to_json(&document, pretty),
        "metadata-json" => {
            let metadata = document
                .metadata
                .as_ref()
                .ok_or_else(|| "Transform failed: document was not annotated".to_string())?;
            to_json(metadata, pretty)
        }
        other => Err(format!(
            "Unknown transform '{other}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map(|mut text| {
        text.push('\n');
        text
    })
    .map_err(|e| format!("JSON serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, transform: &str) -> Result<String, String> {
        execute_transform(source, transform, &Renderer::default(), &HashMap::new())
    }

    #[test]
    fn test_treeviz_is_default_view() {
        let output = run("# Title", "ast-treeviz").unwrap();
        assert!(output.starts_with("⧉ Document (1 nodes)"));
    }

    #[test]
    fn test_ast_json_carries_metadata() {
        let output = run("```rust\nfn main() {}\n```", "ast-json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["children"][0]["type"], "code-block");
        assert_eq!(value["metadata"]["code_languages"][0], "rust");
    }

    #[test]
    fn test_metadata_json() {
        let output = run("$x$ and\n\n```mermaid\ngraph\n```", "metadata-json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["math_expressions"][0]["content"], "x");
        assert_eq!(value["diagram_blocks"][0]["path"][0], 1);
    }

    #[test]
    fn test_compact_json() {
        let mut params = HashMap::new();
        params.insert("pretty".to_string(), "false".to_string());
        let output =
            execute_transform("text", "metadata-json", &Renderer::default(), &params).unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_unknown_transform() {
        let err = run("text", "token-json").unwrap_err();
        assert!(err.contains("ast-treeviz"));
    }
}
