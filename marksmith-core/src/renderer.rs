//! Renderer entrypoints
//!
//! [`Renderer`] owns the immutable configuration of a rendering pipeline:
//! options, the highlighter language registry and the two collaborators.
//! Every call builds and drops its own document tree, so one renderer can
//! serve concurrent renders.
//!
//! The pipeline is split in two halves that can be driven separately:
//!
//! - [`Renderer::parse`]: preprocess → tokenize → annotate
//! - [`Renderer::render_document`]: serialize → math substitution → postprocess
//!
//! [`Renderer::render`] runs both and never fails.

use crate::ast::nodes::Document;
use crate::common::escape::escape_html;
use crate::error::RenderError;
use crate::formats::html::{serialize_to_html, HtmlOptions};
use crate::formats::markdown;
use crate::highlight::{Highlighter, PlainHighlighter, SyntectHighlighter};
use crate::math::{ClientSideMath, MathFormatter};
use crate::registry::LanguageRegistry;
use crate::transforms::{self, PostprocessOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output for empty or whitespace-only input.
pub const EMPTY_DOCUMENT_HTML: &str = "<p><em>No content</em></p>\n";

/// Construction options, fixed for the lifetime of a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    /// Highlight fenced code with the syntax highlighter.
    pub highlight: bool,
    /// Load extra syntax definitions from `syntax_dir`.
    pub load_additional_languages: bool,
    /// File extension (or fence tag) → highlighter language.
    pub dynamic_file_types: BTreeMap<String, String>,
    pub syntax_dir: Option<PathBuf>,
    pub external_links_new_tab: bool,
    pub lazy_images: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        RendererOptions {
            highlight: true,
            load_additional_languages: false,
            dynamic_file_types: BTreeMap::new(),
            syntax_dir: None,
            external_links_new_tab: false,
            lazy_images: false,
        }
    }
}

pub struct Renderer {
    options: RendererOptions,
    registry: LanguageRegistry,
    highlighter: Arc<dyn Highlighter>,
    math: Arc<dyn MathFormatter>,
}

impl Renderer {
    pub fn new(options: RendererOptions) -> Self {
        let registry = LanguageRegistry::with_file_types(&options.dynamic_file_types);
        let highlighter: Arc<dyn Highlighter> = if !options.highlight {
            Arc::new(PlainHighlighter)
        } else if options.load_additional_languages {
            match &options.syntax_dir {
                Some(dir) => Arc::new(SyntectHighlighter::with_additional_languages(dir)),
                None => {
                    tracing::warn!("load_additional_languages is set but no syntax_dir is configured");
                    Arc::new(SyntectHighlighter::new())
                }
            }
        } else {
            Arc::new(SyntectHighlighter::new())
        };

        Renderer {
            options,
            registry,
            highlighter,
            math: Arc::new(ClientSideMath),
        }
    }

    /// Replace the syntax highlighter
    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Arc::new(highlighter);
        self
    }

    /// Replace the math formatter
    pub fn with_math_formatter(mut self, formatter: impl MathFormatter + 'static) -> Self {
        self.math = Arc::new(formatter);
        self
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn highlighter(&self) -> &dyn Highlighter {
        self.highlighter.as_ref()
    }

    /// Preprocess, tokenize and annotate Markdown into a document tree
    pub fn parse(&self, markdown: &str) -> Document {
        let source = transforms::preprocess(markdown);
        let mut document = markdown::tokenize(&source);
        transforms::annotate(&mut document);
        if let Some(metadata) = document.metadata.as_mut() {
            let mut steps = vec!["preprocess".to_string(), "tokenize".to_string()];
            steps.append(&mut metadata.render_steps);
            metadata.render_steps = steps;
        }
        document
    }

    /// Render a document produced by [`Renderer::parse`]
    ///
    /// Fails only when the tree breaks the renderer's contract: no metadata,
    /// a heading level outside 1..=6, or a math node whose expression was
    /// never extracted.
    pub fn render_document(&self, document: &Document) -> Result<String, RenderError> {
        let options = HtmlOptions {
            highlighter: self.highlighter.as_ref(),
            registry: &self.registry,
        };
        let html = serialize_to_html(document, options)?;
        let expressions = document
            .metadata
            .as_ref()
            .map(|metadata| metadata.math_expressions.as_slice())
            .unwrap_or_default();
        let placeholders = transforms::math::Placeholders::for_document(document);
        let html = transforms::math::substitute(
            &html,
            expressions,
            &placeholders,
            self.math.as_ref(),
        );
        Ok(transforms::postprocess(
            &html,
            PostprocessOptions {
                external_links_new_tab: self.options.external_links_new_tab,
                lazy_images: self.options.lazy_images,
            },
        ))
    }

    /// Render Markdown to an HTML fragment
    ///
    /// Total over every input: empty input gives [`EMPTY_DOCUMENT_HTML`] and
    /// an internal failure is reported inside the returned HTML.
    pub fn render(&self, markdown: &str) -> String {
        if markdown.trim().is_empty() {
            return EMPTY_DOCUMENT_HTML.to_string();
        }
        let document = self.parse(markdown);
        match self.render_document(&document) {
            Ok(html) => html,
            Err(error) => {
                tracing::error!(error = %error, "rendering failed");
                format!(
                    "<div class=\"marksmith-error\">Rendering failed: {}</div>\n",
                    escape_html(&error.to_string())
                )
            }
        }
    }

    /// Read a UTF-8 file and render it
    pub async fn render_file(&self, path: impl AsRef<Path>) -> Result<String, RenderError> {
        let path = path.as_ref();
        let markdown = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RenderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(self.render(&markdown))
    }

    /// Blocking variant of [`Renderer::render_file`]
    pub fn render_file_blocking(&self, path: impl AsRef<Path>) -> Result<String, RenderError> {
        let path = path.as_ref();
        let markdown = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.render(&markdown))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_placeholder() {
        let renderer = Renderer::default();
        assert_eq!(renderer.render(""), EMPTY_DOCUMENT_HTML);
        assert_eq!(renderer.render("  \n\t\n"), EMPTY_DOCUMENT_HTML);
    }

    #[test]
    fn test_render_steps_are_recorded() {
        let doc = Renderer::default().parse("text");
        assert_eq!(
            doc.metadata.as_ref().unwrap().render_steps,
            vec!["preprocess", "tokenize", "annotate"]
        );
    }

    #[test]
    fn test_unannotated_document_is_a_contract_error() {
        let doc = markdown::tokenize("text");
        assert!(matches!(
            Renderer::default().render_document(&doc),
            Err(RenderError::NotAnnotated)
        ));
    }

    #[test]
    fn test_highlight_off_uses_plain_code() {
        let renderer = Renderer::new(RendererOptions {
            highlight: false,
            ..Default::default()
        });
        assert_eq!(
            renderer.render("```rust\nfn x() {}\n```"),
            "<pre><code class=\"language-rust\">fn x() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_dynamic_file_types_reach_the_highlighter() {
        let mut dynamic_file_types = BTreeMap::new();
        dynamic_file_types.insert("myrs".to_string(), "rust".to_string());
        let renderer = Renderer::new(RendererOptions {
            dynamic_file_types,
            ..Default::default()
        });
        let html = renderer.render("```myrs\nfn x() {}\n```");
        assert!(html.contains("<pre class=\"highlight\"><code class=\"language-myrs\">"));
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = Renderer::default()
            .render_file_blocking("/definitely/not/here.md")
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.md"));
    }
}
