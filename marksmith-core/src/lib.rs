//! Extensible Markdown to HTML rendering
//!
//!     This crate turns Markdown, extended with task lists, footnotes, sub/superscript, highlights,
//!     math, diagrams, emoji and video thumbnails, into HTML. It is a pure lib: it powers the
//!     marksmith cli but makes no assumption about a shell (no printing, no env vars).
//!
//! Architecture
//!
//!     The pipeline is linear, every stage owning one concern:
//!
//!     raw text → preprocess → tokenize (block + inline, grammar rules) → document tree
//!              → annotate (metadata) → serialize to HTML → math substitution → postprocess
//!
//!     The document tree (./ast) is the boundary between the two halves. Everything that walks it
//!     does so through the flat event stream of ./common/tree_walk.rs, so no stage recurses per
//!     nesting level and pathological nesting is bounded by memory, not by the call stack.
//!
//!     The file structure :
//!     .
//!     ├── ast                     # Document tree, metadata, events
//!     ├── common                  # Tree walking, escaping
//!     ├── grammar                 # The extension rule set (closed, ordered)
//!     ├── formats
//!     │   ├── markdown            # Lexer: block.rs, inline.rs, table.rs
//!     │   ├── html                # Serializer + standalone page
//!     │   └── treeviz             # Tree view for inspection
//!     ├── transforms              # preprocess, annotate, math substitution, postprocess
//!     ├── highlight.rs            # Highlighter trait + syntect implementation
//!     ├── math.rs                 # MathFormatter trait + implementations
//!     ├── registry.rs             # Highlighter language registry
//!     ├── renderer.rs             # Renderer entrypoints
//!     └── error.rs
//!
//! Collaborators
//!
//!     Syntax highlighting and math typesetting are traits ([`Highlighter`], [`MathFormatter`])
//!     so the renderer never depends on an engine directly. Failures of either are logged and the
//!     output falls back to escaped source: rendering always completes. Diagrams are never
//!     rendered here; mermaid blocks become tagged containers for the browser.
//!
//! Library Choices
//!
//!     - `regex` + `once_cell` for the grammar patterns
//!     - `syntect` for highlighting, with class based output so themes are plain CSS
//!     - `url` for video links
//!     - `katex` (optional, `katex` feature) for server-side math
//!     - `tracing` for diagnostics, `thiserror` for error types, `serde` for inspection output
//!
//! Testing
//!     tests
//!     ├── common                  # DOM helpers (html5ever)
//!     ├── html                    # rendering behaviour
//!     ├── markdown                # lexer behaviour
//!     └── properties.rs           # proptest properties
//!
//!     Rust does not discover tests in subdirectories by default, so tests/lib.rs includes them.

pub mod ast;
pub mod common;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod highlight;
pub mod math;
pub mod registry;
pub mod renderer;
pub mod transforms;

pub use ast::{Document, Metadata, Node};
pub use error::{HighlightError, MathError, RenderError};
pub use formats::html::{standalone_page, PageAssets};
pub use highlight::{Highlighter, PlainHighlighter, SyntectHighlighter};
#[cfg(feature = "katex")]
pub use math::KatexMath;
pub use math::{ClientSideMath, MathFormatter};
pub use registry::LanguageRegistry;
pub use renderer::{Renderer, RendererOptions, EMPTY_DOCUMENT_HTML};

/// Render Markdown with the default options
pub fn render(markdown: &str) -> String {
    Renderer::default().render(markdown)
}
