//! Text-level passes around the tree pipeline
//!
//! The pipeline runs in this order:
//!
//! 1. [`preprocess`]: normalize Markdown before tokenization
//! 2. [`annotate`]: extract metadata from the tokenized tree
//! 3. [`math::substitute`]: replace math anchors in the serialized HTML
//! 4. [`postprocess`]: adjust attributes and whitespace of the final HTML

pub mod annotate;
pub mod math;
pub mod postprocess;
pub mod preprocess;

pub use annotate::{annotate, DIAGRAM_LANGUAGE};
pub use postprocess::{postprocess, PostprocessOptions};
pub use preprocess::preprocess;
