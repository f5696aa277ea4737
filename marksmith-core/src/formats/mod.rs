//! Format implementations
//!
//! - `markdown`: Markdown source → document tree (the lexer)
//! - `html`: document tree → HTML
//! - `treeviz`: document tree → indented tree view for inspection

pub mod html;
pub mod markdown;
pub mod treeviz;

pub use html::{get_default_css, serialize_to_html, standalone_page, HtmlOptions, PageAssets};
pub use treeviz::to_treeviz;
