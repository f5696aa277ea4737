//! Math formatters
//!
//! The substitution pass hands every extracted expression to a
//! [`MathFormatter`]. [`ClientSideMath`] is the default: it wraps the escaped
//! source in elements KaTeX auto-render picks up in the browser, so rendering
//! needs no JavaScript engine. With the `katex` feature, [`KatexMath`]
//! typesets on the server instead.

use crate::common::escape::escape_html;
use crate::error::MathError;

/// Turns a formula into HTML markup.
pub trait MathFormatter: Send + Sync {
    fn format(&self, expression: &str, display_mode: bool) -> Result<String, MathError>;
}

/// Emits `\( \)` / `\[ \]` delimited markup for client-side typesetting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientSideMath;

impl MathFormatter for ClientSideMath {
    fn format(&self, expression: &str, display_mode: bool) -> Result<String, MathError> {
        let escaped = escape_html(expression);
        Ok(if display_mode {
            format!("<div class=\"math math-display\">\\[{escaped}\\]</div>")
        } else {
            format!("<span class=\"math math-inline\">\\({escaped}\\)</span>")
        })
    }
}

/// Server-side typesetting through the `katex` crate.
#[cfg(feature = "katex")]
#[derive(Debug, Clone, Copy, Default)]
pub struct KatexMath;

#[cfg(feature = "katex")]
impl MathFormatter for KatexMath {
    fn format(&self, expression: &str, display_mode: bool) -> Result<String, MathError> {
        let opts = katex::Opts::builder()
            .display_mode(display_mode)
            .build()
            .map_err(|error| MathError(error.to_string()))?;
        katex::render_with_opts(expression, opts).map_err(|error| MathError(error.to_string()))
    }
}
