//! Syntax highlighting collaborators
//!
//! [`SyntectHighlighter`] produces class-based markup (`<span class="...">`)
//! so the colors come from a stylesheet, see [`theme_css`]. The bundled
//! syntax definitions are loaded once per process on first use and shared by
//! every highlighter built from them.

use crate::error::HighlightError;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Theme used by the generated stylesheet.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

static DEFAULT_SYNTAXES: Lazy<Arc<SyntaxSet>> =
    Lazy::new(|| Arc::new(SyntaxSet::load_defaults_newlines()));
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Turns source code into highlighted HTML.
///
/// `Ok(None)` means the language is not recognized; the caller then emits
/// the escaped code itself.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, code: &str, language: &str) -> Result<Option<String>, HighlightError>;

    /// Names of the languages this highlighter recognizes.
    fn languages(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Recognizes nothing. Used when highlighting is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, _code: &str, _language: &str) -> Result<Option<String>, HighlightError> {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct SyntectHighlighter {
    syntaxes: Arc<SyntaxSet>,
}

impl SyntectHighlighter {
    /// Highlighter over the bundled syntax definitions
    pub fn new() -> Self {
        SyntectHighlighter {
            syntaxes: Arc::clone(&DEFAULT_SYNTAXES),
        }
    }

    /// Highlighter over the bundled definitions plus every `.sublime-syntax`
    /// file under `dir`
    ///
    /// A directory that fails to load is logged and ignored.
    pub fn with_additional_languages(dir: &Path) -> Self {
        let mut builder = SyntaxSet::load_defaults_newlines().into_builder();
        match builder.add_from_folder(dir, true) {
            Ok(()) => {
                let syntaxes = builder.build();
                tracing::debug!(
                    dir = %dir.display(),
                    count = syntaxes.syntaxes().len(),
                    "loaded additional syntax definitions"
                );
                SyntectHighlighter {
                    syntaxes: Arc::new(syntaxes),
                }
            }
            Err(error) => {
                tracing::warn!(
                    dir = %dir.display(),
                    error = %error,
                    "could not load additional syntax definitions"
                );
                Self::new()
            }
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<Option<String>, HighlightError> {
        let Some(syntax) = self.syntaxes.find_syntax_by_token(language) else {
            return Ok(None);
        };
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|error| HighlightError {
                    language: language.to_string(),
                    message: error.to_string(),
                })?;
        }
        Ok(Some(generator.finalize()))
    }

    fn languages(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .syntaxes
            .syntaxes()
            .iter()
            .map(|syntax| {
                if syntax.file_extensions.is_empty() {
                    syntax.name.clone()
                } else {
                    format!("{} ({})", syntax.name, syntax.file_extensions.join(", "))
                }
            })
            .collect();
        names.sort();
        names
    }
}

/// Stylesheet for the class names [`SyntectHighlighter`] emits.
pub fn theme_css(theme: &str) -> Result<String, HighlightError> {
    let css_error = |message: String| HighlightError {
        language: "css".to_string(),
        message,
    };
    let theme = THEMES
        .themes
        .get(theme)
        .ok_or_else(|| css_error(format!("unknown theme '{theme}'")))?;
    css_for_theme_with_class_style(theme, ClassStyle::Spaced)
        .map_err(|error| css_error(error.to_string()))
}
