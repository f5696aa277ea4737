//! Highlighter language registry
//!
//! Maps the language tag written on a code fence (or a file extension) to
//! the token the syntax highlighter understands. The registry is built once
//! per renderer from a built-in alias table plus the user's
//! `dynamic_file_types` bindings and is read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Built-in fence aliases for tokens the highlighter names differently.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("console", "bash"),
    ("py", "python"),
    ("python3", "python"),
    ("rs", "rust"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("rb", "ruby"),
    ("cpp", "c++"),
    ("cc", "c++"),
    ("hpp", "c++"),
    ("cs", "c#"),
    ("csharp", "c#"),
    ("golang", "go"),
    ("htm", "html"),
    ("xhtml", "html"),
];

/// Registry of highlighter language bindings
///
/// # Examples
///
/// ```ignore
/// let mut registry = LanguageRegistry::new();
/// registry.register("vue", "html");
///
/// assert_eq!(registry.resolve("Vue"), "html");
/// assert_eq!(registry.resolve("sh"), "bash");
/// assert_eq!(registry.language_for_path("App.vue"), Some("html".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    aliases: HashMap<String, String>,
    file_types: HashMap<String, String>,
}

impl LanguageRegistry {
    /// Create a registry holding only the built-in aliases
    pub fn new() -> Self {
        LanguageRegistry {
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(alias, token)| (alias.to_string(), token.to_string()))
                .collect(),
            file_types: HashMap::new(),
        }
    }

    /// Create a registry with the built-in aliases and the given
    /// extension-to-language bindings
    pub fn with_file_types(file_types: &BTreeMap<String, String>) -> Self {
        let mut registry = Self::new();
        for (extension, language) in file_types {
            registry.register(extension, language);
        }
        registry
    }

    /// Bind a file extension (or fence tag) to a highlighter language
    ///
    /// A later binding for the same extension replaces the earlier one.
    pub fn register(&mut self, extension: &str, language: &str) {
        let extension = extension.trim_start_matches('.').to_lowercase();
        self.file_types.insert(extension, language.to_lowercase());
    }

    /// Highlighter token for a fence language tag
    ///
    /// User bindings win over the built-in aliases; an unknown tag resolves
    /// to itself, lowercased.
    pub fn resolve(&self, tag: &str) -> String {
        let tag = tag.to_lowercase();
        self.file_types
            .get(&tag)
            .or_else(|| self.aliases.get(&tag))
            .cloned()
            .unwrap_or(tag)
    }

    /// Highlighter token for a file, from its extension
    pub fn language_for_path(&self, path: impl AsRef<Path>) -> Option<String> {
        let extension = path.as_ref().extension().and_then(|ext| ext.to_str())?;
        Some(self.resolve(extension))
    }

    /// User bindings, sorted by extension
    pub fn file_types(&self) -> Vec<(String, String)> {
        let mut bindings: Vec<_> = self
            .file_types
            .iter()
            .map(|(ext, lang)| (ext.clone(), lang.clone()))
            .collect();
        bindings.sort();
        bindings
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
