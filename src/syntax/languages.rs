//! Language identification and detection
//!
//! Maps file extensions and names to language IDs and provides language metadata.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    Rust,
    Python,
    Go,
    C,
    Cpp,
    Java,
    Bash,
}

impl LanguageId {
    /// Every language with a grammar, in display order
    pub const HIGHLIGHTED: &'static [LanguageId] = &[
        LanguageId::Rust,
        LanguageId::Python,
        LanguageId::Go,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Java,
        LanguageId::Bash,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => LanguageId::Rust,
            "py" | "pyi" | "pyw" => LanguageId::Python,
            "go" => LanguageId::Go,
            "c" | "h" => LanguageId::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => LanguageId::Cpp,
            "java" => LanguageId::Java,
            "sh" | "bash" | "zsh" => LanguageId::Bash,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Stable lowercase name used in config files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "plaintext",
            LanguageId::Rust => "rust",
            LanguageId::Python => "python",
            LanguageId::Go => "go",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::Java => "java",
            LanguageId::Bash => "bash",
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Rust => "Rust",
            LanguageId::Python => "Python",
            LanguageId::Go => "Go",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
            LanguageId::Bash => "Bash",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LanguageId {
    type Err = String;

    /// Accepts a language name ("rust", "c++") or a file extension ("rs")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "plaintext" | "plain" | "text" | "txt" => return Ok(LanguageId::PlainText),
            "c++" => return Ok(LanguageId::Cpp),
            "shell" => return Ok(LanguageId::Bash),
            _ => {}
        }
        if let Some(lang) = LanguageId::HIGHLIGHTED
            .iter()
            .find(|lang| lang.name() == lower)
        {
            return Ok(*lang);
        }
        match LanguageId::from_extension(&lower) {
            LanguageId::PlainText => Err(format!("Unknown language: {}", s)),
            lang => Ok(lang),
        }
    }
}
