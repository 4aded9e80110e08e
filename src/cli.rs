//! Command-line argument parsing for the highlighter
//!
//! Supports:
//! - Highlighting a file with a detected or explicit language
//! - Choosing a theme and output format
//! - Listing available themes and languages

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::syntax::LanguageId;

/// Highlight a source file through an attributed text storage
#[derive(Parser, Debug)]
#[command(name = "syntax-storage", version, about = "Highlight a file through an attributed text storage")]
pub struct CliArgs {
    /// File to highlight
    #[arg(value_name = "FILE", required_unless_present_any = ["list_themes", "list_languages"])]
    pub file: Option<PathBuf>,

    /// Language name or extension (detected from the file name if omitted)
    #[arg(short, long, value_name = "NAME")]
    pub language: Option<String>,

    /// Theme id (overrides the config file)
    #[arg(short, long, value_name = "ID")]
    pub theme: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
    pub format: OutputFormat,

    /// List available themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// List supported languages and exit
    #[arg(long)]
    pub list_languages: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 24-bit ANSI escape sequences
    Ansi,
    /// Attribute runs as JSON
    Json,
    /// One line per attribute run with its highlight class
    Plain,
}

impl CliArgs {
    /// Language to highlight with: the explicit flag, then the file name,
    /// then `fallback`
    pub fn resolve_language(
        &self,
        fallback: Option<LanguageId>,
    ) -> Result<Option<LanguageId>, String> {
        if let Some(name) = &self.language {
            return name.parse().map(Some);
        }
        let detected = self.file.as_deref().map(LanguageId::from_path);
        Ok(match detected {
            Some(lang) if lang != LanguageId::PlainText => Some(lang),
            _ => fallback,
        })
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}
