//! Theme system for syntax styling
//!
//! Provides YAML-based themes that map highlight classes to attribute sets,
//! with compile-time embedded themes and user-defined themes from config directories.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/syntax-storage/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attributes::{Attribute, AttributeSet};

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/syntax-storage/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    /// Stable identifier (e.g., "default-dark", "my-custom-theme")
    pub id: String,
    /// Display name from YAML (e.g., "Default Dark")
    pub name: String,
    /// Where this theme is loaded from
    pub source: ThemeSource,
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// List all available themes from all sources
///
/// User themes override builtins with the same id.
pub fn list_available_themes() -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = crate::config_paths::themes_dir() {
        if let Ok(entries) = std::fs::read_dir(&user_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if !path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    continue;
                }
                let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if seen_ids.insert(id.to_string()) {
                    let name = from_file(&path)
                        .map(|t| t.name)
                        .unwrap_or_else(|_| id.to_string());
                    themes.push(ThemeInfo {
                        id: id.to_string(),
                        name,
                        source: ThemeSource::User,
                    });
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            s.get(range)
                .ok_or_else(|| format!("Invalid color format: {}", s))
                .and_then(|hex| u8::from_str_radix(hex, 16).map_err(|e| e.to_string()))
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#RRGGBB" (alpha omitted when opaque)
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub editor: EditorThemeData,
    #[serde(default)]
    pub syntax: HashMap<String, SyntaxStyleData>,
}

/// Base text colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct EditorThemeData {
    pub foreground: String,
    pub background: String,
}

/// Style for one highlight class (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct SyntaxStyleData {
    pub color: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

/// Resolved style for one highlight class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxStyle {
    pub color: Color,
    pub background: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Resolved theme
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub foreground: Color,
    pub background: Color,
    /// Keyed by highlight class (e.g. "keyword", "string.special")
    pub syntax: HashMap<String, SyntaxStyle>,
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let mut syntax = HashMap::with_capacity(data.syntax.len());
        for (class, style) in data.syntax {
            let background = match style.background {
                Some(hex) => Some(Color::from_hex(&hex)?),
                None => None,
            };
            syntax.insert(
                class,
                SyntaxStyle {
                    color: Color::from_hex(&style.color)?,
                    background,
                    bold: style.bold,
                    italic: style.italic,
                    underline: style.underline,
                },
            );
        }

        Ok(Theme {
            name: data.name,
            foreground: Color::from_hex(&data.editor.foreground)?,
            background: Color::from_hex(&data.editor.background)?,
            syntax,
        })
    }

    /// Default dark theme (matches the embedded default-dark.yaml)
    pub fn default_dark() -> Self {
        Self::from_builtin("default-dark").unwrap_or_else(|e| {
            tracing::error!("Embedded default theme failed to load: {}", e);
            Theme {
                name: "Default Dark".to_string(),
                foreground: Color::rgb(0xD4, 0xD4, 0xD4),
                background: Color::rgb(0x1E, 0x1E, 0x1E),
                syntax: HashMap::new(),
            }
        })
    }

    /// Look up the style for a class, falling back to parent classes
    /// ("keyword.return" -> "keyword").
    pub fn style_for(&self, class: &str) -> Option<&SyntaxStyle> {
        let mut current = class;
        loop {
            if let Some(style) = self.syntax.get(current) {
                return Some(style);
            }
            let dot_pos = current.rfind('.')?;
            current = &current[..dot_pos];
        }
    }

    /// Attributes for unclassified text
    pub fn plain_attributes(&self) -> AttributeSet {
        AttributeSet::from_iter([Attribute::Foreground(self.foreground)])
    }

    /// Attributes for text tagged with a highlight class
    pub fn attributes_for(&self, class: &'static str) -> AttributeSet {
        let mut set = AttributeSet::from_iter([Attribute::Token(class)]);
        match self.style_for(class) {
            Some(style) => {
                set.insert(Attribute::Foreground(style.color));
                if let Some(bg) = style.background {
                    set.insert(Attribute::Background(bg));
                }
                if style.bold {
                    set.insert(Attribute::Bold);
                }
                if style.italic {
                    set.insert(Attribute::Italic);
                }
                if style.underline {
                    set.insert(Attribute::Underline);
                }
            }
            None => set.insert(Attribute::Foreground(self.foreground)),
        }
        set
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_lookup_falls_back_to_parent() {
        let theme = Theme::default_dark();
        let keyword = theme.style_for("keyword").cloned();
        assert!(keyword.is_some());
        assert_eq!(theme.style_for("keyword.control.import").cloned(), keyword);
        assert!(theme.style_for("no-such-class").is_none());
    }

    #[test]
    fn test_attributes_for_unknown_class_uses_foreground() {
        let theme = Theme::default_dark();
        let set = theme.attributes_for("identifier");
        assert!(set.has_token("identifier"));
        assert_eq!(set.foreground(), Some(theme.foreground));
    }

    #[test]
    fn test_color_hex_roundtrip_text() {
        assert_eq!(Color::rgb(0x1E, 0x1E, 0x1E).to_hex(), "#1E1E1E");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }
}
