use syntax_storage::attributes::Attribute;
use syntax_storage::theme::{
    self, Color, Theme, BUILTIN_THEMES, DEFAULT_DARK_YAML, DEFAULT_LIGHT_YAML,
};

#[test]
fn test_color_from_hex_6() {
    let color = Color::from_hex("#1E1E1E").unwrap();
    assert_eq!(color.r, 0x1E);
    assert_eq!(color.g, 0x1E);
    assert_eq!(color.b, 0x1E);
    assert_eq!(color.a, 255);
}

#[test]
fn test_color_from_hex_8() {
    let color = Color::from_hex("#1E1E1E80").unwrap();
    assert_eq!(color.a, 0x80);
}

#[test]
fn test_default_theme() {
    let theme = Theme::default_dark();
    assert_eq!(theme.name, "Default Dark");
    assert_eq!(theme.background, Color::rgb(0x1E, 0x1E, 0x1E));
}

#[test]
fn test_builtin_yaml_parses() {
    assert_eq!(Theme::from_yaml(DEFAULT_DARK_YAML).unwrap().name, "Default Dark");
    assert_eq!(Theme::from_yaml(DEFAULT_LIGHT_YAML).unwrap().name, "Default Light");
}

#[test]
fn test_from_builtin() {
    let theme = Theme::from_builtin("default-light").unwrap();
    assert_eq!(theme.name, "Default Light");
    assert!(Theme::from_builtin("nonexistent").is_err());
}

#[test]
fn test_all_builtin_themes_style_keywords() {
    for builtin in BUILTIN_THEMES {
        let theme = Theme::from_yaml(builtin.yaml)
            .unwrap_or_else(|e| panic!("Failed to parse theme '{}': {}", builtin.id, e));
        assert!(
            theme.style_for("keyword").is_some(),
            "Theme '{}' has no keyword style",
            builtin.id
        );
    }
}

#[test]
fn test_keyword_attributes() {
    let theme = Theme::default_dark();
    let set = theme.attributes_for("keyword");
    assert!(set.has_token("keyword"));
    assert!(set.contains(&Attribute::Bold));
    assert_eq!(set.foreground(), Some(Color::rgb(0x56, 0x9C, 0xD6)));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mono.yaml");
    std::fs::write(
        &path,
        r##"version: 1
name: "Mono"
editor:
  foreground: "#FFFFFF"
  background: "#000000"
syntax:
  comment: { color: "#808080", italic: true, underline: true }
"##,
    )
    .unwrap();

    let theme = theme::from_file(&path).unwrap();
    assert_eq!(theme.name, "Mono");
    let set = theme.attributes_for("comment.line");
    assert!(set.contains(&Attribute::Italic));
    assert!(set.contains(&Attribute::Underline));
    // Unstyled classes fall back to the editor foreground
    assert_eq!(
        theme.attributes_for("keyword").foreground(),
        Some(Color::rgb(0xFF, 0xFF, 0xFF))
    );
}

#[test]
fn test_invalid_color_is_an_error() {
    let yaml = r##"version: 1
name: "Broken"
editor:
  foreground: "#FFF"
  background: "#000000"
syntax: {}
"##;
    assert!(Theme::from_yaml(yaml).is_err());
}

#[test]
fn test_list_available_themes_includes_builtins() {
    let themes = theme::list_available_themes();
    for builtin in BUILTIN_THEMES {
        assert!(
            themes.iter().any(|t| t.id == builtin.id),
            "Missing builtin theme {}",
            builtin.id
        );
    }
}
