//! Style attributes attached to buffer characters
//!
//! An [`AttributeSet`] is what every character position in the buffer carries.
//! Highlighting writes sets built from the theme; hosts may write their own.

use serde::Serialize;

use crate::theme::Color;

/// A single style attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Attribute {
    /// Highlight class assigned by the grammar (e.g. "keyword")
    Token(&'static str),
    Foreground(Color),
    Background(Color),
    Bold,
    Italic,
    Underline,
}

/// Sorted, de-duplicated set of attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attrs: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    pub fn contains(&self, attr: &Attribute) -> bool {
        self.attrs.binary_search(attr).is_ok()
    }

    /// Insert an attribute. A new `Token`, `Foreground` or `Background`
    /// replaces an existing one of the same kind.
    pub fn insert(&mut self, attr: Attribute) {
        if attr.is_exclusive() {
            self.attrs.retain(|a| !a.same_kind(&attr));
        }
        if let Err(pos) = self.attrs.binary_search(&attr) {
            self.attrs.insert(pos, attr);
        }
    }

    pub fn remove(&mut self, attr: &Attribute) -> bool {
        match self.attrs.binary_search(attr) {
            Ok(pos) => {
                self.attrs.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Overlay `other` onto this set (other wins for exclusive kinds)
    pub fn merge(&mut self, other: &AttributeSet) {
        for attr in &other.attrs {
            self.insert(*attr);
        }
    }

    /// The highlight class, if any
    pub fn token(&self) -> Option<&'static str> {
        self.attrs.iter().find_map(|a| match a {
            Attribute::Token(name) => Some(*name),
            _ => None,
        })
    }

    /// Whether the set carries `class` or a more specific child of it
    /// ("keyword" matches "keyword.return").
    pub fn has_token(&self, class: &str) -> bool {
        self.token().is_some_and(|t| {
            t == class
                || t.strip_prefix(class)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    pub fn foreground(&self) -> Option<Color> {
        self.attrs.iter().find_map(|a| match a {
            Attribute::Foreground(c) => Some(*c),
            _ => None,
        })
    }

    pub fn background(&self) -> Option<Color> {
        self.attrs.iter().find_map(|a| match a {
            Attribute::Background(c) => Some(*c),
            _ => None,
        })
    }
}

impl Attribute {
    fn is_exclusive(&self) -> bool {
        matches!(
            self,
            Attribute::Token(_) | Attribute::Foreground(_) | Attribute::Background(_)
        )
    }

    fn same_kind(&self, other: &Attribute) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for attr in iter {
            set.insert(attr);
        }
        set
    }
}
