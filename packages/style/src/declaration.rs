use std::fmt;

/// An ordered inline style declaration
///
/// Property names are lower-cased on the way in except custom properties
/// (`--x`), which are case-sensitive. Setting an existing property replaces
/// its value in place, so first-seen order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    entries: Vec<(String, String)>,
}

pub fn normalize_property(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `style` attribute text
    ///
    /// Separators inside parentheses or quotes do not end a declaration, so
    /// `background: url(data:image/png;base64,AAA)` survives intact. Entries
    /// without a name or a value are dropped.
    pub fn parse(text: &str) -> Self {
        let mut declaration = Self::new();
        for item in split_declarations(text) {
            let Some((name, value)) = item.split_once(':') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() || value.is_empty() {
                continue;
            }
            declaration.set(name, value);
        }
        declaration
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = normalize_property(name);
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = normalize_property(name);
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = normalize_property(name);
        let index = self.entries.iter().position(|(key, _)| *key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|(name, value)| keep(name, value));
    }

    /// Copy every entry of `other` over this declaration
    pub fn merge(&mut self, other: &StyleDeclaration) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `name: value;` pairs joined by single spaces
    pub fn to_css_text(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_text())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for StyleDeclaration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut declaration = Self::new();
        for (name, value) in iter {
            declaration.set(name.as_ref(), value);
        }
        declaration
    }
}

fn split_declarations(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                items.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);
    items
}
