use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Ranked style settings published by the cascade resolver
///
/// Every branch is optional: an absent or partial branch leaves whatever
/// was published before in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CascadeSettings {
    pub page: PageDefaults,
    pub colors: ColorPalette,
    /// Text defaults keyed by heading tag (`h1` … `h6`)
    pub headings: BTreeMap<String, TextDefaults>,
    /// Default property bags keyed by fragment kind
    pub kinds: BTreeMap<String, Map<String, Value>>,
}

impl CascadeSettings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Written as direct style properties on the scope root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageDefaults {
    pub background: Option<Value>,
    /// Scalar or four-sided `{top, right, bottom, left}`
    pub padding: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorPalette {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub text: Option<String>,
    pub background: Option<String>,
    pub custom: Vec<CustomColor>,
    /// Any other named color (`success`, `warning`, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ColorPalette {
    /// Named colors in publishing order
    pub fn named(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("primary", self.primary.as_deref()),
            ("secondary", self.secondary.as_deref()),
            ("accent", self.accent.as_deref()),
            ("text", self.text.as_deref()),
            ("background", self.background.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomColor {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextDefaults {
    pub color: Option<Value>,
    pub size: Option<Value>,
    pub font_family: Option<Value>,
    pub line_height: Option<Value>,
    pub letter_spacing: Option<Value>,
    pub text_transform: Option<Value>,
}

impl TextDefaults {
    /// `(published property, value)` pairs in publishing order
    pub fn properties(&self) -> [(&'static str, Option<&Value>); 6] {
        [
            ("color", self.color.as_ref()),
            ("font-size", self.size.as_ref()),
            ("font-family", self.font_family.as_ref()),
            ("line-height", self.line_height.as_ref()),
            ("letter-spacing", self.letter_spacing.as_ref()),
            ("text-transform", self.text_transform.as_ref()),
        ]
    }
}
