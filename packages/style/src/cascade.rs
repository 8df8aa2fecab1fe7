use crate::applicator::{acquire, Acquisition, ApplicatorSource, RetryPolicy, Scheduler, StyleApplicator};
use crate::declaration::StyleDeclaration;
use crate::error::{CascadeError, CascadeResult};
use crate::settings::{CascadeSettings, TextDefaults};
use crate::units::{normalize_value, scalar_text, DEFAULT_UNIT};
use gbn_common::{Conventions, KindCatalog};
use gbn_markup::{Document, NodeId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Sub-variables published for a typography bundle
const TYPOGRAPHY_FIELDS: [&str; 6] = [
    "font-size",
    "font-family",
    "line-height",
    "letter-spacing",
    "text-transform",
    "font-weight",
];

/// Font family values that mean "use whatever the cascade gives"
const GENERIC_FONT_FALLBACKS: [&str; 4] = ["default", "inherit", "initial", "unset"];

/// How the published declarations reached the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Written to the tree only
    Direct,
    /// Written to the tree and handed to the applicator
    Applicator { attempts: u32 },
    /// The applicator never became available; written to the tree only
    Degraded { attempts: u32 },
}

#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub root: NodeId,
    pub declarations: StyleDeclaration,
    pub delivery: Delivery,
}

/// Publishes ranked style settings as variables on a scope root
pub struct CascadeResolver<'a> {
    conventions: &'a Conventions,
    catalog: &'a KindCatalog,
    default_unit: String,
}

impl<'a> CascadeResolver<'a> {
    pub fn new(conventions: &'a Conventions, catalog: &'a KindCatalog) -> Self {
        Self {
            conventions,
            catalog,
            default_unit: DEFAULT_UNIT.to_string(),
        }
    }

    pub fn with_default_unit(mut self, unit: impl Into<String>) -> Self {
        self.default_unit = unit.into();
        self
    }

    /// Find the cascade scope root and mark it
    ///
    /// Preference: marked root, landmark, `body`, first element.
    pub fn select_root(&self, doc: &mut Document) -> CascadeResult<NodeId> {
        let conventions = self.conventions;
        let root = doc
            .find_element(|e| conventions.is_root(e))
            .or_else(|| doc.find_element(|e| conventions.is_landmark(e)))
            .or_else(|| doc.find_element(|e| e.is("body")))
            .or_else(|| doc.find_element(|_| true))
            .ok_or(CascadeError::NoScopeRoot)?;

        let element = doc
            .element_mut(root)
            .ok_or_else(|| CascadeError::not_an_element(root))?;
        element.set_flag(&conventions.root_attribute);
        Ok(root)
    }

    /// Every declaration `settings` publishes, in resolution order
    pub fn resolve(&self, settings: &CascadeSettings) -> StyleDeclaration {
        let mut out = StyleDeclaration::new();
        self.resolve_page(settings, &mut out);
        self.resolve_colors(settings, &mut out);
        for (tag, defaults) in &settings.headings {
            self.resolve_heading(tag, defaults, &mut out);
        }
        for (kind, bag) in &settings.kinds {
            self.resolve_kind(kind, bag, &mut out);
        }
        out
    }

    /// Resolve `settings` onto the scope root's `style` attribute
    ///
    /// Existing style values the settings do not mention are left as they are.
    #[instrument(skip_all)]
    pub fn apply_cascade(
        &self,
        doc: &mut Document,
        settings: &CascadeSettings,
    ) -> CascadeResult<CascadeOutcome> {
        let root = self.select_root(doc)?;
        let declarations = self.resolve(settings);

        let element = doc
            .element_mut(root)
            .ok_or_else(|| CascadeError::not_an_element(root))?;
        let mut style = StyleDeclaration::parse(element.attr("style").unwrap_or_default());
        style.merge(&declarations);
        if !style.is_empty() {
            element.set_attr("style", style.to_css_text());
        }

        info!(
            "Published {} cascade declarations on {}",
            declarations.len(),
            root
        );

        Ok(CascadeOutcome {
            root,
            declarations,
            delivery: Delivery::Direct,
        })
    }

    /// Like [`apply_cascade`](Self::apply_cascade), also handing the result to
    /// the host's applicator once it can be acquired
    pub fn apply_cascade_with<S: ApplicatorSource>(
        &self,
        doc: &mut Document,
        settings: &CascadeSettings,
        source: &mut S,
        scheduler: &mut dyn Scheduler,
        policy: &RetryPolicy,
    ) -> CascadeResult<CascadeOutcome> {
        let mut outcome = self.apply_cascade(doc, settings)?;

        outcome.delivery = match acquire(source, scheduler, policy) {
            Acquisition::Ready {
                mut applicator,
                attempts,
            } => {
                applicator.publish(outcome.root, &outcome.declarations);
                Delivery::Applicator { attempts }
            }
            Acquisition::Degraded { attempts } => Delivery::Degraded { attempts },
            Acquisition::Pending { attempt } => Delivery::Degraded { attempts: attempt },
        };
        Ok(outcome)
    }

    fn publish(&self, out: &mut StyleDeclaration, name: &str, property: &str, value: &Value) {
        match normalize_value(property, value, &self.default_unit) {
            Some(text) => out.set(name, text),
            None => debug!("Skipping empty value for {}", name),
        }
    }

    /// Scalar, or one declaration per side of a `{top, right, bottom, left}` object
    fn publish_spacing(&self, out: &mut StyleDeclaration, name: &str, property: &str, value: &Value) {
        match value {
            Value::Object(sides) => {
                for side in SIDES {
                    if let Some(value) = sides.get(side) {
                        self.publish(out, &format!("{}-{}", name, side), property, value);
                    }
                }
            }
            value => self.publish(out, name, property, value),
        }
    }

    fn resolve_page(&self, settings: &CascadeSettings, out: &mut StyleDeclaration) {
        if let Some(background) = settings.page.background.as_ref().and_then(scalar_text) {
            out.set("background", background);
        }
        if let Some(padding) = &settings.page.padding {
            self.publish_spacing(out, "padding", "padding", padding);
        }
    }

    fn resolve_colors(&self, settings: &CascadeSettings, out: &mut StyleDeclaration) {
        let colors = &settings.colors;
        let named = colors
            .named()
            .into_iter()
            .filter_map(|(name, value)| Some((name.to_string(), value?.trim().to_string())));
        let extra = colors
            .extra
            .iter()
            .filter_map(|(name, value)| Some((slug(&kebab_case(name)), scalar_text(value)?)));
        let custom = colors
            .custom
            .iter()
            .map(|color| (slug(&color.name), color.value.trim().to_string()));

        for (name, value) in named.chain(extra).chain(custom) {
            if name.is_empty() || value.is_empty() {
                continue;
            }
            out.set(&format!("--gbn-color-{}", name), value);
        }
    }

    fn resolve_heading(&self, tag: &str, defaults: &TextDefaults, out: &mut StyleDeclaration) {
        let tag = tag.trim().to_ascii_lowercase();
        if !HEADING_TAGS.contains(&tag.as_str()) {
            debug!("Ignoring text defaults for non-heading tag {}", tag);
            return;
        }

        for (property, value) in defaults.properties() {
            let Some(value) = value else { continue };
            if property == "font-family" && is_generic_font(value) {
                continue;
            }
            self.publish(out, &format!("--gbn-{}-{}", tag, property), property, value);
        }
    }

    fn resolve_kind(&self, kind: &str, bag: &Map<String, Value>, out: &mut StyleDeclaration) {
        if !self.catalog.contains(kind) {
            debug!("Skipping defaults for unknown kind {}", kind);
            return;
        }
        let kind = slug(kind);
        if kind.is_empty() {
            return;
        }

        // Typography field -> bundle that last published it
        let mut typography: BTreeMap<&str, &str> = BTreeMap::new();
        for (key, value) in bag {
            let property = kebab_case(key);
            let name = format!("--{}-{}", kind, property);

            match value {
                Value::Object(fields) if is_typography(fields) => {
                    for field in TYPOGRAPHY_FIELDS {
                        let Some(value) = typography_field(fields, field) else {
                            continue;
                        };
                        if field == "font-family" && is_generic_font(value) {
                            continue;
                        }
                        let name = format!("--{}-{}", kind, field);
                        if let Some(previous) = typography.insert(field, key) {
                            debug!("Typography bundle {} overrides {} from {}", key, name, previous);
                        }
                        self.publish(out, &name, field, value);
                    }
                }
                Value::Object(fields) if SIDES.iter().any(|side| fields.contains_key(*side)) => {
                    self.publish_spacing(out, &name, &property, value);
                }
                Value::Object(_) => debug!("Ignoring unrecognized bundle {}", name),
                value => self.publish(out, &name, &property, value),
            }
        }
    }
}

fn is_generic_font(value: &Value) -> bool {
    scalar_text(value).map_or(true, |family| {
        GENERIC_FONT_FALLBACKS
            .iter()
            .any(|generic| generic.eq_ignore_ascii_case(&family))
    })
}

fn is_typography(fields: &Map<String, Value>) -> bool {
    fields
        .keys()
        .any(|key| TYPOGRAPHY_FIELDS.contains(&kebab_case(key).as_str()))
}

/// Look up a typography field written either camelCase or kebab-case
fn typography_field<'v>(fields: &'v Map<String, Value>, field: &str) -> Option<&'v Value> {
    fields
        .iter()
        .find(|(key, _)| kebab_case(key) == field)
        .map(|(_, value)| value)
}

/// `fontSize` → `font-size`, `row_gap` → `row-gap`
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.trim().chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

/// Lower-case alphanumerics separated by single dashes
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbn_markup::parse;
    use serde_json::json;

    fn settings(value: Value) -> CascadeSettings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("fontSize"), "font-size");
        assert_eq!(kebab_case("letter_spacing"), "letter-spacing");
        assert_eq!(kebab_case("gap"), "gap");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("  Brand Blue!! "), "brand-blue");
        assert_eq!(slug("***"), "");
    }

    #[test]
    fn test_root_selection_order() {
        let conventions = Conventions::default();
        let catalog = KindCatalog::open();
        let resolver = CascadeResolver::new(&conventions, &catalog);

        let mut doc = parse(r#"<body><main></main><div data-gbn-root></div></body>"#);
        let root = resolver.select_root(&mut doc).unwrap();
        assert_eq!(doc.tag(root), Some("div"));

        let mut doc = parse(r#"<body><div role="main"></div></body>"#);
        let root = resolver.select_root(&mut doc).unwrap();
        assert_eq!(doc.tag(root), Some("div"));

        let mut doc = parse(r#"<body><div></div></body>"#);
        let root = resolver.select_root(&mut doc).unwrap();
        assert_eq!(doc.tag(root), Some("body"));

        let mut doc = parse(r#"<section></section><div></div>"#);
        let root = resolver.select_root(&mut doc).unwrap();
        assert_eq!(doc.tag(root), Some("section"));

        let mut doc = parse("just text");
        assert!(matches!(
            resolver.select_root(&mut doc),
            Err(CascadeError::NoScopeRoot)
        ));
    }

    #[test]
    fn test_chosen_root_is_marked() {
        let conventions = Conventions::default();
        let catalog = KindCatalog::open();
        let resolver = CascadeResolver::new(&conventions, &catalog);

        let mut doc = parse(r#"<body><main></main></body>"#);
        let first = resolver.select_root(&mut doc).unwrap();
        assert!(doc.element(first).unwrap().has_attr("data-gbn-root"));
        assert_eq!(resolver.select_root(&mut doc).unwrap(), first);
    }

    #[test]
    fn test_heading_generic_font_skipped() {
        let conventions = Conventions::default();
        let catalog = KindCatalog::open();
        let resolver = CascadeResolver::new(&conventions, &catalog);

        let declarations = resolver.resolve(&settings(json!({
            "headings": {
                "h1": {"fontFamily": "Default", "size": 32, "lineHeight": 1.2},
                "h2": {"fontFamily": "Inter, sans-serif"},
                "p": {"size": 12}
            }
        })));

        assert_eq!(declarations.get("--gbn-h1-font-family"), None);
        assert_eq!(declarations.get("--gbn-h1-font-size"), Some("32px"));
        assert_eq!(declarations.get("--gbn-h1-line-height"), Some("1.2"));
        assert_eq!(
            declarations.get("--gbn-h2-font-family"),
            Some("Inter, sans-serif")
        );
        assert_eq!(declarations.get("--gbn-p-font-size"), None);
    }

    #[test]
    fn test_closed_catalog_skips_unknown_kinds() {
        let conventions = Conventions::default();
        let catalog = KindCatalog::closed(["card"]);
        let resolver = CascadeResolver::new(&conventions, &catalog);

        let declarations = resolver.resolve(&settings(json!({
            "kinds": {"card": {"gap": 4}, "hero": {"gap": 8}}
        })));

        assert_eq!(declarations.get("--card-gap"), Some("4px"));
        assert_eq!(declarations.get("--hero-gap"), None);
    }

    #[test]
    fn test_unlisted_palette_colors_are_published() {
        let conventions = Conventions::default();
        let catalog = KindCatalog::open();
        let resolver = CascadeResolver::new(&conventions, &catalog);

        let declarations = resolver.resolve(&settings(json!({
            "colors": {
                "primary": "#123",
                "success": "#0a0",
                "warningLight": " #fe0 ",
                "danger": "",
                "custom": [{"name": "Success", "value": "#0b0"}]
            }
        })));

        assert_eq!(declarations.get("--gbn-color-primary"), Some("#123"));
        assert_eq!(declarations.get("--gbn-color-warning-light"), Some("#fe0"));
        assert_eq!(declarations.get("--gbn-color-danger"), None);
        // Custom entries publish last
        assert_eq!(declarations.get("--gbn-color-success"), Some("#0b0"));
    }

    #[test]
    fn test_later_typography_bundle_wins() {
        let conventions = Conventions::default();
        let catalog = KindCatalog::open();
        let resolver = CascadeResolver::new(&conventions, &catalog);

        let declarations = resolver.resolve(&settings(json!({
            "kinds": {"card": {
                "body": {"fontSize": 14, "lineHeight": 1.5},
                "title": {"fontSize": 20}
            }}
        })));

        assert_eq!(declarations.get("--card-font-size"), Some("20px"));
        assert_eq!(declarations.get("--card-line-height"), Some("1.5"));
    }

    #[test]
    fn test_default_unit_override() {
        let conventions = Conventions::default();
        let catalog = KindCatalog::open();
        let resolver = CascadeResolver::new(&conventions, &catalog).with_default_unit("rem");

        let declarations = resolver.resolve(&settings(json!({"kinds": {"card": {"gap": 2}}})));
        assert_eq!(declarations.get("--card-gap"), Some("2rem"));
    }
}
