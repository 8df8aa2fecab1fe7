use crate::declaration::StyleDeclaration;
use crate::error::{CascadeError, CascadeResult};
use gbn_markup::{Document, NodeId};
use std::collections::HashMap;
use tracing::debug;

/// Properties this system authors and may retract from inline styles
///
/// Anything outside this list belongs to the author and is never removed.
pub const CONTROLLED_PROPERTIES: &[&str] = &[
    // Spacing
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "gap",
    "row-gap",
    "column-gap",
    // Background
    "background",
    "background-color",
    "background-image",
    "background-size",
    "background-position",
    "background-repeat",
    // Layout
    "display",
    "flex-direction",
    "flex-wrap",
    "justify-content",
    "align-items",
    "align-content",
    "grid-template-columns",
    "grid-template-rows",
    // Sizing
    "width",
    "min-width",
    "max-width",
    "height",
    "min-height",
    "max-height",
    // Typography
    "font-size",
    "font-weight",
    "font-family",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-transform",
    "border-radius",
];

pub fn is_controlled(property: &str) -> bool {
    CONTROLLED_PROPERTIES
        .iter()
        .any(|controlled| controlled.eq_ignore_ascii_case(property.trim()))
}

/// Merges newly configured styles into a fragment's inline style
#[derive(Debug, Default)]
pub struct InlineStyleReconciler {
    /// Last styles applied per fragment, for diagnostics only
    snapshots: HashMap<NodeId, StyleDeclaration>,
}

impl InlineStyleReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `new_styles` to `node`'s `style` attribute and return the result
    ///
    /// Controlled properties not present in `new_styles` are dropped so they
    /// fall back to the cascade; uncontrolled properties are kept. Blank
    /// values in `new_styles` count as not supplied.
    pub fn apply_styles(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        new_styles: &StyleDeclaration,
    ) -> CascadeResult<StyleDeclaration> {
        let element = doc
            .element_mut(node)
            .ok_or_else(|| CascadeError::not_an_element(node))?;

        let mut supplied = new_styles.clone();
        supplied.retain(|_, value| !value.trim().is_empty());

        let mut current = StyleDeclaration::parse(element.attr("style").unwrap_or_default());
        let before = current.len();
        current.retain(|name, _| !is_controlled(name) || supplied.contains(name));
        let retracted = before - current.len();
        current.merge(&supplied);

        if current.is_empty() {
            element.remove_attr("style");
        } else {
            element.set_attr("style", current.to_css_text());
        }

        debug!(
            "Applied {} styles to {}, retracted {}",
            supplied.len(),
            node,
            retracted
        );

        self.snapshots.insert(node, supplied);
        Ok(current)
    }

    pub fn last_applied(&self, node: NodeId) -> Option<&StyleDeclaration> {
        self.snapshots.get(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbn_markup::{parse, serialize};

    fn first_div(doc: &Document) -> NodeId {
        doc.find_element(|e| e.is("div")).unwrap()
    }

    #[test]
    fn test_retraction_keeps_uncontrolled() {
        let mut doc = parse(r#"<div style="padding-top: 4px; color: red"></div>"#);
        let div = first_div(&doc);
        let mut reconciler = InlineStyleReconciler::new();

        let result = reconciler
            .apply_styles(&mut doc, div, &StyleDeclaration::new())
            .unwrap();

        assert_eq!(result.to_css_text(), "color: red;");
        assert_eq!(serialize(&doc), r#"<div style="color: red;"></div>"#);
    }

    #[test]
    fn test_supplied_controlled_value_wins() {
        let mut doc = parse(r#"<div style="PADDING-TOP: 4px; margin: 0"></div>"#);
        let div = first_div(&doc);
        let mut reconciler = InlineStyleReconciler::new();
        let new_styles: StyleDeclaration = [("padding-top", "12px")].into_iter().collect();

        let result = reconciler.apply_styles(&mut doc, div, &new_styles).unwrap();
        assert_eq!(result.to_css_text(), "padding-top: 12px;");
    }

    #[test]
    fn test_empty_result_removes_attribute() {
        let mut doc = parse(r#"<div style="gap: 4px"></div>"#);
        let div = first_div(&doc);
        let mut reconciler = InlineStyleReconciler::new();
        let blank: StyleDeclaration = [("gap", " ")].into_iter().collect();

        reconciler.apply_styles(&mut doc, div, &blank).unwrap();
        assert_eq!(serialize(&doc), "<div></div>");
        assert!(reconciler.last_applied(div).unwrap().is_empty());
    }

    #[test]
    fn test_text_node_rejected() {
        let mut doc = parse("text");
        let text = doc.children(doc.root())[0];
        let err = InlineStyleReconciler::new()
            .apply_styles(&mut doc, text, &StyleDeclaration::new())
            .unwrap_err();
        assert!(matches!(err, CascadeError::NotAnElement { .. }));
    }

    #[test]
    fn test_color_is_not_controlled() {
        assert!(!is_controlled("color"));
        assert!(is_controlled("Padding-Top"));
    }
}
