use gbn_markup::Element;
use serde::{Deserialize, Serialize};

pub const IDENTITY_ATTRIBUTE: &str = "data-gbn-id";
pub const ROOT_ATTRIBUTE: &str = "data-gbn-root";
pub const TRANSPARENT_TAG: &str = "gbn-layout";

/// Reserved names shared by the reconciler and the cascade resolver
///
/// Built once at startup (from defaults or the config file) and passed by
/// reference; nothing reads these names from global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conventions {
    /// The one attribute identities are written to
    pub identity_attribute: String,

    /// Attributes that mark an element as a builder fragment, current name
    /// first, legacy names after
    pub marker_attributes: Vec<String>,

    /// Boolean attribute flagging the reconciliation and cascade boundary
    pub root_attribute: String,

    /// Layout-only wrapper tag that never contributes a path segment
    pub transparent_tag: String,

    /// Tags at which path computation stops even without a root marker
    pub document_root_tags: Vec<String>,

    /// Primary content landmark preferred as cascade scope root
    pub landmark_tag: String,

    /// `role` value accepted as a landmark on any element
    pub landmark_role: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            identity_attribute: IDENTITY_ATTRIBUTE.to_string(),
            marker_attributes: vec![
                "data-gbn-fragment".to_string(),
                "data-gbn-block".to_string(),
                "data-gb-block".to_string(),
                "data-builder-block".to_string(),
            ],
            root_attribute: ROOT_ATTRIBUTE.to_string(),
            transparent_tag: TRANSPARENT_TAG.to_string(),
            document_root_tags: vec!["html".to_string(), "body".to_string()],
            landmark_tag: "main".to_string(),
            landmark_role: "main".to_string(),
        }
    }
}

impl Conventions {
    /// An element is a fragment when it carries any marker attribute or an
    /// already persisted identity
    pub fn is_fragment(&self, element: &Element) -> bool {
        element.has_attr(&self.identity_attribute) || element.has_any_attr(&self.marker_attributes)
    }

    pub fn is_root(&self, element: &Element) -> bool {
        element.has_attr(&self.root_attribute)
    }

    pub fn is_transparent(&self, element: &Element) -> bool {
        element.is(&self.transparent_tag)
    }

    pub fn is_document_root(&self, element: &Element) -> bool {
        self.document_root_tags.iter().any(|tag| element.is(tag))
    }

    pub fn is_landmark(&self, element: &Element) -> bool {
        element.is(&self.landmark_tag)
            || element
                .attr("role")
                .is_some_and(|role| role.trim().eq_ignore_ascii_case(&self.landmark_role))
    }

    pub fn identity_of<'a>(&self, element: &'a Element) -> Option<&'a str> {
        element
            .attr(&self.identity_attribute)
            .filter(|id| !id.trim().is_empty())
    }
}
