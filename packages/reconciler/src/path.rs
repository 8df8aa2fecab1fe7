//! Structural paths for fragments
//!
//! A path names a fragment by where it sits, not by what it contains: the
//! chain of `tag:index` segments from the nearest root marker down to the
//! fragment, where `index` counts preceding siblings with the same tag.
//! Attributes and text never influence it, so editing a fragment's content
//! keeps its identity.

use crate::error::{ReconcileError, ReconcileResult};
use crate::identity::Identity;
use gbn_common::Conventions;
use gbn_markup::{Document, NodeData, NodeId};
use std::fmt;

/// One `tag:index` step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub tag: String,
    pub index: usize,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag, self.index)
    }
}

/// Segments ordered from the boundary down to the fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralPath {
    pub segments: Vec<PathSegment>,
}

impl StructuralPath {
    /// Compute the path of an element
    pub fn of(doc: &Document, node: NodeId, conventions: &Conventions) -> ReconcileResult<Self> {
        if doc.element(node).is_none() {
            return Err(ReconcileError::not_an_element(node));
        }

        let mut segments = Vec::new();
        let mut current = Some(node);

        while let Some(id) = current {
            let element = match doc.data(id) {
                NodeData::Element(element) => element,
                _ => break,
            };

            let is_boundary = conventions.is_root(element) || conventions.is_document_root(element);

            if is_boundary || !conventions.is_transparent(element) {
                segments.push(PathSegment {
                    tag: element.tag.to_ascii_lowercase(),
                    index: same_tag_index(doc, id),
                });
            }

            if is_boundary {
                break;
            }
            current = doc.parent(id);
        }

        segments.reverse();
        Ok(Self { segments })
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn identity(&self) -> Identity {
        Identity::from_path(&self.to_string())
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(">")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// 0-based position among preceding element siblings with the same tag
fn same_tag_index(doc: &Document, node: NodeId) -> usize {
    let Some(tag) = doc.tag(node) else {
        return 0;
    };
    doc.preceding_element_siblings(node)
        .filter(|&sibling| doc.tag(sibling).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
        .count()
}

/// Path string for a fragment
pub fn structural_path(
    doc: &Document,
    node: NodeId,
    conventions: &Conventions,
) -> ReconcileResult<String> {
    StructuralPath::of(doc, node, conventions).map(|path| path.to_string())
}

/// Identity for a fragment, derived from its current position
pub fn compute_identity(
    doc: &Document,
    node: NodeId,
    conventions: &Conventions,
) -> ReconcileResult<Identity> {
    StructuralPath::of(doc, node, conventions).map(|path| path.identity())
}
