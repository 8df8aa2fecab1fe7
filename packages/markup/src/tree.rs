//! Arena-backed markup tree
//!
//! Nodes live in a single `Vec` owned by the [`Document`] and refer to each
//! other by [`NodeId`]. Detaching a node unlinks it from its parent; the
//! node and its subtree stay in the arena but are no longer reachable from
//! the document root.

use std::fmt;

/// Stable index of a node within its owning [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element attribute. `value` is `None` for boolean attributes written
/// without `=`; the raw source text is kept otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name
    pub tag: String,
    /// Attributes in source order, names lower-cased
    pub attributes: Vec<Attribute>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// True when any of `names` is present
    pub fn has_any_attr<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|name| self.has_attr(name.as_ref()))
    }

    /// Attribute value; boolean attributes read as `""`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.position(name)
            .map(|i| self.attributes[i].value.as_deref().unwrap_or(""))
    }

    /// Set an attribute, replacing an existing one in place
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.position(name) {
            Some(i) => self.attributes[i].value = value,
            None => self.attributes.push(Attribute {
                name: name.to_ascii_lowercase(),
                value,
            }),
        }
    }

    /// Set a boolean attribute (written without a value)
    pub fn set_flag(&mut self, name: &str) {
        if !self.has_attr(name) {
            self.attributes.push(Attribute {
                name: name.to_ascii_lowercase(),
                value: None,
            });
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<Attribute> {
        self.position(name).map(|i| self.attributes.remove(i))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Element(Element),
    Text(String),
    Comment(String),
    /// Doctype, CDATA or processing instruction, kept verbatim
    Declaration(String),
}

#[derive(Debug, Clone)]
struct Node {
    pub data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Markup document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// The document node; parent of all top-level nodes
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.push(NodeData::Element(element))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(text.into()))
    }

    pub fn create_declaration(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Declaration(text.into()))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Append text, merging with a trailing text child
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeData::Text(existing) = &mut self.nodes[last.0].data {
                existing.push_str(text);
                return;
            }
        }
        let id = self.create_text(text);
        self.append_child(parent, id);
    }

    /// Unlink a node (and with it, its subtree) from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Pre-order descendants, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Element siblings before `id`, nearest first
    pub fn preceding_element_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings: &[NodeId] = match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &[],
        };
        let position = siblings.iter().position(|&s| s == id).unwrap_or(0);
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .filter(move |&s| self.element(s).is_some())
    }

    /// First element in document order matching the predicate
    pub fn find_element(&self, mut predicate: impl FnMut(&Element) -> bool) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&id| self.element(id).is_some_and(&mut predicate))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}
