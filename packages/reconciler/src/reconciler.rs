use crate::config::ConfigMap;
use crate::error::ReconcileResult;
use crate::identity::Identity;
use crate::path::StructuralPath;
use gbn_common::Conventions;
use gbn_markup::{parse_with, serialize_children, Document, NodeId, ParseError, ParseOptions};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// What a reconcile pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Fragments found under the scope root
    pub fragments: usize,
    /// Identities computed and attached during this pass
    pub assigned: Vec<String>,
    /// Identities of orphaned fragments removed with their subtrees
    pub removed: Vec<String>,
    /// Parents whose configured children changed order
    pub reordered_parents: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.assigned.is_empty() && self.removed.is_empty() && self.reordered_parents == 0
    }
}

/// A fragment as seen by [`Reconciler::inspect`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentInfo {
    #[serde(skip)]
    pub node: NodeId,
    pub tag: String,
    pub path: String,
    /// Identity derived from the current position
    pub computed: Identity,
    /// Identity attribute already present on the element
    pub persisted: Option<String>,
}

/// Prunes and reorders fragments against a configuration snapshot
pub struct Reconciler<'a> {
    conventions: &'a Conventions,
}

impl<'a> Reconciler<'a> {
    pub fn new(conventions: &'a Conventions) -> Self {
        Self { conventions }
    }

    /// The first element carrying the root marker, or the document node
    pub fn scope_root(&self, doc: &Document) -> NodeId {
        doc.find_element(|element| self.conventions.is_root(element))
            .unwrap_or(doc.root())
    }

    /// Fragments under `scope` in document order
    pub fn fragments(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .filter(|&id| {
                doc.element(id)
                    .is_some_and(|element| self.conventions.is_fragment(element))
            })
            .collect()
    }

    /// Describe every fragment without modifying the tree
    pub fn inspect(&self, doc: &Document, scope: NodeId) -> ReconcileResult<Vec<FragmentInfo>> {
        self.fragments(doc, scope)
            .into_iter()
            .map(|node| {
                let path = StructuralPath::of(doc, node, self.conventions)?;
                let element = doc.element(node);
                Ok(FragmentInfo {
                    node,
                    tag: doc.tag(node).unwrap_or_default().to_string(),
                    computed: path.identity(),
                    path: path.to_string(),
                    persisted: element
                        .and_then(|e| self.conventions.identity_of(e))
                        .map(str::to_string),
                })
            })
            .collect()
    }

    /// Reconcile the fragments under `scope` against `config`
    #[instrument(skip_all, fields(scope = %scope, configured = config.len()))]
    pub fn reconcile(
        &self,
        doc: &mut Document,
        scope: NodeId,
        config: &ConfigMap,
    ) -> ReconcileResult<ReconcileReport> {
        info!("Starting reconciliation");

        let fragments = self.fragments(doc, scope);
        let mut report = ReconcileReport {
            fragments: fragments.len(),
            ..Default::default()
        };

        // Identities are all settled before the tree changes shape
        let mut identities = Vec::with_capacity(fragments.len());
        for &node in &fragments {
            let persisted = doc
                .element(node)
                .and_then(|element| self.conventions.identity_of(element))
                .map(str::to_string);

            let identity = match persisted {
                Some(identity) => identity,
                None => {
                    let identity = StructuralPath::of(doc, node, self.conventions)?
                        .identity()
                        .to_string();
                    if let Some(element) = doc.element_mut(node) {
                        element.set_attr(&self.conventions.identity_attribute, identity.clone());
                    }
                    debug!(node = %node, identity = %identity, "Attached identity");
                    report.assigned.push(identity.clone());
                    identity
                }
            };
            identities.push(identity);
        }

        let mut orphans = Vec::new();
        let mut groups: BTreeMap<NodeId, Vec<(NodeId, i64)>> = BTreeMap::new();

        for (&node, identity) in fragments.iter().zip(&identities) {
            match config.get(identity) {
                Some(entry) => {
                    if let Some(parent) = doc.parent(node) {
                        groups.entry(parent).or_default().push((node, entry.sort_key()));
                    }
                }
                None => {
                    debug!(node = %node, identity = %identity, "Orphaned fragment scheduled for removal");
                    orphans.push((node, identity.clone()));
                }
            }
        }

        for (parent, members) in groups {
            if self.reorder_group(doc, parent, members) {
                debug!(parent = %parent, "Reordered configured children");
                report.reordered_parents += 1;
            }
        }

        for (node, identity) in orphans {
            doc.detach(node);
            report.removed.push(identity);
        }

        info!(
            fragments = report.fragments,
            assigned = report.assigned.len(),
            removed = report.removed.len(),
            reordered = report.reordered_parents,
            "Reconciliation complete"
        );

        Ok(report)
    }

    /// Stable-sort configured siblings by order and re-append them to the
    /// parent in that order. Returns true when the child order changed.
    fn reorder_group(&self, doc: &mut Document, parent: NodeId, mut members: Vec<(NodeId, i64)>) -> bool {
        let before = doc.children(parent).to_vec();

        members.sort_by_key(|&(_, key)| key);
        for (node, _) in members {
            doc.append_child(parent, node);
        }

        doc.children(parent) != before.as_slice()
    }
}

/// Result of reconciling a markup payload
#[derive(Debug, Clone)]
pub struct ReconcileOutput {
    /// Children of the scope root, serialized
    pub markup: String,
    pub report: ReconcileReport,
    pub diagnostics: Vec<ParseError>,
}

/// Parse, reconcile and serialize a markup payload
pub fn reconcile_markup(
    markup: &str,
    config: &ConfigMap,
    conventions: &Conventions,
) -> ReconcileResult<ReconcileOutput> {
    reconcile_markup_with(markup, config, conventions, ParseOptions::default())
}

/// [`reconcile_markup`] with explicit parse options
pub fn reconcile_markup_with(
    markup: &str,
    config: &ConfigMap,
    conventions: &Conventions,
    options: ParseOptions,
) -> ReconcileResult<ReconcileOutput> {
    let mut diagnostics: Vec<ParseError> = Vec::new();
    let mut doc = parse_with(markup, options, &mut diagnostics)?;

    let reconciler = Reconciler::new(conventions);
    let scope = reconciler.scope_root(&doc);
    let report = reconciler.reconcile(&mut doc, scope, config)?;

    Ok(ReconcileOutput {
        markup: serialize_children(&doc, scope),
        report,
        diagnostics,
    })
}
