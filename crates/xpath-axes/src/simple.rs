//! Arena-backed in-memory tree implementing [`TreeAccessor`], for tests,
//! benchmarks and quick prototypes.
//!
//! Nodes are numbered in document order while the tree is built (attributes
//! directly after their owner, before its children), so [`NodeId`] order is
//! document order for every node of the arena.
//!
//! ```
//! use xpath_axes::simple::{SimpleTree, attr, doc, elem, ns_decl, text};
//! use xpath_axes::{NodeKind, TreeAccessor};
//!
//! // <root id="r" xmlns:p="urn:p"><child>Hello</child><child/></root>
//! let tree = SimpleTree::build(
//!     doc().child(
//!         elem("root")
//!             .attr(attr("id", "r"))
//!             .attr(ns_decl("p", "urn:p"))
//!             .child(elem("child").child(text("Hello")))
//!             .child(elem("child")),
//!     ),
//! );
//! let root = tree.find("root").unwrap();
//! assert_eq!(tree.node_kind(&root), NodeKind::Element);
//! assert_eq!(tree.children(&root, None).count(), 2);
//! // Namespace declarations are not reported as attributes.
//! assert_eq!(tree.attributes(&root, None).count(), 1);
//! ```

use core::cmp::Ordering;
use core::fmt;
use std::sync::Arc;

use crate::bucket::Bucket;
use crate::consts::{XML_NS, XMLNS_NS};
use crate::model::{GraftPoint, NodeKind, NodeRef, QName, TreeAccessor};
use crate::xdm::NodeValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeRec {
    kind: NodeKind,
    name: Option<QName>,
    value: Option<String>,
    parent: Option<NodeId>,
    // Index in the parent's child list; unused for attributes and roots.
    position: usize,
    children: Vec<NodeId>,
    attributes: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct SimpleTree {
    nodes: Vec<NodeRec>,
    roots: Vec<NodeId>,
}

/// Description of a node to be added to a [`SimpleTree`].
#[derive(Debug, Clone)]
pub struct SimpleNodeBuilder {
    kind: NodeKind,
    name: Option<QName>,
    value: Option<String>,
    attributes: Vec<AttrSpec>,
    children: Vec<SimpleNodeBuilder>,
}

#[derive(Debug, Clone)]
pub struct AttrSpec {
    name: QName,
    value: String,
}

impl SimpleNodeBuilder {
    fn new(kind: NodeKind, name: Option<QName>, value: Option<String>) -> Self {
        Self { kind, name, value, attributes: Vec::new(), children: Vec::new() }
    }

    pub fn child(mut self, child: SimpleNodeBuilder) -> Self {
        debug_assert!(self.kind.has_children());
        self.children.push(child);
        self
    }

    pub fn children<I: IntoIterator<Item = SimpleNodeBuilder>>(mut self, it: I) -> Self {
        debug_assert!(self.kind.has_children());
        self.children.extend(it);
        self
    }

    pub fn attr(mut self, attr: AttrSpec) -> Self {
        debug_assert!(self.kind == NodeKind::Element);
        self.attributes.push(attr);
        self
    }

    pub fn attrs<I: IntoIterator<Item = AttrSpec>>(mut self, it: I) -> Self {
        debug_assert!(self.kind == NodeKind::Element);
        self.attributes.extend(it);
        self
    }
}

fn split_qname(name: &str) -> (Option<String>, String) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, name.to_string()),
    }
}

pub fn doc() -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Document, None, None)
}

/// Element without a namespace. A `prefix:local` name keeps the prefix but
/// binds no namespace; use [`elem_ns`] for namespaced elements.
pub fn elem(name: &str) -> SimpleNodeBuilder {
    let (prefix, local) = split_qname(name);
    SimpleNodeBuilder::new(NodeKind::Element, Some(QName::new(prefix, local, None)), None)
}

pub fn elem_ns(ns_uri: &str, name: &str) -> SimpleNodeBuilder {
    let (prefix, local) = split_qname(name);
    SimpleNodeBuilder::new(NodeKind::Element, Some(QName::new(prefix, local, Some(ns_uri.to_string()))), None)
}

pub fn text(value: &str) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Text, None, Some(value.to_string()))
}

pub fn comment(value: &str) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Comment, None, Some(value.to_string()))
}

pub fn pi(target: &str, data: &str) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::ProcessingInstruction, Some(QName::local(target)), Some(data.to_string()))
}

/// Attribute; the `xml:` prefix is bound to the XML namespace.
pub fn attr(name: &str, value: &str) -> AttrSpec {
    let (prefix, local) = split_qname(name);
    let ns_uri = (prefix.as_deref() == Some("xml")).then(|| XML_NS.to_string());
    AttrSpec { name: QName::new(prefix, local, ns_uri), value: value.to_string() }
}

pub fn attr_ns(ns_uri: &str, name: &str, value: &str) -> AttrSpec {
    let (prefix, local) = split_qname(name);
    AttrSpec { name: QName::new(prefix, local, Some(ns_uri.to_string())), value: value.to_string() }
}

/// Namespace declaration attribute: `xmlns:prefix="uri"`, or `xmlns="uri"`
/// for an empty prefix.
pub fn ns_decl(prefix: &str, uri: &str) -> AttrSpec {
    let name = if prefix.is_empty() {
        QName::new(None, "xmlns", Some(XMLNS_NS.to_string()))
    } else {
        QName::new(Some("xmlns".to_string()), prefix, Some(XMLNS_NS.to_string()))
    };
    AttrSpec { name, value: uri.to_string() }
}

impl SimpleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(root: SimpleNodeBuilder) -> Self {
        let mut tree = Self::new();
        tree.add(root);
        tree
    }

    /// Adds another root (a document or a detached fragment) and returns it.
    pub fn add(&mut self, root: SimpleNodeBuilder) -> NodeRef<NodeId> {
        let id = self.insert(root, None, 0);
        self.roots.push(id);
        NodeRef::new(id)
    }

    fn insert(&mut self, spec: SimpleNodeBuilder, parent: Option<NodeId>, position: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeRec {
            kind: spec.kind,
            name: spec.name,
            value: spec.value,
            parent,
            position,
            children: Vec::with_capacity(spec.children.len()),
            attributes: Vec::with_capacity(spec.attributes.len()),
        });
        for a in spec.attributes {
            let attr_id = NodeId(self.nodes.len());
            self.nodes.push(NodeRec {
                kind: NodeKind::Attribute,
                name: Some(a.name),
                value: Some(a.value),
                parent: Some(id),
                position: 0,
                children: Vec::new(),
                attributes: Vec::new(),
            });
            self.nodes[id.0].attributes.push(attr_id);
        }
        for (pos, child) in spec.children.into_iter().enumerate() {
            let child_id = self.insert(child, Some(id), pos);
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    fn rec(&self, id: NodeId) -> &NodeRec {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First root added to the tree.
    pub fn root(&self) -> Option<NodeRef<NodeId>> {
        self.roots.first().map(|id| NodeRef::new(*id))
    }

    pub fn node(&self, id: NodeId) -> NodeRef<NodeId> {
        NodeRef::new(id)
    }

    /// All nodes in document order, attributes included.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeRef<NodeId>> + '_ {
        (0..self.nodes.len()).map(|i| NodeRef::new(NodeId(i)))
    }

    pub fn node_value(&self, node: &NodeRef<NodeId>) -> NodeValue<NodeId> {
        NodeValue::from_ref(self, node.clone())
    }

    /// First element with the given local name, in document order.
    pub fn find(&self, local: &str) -> Option<NodeRef<NodeId>> {
        self.find_all(local).next()
    }

    pub fn find_all<'s>(&'s self, local: &'s str) -> impl Iterator<Item = NodeRef<NodeId>> + 's {
        self.nodes.iter().enumerate().filter_map(move |(i, rec)| {
            (rec.kind == NodeKind::Element && rec.name.as_ref().is_some_and(|q| q.local == local))
                .then(|| NodeRef::new(NodeId(i)))
        })
    }

    pub fn local_name(&self, node: &NodeRef<NodeId>) -> Option<String> {
        self.rec(*node.handle()).name.as_ref().map(|q| q.local.clone())
    }

    /// Text, comment, attribute or processing-instruction content.
    pub fn value(&self, node: &NodeRef<NodeId>) -> Option<&str> {
        self.rec(*node.handle()).value.as_deref()
    }

    /// Attaches the fragment rooted at `fragment_root` below `parent` for
    /// upward navigation. The parent's own child list is left untouched.
    pub fn graft(&self, fragment_root: NodeId, parent: NodeRef<NodeId>) -> NodeRef<NodeId> {
        NodeRef::grafted(fragment_root, Arc::new(GraftPoint { root: fragment_root, parent }))
    }

    /// Document order of two nodes by arena position. Graft markers are not
    /// taken into account.
    pub fn compare_document_order(&self, a: &NodeRef<NodeId>, b: &NodeRef<NodeId>) -> Ordering {
        a.handle().cmp(b.handle())
    }

    fn in_bucket(&self, id: NodeId, bucket: Option<&Bucket>) -> bool {
        let rec = self.rec(id);
        bucket.is_none_or(|b| b.admits(rec.kind, rec.name.as_ref()))
    }

    fn is_ns_decl(&self, id: NodeId) -> bool {
        self.rec(id).name.as_ref().is_some_and(|q| q.ns_uri.as_deref() == Some(XMLNS_NS))
    }

    /// Parent's child list and this node's index in it, unless the node is a
    /// root, an attribute, or the root of a grafted fragment.
    fn sibling_list(&self, node: &NodeRef<NodeId>) -> Option<(&[NodeId], usize)> {
        if node.is_graft_root() {
            return None;
        }
        let rec = self.rec(*node.handle());
        if rec.kind == NodeKind::Attribute {
            return None;
        }
        let parent = rec.parent?;
        Some((&self.rec(parent).children, rec.position))
    }
}

/// Children of one node, bucket applied.
pub struct SimpleChildren<'a> {
    tree: &'a SimpleTree,
    parent: NodeRef<NodeId>,
    ids: core::slice::Iter<'a, NodeId>,
    bucket: Option<Bucket>,
}

impl Iterator for SimpleChildren<'_> {
    type Item = NodeRef<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.by_ref().find(|id| self.tree.in_bucket(**id, self.bucket.as_ref()))?;
        Some(self.parent.rebind(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.ids.size_hint().1)
    }
}

/// Attributes of one element, namespace declarations and bucket applied.
pub struct SimpleAttributes<'a> {
    tree: &'a SimpleTree,
    owner: NodeRef<NodeId>,
    ids: core::slice::Iter<'a, NodeId>,
    bucket: Option<Bucket>,
}

impl Iterator for SimpleAttributes<'_> {
    type Item = NodeRef<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self
            .ids
            .by_ref()
            .find(|id| !self.tree.is_ns_decl(**id) && self.tree.in_bucket(**id, self.bucket.as_ref()))?;
        Some(self.owner.rebind(id))
    }
}

impl TreeAccessor for SimpleTree {
    type Handle = NodeId;
    type Children<'a> = SimpleChildren<'a>;
    type Attributes<'a> = SimpleAttributes<'a>;

    fn node_kind(&self, node: &NodeRef<NodeId>) -> NodeKind {
        self.rec(*node.handle()).kind
    }

    fn name(&self, node: &NodeRef<NodeId>) -> Option<QName> {
        self.rec(*node.handle()).name.clone()
    }

    fn parent(&self, node: &NodeRef<NodeId>, bucket: Option<&Bucket>) -> Option<NodeRef<NodeId>> {
        let parent = if node.is_graft_root() {
            node.graft().map(|g| g.parent.clone())?
        } else {
            node.rebind(self.rec(*node.handle()).parent?)
        };
        self.in_bucket(*parent.handle(), bucket).then_some(parent)
    }

    fn children(&self, node: &NodeRef<NodeId>, bucket: Option<&Bucket>) -> SimpleChildren<'_> {
        SimpleChildren {
            tree: self,
            parent: node.clone(),
            ids: self.rec(*node.handle()).children.iter(),
            bucket: bucket.cloned(),
        }
    }

    fn next_sibling(&self, node: &NodeRef<NodeId>, bucket: Option<&Bucket>) -> Option<NodeRef<NodeId>> {
        let (siblings, position) = self.sibling_list(node)?;
        let id = siblings[position + 1..].iter().find(|id| self.in_bucket(**id, bucket))?;
        Some(node.rebind(*id))
    }

    fn previous_sibling(&self, node: &NodeRef<NodeId>, bucket: Option<&Bucket>) -> Option<NodeRef<NodeId>> {
        let (siblings, position) = self.sibling_list(node)?;
        let id = siblings[..position].iter().rev().find(|id| self.in_bucket(**id, bucket))?;
        Some(node.rebind(*id))
    }

    fn attributes(&self, element: &NodeRef<NodeId>, bucket: Option<&Bucket>) -> SimpleAttributes<'_> {
        SimpleAttributes {
            tree: self,
            owner: element.clone(),
            ids: self.rec(*element.handle()).attributes.iter(),
            bucket: bucket.cloned(),
        }
    }

    fn last_child(&self, node: &NodeRef<NodeId>, bucket: Option<&Bucket>) -> Option<NodeRef<NodeId>> {
        let id = self.rec(*node.handle()).children.iter().rev().find(|id| self.in_bucket(**id, bucket))?;
        Some(node.rebind(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_follow_document_order_with_attributes_first() {
        let tree = SimpleTree::build(doc().child(elem("a").attr(attr("x", "1")).child(elem("b")).child(text("t"))));
        let kinds: Vec<NodeKind> = tree.all_nodes().map(|n| tree.node_kind(&n)).collect();
        let indices: Vec<usize> = tree.all_nodes().map(|n| n.handle().index()).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert_eq!(tree.find("b").map(|n| n.handle().to_string()), Some("#3".to_string()));
        assert_eq!(
            kinds,
            [NodeKind::Document, NodeKind::Element, NodeKind::Attribute, NodeKind::Element, NodeKind::Text]
        );
    }

    #[rstest]
    fn attribute_prefixes() {
        let lang = attr("xml:lang", "en");
        assert_eq!(lang.name.ns_uri.as_deref(), Some(XML_NS));
        assert_eq!(attr("p:x", "1").name.ns_uri, None);
        assert_eq!(ns_decl("", "urn:d").name.local, "xmlns");
        assert_eq!(ns_decl("p", "urn:p").name.prefix.as_deref(), Some("xmlns"));
    }

    #[rstest]
    fn sibling_hints_skip_to_nearest_match() {
        let tree = SimpleTree::build(
            doc().child(elem("r").child(elem("a")).child(text("t")).child(comment("c")).child(elem("b"))),
        );
        let a = tree.find("a").unwrap();
        let b = tree.find("b").unwrap();
        let element = Bucket::Kind(NodeKind::Element);
        assert_eq!(tree.next_sibling(&a, Some(&element)), Some(b.clone()));
        assert_eq!(tree.previous_sibling(&b, Some(&element)), Some(a.clone()));
        let found = tree.next_sibling(&a, Some(&Bucket::Kind(NodeKind::Comment))).unwrap();
        assert_eq!(tree.value(&found), Some("c"));
        let last_text = tree.last_child(&tree.find("r").unwrap(), Some(&Bucket::Kind(NodeKind::Text))).unwrap();
        assert_eq!(tree.value(&last_text), Some("t"));
        assert_eq!(tree.next_sibling(&b, None), None);
    }
}
