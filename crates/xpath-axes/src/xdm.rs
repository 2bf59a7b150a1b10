use core::fmt;

use crate::model::{NodeKind, NodeRef, TreeAccessor};

/// A node reference tagged with its node kind.
///
/// Axis cursors build these only for the nodes they actually yield.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeValue<H> {
    node: NodeRef<H>,
    kind: NodeKind,
}

impl<H> NodeValue<H> {
    pub fn new(node: NodeRef<H>, kind: NodeKind) -> Self {
        Self { node, kind }
    }

    pub fn from_ref<A>(tree: &A, node: NodeRef<H>) -> Self
    where
        A: TreeAccessor<Handle = H> + ?Sized,
    {
        let kind = tree.node_kind(&node);
        Self { node, kind }
    }

    pub fn node(&self) -> &NodeRef<H> {
        &self.node
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn into_node(self) -> NodeRef<H> {
        self.node
    }
}

/// Atomic values that may appear as a context item. The axis engine only needs
/// to tell them apart from nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum XdmAtomicValue {
    Boolean(bool),
    String(String),
    Integer(i64),
    Double(f64),
    UntypedAtomic(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum XdmItem<H> {
    Node(NodeValue<H>),
    Atomic(XdmAtomicValue),
}

impl<H> XdmItem<H> {
    pub fn as_node(&self) -> Option<&NodeValue<H>> {
        match self {
            XdmItem::Node(n) => Some(n),
            XdmItem::Atomic(_) => None,
        }
    }
}

impl<H> From<NodeValue<H>> for XdmItem<H> {
    fn from(n: NodeValue<H>) -> Self {
        XdmItem::Node(n)
    }
}

impl<H> From<XdmAtomicValue> for XdmItem<H> {
    fn from(a: XdmAtomicValue) -> Self {
        XdmItem::Atomic(a)
    }
}

impl<H> fmt::Display for XdmItem<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XdmItem::Node(n) => write!(f, "<{:?} node>", n.kind()),
            XdmItem::Atomic(a) => write!(f, "{a:?}"),
        }
    }
}
