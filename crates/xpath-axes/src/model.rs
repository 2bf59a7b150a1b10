use core::fmt;
use core::hash::Hash;
use std::sync::Arc;

use crate::bucket::Bucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

impl NodeKind {
    /// Only documents and elements carry child lists.
    #[inline]
    pub fn has_children(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
    pub ns_uri: Option<String>,
}

impl QName {
    pub fn local(local: impl Into<String>) -> Self {
        Self { prefix: None, local: local.into(), ns_uri: None }
    }

    pub fn new(prefix: Option<String>, local: impl Into<String>, ns_uri: Option<String>) -> Self {
        Self { prefix, local: local.into(), ns_uri }
    }
}

/// Handle to a node of an externally owned tree.
///
/// The engine never dereferences the handle itself; every lookup goes through a
/// [`TreeAccessor`]. The optional graft marker records that the node belongs to a
/// fragment that is treated as if it were attached below another node. Two
/// references are equal when both the handle and the graft marker are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NodeRef<H> {
    handle: H,
    graft: Option<Arc<GraftPoint<H>>>,
}

/// Virtual attachment of a fragment: the subtree rooted at `root` behaves as a
/// child of `parent` for upward navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraftPoint<H> {
    pub root: H,
    pub parent: NodeRef<H>,
}

impl<H> NodeRef<H> {
    pub fn new(handle: H) -> Self {
        Self { handle, graft: None }
    }

    pub fn grafted(handle: H, graft: Arc<GraftPoint<H>>) -> Self {
        Self { handle, graft: Some(graft) }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn graft(&self) -> Option<&Arc<GraftPoint<H>>> {
        self.graft.as_ref()
    }

    /// Reference to another node of the same fragment (same graft marker).
    pub fn rebind(&self, handle: H) -> Self {
        Self { handle, graft: self.graft.clone() }
    }
}

impl<H: PartialEq> NodeRef<H> {
    /// True when this node is the root of its grafted fragment.
    pub fn is_graft_root(&self) -> bool {
        self.graft.as_ref().is_some_and(|g| g.root == self.handle)
    }
}

impl<H: fmt::Debug> fmt::Debug for NodeRef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.graft {
            None => write!(f, "NodeRef({:?})", self.handle),
            Some(g) => write!(f, "NodeRef({:?} grafted at {:?})", self.handle, g.parent),
        }
    }
}

/// Read-only navigation over an externally owned tree.
///
/// Every `bucket` argument is a pruning hint. Implementations may use it to
/// avoid materializing nodes that cannot match, and may equally ignore it: the
/// axis code re-applies the real node test to whatever is returned. When a hint
/// is honoured by a sibling step, the step skips to the nearest sibling inside
/// the bucket rather than stopping.
pub trait TreeAccessor {
    type Handle: Clone + Eq + Hash + fmt::Debug;
    type Children<'a>: Iterator<Item = NodeRef<Self::Handle>> + 'a
    where
        Self: 'a;
    type Attributes<'a>: Iterator<Item = NodeRef<Self::Handle>> + 'a
    where
        Self: 'a;

    fn node_kind(&self, node: &NodeRef<Self::Handle>) -> NodeKind;
    fn name(&self, node: &NodeRef<Self::Handle>) -> Option<QName>;

    fn parent(&self, node: &NodeRef<Self::Handle>, bucket: Option<&Bucket>) -> Option<NodeRef<Self::Handle>>;
    fn children(&self, node: &NodeRef<Self::Handle>, bucket: Option<&Bucket>) -> Self::Children<'_>;
    fn next_sibling(&self, node: &NodeRef<Self::Handle>, bucket: Option<&Bucket>) -> Option<NodeRef<Self::Handle>>;
    fn previous_sibling(
        &self,
        node: &NodeRef<Self::Handle>,
        bucket: Option<&Bucket>,
    ) -> Option<NodeRef<Self::Handle>>;

    /// Attributes of an element, namespace declarations excluded.
    fn attributes(&self, element: &NodeRef<Self::Handle>, bucket: Option<&Bucket>) -> Self::Attributes<'_>;

    fn first_child(&self, node: &NodeRef<Self::Handle>, bucket: Option<&Bucket>) -> Option<NodeRef<Self::Handle>> {
        self.children(node, bucket).next()
    }

    fn last_child(&self, node: &NodeRef<Self::Handle>, bucket: Option<&Bucket>) -> Option<NodeRef<Self::Handle>> {
        self.children(node, bucket).last()
    }
}
