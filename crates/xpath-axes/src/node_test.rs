//! Node tests applied by axis steps.
//!
//! A node test is a boolean predicate over candidate nodes plus the bucket
//! describing everything it could ever accept.

use core::fmt;

use crate::bucket::{Bucket, intersect_buckets};
use crate::model::{NodeKind, TreeAccessor};
use crate::runtime::DynamicContext;
use crate::xdm::NodeValue;

pub trait NodeTest<A: TreeAccessor>: fmt::Debug {
    fn matches(&self, ctx: &DynamicContext<'_, A>, candidate: &NodeValue<A::Handle>) -> bool;

    fn bucket(&self) -> Option<Bucket>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOrWildcard {
    Wildcard,
    Name(String),
}

impl NameOrWildcard {
    fn accepts(&self, value: &str) -> bool {
        match self {
            NameOrWildcard::Wildcard => true,
            NameOrWildcard::Name(n) => n == value,
        }
    }
}

/// `QName`, `*`, `prefix:*` and `*:local` tests against the principal node
/// kind of the axis. An empty namespace name stands for "no namespace".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    principal: NodeKind,
    ns_uri: NameOrWildcard,
    local: NameOrWildcard,
}

impl NameTest {
    pub fn new(principal: NodeKind, ns_uri: NameOrWildcard, local: NameOrWildcard) -> Self {
        debug_assert!(matches!(principal, NodeKind::Element | NodeKind::Attribute));
        Self { principal, ns_uri, local }
    }

    pub fn element(local: &str) -> Self {
        Self::new(NodeKind::Element, NameOrWildcard::Name(String::new()), NameOrWildcard::Name(local.to_string()))
    }

    pub fn element_ns(ns_uri: &str, local: &str) -> Self {
        Self::new(
            NodeKind::Element,
            NameOrWildcard::Name(ns_uri.to_string()),
            NameOrWildcard::Name(local.to_string()),
        )
    }

    pub fn any_element() -> Self {
        Self::new(NodeKind::Element, NameOrWildcard::Wildcard, NameOrWildcard::Wildcard)
    }

    pub fn attribute(local: &str) -> Self {
        Self::new(NodeKind::Attribute, NameOrWildcard::Name(String::new()), NameOrWildcard::Name(local.to_string()))
    }

    pub fn any_attribute() -> Self {
        Self::new(NodeKind::Attribute, NameOrWildcard::Wildcard, NameOrWildcard::Wildcard)
    }

    pub fn principal(&self) -> NodeKind {
        self.principal
    }
}

impl<A: TreeAccessor> NodeTest<A> for NameTest {
    fn matches(&self, ctx: &DynamicContext<'_, A>, candidate: &NodeValue<A::Handle>) -> bool {
        if candidate.kind() != self.principal {
            return false;
        }
        if matches!((&self.ns_uri, &self.local), (NameOrWildcard::Wildcard, NameOrWildcard::Wildcard)) {
            return true;
        }
        let Some(name) = ctx.tree().name(candidate.node()) else {
            return false;
        };
        self.local.accepts(&name.local) && self.ns_uri.accepts(name.ns_uri.as_deref().unwrap_or(""))
    }

    fn bucket(&self) -> Option<Bucket> {
        match (&self.principal, &self.local) {
            (NodeKind::Element, NameOrWildcard::Name(local)) => Some(Bucket::element_named(local)),
            (kind, _) => Some(Bucket::Kind(*kind)),
        }
    }
}

/// Kind tests: `node()`, `element()`, `text()`, `processing-instruction(t)` ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindTest {
    AnyNode,
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction(Option<String>),
}

impl KindTest {
    fn kind(&self) -> Option<NodeKind> {
        match self {
            KindTest::AnyNode => None,
            KindTest::Document => Some(NodeKind::Document),
            KindTest::Element => Some(NodeKind::Element),
            KindTest::Attribute => Some(NodeKind::Attribute),
            KindTest::Text => Some(NodeKind::Text),
            KindTest::Comment => Some(NodeKind::Comment),
            KindTest::ProcessingInstruction(_) => Some(NodeKind::ProcessingInstruction),
        }
    }
}

impl<A: TreeAccessor> NodeTest<A> for KindTest {
    fn matches(&self, ctx: &DynamicContext<'_, A>, candidate: &NodeValue<A::Handle>) -> bool {
        match self.kind() {
            None => true,
            Some(kind) if kind != candidate.kind() => false,
            Some(_) => match self {
                KindTest::ProcessingInstruction(Some(target)) => {
                    ctx.tree().name(candidate.node()).is_some_and(|q| &q.local == target)
                }
                _ => true,
            },
        }
    }

    fn bucket(&self) -> Option<Bucket> {
        self.kind().map(Bucket::Kind)
    }
}

/// Predicate supplied as a closure, with an explicitly declared bucket.
///
/// The bucket must be a superset of what the closure accepts; pass `None`
/// when unsure.
pub struct FnTest<F> {
    predicate: F,
    bucket: Option<Bucket>,
}

impl<F> FnTest<F> {
    pub fn new(bucket: Option<Bucket>, predicate: F) -> Self {
        Self { predicate, bucket }
    }
}

impl<F> fmt::Debug for FnTest<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTest").field("bucket", &self.bucket).finish_non_exhaustive()
    }
}

impl<A, F> NodeTest<A> for FnTest<F>
where
    A: TreeAccessor,
    F: Fn(&A, &NodeValue<A::Handle>) -> bool,
{
    fn matches(&self, ctx: &DynamicContext<'_, A>, candidate: &NodeValue<A::Handle>) -> bool {
        (self.predicate)(ctx.tree(), candidate)
    }

    fn bucket(&self) -> Option<Bucket> {
        self.bucket.clone()
    }
}

/// Both tests must accept; the bucket is the intersection of both buckets.
pub struct IntersectTest<A: TreeAccessor> {
    left: Box<dyn NodeTest<A>>,
    right: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> IntersectTest<A> {
    pub fn new(left: impl NodeTest<A> + 'static, right: impl NodeTest<A> + 'static) -> Self {
        Self { left: Box::new(left), right: Box::new(right) }
    }
}

impl<A: TreeAccessor> fmt::Debug for IntersectTest<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntersectTest").field("left", &self.left).field("right", &self.right).finish()
    }
}

impl<A: TreeAccessor> NodeTest<A> for IntersectTest<A> {
    fn matches(&self, ctx: &DynamicContext<'_, A>, candidate: &NodeValue<A::Handle>) -> bool {
        self.left.matches(ctx, candidate) && self.right.matches(ctx, candidate)
    }

    fn bucket(&self) -> Option<Bucket> {
        intersect_buckets(self.left.bucket().as_ref(), self.right.bucket().as_ref())
    }
}
