//! Axis expressions and the cursors behind them.
//!
//! Every axis expression validates the dynamic context synchronously, then
//! returns a lazy [`Sequence`] whose cursor walks the tree through the
//! [`TreeAccessor`] and whose filter applies the node test.

use core::fmt;
use core::str::FromStr;

use crate::bucket::Bucket;
use crate::model::TreeAccessor;
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::Sequence;
use crate::xdm::{NodeValue, XdmItem};

macro_rules! impl_axis_debug {
    ($ty:ident) => {
        impl<A: $crate::model::TreeAccessor> ::core::fmt::Debug for $ty<A> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("axis", &$crate::axes::AxisExpression::axis(self))
                    .field("test", &self.test)
                    .finish()
            }
        }
    };
}

mod ancestor;
mod attribute;
mod child;
mod descendant;
mod following;
mod parent;
mod preceding;
mod self_axis;
mod sibling;

pub use ancestor::AncestorAxis;
pub use attribute::AttributeAxis;
pub use child::ChildAxis;
pub use descendant::DescendantAxis;
pub use following::FollowingAxis;
pub use parent::ParentAxis;
pub use preceding::PrecedingAxis;
pub use self_axis::SelfAxis;
pub use sibling::{FollowingSiblingAxis, PrecedingSiblingAxis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    SelfAxis,
    Child,
    Attribute,
    Parent,
    Descendant,
    DescendantOrSelf,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
}

/// Order guarantee of an axis result, relied upon by set operations without
/// re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultOrder {
    Sorted,
    ReverseSorted,
    Unsorted,
}

impl Axis {
    pub const ALL: [Axis; 12] = [
        Axis::SelfAxis,
        Axis::Child,
        Axis::Attribute,
        Axis::Parent,
        Axis::Descendant,
        Axis::DescendantOrSelf,
        Axis::Ancestor,
        Axis::AncestorOrSelf,
        Axis::FollowingSibling,
        Axis::PrecedingSibling,
        Axis::Following,
        Axis::Preceding,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Axis::SelfAxis => "self",
            Axis::Child => "child",
            Axis::Attribute => "attribute",
            Axis::Parent => "parent",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Following => "following",
            Axis::Preceding => "preceding",
        }
    }

    pub fn result_order(self) -> ResultOrder {
        match self {
            Axis::SelfAxis
            | Axis::Child
            | Axis::Descendant
            | Axis::DescendantOrSelf
            | Axis::FollowingSibling
            | Axis::Following => ResultOrder::Sorted,
            Axis::Parent | Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling | Axis::Preceding => {
                ResultOrder::ReverseSorted
            }
            Axis::Attribute => ResultOrder::Unsorted,
        }
    }

    /// All results lie inside the context node's subtree (itself included).
    pub fn subtree(self) -> bool {
        matches!(self, Axis::SelfAxis | Axis::Child | Axis::Attribute | Axis::Descendant | Axis::DescendantOrSelf)
    }

    /// No result is an ancestor of another result.
    pub fn peer(self) -> bool {
        matches!(
            self,
            Axis::SelfAxis
                | Axis::Child
                | Axis::Attribute
                | Axis::Parent
                | Axis::FollowingSibling
                | Axis::PrecedingSibling
        )
    }

    pub fn is_reverse(self) -> bool {
        self.result_order() == ResultOrder::ReverseSorted
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown axis name: {0}")]
pub struct ParseAxisError(pub String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix("::").unwrap_or(s);
        Axis::ALL.into_iter().find(|a| a.name() == name).ok_or_else(|| ParseAxisError(s.to_string()))
    }
}

pub trait AxisExpression<A: TreeAccessor>: fmt::Debug {
    fn axis(&self) -> Axis;

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error>;

    fn result_order(&self) -> ResultOrder {
        self.axis().result_order()
    }

    fn subtree(&self) -> bool {
        self.axis().subtree()
    }

    fn peer(&self) -> bool {
        self.axis().peer()
    }

    /// Bucket of the context nodes for which this expression can be non-empty.
    fn bucket(&self) -> Option<Bucket> {
        None
    }
}

/// Axis expression chosen by [`Axis`] tag.
pub struct AxisStep<A: TreeAccessor> {
    inner: Box<dyn AxisExpression<A>>,
}

impl<A: TreeAccessor + 'static> AxisStep<A> {
    pub fn new(axis: Axis, test: impl NodeTest<A> + 'static) -> Self {
        let inner: Box<dyn AxisExpression<A>> = match axis {
            Axis::SelfAxis => Box::new(SelfAxis::new(test)),
            Axis::Child => Box::new(ChildAxis::new(test)),
            Axis::Attribute => Box::new(AttributeAxis::new(test)),
            Axis::Parent => Box::new(ParentAxis::new(test)),
            Axis::Descendant => Box::new(DescendantAxis::new(test, false)),
            Axis::DescendantOrSelf => Box::new(DescendantAxis::new(test, true)),
            Axis::Ancestor => Box::new(AncestorAxis::new(test, false)),
            Axis::AncestorOrSelf => Box::new(AncestorAxis::new(test, true)),
            Axis::FollowingSibling => Box::new(FollowingSiblingAxis::new(test)),
            Axis::PrecedingSibling => Box::new(PrecedingSiblingAxis::new(test)),
            Axis::Following => Box::new(FollowingAxis::new(test)),
            Axis::Preceding => Box::new(PrecedingAxis::new(test)),
        };
        Self { inner }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for AxisStep<A> {
    fn axis(&self) -> Axis {
        self.inner.axis()
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        self.inner.evaluate(ctx)
    }

    fn bucket(&self) -> Option<Bucket> {
        self.inner.bucket()
    }
}

impl<A: TreeAccessor> fmt::Debug for AxisStep<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// Context validation shared by all axes: the context item must be present
/// and must be a node.
pub(crate) fn context_node<A: TreeAccessor>(
    ctx: &DynamicContext<'_, A>,
    axis: Axis,
) -> Result<NodeValue<A::Handle>, Error> {
    match ctx.context_item() {
        None => {
            tracing::debug!(%axis, "axis step evaluated without a context item");
            Err(Error::absent_context())
        }
        Some(XdmItem::Atomic(value)) => {
            tracing::debug!(%axis, ?value, "axis step evaluated on an atomic context item");
            Err(Error::context_not_node())
        }
        Some(XdmItem::Node(node)) => {
            tracing::trace!(%axis, kind = ?node.kind(), "evaluating axis step");
            Ok(node.clone())
        }
    }
}

/// Bucket of `test`, or nothing when pruning is switched off.
pub(crate) fn step_bucket<A: TreeAccessor>(ctx: &DynamicContext<'_, A>, test: &dyn NodeTest<A>) -> Option<Bucket> {
    if ctx.bucket_pruning() { test.bucket() } else { None }
}

#[inline]
pub(crate) fn is_empty_bucket(bucket: Option<&Bucket>) -> bool {
    matches!(bucket, Some(Bucket::Empty))
}

pub(crate) fn apply_test<'a, A: TreeAccessor>(
    ctx: &'a DynamicContext<'a, A>,
    test: &'a dyn NodeTest<A>,
    seq: Sequence<'a, NodeValue<A::Handle>>,
) -> Sequence<'a, NodeValue<A::Handle>> {
    seq.filter(move |candidate| test.matches(ctx, candidate))
}
