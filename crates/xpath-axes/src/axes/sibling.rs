use crate::bucket::Bucket;
use crate::model::{NodeKind, NodeRef, TreeAccessor};
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `following-sibling::` in document order.
pub struct FollowingSiblingAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

/// `preceding-sibling::`, nearest sibling first.
pub struct PrecedingSiblingAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> FollowingSiblingAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> PrecedingSiblingAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for FollowingSiblingAxis<A> {
    fn axis(&self) -> Axis {
        Axis::FollowingSibling
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        evaluate_siblings(ctx, &*self.test, Axis::FollowingSibling, Direction::Next)
    }
}

impl<A: TreeAccessor> AxisExpression<A> for PrecedingSiblingAxis<A> {
    fn axis(&self) -> Axis {
        Axis::PrecedingSibling
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        evaluate_siblings(ctx, &*self.test, Axis::PrecedingSibling, Direction::Previous)
    }
}

impl_axis_debug!(FollowingSiblingAxis);
impl_axis_debug!(PrecedingSiblingAxis);

fn evaluate_siblings<'a, A: TreeAccessor>(
    ctx: &'a DynamicContext<'a, A>,
    test: &'a dyn NodeTest<A>,
    axis: Axis,
    direction: Direction,
) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
    let node = context_node(ctx, axis)?;
    // Attributes are not children of their owner, so they have no siblings.
    if node.kind() == NodeKind::Attribute {
        return Ok(Sequence::empty());
    }
    let bucket = step_bucket(ctx, test);
    if is_empty_bucket(bucket.as_ref()) {
        return Ok(Sequence::empty());
    }
    let cursor = SiblingCursor { tree: ctx.tree(), current: Some(node.into_node()), bucket, direction };
    Ok(apply_test(ctx, test, Sequence::from_cursor(cursor)))
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

struct SiblingCursor<'a, A: TreeAccessor> {
    tree: &'a A,
    // Last node visited; the walk continues from here.
    current: Option<NodeRef<A::Handle>>,
    bucket: Option<Bucket>,
    direction: Direction,
}

impl<A: TreeAccessor> SequenceCursor for SiblingCursor<'_, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, _hint: IterationHint) -> Option<Self::Item> {
        let from = self.current.take()?;
        let next = match self.direction {
            Direction::Next => self.tree.next_sibling(&from, self.bucket.as_ref()),
            Direction::Previous => self.tree.previous_sibling(&from, self.bucket.as_ref()),
        }?;
        self.current = Some(next.clone());
        Some(NodeValue::from_ref(self.tree, next))
    }
}
