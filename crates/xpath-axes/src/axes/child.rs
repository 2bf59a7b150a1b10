use crate::model::TreeAccessor;
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `child::` - children in document order.
pub struct ChildAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> ChildAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for ChildAxis<A> {
    fn axis(&self) -> Axis {
        Axis::Child
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, Axis::Child)?;
        if !node.kind().has_children() {
            return Ok(Sequence::empty());
        }
        let bucket = step_bucket(ctx, &*self.test);
        if is_empty_bucket(bucket.as_ref()) {
            return Ok(Sequence::empty());
        }
        let tree = ctx.tree();
        let cursor = ChildCursor { tree, children: tree.children(node.node(), bucket.as_ref()) };
        Ok(apply_test(ctx, &*self.test, Sequence::from_cursor(cursor)))
    }
}

impl_axis_debug!(ChildAxis);

struct ChildCursor<'a, A: TreeAccessor + 'a> {
    tree: &'a A,
    children: A::Children<'a>,
}

impl<'a, A: TreeAccessor + 'a> SequenceCursor for ChildCursor<'a, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, _hint: IterationHint) -> Option<Self::Item> {
        self.children.next().map(|child| NodeValue::from_ref(self.tree, child))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}
