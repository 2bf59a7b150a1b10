use crate::bucket::Bucket;
use crate::model::{NodeRef, TreeAccessor};
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, step_bucket};

/// `parent::` - at most one node.
pub struct ParentAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> ParentAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for ParentAxis<A> {
    fn axis(&self) -> Axis {
        Axis::Parent
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, Axis::Parent)?;
        let bucket = step_bucket(ctx, &*self.test);
        if bucket.as_ref().is_some_and(|b| !b.may_contain_parents()) {
            return Ok(Sequence::empty());
        }
        let cursor = ParentCursor { tree: ctx.tree(), child: Some(node.into_node()), bucket };
        Ok(apply_test(ctx, &*self.test, Sequence::from_cursor(cursor)))
    }
}

impl_axis_debug!(ParentAxis);

struct ParentCursor<'a, A: TreeAccessor> {
    tree: &'a A,
    child: Option<NodeRef<A::Handle>>,
    bucket: Option<Bucket>,
}

impl<A: TreeAccessor> SequenceCursor for ParentCursor<'_, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, _hint: IterationHint) -> Option<Self::Item> {
        let child = self.child.take()?;
        let parent = self.tree.parent(&child, self.bucket.as_ref())?;
        Some(NodeValue::from_ref(self.tree, parent))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(usize::from(self.child.is_some())))
    }
}
