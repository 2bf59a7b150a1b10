use crate::model::{NodeRef, TreeAccessor};
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `ancestor::` and `ancestor-or-self::`, nearest first.
pub struct AncestorAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
    inclusive: bool,
}

impl<A: TreeAccessor> AncestorAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static, inclusive: bool) -> Self {
        Self { test: Box::new(test), inclusive }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for AncestorAxis<A> {
    fn axis(&self) -> Axis {
        if self.inclusive { Axis::AncestorOrSelf } else { Axis::Ancestor }
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, self.axis())?;
        let bucket = step_bucket(ctx, &*self.test);
        if is_empty_bucket(bucket.as_ref()) {
            return Ok(Sequence::empty());
        }
        // Ancestors always have children; a bucket that cannot hold such nodes
        // leaves at most the context node itself.
        let climb = bucket.as_ref().is_none_or(|b| b.may_contain_parents());
        if !climb && !self.inclusive {
            return Ok(Sequence::empty());
        }
        let cursor = AncestorCursor {
            tree: ctx.tree(),
            current: climb.then(|| node.node().clone()),
            pending_self: self.inclusive.then_some(node),
        };
        Ok(apply_test(ctx, &*self.test, Sequence::from_cursor(cursor)))
    }
}

impl_axis_debug!(AncestorAxis);

struct AncestorCursor<'a, A: TreeAccessor> {
    tree: &'a A,
    pending_self: Option<NodeValue<A::Handle>>,
    // Node whose parent is produced next.
    current: Option<NodeRef<A::Handle>>,
}

impl<A: TreeAccessor> SequenceCursor for AncestorCursor<'_, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, _hint: IterationHint) -> Option<Self::Item> {
        if let Some(own) = self.pending_self.take() {
            return Some(own);
        }
        let from = self.current.take()?;
        // The upward walk is never pruned: a non-matching parent still leads
        // to matching ancestors.
        let parent = self.tree.parent(&from, None)?;
        self.current = Some(parent.clone());
        Some(NodeValue::from_ref(self.tree, parent))
    }
}
