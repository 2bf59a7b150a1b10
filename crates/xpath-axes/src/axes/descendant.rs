use smallvec::SmallVec;

use crate::bucket::Bucket;
use crate::model::TreeAccessor;
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `descendant::` and `descendant-or-self::` in document order.
///
/// Honours [`IterationHint::SkipDescendants`]: the subtree below the node
/// returned by the previous pull is not entered.
pub struct DescendantAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
    inclusive: bool,
}

impl<A: TreeAccessor> DescendantAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static, inclusive: bool) -> Self {
        Self { test: Box::new(test), inclusive }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for DescendantAxis<A> {
    fn axis(&self) -> Axis {
        if self.inclusive { Axis::DescendantOrSelf } else { Axis::Descendant }
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, self.axis())?;
        let bucket = step_bucket(ctx, &*self.test);
        if is_empty_bucket(bucket.as_ref()) {
            return Ok(Sequence::empty());
        }
        if !self.inclusive && !node.kind().has_children() {
            return Ok(Sequence::empty());
        }
        let cursor = SubtreeCursor::new(ctx.tree(), node, self.inclusive, Bucket::descent_hint(bucket.as_ref()));
        Ok(apply_test(ctx, &*self.test, Sequence::from_cursor(cursor)))
    }
}

impl_axis_debug!(DescendantAxis);

/// Pre-order walk of a subtree, kept as a stack of child iterators.
///
/// The children of a yielded node are only requested from the accessor on the
/// following pull, so a `SkipDescendants` hint costs no accessor call at all.
pub(crate) struct SubtreeCursor<'a, A: TreeAccessor + 'a> {
    tree: &'a A,
    hint: Option<Bucket>,
    stack: SmallVec<[A::Children<'a>; 8]>,
    // Last node produced whose children have not been opened yet.
    pending: Option<NodeValue<A::Handle>>,
    include_root: bool,
    started: bool,
}

impl<'a, A: TreeAccessor + 'a> SubtreeCursor<'a, A> {
    pub(crate) fn new(tree: &'a A, root: NodeValue<A::Handle>, include_root: bool, hint: Option<Bucket>) -> Self {
        Self { tree, hint, stack: SmallVec::new(), pending: Some(root), include_root, started: false }
    }
}

impl<'a, A: TreeAccessor + 'a> SequenceCursor for SubtreeCursor<'a, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, hint: IterationHint) -> Option<Self::Item> {
        let mut hint = hint;
        if !self.started {
            self.started = true;
            if self.include_root {
                return self.pending.clone();
            }
            // The root is consumed internally; its children are always entered.
            hint = IterationHint::None;
        }
        if let Some(last) = self.pending.take()
            && hint != IterationHint::SkipDescendants
            && last.kind().has_children()
        {
            self.stack.push(self.tree.children(last.node(), self.hint.as_ref()));
        }
        while let Some(top) = self.stack.last_mut() {
            if let Some(child) = top.next() {
                let value = NodeValue::from_ref(self.tree, child);
                self.pending = Some(value.clone());
                return Some(value);
            }
            self.stack.pop();
        }
        None
    }
}
