use smallvec::SmallVec;

use crate::bucket::Bucket;
use crate::model::{NodeKind, NodeRef, TreeAccessor};
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::descendant::SubtreeCursor;
use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `following::` - everything after the context node in document order that
/// is not one of its descendants.
pub struct FollowingAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> FollowingAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for FollowingAxis<A> {
    fn axis(&self) -> Axis {
        Axis::Following
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, Axis::Following)?;
        let bucket = step_bucket(ctx, &*self.test);
        if is_empty_bucket(bucket.as_ref()) {
            return Ok(Sequence::empty());
        }
        let cursor = FollowingCursor::new(ctx.tree(), node, Bucket::descent_hint(bucket.as_ref()));
        Ok(apply_test(ctx, &*self.test, Sequence::from_cursor(cursor)))
    }
}

impl_axis_debug!(FollowingAxis);

/// Walks the "uncle" subtrees of the context node.
///
/// On the first pull the ancestor chain is climbed once and, per level, the
/// first following sibling is recorded; the nearest level ends up on top of
/// the stack. Each recorded sibling is expanded as a full subtree before its
/// own next sibling, and an exhausted level falls through to the one above.
struct FollowingCursor<'a, A: TreeAccessor + 'a> {
    tree: &'a A,
    hint: Option<Bucket>,
    context: Option<NodeValue<A::Handle>>,
    levels: SmallVec<[NodeRef<A::Handle>; 16]>,
    // Sibling whose subtree is being expanded.
    current: Option<NodeRef<A::Handle>>,
    subtree: Option<SubtreeCursor<'a, A>>,
}

impl<'a, A: TreeAccessor + 'a> FollowingCursor<'a, A> {
    fn new(tree: &'a A, context: NodeValue<A::Handle>, hint: Option<Bucket>) -> Self {
        Self { tree, hint, context: Some(context), levels: SmallVec::new(), current: None, subtree: None }
    }

    fn collect_levels(&mut self, context: &NodeValue<A::Handle>) {
        let hint = self.hint.as_ref();
        let mut nearest_first: SmallVec<[NodeRef<A::Handle>; 16]> = SmallVec::new();
        let mut level = context.node().clone();
        if context.kind() == NodeKind::Attribute {
            // The owner's children follow its attributes in document order.
            let Some(owner) = self.tree.parent(&level, None) else {
                return;
            };
            nearest_first.extend(self.tree.first_child(&owner, hint));
            level = owner;
        }
        loop {
            nearest_first.extend(self.tree.next_sibling(&level, hint));
            match self.tree.parent(&level, None) {
                Some(parent) => level = parent,
                None => break,
            }
        }
        nearest_first.reverse();
        self.levels = nearest_first;
    }

    fn expand(&mut self, sibling: NodeRef<A::Handle>) {
        let root = NodeValue::from_ref(self.tree, sibling.clone());
        self.subtree = Some(SubtreeCursor::new(self.tree, root, true, self.hint.clone()));
        self.current = Some(sibling);
    }
}

impl<'a, A: TreeAccessor + 'a> SequenceCursor for FollowingCursor<'a, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, hint: IterationHint) -> Option<Self::Item> {
        if let Some(context) = self.context.take() {
            self.collect_levels(&context);
        }
        let mut hint = hint;
        loop {
            if let Some(subtree) = self.subtree.as_mut() {
                if let Some(value) = subtree.next_item(hint) {
                    return Some(value);
                }
                self.subtree = None;
                let next = self.current.take().and_then(|done| self.tree.next_sibling(&done, self.hint.as_ref()));
                if let Some(next) = next {
                    self.expand(next);
                    hint = IterationHint::None;
                    continue;
                }
            }
            let level = self.levels.pop()?;
            self.expand(level);
            hint = IterationHint::None;
        }
    }
}
