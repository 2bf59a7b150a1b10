use smallvec::SmallVec;

use crate::bucket::Bucket;
use crate::model::{NodeRef, TreeAccessor};
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `preceding::` - everything before the context node in document order
/// except its ancestors, nearest first.
pub struct PrecedingAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> PrecedingAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for PrecedingAxis<A> {
    fn axis(&self) -> Axis {
        Axis::Preceding
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, Axis::Preceding)?;
        let bucket = step_bucket(ctx, &*self.test);
        if is_empty_bucket(bucket.as_ref()) {
            return Ok(Sequence::empty());
        }
        let cursor = PrecedingCursor {
            tree: ctx.tree(),
            hint: Bucket::descent_hint(bucket.as_ref()),
            level: Some(node.into_node()),
            current: None,
            subtree: None,
        };
        Ok(apply_test(ctx, &*self.test, Sequence::from_cursor(cursor)))
    }
}

impl_axis_debug!(PrecedingAxis);

/// Climbs the ancestor chain; at every level the previous siblings of the
/// level node are expanded right to left. The level nodes themselves are
/// ancestors (or the context node) and are never produced.
struct PrecedingCursor<'a, A: TreeAccessor + 'a> {
    tree: &'a A,
    hint: Option<Bucket>,
    // Next level whose previous siblings have not been visited yet.
    level: Option<NodeRef<A::Handle>>,
    // Sibling whose subtree is being expanded.
    current: Option<NodeRef<A::Handle>>,
    subtree: Option<ReverseSubtree<'a, A>>,
}

impl<'a, A: TreeAccessor + 'a> PrecedingCursor<'a, A> {
    fn expand(&mut self, sibling: NodeRef<A::Handle>) {
        self.subtree = Some(ReverseSubtree::new(self.tree, sibling.clone(), self.hint.clone()));
        self.current = Some(sibling);
    }
}

impl<'a, A: TreeAccessor + 'a> SequenceCursor for PrecedingCursor<'a, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, _hint: IterationHint) -> Option<Self::Item> {
        loop {
            if let Some(subtree) = self.subtree.as_mut() {
                if let Some(value) = subtree.next_node() {
                    return Some(value);
                }
                self.subtree = None;
                let prev = self.current.take().and_then(|done| self.tree.previous_sibling(&done, self.hint.as_ref()));
                if let Some(prev) = prev {
                    self.expand(prev);
                }
                continue;
            }
            let level = self.level.take()?;
            self.level = self.tree.parent(&level, None);
            if let Some(prev) = self.tree.previous_sibling(&level, self.hint.as_ref()) {
                self.expand(prev);
            }
        }
    }
}

/// Reverse document order over one subtree: descendants from last to first,
/// then the root itself.
struct ReverseSubtree<'a, A: TreeAccessor + 'a> {
    tree: &'a A,
    hint: Option<Bucket>,
    // (node, next child to enter, walking right to left)
    stack: SmallVec<[(NodeValue<A::Handle>, Option<NodeRef<A::Handle>>); 16]>,
}

impl<'a, A: TreeAccessor + 'a> ReverseSubtree<'a, A> {
    fn new(tree: &'a A, root: NodeRef<A::Handle>, hint: Option<Bucket>) -> Self {
        let mut this = Self { tree, hint, stack: SmallVec::new() };
        this.push(root);
        this
    }

    fn push(&mut self, node: NodeRef<A::Handle>) {
        let value = NodeValue::from_ref(self.tree, node);
        let last = value
            .kind()
            .has_children()
            .then(|| self.tree.last_child(value.node(), self.hint.as_ref()))
            .flatten();
        self.stack.push((value, last));
    }

    fn next_node(&mut self) -> Option<NodeValue<A::Handle>> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.1.take() {
                Some(child) => {
                    frame.1 = self.tree.previous_sibling(&child, self.hint.as_ref());
                    self.push(child);
                }
                None => return self.stack.pop().map(|(value, _)| value),
            }
        }
    }
}
