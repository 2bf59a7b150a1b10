use crate::bucket::Bucket;
use crate::consts::XMLNS_NS;
use crate::model::{NodeKind, TreeAccessor};
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::{IterationHint, Sequence, SequenceCursor};
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `attribute::` - attributes of an element, namespace declarations excluded.
///
/// Attribute order is not part of document order, so the result is declared
/// unsorted.
pub struct AttributeAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> AttributeAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for AttributeAxis<A> {
    fn axis(&self) -> Axis {
        Axis::Attribute
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, Axis::Attribute)?;
        if node.kind() != NodeKind::Element {
            return Ok(Sequence::empty());
        }
        let bucket = step_bucket(ctx, &*self.test);
        if is_empty_bucket(bucket.as_ref()) {
            return Ok(Sequence::empty());
        }
        let tree = ctx.tree();
        let cursor = AttributeCursor { tree, attributes: tree.attributes(node.node(), bucket.as_ref()) };
        Ok(apply_test(ctx, &*self.test, Sequence::from_cursor(cursor)))
    }

    fn bucket(&self) -> Option<Bucket> {
        Some(Bucket::Kind(NodeKind::Element))
    }
}

impl_axis_debug!(AttributeAxis);

struct AttributeCursor<'a, A: TreeAccessor + 'a> {
    tree: &'a A,
    attributes: A::Attributes<'a>,
}

impl<'a, A: TreeAccessor + 'a> SequenceCursor for AttributeCursor<'a, A> {
    type Item = NodeValue<A::Handle>;

    fn next_item(&mut self, _hint: IterationHint) -> Option<Self::Item> {
        for attr in self.attributes.by_ref() {
            let is_ns_decl = self.tree.name(&attr).is_some_and(|q| q.ns_uri.as_deref() == Some(XMLNS_NS));
            if !is_ns_decl {
                return Some(NodeValue::new(attr, NodeKind::Attribute));
            }
        }
        None
    }
}
