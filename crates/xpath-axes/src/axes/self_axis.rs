use crate::bucket::Bucket;
use crate::model::TreeAccessor;
use crate::node_test::NodeTest;
use crate::runtime::{DynamicContext, Error};
use crate::sequence::Sequence;
use crate::xdm::NodeValue;

use super::{Axis, AxisExpression, apply_test, context_node, is_empty_bucket, step_bucket};

/// `self::` - the context node, if it passes the test.
pub struct SelfAxis<A: TreeAccessor> {
    test: Box<dyn NodeTest<A>>,
}

impl<A: TreeAccessor> SelfAxis<A> {
    pub fn new(test: impl NodeTest<A> + 'static) -> Self {
        Self { test: Box::new(test) }
    }
}

impl<A: TreeAccessor> AxisExpression<A> for SelfAxis<A> {
    fn axis(&self) -> Axis {
        Axis::SelfAxis
    }

    fn evaluate<'a>(&'a self, ctx: &'a DynamicContext<'a, A>) -> Result<Sequence<'a, NodeValue<A::Handle>>, Error> {
        let node = context_node(ctx, Axis::SelfAxis)?;
        if is_empty_bucket(step_bucket(ctx, &*self.test).as_ref()) {
            return Ok(Sequence::empty());
        }
        Ok(apply_test(ctx, &*self.test, Sequence::singleton(node)))
    }

    fn bucket(&self) -> Option<Bucket> {
        self.test.bucket()
    }
}

impl_axis_debug!(SelfAxis);
