//! Lazy XPath axis evaluation over externally owned, read-only trees.
//!
//! The crate does not own a document model. Trees are reached through the
//! [`TreeAccessor`] trait; the engine only keeps [`NodeRef`] handles while a
//! [`Sequence`] is being pulled.
//!
//! ```
//! use xpath_axes::simple::{SimpleTree, doc, elem};
//! use xpath_axes::{Axis, AxisExpression, AxisStep, DynamicContextBuilder, NameTest};
//!
//! let tree = SimpleTree::build(doc().child(elem("root").child(elem("a")).child(elem("b"))));
//! let root = tree.find("root").unwrap();
//! let ctx = DynamicContextBuilder::new(&tree).with_context_node(tree.node_value(&root)).build();
//!
//! let step = AxisStep::new(Axis::Child, NameTest::any_element());
//! let names: Vec<String> = step
//!     .evaluate(&ctx)
//!     .unwrap()
//!     .map(|n| tree.local_name(n.node()).unwrap_or_default())
//!     .collect();
//! assert_eq!(names, ["a", "b"]);
//! ```

pub mod axes;
pub mod bucket;
pub mod consts;
pub mod model;
pub mod node_test;
pub mod runtime;
pub mod sequence;
pub mod simple;
pub mod xdm;

pub use axes::{Axis, AxisExpression, AxisStep, ResultOrder};
pub use bucket::{Bucket, intersect_buckets};
pub use model::{GraftPoint, NodeKind, NodeRef, QName, TreeAccessor};
pub use node_test::{FnTest, IntersectTest, KindTest, NameTest, NodeTest};
pub use runtime::{DynamicContext, DynamicContextBuilder, Error, ErrorCode};
pub use sequence::{IterationHint, Sequence, SequenceCursor};
pub use xdm::{NodeValue, XdmAtomicValue, XdmItem};
