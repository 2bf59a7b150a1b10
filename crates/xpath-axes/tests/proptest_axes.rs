use std::collections::HashSet;

use proptest::prelude::*;
use proptest::sample::Index;
use xpath_axes::simple::{NodeId, SimpleNodeBuilder, SimpleTree, attr, comment, doc, elem, ns_decl, text};
use xpath_axes::{
    Axis, AxisExpression, AxisStep, DynamicContextBuilder, KindTest, NameTest, NodeKind, NodeRef, NodeTest, ResultOrder,
    TreeAccessor,
};

const NAMES: [&str; 3] = ["n0", "n1", "n2"];

#[derive(Debug, Clone)]
struct Shape {
    parent: Index,
    kind: u8,
    name: u8,
    with_attrs: bool,
}

prop_compose! {
    fn arb_shape()(parent in any::<Index>(), kind in 0u8..4, name in 0u8..3, with_attrs in any::<bool>()) -> Shape {
        Shape { parent, kind, name, with_attrs }
    }
}

/// Random document: every generated node hangs below one of the elements
/// generated before it.
fn build_tree(shapes: &[Shape]) -> SimpleTree {
    // slot 0 is the document element
    let mut children: Vec<Vec<usize>> = vec![Vec::new()];
    let mut elements = vec![0usize];
    for (i, shape) in shapes.iter().enumerate() {
        let slot = i + 1;
        let parent = elements[shape.parent.index(elements.len())];
        children[parent].push(slot);
        children.push(Vec::new());
        if shape.kind < 2 {
            elements.push(slot);
        }
    }

    fn node(shapes: &[Shape], children: &[Vec<usize>], slot: usize) -> SimpleNodeBuilder {
        if slot == 0 {
            let root = elem("top").attr(attr("id", "top")).attr(ns_decl("p", "urn:p"));
            return root.children(children[0].iter().map(|c| node(shapes, children, *c)));
        }
        let shape = &shapes[slot - 1];
        match shape.kind {
            0 | 1 => {
                let mut e = elem(NAMES[usize::from(shape.name)]);
                if shape.with_attrs {
                    e = e.attr(attr("k", "v")).attr(ns_decl("q", "urn:q"));
                }
                e.children(children[slot].iter().map(|c| node(shapes, children, *c)))
            }
            2 => text("t"),
            _ => comment("c"),
        }
    }

    SimpleTree::build(doc().child(node(shapes, &children, 0)))
}

fn eval(
    tree: &SimpleTree,
    axis: Axis,
    test: impl NodeTest<SimpleTree> + 'static,
    at: &NodeRef<NodeId>,
    pruning: bool,
) -> Vec<NodeId> {
    let ctx = DynamicContextBuilder::new(tree)
        .with_context_node(tree.node_value(at))
        .with_bucket_pruning(pruning)
        .build();
    let step = AxisStep::new(axis, test);
    step.evaluate(&ctx).unwrap().map(|n| *n.node().handle()).collect()
}

#[derive(Debug, Clone, Copy)]
enum Probe {
    AnyNode,
    AnyElement,
    NamedElement,
    Text,
    AnyAttribute,
    NamedAttribute,
}

const PROBES: [Probe; 6] =
    [Probe::AnyNode, Probe::AnyElement, Probe::NamedElement, Probe::Text, Probe::AnyAttribute, Probe::NamedAttribute];

fn eval_probe(tree: &SimpleTree, axis: Axis, probe: Probe, at: &NodeRef<NodeId>, pruning: bool) -> Vec<NodeId> {
    match probe {
        Probe::AnyNode => eval(tree, axis, KindTest::AnyNode, at, pruning),
        Probe::AnyElement => eval(tree, axis, NameTest::any_element(), at, pruning),
        Probe::NamedElement => eval(tree, axis, NameTest::element("n1"), at, pruning),
        Probe::Text => eval(tree, axis, KindTest::Text, at, pruning),
        Probe::AnyAttribute => eval(tree, axis, NameTest::any_attribute(), at, pruning),
        Probe::NamedAttribute => eval(tree, axis, NameTest::attribute("k"), at, pruning),
    }
}

fn strictly_increasing(ids: &[NodeId]) -> bool {
    ids.windows(2).all(|w| w[0] < w[1])
}

fn strictly_decreasing(ids: &[NodeId]) -> bool {
    ids.windows(2).all(|w| w[0] > w[1])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn axes_partition_the_tree(shapes in prop::collection::vec(arb_shape(), 0..30)) {
        let tree = build_tree(&shapes);
        let universe: HashSet<NodeId> = tree
            .all_nodes()
            .filter(|n| tree.node_kind(n) != NodeKind::Attribute)
            .map(|n| *n.handle())
            .collect();
        for n in tree.all_nodes().filter(|n| tree.node_kind(n) != NodeKind::Attribute) {
            let mut seen: HashSet<NodeId> = HashSet::from([*n.handle()]);
            let mut total = 1;
            for axis in [Axis::Ancestor, Axis::Descendant, Axis::Following, Axis::Preceding] {
                let ids = eval(&tree, axis, KindTest::AnyNode, &n, true);
                total += ids.len();
                seen.extend(ids);
            }
            prop_assert_eq!(total, seen.len(), "overlap at {:?}", n);
            prop_assert_eq!(&seen, &universe, "gap at {:?}", n);
        }
    }

    #[test]
    fn axes_respect_declared_order(shapes in prop::collection::vec(arb_shape(), 0..30)) {
        let tree = build_tree(&shapes);
        for n in tree.all_nodes() {
            for axis in Axis::ALL {
                let ids = eval(&tree, axis, KindTest::AnyNode, &n, true);
                let unique: HashSet<_> = ids.iter().collect();
                prop_assert_eq!(unique.len(), ids.len(), "duplicates on {} at {:?}", axis, n);
                match axis.result_order() {
                    ResultOrder::Sorted => {
                        prop_assert!(strictly_increasing(&ids), "{} at {:?}", axis, n);
                    }
                    ResultOrder::ReverseSorted => {
                        prop_assert!(strictly_decreasing(&ids), "{} at {:?}", axis, n);
                    }
                    ResultOrder::Unsorted => {}
                }
            }
        }
    }

    #[test]
    fn inclusive_axes_prepend_context(shapes in prop::collection::vec(arb_shape(), 0..30)) {
        let tree = build_tree(&shapes);
        for n in tree.all_nodes() {
            let id = *n.handle();
            let mut expected = vec![id];
            expected.extend(eval(&tree, Axis::Ancestor, KindTest::AnyNode, &n, true));
            prop_assert_eq!(eval(&tree, Axis::AncestorOrSelf, KindTest::AnyNode, &n, true), expected);

            let mut expected = vec![id];
            expected.extend(eval(&tree, Axis::Descendant, KindTest::AnyNode, &n, true));
            prop_assert_eq!(eval(&tree, Axis::DescendantOrSelf, KindTest::AnyNode, &n, true), expected);

            prop_assert_eq!(eval(&tree, Axis::SelfAxis, KindTest::AnyNode, &n, true), vec![id]);
            prop_assert!(eval(&tree, Axis::Parent, KindTest::AnyNode, &n, true).len() <= 1);
        }
    }

    #[test]
    fn pruning_never_changes_results(shapes in prop::collection::vec(arb_shape(), 0..20)) {
        let tree = build_tree(&shapes);
        for n in tree.all_nodes() {
            for axis in Axis::ALL {
                for probe in PROBES {
                    let pruned = eval_probe(&tree, axis, probe, &n, true);
                    let plain = eval_probe(&tree, axis, probe, &n, false);
                    prop_assert_eq!(pruned, plain, "{}::{:?} at {:?}", axis, probe, n);
                }
            }
        }
    }
}
