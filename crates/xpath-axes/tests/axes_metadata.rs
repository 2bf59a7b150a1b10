use rstest::rstest;
use xpath_axes::simple::SimpleTree;
use xpath_axes::{Axis, AxisExpression, AxisStep, Bucket, KindTest, NameTest, NodeKind, ResultOrder};

#[rstest]
#[case(Axis::SelfAxis, ResultOrder::Sorted, true, true)]
#[case(Axis::Child, ResultOrder::Sorted, true, true)]
#[case(Axis::Attribute, ResultOrder::Unsorted, true, true)]
#[case(Axis::Parent, ResultOrder::ReverseSorted, false, true)]
#[case(Axis::Descendant, ResultOrder::Sorted, true, false)]
#[case(Axis::DescendantOrSelf, ResultOrder::Sorted, true, false)]
#[case(Axis::Ancestor, ResultOrder::ReverseSorted, false, false)]
#[case(Axis::AncestorOrSelf, ResultOrder::ReverseSorted, false, false)]
#[case(Axis::FollowingSibling, ResultOrder::Sorted, false, true)]
#[case(Axis::PrecedingSibling, ResultOrder::ReverseSorted, false, true)]
#[case(Axis::Following, ResultOrder::Sorted, false, false)]
#[case(Axis::Preceding, ResultOrder::ReverseSorted, false, false)]
fn axis_metadata(#[case] axis: Axis, #[case] order: ResultOrder, #[case] subtree: bool, #[case] peer: bool) {
    let step = AxisStep::<SimpleTree>::new(axis, KindTest::AnyNode);
    assert_eq!(step.axis(), axis);
    assert_eq!(step.result_order(), order);
    assert_eq!(step.subtree(), subtree);
    assert_eq!(step.peer(), peer);
    assert_eq!(axis.is_reverse(), order == ResultOrder::ReverseSorted);
}

#[rstest]
#[case("self", Axis::SelfAxis)]
#[case("descendant-or-self", Axis::DescendantOrSelf)]
#[case("following-sibling::", Axis::FollowingSibling)]
#[case("preceding", Axis::Preceding)]
fn axis_names_parse(#[case] text: &str, #[case] axis: Axis) {
    assert_eq!(text.parse::<Axis>(), Ok(axis));
}

#[rstest]
fn axis_names_round_trip() {
    for axis in Axis::ALL {
        assert_eq!(axis.to_string().parse::<Axis>(), Ok(axis));
    }
    assert!("namespace".parse::<Axis>().is_err());
    assert_eq!("sideways".parse::<Axis>().unwrap_err().to_string(), "unknown axis name: sideways");
}

#[rstest]
fn expression_buckets() {
    let self_step = AxisStep::<SimpleTree>::new(Axis::SelfAxis, NameTest::element("item"));
    assert_eq!(self_step.bucket(), Some(Bucket::element_named("item")));
    let attr_step = AxisStep::<SimpleTree>::new(Axis::Attribute, NameTest::any_attribute());
    assert_eq!(attr_step.bucket(), Some(Bucket::Kind(NodeKind::Element)));
    let child_step = AxisStep::<SimpleTree>::new(Axis::Child, NameTest::element("item"));
    assert_eq!(child_step.bucket(), None);
}

#[rstest]
fn debug_output_names_axis_and_test() {
    let step = AxisStep::<SimpleTree>::new(Axis::FollowingSibling, NameTest::element("item"));
    let text = format!("{step:?}");
    assert!(text.starts_with("FollowingSiblingAxis"), "{text}");
    assert!(text.contains("FollowingSibling"), "{text}");
    assert!(text.contains("item"), "{text}");
}
