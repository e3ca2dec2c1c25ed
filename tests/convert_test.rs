use rstest::rstest;

use treeindex::domain::{
    build_forest, forest_iter, generate, to_flat, to_tree, Anomaly, Node, NodeId,
};

fn node(id: i64, label: &str, parent: Option<i64>) -> Node {
    Node::new(id, label, parent.map(NodeId::from))
}

#[rstest]
#[case(1, 1)]
#[case(7, 2)]
#[case(100, 3)]
#[case(1_000, 10)]
fn given_generated_dataset_when_round_tripping_then_same_records(
    #[case] count: usize,
    #[case] children: usize,
) {
    let flat = generate(count, children);

    let forest = to_tree(&flat);
    let mut back = to_flat(&forest);

    let mut expected = flat.clone();
    expected.sort_by(|a, b| a.id.cmp(&b.id));
    back.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(back, expected);
}

#[rstest]
fn given_children_before_parents_and_several_roots_when_round_tripping_then_same_records() {
    let flat = vec![
        node(7, "grandchild of 20", Some(21)),
        node(11, "child of 10", Some(10)),
        node(21, "child of 20", Some(20)),
        node(12, "grandchild of 10", Some(11)),
        node(20, "second root", None),
        node(13, "child of 10", Some(10)),
        node(10, "first root", None),
        node(30, "lone root", None),
    ];

    let forest = to_tree(&flat);
    let mut back = to_flat(&forest);

    let roots: Vec<&NodeId> = forest.iter().map(|t| t.id()).collect();
    assert_eq!(
        roots,
        vec![&NodeId::from(20), &NodeId::from(10), &NodeId::from(30)]
    );
    let mut expected = flat.clone();
    expected.sort_by(|a, b| a.id.cmp(&b.id));
    back.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(back, expected);
}

#[rstest]
fn given_shuffled_input_when_nesting_then_children_keep_input_order() {
    let flat = vec![
        node(3, "third", Some(1)),
        node(1, "root", None),
        node(4, "grandchild", Some(2)),
        node(2, "second", Some(1)),
    ];

    let forest = to_tree(&flat);

    assert_eq!(forest.len(), 1);
    let labels: Vec<&str> = forest[0]
        .children
        .iter()
        .map(|c| c.node.label.as_str())
        .collect();
    assert_eq!(labels, vec!["third", "second"]);
    assert_eq!(forest[0].children[1].children[0].node.label, "grandchild");
}

#[rstest]
fn given_several_roots_when_nesting_then_forest_keeps_root_order() {
    let flat = vec![
        node(10, "b-root", None),
        node(20, "a-root", None),
        node(11, "b-child", Some(10)),
    ];

    let forest = to_tree(&flat);

    let roots: Vec<&NodeId> = forest.iter().map(|t| t.id()).collect();
    assert_eq!(roots, vec![&NodeId::from(10), &NodeId::from(20)]);
    assert_eq!(forest_iter(&forest).count(), 3);
}

#[rstest]
fn given_empty_input_when_converting_then_empty_output() {
    assert!(to_tree(&[]).is_empty());
    assert!(to_flat(&[]).is_empty());
}

#[rstest]
fn given_orphans_and_cycles_when_building_then_reports_each_anomaly() {
    let flat = vec![
        node(1, "root", None),
        node(2, "orphan", Some(99)),
        node(3, "cycle a", Some(4)),
        node(4, "cycle b", Some(3)),
    ];

    let conversion = build_forest(&flat);

    let roots: Vec<&NodeId> = conversion.forest.iter().map(|t| t.id()).collect();
    assert_eq!(roots, vec![&NodeId::from(1), &NodeId::from(2)]);
    assert!(conversion.anomalies.contains(&Anomaly::MissingParent {
        id: NodeId::from(2),
        parent_id: NodeId::from(99),
    }));
    assert!(conversion
        .anomalies
        .contains(&Anomaly::Unreachable { id: NodeId::from(3) }));
    assert!(conversion
        .anomalies
        .contains(&Anomaly::Unreachable { id: NodeId::from(4) }));
}

#[rstest]
fn given_serialized_forest_when_rendering_json_then_leaves_omit_children() {
    let forest = to_tree(&[node(1, "root", None), node(2, "leaf", Some(1))]);

    let json = serde_json::to_value(&forest).unwrap();

    assert_eq!(json[0]["label"], "root");
    assert_eq!(json[0]["children"][0]["parentId"], 1);
    assert!(json[0]["children"][0].get("children").is_none());
}
