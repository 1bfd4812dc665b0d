//! Diagnostic representation tests: the one-line repr and the termtree
//! rendering.

use woodland::util::testing::init_test_setup;
use woodland::{NodeAttrs, TreeArena, TreeNodeConvert, Value};

// ============================================================
// One-line Repr Tests
// ============================================================

#[test]
fn given_linked_nodes_when_displaying_then_repr_nests_children() {
    init_test_setup();
    let mut arena = TreeArena::new();
    let root = arena
        .new_node(NodeAttrs::new().identifier(1).payload("x"))
        .unwrap();
    let child = arena
        .new_node(NodeAttrs::new().identifier(2).parent(root))
        .unwrap();
    arena.add_child(root, Value::Node(child)).unwrap();

    let repr = arena.display(root).to_string();

    assert_eq!(
        repr,
        "<TreeNode id: 1, payload: \"x\", parent: none, \
         children: [<TreeNode id: 2, payload: null, parent: 1, children: []>]>"
    );
}

#[test]
fn given_bare_node_when_displaying_then_repr_shows_unset_fields() {
    init_test_setup();
    let mut arena = TreeArena::new();
    let node = arena.new_node(NodeAttrs::new()).unwrap();

    let repr = arena.display(node).to_string();

    assert_eq!(
        repr,
        "<TreeNode id: unset, payload: null, parent: none, children: []>"
    );
}

// ============================================================
// Termtree Rendering Tests
// ============================================================

#[test]
fn given_branching_tree_when_rendering_then_one_line_per_node() {
    init_test_setup();
    let mut arena = TreeArena::new();
    let root = arena
        .new_node(NodeAttrs::new().identifier(1).payload("root"))
        .unwrap();
    let left = arena
        .new_node(NodeAttrs::new().identifier(2).payload("left"))
        .unwrap();
    let right = arena
        .new_node(NodeAttrs::new().identifier(3).payload("right"))
        .unwrap();
    let leaf = arena
        .new_node(NodeAttrs::new().identifier(4).payload("leaf"))
        .unwrap();

    arena.add_child(root, Value::Node(left)).unwrap();
    arena.add_child(root, Value::Node(right)).unwrap();
    arena.add_child(left, Value::Node(leaf)).unwrap();

    let expected = "1: \"root\"
├── 2: \"left\"
│   └── 4: \"leaf\"
└── 3: \"right\"\n";

    assert_eq!(arena.to_tree_string(root).to_string(), expected);
}

#[test]
fn given_node_without_identifier_when_rendering_then_label_is_payload_only() {
    init_test_setup();
    let mut arena = TreeArena::new();
    let node = arena.new_node(NodeAttrs::new().payload("only")).unwrap();

    assert_eq!(arena.to_tree_string(node).to_string(), "\"only\"\n");
}
