//! Tests for DOM tree mutation methods: remove_child, insert_before, move_children.

use weft_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData {
        namespace: Namespace::Html,
        local_name: tag.to_string(),
        attributes: Vec::new(),
        template_contents: None,
    }))
    .unwrap()
}

/// Helper to build `parent` with children `a`, `b`, `c` under the document.
fn three_children(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    assert_eq!(tree.children(parent).len(), 1);

    assert!(tree.remove_child(parent, child));

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    assert!(tree.remove_child(parent, b));

    // a and c are siblings now
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_with_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let (parent, a, _, _) = three_children(&mut tree);
    let other = alloc_element(&mut tree, "span");

    assert!(!tree.remove_child(other, a));
    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.children(parent).len(), 3);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let new = alloc_element(&mut tree, "new");

    tree.insert_before(parent, new, a);

    assert_eq!(tree.children(parent), &[new, a, b, c]);
    assert_eq!(tree.parent(new), Some(parent));
    assert_eq!(tree.prev_sibling(a), Some(new));
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let stray = alloc_element(&mut tree, "stray");
    let new = alloc_element(&mut tree, "new");

    tree.insert_before(parent, new, stray);

    assert_eq!(tree.children(parent), &[a, b, c, new]);
}

#[test]
fn test_insert_before_moves_attached_node() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.insert_before(parent, c, a);

    assert_eq!(tree.children(parent), &[c, a, b]);
}

// ========== move_children ==========

#[test]
fn test_move_children_keeps_order() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let target = alloc_element(&mut tree, "section");
    let existing = alloc_element(&mut tree, "h1");
    tree.append_child(NodeId::ROOT, target);
    tree.append_child(target, existing);

    tree.move_children(parent, target);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.children(target), &[existing, a, b, c]);
    for child in [a, b, c] {
        assert_eq!(tree.parent(child), Some(target));
    }
}

#[test]
fn test_append_child_reparents() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = alloc_element(&mut tree, "aside");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![other, NodeId::ROOT]);
}

// ========== traversal ==========

#[test]
fn test_descendants_in_tree_order() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let inner = alloc_element(&mut tree, "i");
    tree.append_child(a, inner);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![parent, a, inner, b, c]);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let (parent, a, _, c) = three_children(&mut tree);
    let one = tree.alloc(NodeType::Text("one ".to_string())).unwrap();
    let two = tree.alloc(NodeType::Text("two".to_string())).unwrap();
    tree.append_child(a, one);
    tree.append_child(c, two);

    assert_eq!(tree.text_content(parent), "one two");
}
