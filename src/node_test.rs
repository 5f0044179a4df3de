use super::*;

#[test]
fn test_node() {
    let mut node: Node<u32, u32> = Node::new(10, 200);
    assert_eq!(node.is_red(), true);
    assert_eq!(node.is_black(), false);
    assert_eq!(node.parent.is_none(), true);
    assert_eq!(node.left.is_none(), true);
    assert_eq!(node.right.is_none(), true);

    node.set_black();
    assert_eq!(node.is_black(), true);
    assert_eq!(node.color, Color::Black);
    node.set_red();
    assert_eq!(node.is_red(), true);

    node.value = 300;
    assert_eq!(node.into_entry(), (10, 300));
}

#[test]
fn test_node_id_debug() {
    assert_eq!(format!("{:?}", NodeId(7)), "NodeId(7)");
}
