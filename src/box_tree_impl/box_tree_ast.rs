//! Data structures to represent arithmetic expressions as a tree where each
//! node owns its children through `Box` smart pointers, and some utility
//! functions to display and inspect them.
//!
//! A chain like `1 + 2 + ... + n` folds into a tree whose left spine is `n`
//! nodes deep, so every walk over a tree in this crate (display, dump, clone,
//! comparison, drop and evaluation) keeps its pending work on an explicit
//! stack instead of the call stack.

/// The kinds of nodes an expression tree is made of.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NodeKind {
    NumberLiteral,
    Add,
    Subtract,
    Multiply,
    Divide,
    UnaryPlus,
    UnaryMinus,
}

impl NodeKind {
    /// The operator symbol for operator kinds.
    pub fn symbol(self) -> Option<char> {
        return match self {
            NodeKind::NumberLiteral => None,
            NodeKind::Add | NodeKind::UnaryPlus => Some('+'),
            NodeKind::Subtract | NodeKind::UnaryMinus => Some('-'),
            NodeKind::Multiply => Some('*'),
            NodeKind::Divide => Some('/'),
        };
    }
}

/// Represents an expression tree node.
///
/// Number literals have no children, binary operators have both, and unary
/// operators only have `left`. The parser only ever builds nodes of that
/// shape. The fields are public and the constructors accept any kind, so
/// callers can build trees by hand; the evaluator checks the shape as it goes
/// and reports a wrong one as an `EvalError`.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub value: f64,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

impl Node {
    /// Creates a number literal leaf.
    pub fn number(value: f64) -> Box<Node> {
        return Box::new(Node {
            kind: NodeKind::NumberLiteral,
            value,
            left: None,
            right: None,
        });
    }

    /// Creates a binary operator node owning both operands.
    pub fn binary(kind: NodeKind, left: Box<Node>, right: Box<Node>) -> Box<Node> {
        return Box::new(Node {
            kind,
            value: 0.0,
            left: Some(left),
            right: Some(right),
        });
    }

    /// Creates a unary operator node owning its operand as `left`.
    pub fn unary(kind: NodeKind, operand: Box<Node>) -> Box<Node> {
        return Box::new(Node {
            kind,
            value: 0.0,
            left: Some(operand),
            right: None,
        });
    }
}

/// Lists the nodes of a tree in post-order: left subtree, right subtree, then
/// the node itself. The root is always the last entry.
pub(crate) fn post_order(root: &Node) -> Vec<&Node> {
    let mut pending = vec![root];
    let mut out = Vec::new();

    // Visiting node, right, left and reversing gives left, right, node.
    while let Some(node) = pending.pop() {
        out.push(node);

        if let Some(left) = &node.left {
            pending.push(&**left);
        }

        if let Some(right) = &node.right {
            pending.push(&**right);
        }
    }

    out.reverse();
    return out;
}

// Dropping a child from inside `drop` would recurse once per level, so the
// children are detached onto a stack and dropped childless.
impl Drop for Node {
    fn drop(&mut self) {
        let mut detached: Vec<Box<Node>> = Vec::new();
        detached.extend(self.left.take());
        detached.extend(self.right.take());

        while let Some(mut node) = detached.pop() {
            detached.extend(node.left.take());
            detached.extend(node.right.take());
        }
    }
}

// Takes the clone of a child off the stack of finished clones, if the
// original has that child.
fn take_clone(clones: &mut Vec<Node>, present: bool) -> Option<Box<Node>> {
    match present {
        true => return clones.pop().map(Box::new),
        false => return None,
    };
}

impl Clone for Node {
    fn clone(&self) -> Self {
        let mut clones: Vec<Node> = Vec::new();

        // Descendants in post-order; the root is handled below.
        let mut nodes = post_order(self);
        nodes.pop();

        for node in nodes {
            // Right was finished after left, so it sits on top.
            let right = take_clone(&mut clones, node.right.is_some());
            let left = take_clone(&mut clones, node.left.is_some());

            clones.push(Node {
                kind: node.kind,
                value: node.value,
                left,
                right,
            });
        }

        let right = take_clone(&mut clones, self.right.is_some());
        let left = take_clone(&mut clones, self.left.is_some());

        return Node {
            kind: self.kind,
            value: self.value,
            left,
            right,
        };
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&Node, &Node)> = vec![(self, other)];

        while let Some((node, other_node)) = pending.pop() {
            if node.kind != other_node.kind || node.value != other_node.value {
                return false;
            }

            for (child, other_child) in [
                (&node.left, &other_node.left),
                (&node.right, &other_node.right),
            ] {
                match (child, other_child) {
                    (Some(child), Some(other_child)) => pending.push((&**child, &**other_child)),
                    (None, None) => {}
                    _ => return false,
                }
            }
        }

        return true;
    }
}

// One piece of pending output while rendering a tree.
enum RenderStep<'a> {
    Operand(Option<&'a Node>),
    BinaryOperator(char),
    CloseParen,
}

/// Converts a node to a fully parenthesized infix string. Absent operands of
/// malformed trees are shown as `?`.
pub fn node_to_string(node: &Node) -> String {
    let mut out_string = String::new();
    let mut steps = vec![RenderStep::Operand(Some(node))];

    while let Some(step) = steps.pop() {
        match step {
            RenderStep::CloseParen => out_string.push(')'),

            RenderStep::BinaryOperator(symbol) => {
                out_string.push(' ');
                out_string.push(symbol);
                out_string.push(' ');
            }

            RenderStep::Operand(None) => out_string.push('?'),

            RenderStep::Operand(Some(node)) => match node.kind {
                NodeKind::NumberLiteral => {
                    out_string.push_str(node.value.to_string().as_str());
                }

                NodeKind::UnaryPlus | NodeKind::UnaryMinus => {
                    out_string.push(node.kind.symbol().unwrap_or('?'));
                    steps.push(RenderStep::Operand(node.left.as_deref()));
                }

                NodeKind::Add | NodeKind::Subtract | NodeKind::Multiply | NodeKind::Divide => {
                    // Pushed in reverse of the order they are written.
                    out_string.push('(');
                    steps.push(RenderStep::CloseParen);
                    steps.push(RenderStep::Operand(node.right.as_deref()));
                    steps.push(RenderStep::BinaryOperator(
                        node.kind.symbol().unwrap_or('?'),
                    ));
                    steps.push(RenderStep::Operand(node.left.as_deref()));
                }
            },
        };
    }

    return out_string;
}

// Display trait implementation for Node using node_to_string function.
impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", node_to_string(self).as_str());
    }
}

/// Produces a debug trace of the tree: the kind and value of every node in
/// pre-order, left child before right child, one line per node. The format is
/// for humans only.
pub fn dump(node: &Node) -> String {
    let mut lines = Vec::new();
    let mut pending = vec![node];

    while let Some(node) = pending.pop() {
        lines.push(format!("{:?} {}", node.kind, node.value));

        // Right first so that left is visited first.
        if let Some(right) = &node.right {
            pending.push(&**right);
        }

        if let Some(left) = &node.left {
            pending.push(&**left);
        }
    }

    return lines.join("\n");
}

/// Prints the output of `dump` to standard output.
pub fn print_dump(node: &Node) {
    println!("{}", dump(node));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Builds the tree for `-(1 + 2) * 3`.
    fn sample_tree() -> Box<Node> {
        return Node::binary(
            NodeKind::Multiply,
            Node::unary(
                NodeKind::UnaryMinus,
                Node::binary(NodeKind::Add, Node::number(1.0), Node::number(2.0)),
            ),
            Node::number(3.0),
        );
    }

    // Builds `1 + 1 + ... + 1` with the given number of terms, folded to the
    // left the way the parser folds it.
    fn left_leaning_sum(term_count: usize) -> Box<Node> {
        let mut node = Node::number(1.0);

        for _ in 1..term_count {
            node = Node::binary(NodeKind::Add, node, Node::number(1.0));
        }

        return node;
    }

    #[test]
    fn test_node_to_string() {
        assert_eq!(format!("{}", sample_tree()), "(-(1 + 2) * 3)");
        assert_eq!(format!("{}", Node::number(2.5)), "2.5");
    }

    // Test if the constructors respect the child shape of each kind.
    #[test]
    fn test_constructor_shapes() {
        let leaf = Node::number(4.0);
        assert!(leaf.left.is_none() && leaf.right.is_none());

        let unary = Node::unary(NodeKind::UnaryPlus, Node::number(4.0));
        assert!(unary.left.is_some() && unary.right.is_none());

        let binary = Node::binary(NodeKind::Divide, Node::number(4.0), Node::number(2.0));
        assert!(binary.left.is_some() && binary.right.is_some());
    }

    // Test if post_order lists left, right, then the node itself.
    #[test]
    fn test_post_order() {
        let tree = sample_tree();

        let kinds: Vec<NodeKind> = post_order(&tree).iter().map(|node| node.kind).collect();

        assert_eq!(
            kinds,
            vec![
                NodeKind::NumberLiteral,
                NodeKind::NumberLiteral,
                NodeKind::Add,
                NodeKind::UnaryMinus,
                NodeKind::NumberLiteral,
                NodeKind::Multiply,
            ]
        );
    }

    // Test if dump visits nodes in pre-order, left before right.
    #[test]
    fn test_dump_pre_order() {
        let expected_output = [
            "Multiply 0",
            "UnaryMinus 0",
            "Add 0",
            "NumberLiteral 1",
            "NumberLiteral 2",
            "NumberLiteral 3",
        ]
        .join("\n");

        assert_eq!(dump(&sample_tree()), expected_output);
    }

    // Test if a hand-built tree with a missing operand still displays.
    #[test]
    fn test_malformed_tree_display() {
        let malformed = Node {
            kind: NodeKind::Subtract,
            value: 0.0,
            left: Some(Node::number(1.0)),
            right: None,
        };

        assert_eq!(malformed.to_string(), "(1 - ?)");
    }

    // Test if clones are equal to the original and independent of it.
    #[test]
    fn test_clone_and_compare() {
        let tree = sample_tree();
        let mut copy = tree.clone();

        assert_eq!(copy, tree);

        copy.right = Some(Node::number(4.0));
        assert_ne!(copy, tree);

        copy.right = None;
        assert_ne!(copy, tree);
    }

    // Test if a tree hundreds of thousands of levels deep can be displayed,
    // dumped, cloned, compared and dropped.
    #[test]
    fn test_deep_tree_walks() {
        let term_count = 200_000;
        let tree = left_leaning_sum(term_count);

        let rendered = tree.to_string();
        assert_eq!(rendered.matches('(').count(), term_count - 1);
        assert!(rendered.trim_start_matches('(').starts_with("1 + 1) + 1) + 1)"));
        assert!(rendered.ends_with(" + 1) + 1)"));

        assert_eq!(dump(&tree).lines().count(), 2 * term_count - 1);
        assert_eq!(post_order(&tree).len(), 2 * term_count - 1);

        let copy = tree.clone();
        assert_eq!(copy, tree);

        drop(copy);
        drop(tree);

        let mut negations = Node::number(1.0);
        for _ in 0..100_000 {
            negations = Node::unary(NodeKind::UnaryMinus, negations);
        }
        assert_eq!(dump(&negations).lines().count(), 100_001);
        drop(negations);
    }
}
