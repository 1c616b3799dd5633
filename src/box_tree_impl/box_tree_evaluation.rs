//! Evaluates expressions given in the box-tree representation.

use std::fmt::Display;

use crate::box_tree_impl::box_tree_ast::{post_order, Node, NodeKind};

/// Which child of a node an evaluation error refers to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperandSide {
    Left,
    Right,
}

/// Represents an evaluation error. These are only reachable for trees built
/// by hand; the parser never produces a node with the wrong children.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EvalError {
    MissingOperand {
        node_kind: NodeKind,
        side: OperandSide,
    },
    UnexpectedOperand {
        node_kind: NodeKind,
        side: OperandSide,
    },
}

/// Display trait implementation for EvalError.
impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOperand { node_kind, side } => {
                return write!(f, "{:?} node is missing its {:?} operand.", node_kind, side);
            }

            Self::UnexpectedOperand { node_kind, side } => {
                return write!(f, "{:?} node cannot have a {:?} operand.", node_kind, side);
            }
        }
    }
}

impl std::error::Error for EvalError {}

// Gets the child on the given side, which the node's kind requires.
fn required_operand(node: &Node, side: OperandSide) -> Result<&Node, EvalError> {
    let operand = match side {
        OperandSide::Left => &node.left,
        OperandSide::Right => &node.right,
    };

    match operand {
        Some(operand) => return Ok(&**operand),
        None => {
            return Err(EvalError::MissingOperand {
                node_kind: node.kind,
                side,
            })
        }
    };
}

// Checks that the node has no child on the given side.
fn absent_operand(node: &Node, side: OperandSide) -> Result<(), EvalError> {
    let operand = match side {
        OperandSide::Left => &node.left,
        OperandSide::Right => &node.right,
    };

    match operand {
        None => return Ok(()),
        Some(_) => {
            return Err(EvalError::UnexpectedOperand {
                node_kind: node.kind,
                side,
            })
        }
    };
}

// Takes the values of both operands of a binary node off the value stack.
// The right operand was reduced last, so it sits on top.
fn pop_operands(node: &Node, values: &mut Vec<f64>) -> Result<(f64, f64), EvalError> {
    required_operand(node, OperandSide::Left)?;
    required_operand(node, OperandSide::Right)?;

    let operands = values.split_off(values.len().saturating_sub(2));

    match operands[..] {
        [left_value, right_value] => return Ok((left_value, right_value)),
        _ => {
            return Err(EvalError::MissingOperand {
                node_kind: node.kind,
                side: OperandSide::Left,
            })
        }
    };
}

// Takes the value of the single operand of a unary node off the value stack.
fn pop_unary_operand(node: &Node, values: &mut Vec<f64>) -> Result<f64, EvalError> {
    absent_operand(node, OperandSide::Right)?;
    required_operand(node, OperandSide::Left)?;

    match values.pop() {
        Some(value) => return Ok(value),
        None => {
            return Err(EvalError::MissingOperand {
                node_kind: node.kind,
                side: OperandSide::Left,
            })
        }
    };
}

// Reduces one node whose children have already been reduced onto `values`.
fn reduce_node(node: &Node, values: &mut Vec<f64>, verbose: bool) -> Result<f64, EvalError> {
    let value = match node.kind {
        NodeKind::NumberLiteral => {
            absent_operand(node, OperandSide::Left)?;
            absent_operand(node, OperandSide::Right)?;
            node.value
        }

        NodeKind::Add => {
            let (left_value, right_value) = pop_operands(node, values)?;
            left_value + right_value
        }

        NodeKind::Subtract => {
            let (left_value, right_value) = pop_operands(node, values)?;
            left_value - right_value
        }

        NodeKind::Multiply => {
            let (left_value, right_value) = pop_operands(node, values)?;
            left_value * right_value
        }

        // Division by zero follows IEEE 754 and yields an infinity or NaN.
        NodeKind::Divide => {
            let (left_value, right_value) = pop_operands(node, values)?;
            left_value / right_value
        }

        NodeKind::UnaryPlus => pop_unary_operand(node, values)?,

        NodeKind::UnaryMinus => -pop_unary_operand(node, values)?,
    };

    if verbose {
        println!("Evaluated {} to {}", node, value);
    }

    return Ok(value);
}

// Reduces the tree bottom-up in post-order with an explicit value stack, so
// deep trees do not grow the call stack.
fn evaluate_helper(root: &Node, verbose: bool) -> Result<f64, EvalError> {
    let mut values: Vec<f64> = Vec::new();

    let mut nodes = post_order(root);
    nodes.pop();

    for node in nodes {
        let value = reduce_node(node, &mut values, verbose)?;
        values.push(value);
    }

    return reduce_node(root, &mut values, verbose);
}

/// Evaluates an expression tree to a number. If `verbose` is set, every
/// reduction step is printed to standard output.
pub fn evaluate_with_trace(node: &Node, verbose: bool) -> Result<f64, EvalError> {
    return evaluate_helper(node, verbose);
}

/// Evaluates an expression tree to a number.
pub fn evaluate(node: &Node) -> Result<f64, EvalError> {
    return evaluate_with_trace(node, false);
}
