//! Parser and evaluator that represent expressions as a tree where each node
//! owns its children via `Box` smart pointers.

pub mod box_tree_ast;
pub mod box_tree_evaluation;
pub mod box_tree_recursive_descent_parsing;
