//! This crate contains a small arithmetic expression engine: a recursive
//! descent parser that builds an expression tree from tokens, and an
//! evaluator that reduces the tree to a floating-point number.

pub mod box_tree_impl;
pub mod end_to_end;
pub mod lexical_analysis;

pub use box_tree_impl::box_tree_ast::{dump, Node, NodeKind};
pub use box_tree_impl::box_tree_evaluation::{evaluate, EvalError};
pub use box_tree_impl::box_tree_recursive_descent_parsing::{
    parse_str, parse_tokens, ParseError, Parser,
};
pub use lexical_analysis::{CannedTokenizer, StringTokenizer, Token, TokenKind, Tokenizer};
