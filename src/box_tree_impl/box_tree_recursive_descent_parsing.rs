//! Recursive descent parser that builds box-tree expressions from the tokens
//! of a `Tokenizer`, using the grammar
//!
//! ```text
//! expression := term ( ('+' | '-') term )*
//! term       := factor ( ('*' | '/') factor )*
//! factor     := NUMBER | ('+' | '-') factor | '(' expression ')'
//! ```

use std::fmt::Display;

use crate::box_tree_impl::box_tree_ast::{Node, NodeKind};
use crate::lexical_analysis::{StringTokenizer, Token, TokenKind, Tokenizer};

/// How many factors may be open at once, counting every `(` and every unary
/// sign that has not been closed yet. Each one costs a few stack frames.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Represents a parsing error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseError {
    UnexpectedToken { found_token_kind: TokenKind },
    UnexpectedEndOfInput,
    ExpectedClosingParen { found_token_kind: TokenKind },
    UnexpectedTrailingToken { found_token_kind: TokenKind },
    NestingTooDeep { max_depth: usize },
}

/// Display trait implementation for ParseError.
impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { found_token_kind } => {
                return write!(
                    f,
                    "Unexpected token. Expected a number, '+', '-' or '(', found: {:?}.",
                    found_token_kind
                );
            }

            Self::UnexpectedEndOfInput => {
                return write!(f, "Unexpected end of input.");
            }

            Self::ExpectedClosingParen { found_token_kind } => {
                return write!(
                    f,
                    "Expected closing parenthesis ')', found: {:?}.",
                    found_token_kind
                );
            }

            Self::UnexpectedTrailingToken { found_token_kind } => {
                return write!(
                    f,
                    "Extra tokens after the expression, starting with: {:?}.",
                    found_token_kind
                );
            }

            Self::NestingTooDeep { max_depth } => {
                return write!(
                    f,
                    "Parentheses and signs nest more than {} levels deep.",
                    max_depth
                );
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Pulls tokens from a tokenizer one at a time and builds an expression tree.
///
/// Only the current lookahead token is kept. A parser is meant to be used for
/// a single parse.
pub struct Parser<'a> {
    tokenizer: &'a mut dyn Tokenizer,
    token: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: &'a mut dyn Tokenizer) -> Self {
        return Parser {
            tokenizer,
            token: Token::default(),
            depth: 0,
        };
    }

    /// The current lookahead token. After `parse_expression` returns, this is
    /// the token that ended the expression, which callers embedding an
    /// expression in a larger token stream need to continue from.
    pub fn lookahead(&self) -> Token {
        return self.token;
    }

    fn token_read(&mut self) {
        self.token = self.tokenizer.next();
    }

    // Requires the token read after a complete sub-expression to be of the
    // given kind. The next eager read in `term_r` moves past it.
    fn token_match(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        match self.token.kind == token_kind {
            true => return Ok(()),
            false => {
                return Err(ParseError::ExpectedClosingParen {
                    found_token_kind: self.token.kind,
                })
            }
        };
    }

    /// Parses according to `expression := term (('+' | '-') term)*`.
    ///
    /// On success the lookahead holds the first token after the expression.
    pub fn parse_expression(&mut self) -> Result<Box<Node>, ParseError> {
        let mut left = self.term()?;

        // Keep absorbing additive operators while maintaining left
        // associativity.
        while let Some((kind, right)) = self.expression_r()? {
            left = Node::binary(kind, left, right);
        }

        return Ok(left);
    }

    /// Parses a whole input: an expression followed by the end of input.
    pub fn parse_complete_expression(&mut self) -> Result<Box<Node>, ParseError> {
        let node = self.parse_expression()?;

        match self.token.kind {
            TokenKind::EndOfInput => return Ok(node),
            found_token_kind => {
                return Err(ParseError::UnexpectedTrailingToken { found_token_kind })
            }
        };
    }

    // Tries to parse one more `('+' | '-') term`. The lookahead was already
    // fetched by `term_r`.
    fn expression_r(&mut self) -> Result<Option<(NodeKind, Box<Node>)>, ParseError> {
        let kind = match self.token.kind {
            TokenKind::Plus => NodeKind::Add,
            TokenKind::Minus => NodeKind::Subtract,
            _ => return Ok(None),
        };

        let right = self.term()?;

        return Ok(Some((kind, right)));
    }

    // Parses according to `term := factor (('*' | '/') factor)*`.
    fn term(&mut self) -> Result<Box<Node>, ParseError> {
        let mut left = self.factor()?;

        while let Some((kind, right)) = self.term_r()? {
            left = Node::binary(kind, left, right);
        }

        return Ok(left);
    }

    // Reads the token after the last factor and tries to parse one more
    // `('*' | '/') factor`.
    fn term_r(&mut self) -> Result<Option<(NodeKind, Box<Node>)>, ParseError> {
        self.token_read();

        let kind = match self.token.kind {
            TokenKind::Star => NodeKind::Multiply,
            TokenKind::Slash => NodeKind::Divide,
            _ => return Ok(None),
        };

        let right = self.factor()?;

        return Ok(Some((kind, right)));
    }

    // Parses a factor, refusing to recurse past MAX_NESTING_DEPTH open
    // factors.
    fn factor(&mut self) -> Result<Box<Node>, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
            });
        }

        self.depth += 1;
        let result = self.factor_r();
        self.depth -= 1;

        return result;
    }

    // Parses according to `factor := NUMBER | ('+' | '-') factor | '(' expression ')'`.
    fn factor_r(&mut self) -> Result<Box<Node>, ParseError> {
        self.token_read();

        match self.token.kind {
            TokenKind::NumberLiteral => return Ok(Node::number(self.token.value)),

            TokenKind::Plus => return Ok(Node::unary(NodeKind::UnaryPlus, self.factor()?)),

            TokenKind::Minus => return Ok(Node::unary(NodeKind::UnaryMinus, self.factor()?)),

            TokenKind::LParen => {
                let node = self.parse_expression()?;
                self.token_match(TokenKind::RParen)?;
                return Ok(node);
            }

            TokenKind::EndOfInput => return Err(ParseError::UnexpectedEndOfInput),

            found_token_kind => return Err(ParseError::UnexpectedToken { found_token_kind }),
        };
    }
}

/// Parses one expression from the tokenizer. The whole token stream must be
/// consumed by the expression.
pub fn parse_tokens(tokenizer: &mut dyn Tokenizer) -> Result<Box<Node>, ParseError> {
    return Parser::new(tokenizer).parse_complete_expression();
}

/// Scans and parses one expression from a string.
pub fn parse_str(source: &str) -> Result<Box<Node>, ParseError> {
    let mut tokenizer = StringTokenizer::new(source);
    return parse_tokens(&mut tokenizer);
}

#[cfg(test)]
mod tests {
    use crate::lexical_analysis::CannedTokenizer;

    use super::*;

    // Test if multiplication binds tighter than addition.
    #[test]
    fn test_precedence() {
        let expected_output = Node::binary(
            NodeKind::Add,
            Node::number(1.0),
            Node::binary(NodeKind::Multiply, Node::number(2.0), Node::number(3.0)),
        );

        let generated_output =
            parse_str("1 + 2 * 3").expect("parse_str returned unexpected parse error");

        assert_eq!(generated_output, expected_output);
    }

    // Test if we parse subtraction as left associative.
    #[test]
    fn test_subtraction_association() {
        let expected_output = Node::binary(
            NodeKind::Subtract,
            Node::binary(NodeKind::Subtract, Node::number(8.0), Node::number(3.0)),
            Node::number(2.0),
        );

        let generated_output =
            parse_str("8-3-2").expect("parse_str returned unexpected parse error");

        assert_eq!(generated_output, expected_output);
    }

    // Test if we parse division as left associative.
    #[test]
    fn test_division_association() {
        let expected_output = Node::binary(
            NodeKind::Divide,
            Node::binary(NodeKind::Divide, Node::number(8.0), Node::number(4.0)),
            Node::number(2.0),
        );

        let generated_output =
            parse_str("8/4/2").expect("parse_str returned unexpected parse error");

        assert_eq!(generated_output, expected_output);
    }

    // Test if association respects parentheses, and if a parenthesized
    // factor can be followed by more operators.
    #[test]
    fn test_association_with_parentheses() {
        let expected_output = Node::binary(
            NodeKind::Multiply,
            Node::binary(
                NodeKind::Subtract,
                Node::number(8.0),
                Node::binary(NodeKind::Subtract, Node::number(3.0), Node::number(2.0)),
            ),
            Node::number(4.0),
        );

        let generated_output =
            parse_str("(8 - (3 - 2)) * 4").expect("parse_str returned unexpected parse error");

        assert_eq!(generated_output, expected_output);
    }

    // Test if unary operators nest and bind tighter than binary ones.
    #[test]
    fn test_unary_operators() {
        let expected_output = Node::binary(
            NodeKind::Add,
            Node::unary(
                NodeKind::UnaryMinus,
                Node::unary(NodeKind::UnaryPlus, Node::number(5.0)),
            ),
            Node::number(3.0),
        );

        let generated_output =
            parse_str("-+5 + 3").expect("parse_str returned unexpected parse error");

        assert_eq!(generated_output, expected_output);
    }

    // Test if the parser works from a canned token sequence without a
    // string scanner.
    #[test]
    fn test_canned_tokens() {
        let mut tokenizer = CannedTokenizer::new(vec![
            Token::new(TokenKind::Minus),
            Token::new(TokenKind::LParen),
            Token::number(1.5),
            Token::new(TokenKind::Slash),
            Token::number(3.0),
            Token::new(TokenKind::RParen),
        ]);

        let expected_output = Node::unary(
            NodeKind::UnaryMinus,
            Node::binary(NodeKind::Divide, Node::number(1.5), Node::number(3.0)),
        );

        assert_eq!(parse_tokens(&mut tokenizer), Ok(expected_output));
    }

    // Test if parse_expression stops at the first token it cannot use and
    // leaves it as the lookahead.
    #[test]
    fn test_parse_expression_leaves_lookahead() {
        let mut tokenizer = StringTokenizer::new("1 + 2 ) 7");
        let mut parser = Parser::new(&mut tokenizer);

        let node = parser
            .parse_expression()
            .expect("parse_expression returned unexpected parse error");

        assert_eq!(node.to_string(), "(1 + 2)");
        assert_eq!(parser.lookahead().kind, TokenKind::RParen);
    }

    // Test if malformed inputs produce the right syntax faults.
    #[test]
    fn test_syntax_faults() {
        let inputs_and_expected_errors = vec![
            ("", ParseError::UnexpectedEndOfInput),
            ("   ", ParseError::UnexpectedEndOfInput),
            ("1 +", ParseError::UnexpectedEndOfInput),
            ("-", ParseError::UnexpectedEndOfInput),
            (
                "(1+2",
                ParseError::ExpectedClosingParen {
                    found_token_kind: TokenKind::EndOfInput,
                },
            ),
            (
                "(1+2+3 4",
                ParseError::ExpectedClosingParen {
                    found_token_kind: TokenKind::NumberLiteral,
                },
            ),
            (
                "()",
                ParseError::UnexpectedToken {
                    found_token_kind: TokenKind::RParen,
                },
            ),
            (
                "2 * x",
                ParseError::UnexpectedToken {
                    found_token_kind: TokenKind::Unknown,
                },
            ),
            (
                "1 + 2)",
                ParseError::UnexpectedTrailingToken {
                    found_token_kind: TokenKind::RParen,
                },
            ),
            (
                "1 2",
                ParseError::UnexpectedTrailingToken {
                    found_token_kind: TokenKind::NumberLiteral,
                },
            ),
        ];

        for (input, expected_error) in inputs_and_expected_errors {
            assert_eq!(parse_str(input), Err(expected_error), "input: {:?}", input);
        }
    }

    // Test if nesting up to the limit parses, and nesting past it is a
    // syntax fault rather than a stack overflow.
    #[test]
    fn test_nesting_limit() {
        let open_count = MAX_NESTING_DEPTH - 1;
        let source = format!("{}1{}", "(".repeat(open_count), ")".repeat(open_count));
        let generated_output =
            parse_str(&source).expect("parse_str returned unexpected parse error");
        assert_eq!(generated_output, Node::number(1.0));

        let too_deep = format!("{}1{}", "(".repeat(open_count + 1), ")".repeat(open_count + 1));
        assert_eq!(
            parse_str(&too_deep),
            Err(ParseError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
            })
        );

        let many_signs = format!("{}1", "-".repeat(100_000));
        assert_eq!(
            parse_str(&many_signs),
            Err(ParseError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
            })
        );

        let many_parens = "(".repeat(100_000);
        assert_eq!(
            parse_str(&many_parens),
            Err(ParseError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
            })
        );
    }

    // Test if the nesting depth is released when a group closes, so that
    // many shallow groups in a row are fine.
    #[test]
    fn test_nesting_depth_is_released() {
        let source = vec!["-(-(1))"; 10_000].join(" + ");

        let generated_output =
            parse_str(&source).expect("parse_str returned unexpected parse error");

        assert_eq!(generated_output.to_string().matches("--1").count(), 10_000);
    }
}
