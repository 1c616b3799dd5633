//! Tokens consumed by the parser, the `Tokenizer` capability the parser pulls
//! them from, and two tokenizers callers can hand to the parser: a regex
//! driven scanner over a string and a tokenizer replaying a canned sequence.

use lazy_static::lazy_static;
use regex::Regex;

/// The kinds of tokens the parser understands.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum TokenKind {
    #[default]
    Unknown,
    EndOfInput,
    NumberLiteral,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// Represents a single token. `value` is only meaningful for
/// `TokenKind::NumberLiteral` and is 0 otherwise.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Token {
    pub kind: TokenKind,
    pub value: f64,
}

impl Token {
    /// Creates a token of the given kind with no value.
    pub fn new(kind: TokenKind) -> Self {
        return Token { kind, value: 0.0 };
    }

    /// Creates a number literal token.
    pub fn number(value: f64) -> Self {
        return Token {
            kind: TokenKind::NumberLiteral,
            value,
        };
    }

    pub fn end_of_input() -> Self {
        return Token::new(TokenKind::EndOfInput);
    }
}

/// Anything that can produce tokens for the parser, one per call.
///
/// Once the underlying input is exhausted, every further call must return a
/// token of kind `TokenKind::EndOfInput`.
pub trait Tokenizer {
    fn next(&mut self) -> Token;
}

// The classes of text the string scanner recognizes. Whitespace is skipped and
// never becomes a token.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum TokenClass {
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Whitespace,
    Error,
}

// Represents how to recognize a token class.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    regex: Regex,
}

// Vector of regex patterns that correspond to each token class. Every pattern
// is anchored so that it only matches at the start of the remaining input.
lazy_static! {
    static ref TOKEN_RULES: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::Number,
            regex: Regex::new(r"^([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?")
                .expect("Unable to compile Number rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Plus,
            regex: Regex::new(r"^\+").expect("Unable to compile Plus rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Minus,
            regex: Regex::new(r"^-").expect("Unable to compile Minus rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Star,
            regex: Regex::new(r"^\*").expect("Unable to compile Star rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Slash,
            regex: Regex::new(r"^/").expect("Unable to compile Slash rule regex."),
        },
        TokenRule {
            token_class: TokenClass::LParen,
            regex: Regex::new(r"^\(").expect("Unable to compile LParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::RParen,
            regex: Regex::new(r"^\)").expect("Unable to compile RParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Whitespace,
            regex: Regex::new(r"^\s+").expect("Unable to compile Whitespace rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Error,
            regex: Regex::new(r"(?s)^.").expect("Unable to compile Error rule regex."),
        },
    ];
}

// Gets the rule for a specific token class.
fn get_rule_for_token_class(token_class: TokenClass) -> Option<&'static TokenRule> {
    return TOKEN_RULES
        .iter()
        .find(|token_rule| token_rule.token_class == token_class);
}

// Finds the rule that matches the most characters from the start of the input
// string. Ties go to the rule listed first.
fn get_longest_matching_rule(input_str: &str) -> (&'static TokenRule, usize) {
    let mut longest_match_len: usize = 0;
    let mut longest_token_rule = get_rule_for_token_class(TokenClass::Error)
        .expect("Unable to find token rule for Error token class.");

    for token_rule in TOKEN_RULES.iter() {
        match token_rule.regex.find(input_str) {
            None => continue,
            Some(match_obj) => {
                if match_obj.len() > longest_match_len {
                    longest_match_len = match_obj.len();
                    longest_token_rule = token_rule;
                }
            }
        };
    }

    return (longest_token_rule, longest_match_len);
}

/// Scans a string into tokens on demand.
#[derive(Debug)]
pub struct StringTokenizer<'a> {
    source: &'a str,
    curr_idx: usize,
}

impl<'a> StringTokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        return StringTokenizer {
            source,
            curr_idx: 0,
        };
    }
}

impl Tokenizer for StringTokenizer<'_> {
    fn next(&mut self) -> Token {
        while self.curr_idx < self.source.len() {
            let remaining = &self.source[self.curr_idx..];
            let (token_rule, mut match_len) = get_longest_matching_rule(remaining);

            // Always make progress, even on input no rule accepts.
            if match_len == 0 {
                match_len = remaining.chars().next().map_or(1, char::len_utf8);
            }

            let token_text = &remaining[..match_len];
            self.curr_idx += match_len;

            let token = match token_rule.token_class {
                TokenClass::Whitespace => continue,
                TokenClass::Number => match token_text.parse::<f64>() {
                    Ok(value) => Token::number(value),
                    Err(_) => Token::new(TokenKind::Unknown),
                },
                TokenClass::Plus => Token::new(TokenKind::Plus),
                TokenClass::Minus => Token::new(TokenKind::Minus),
                TokenClass::Star => Token::new(TokenKind::Star),
                TokenClass::Slash => Token::new(TokenKind::Slash),
                TokenClass::LParen => Token::new(TokenKind::LParen),
                TokenClass::RParen => Token::new(TokenKind::RParen),
                TokenClass::Error => Token::new(TokenKind::Unknown),
            };

            return token;
        }

        return Token::end_of_input();
    }
}

/// Replays a fixed sequence of tokens, then `EndOfInput` forever.
#[derive(Debug)]
pub struct CannedTokenizer {
    tokens: std::vec::IntoIter<Token>,
}

impl CannedTokenizer {
    pub fn new(tokens: Vec<Token>) -> Self {
        return CannedTokenizer {
            tokens: tokens.into_iter(),
        };
    }
}

impl Tokenizer for CannedTokenizer {
    fn next(&mut self) -> Token {
        return self.tokens.next().unwrap_or_else(Token::end_of_input);
    }
}

/// Given a string, returns every token in it up to (not including) the end of
/// input token.
pub fn run_lexical_analysis(source: &str) -> Vec<Token> {
    let mut tokenizer = StringTokenizer::new(source);
    let mut out = Vec::new();

    loop {
        let token = tokenizer.next();

        if token.kind == TokenKind::EndOfInput {
            break;
        }

        out.push(token);
    }

    return out;
}
