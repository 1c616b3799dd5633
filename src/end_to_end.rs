//! Code to configure and run the parser and evaluator on an expression given
//! on the command line or on every line of a source file.

use std::fs;

use clap::{ArgGroup, Parser};

use crate::box_tree_impl::box_tree_ast::print_dump;
use crate::box_tree_impl::box_tree_evaluation::{evaluate_with_trace, EvalError};
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{parse_str, ParseError};

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["expression", "src_filepath"])
))]
pub struct InterpreterConfig {
    /// A single expression to evaluate.
    #[arg(short, long)]
    pub expression: Option<String>,

    /// A file with one expression per line. Blank lines and lines starting
    /// with `//` are skipped.
    #[arg(short, long)]
    pub src_filepath: Option<String>,

    /// Print the tree of each expression before evaluating it.
    #[arg(short, long)]
    pub dump: bool,

    /// Print every evaluation step.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Errors that may be thrown when running the interpreter.
#[derive(Debug)]
pub enum RunError {
    ConfigError(String),
    InputFileError(std::io::Error),
    ExprParseError {
        line_num: usize,
        parse_error: ParseError,
    },
    ExprEvalError {
        line_num: usize,
        eval_error: EvalError,
    },
}

/// Display trait implementation for RunError.
impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError(config_err_string) => {
                return write!(f, "Interpreter configuration error: {}", config_err_string);
            }

            Self::InputFileError(io_err) => {
                return write!(f, "Input file error: {}", io_err);
            }

            Self::ExprParseError {
                line_num,
                parse_error,
            } => {
                return write!(f, "Parse error on line {}: {}", line_num, parse_error);
            }

            Self::ExprEvalError {
                line_num,
                eval_error,
            } => {
                return write!(f, "Evaluation error on line {}: {}", line_num, eval_error);
            }
        }
    }
}

impl std::error::Error for RunError {}

/// Type conversions for errors.
impl From<std::io::Error> for RunError {
    fn from(value: std::io::Error) -> Self {
        return Self::InputFileError(value);
    }
}

/// Parse and evaluate a single expression, returning its value as a string.
pub fn run_expression(
    source: &str,
    line_num: usize,
    config: &InterpreterConfig,
) -> Result<String, RunError> {
    // Run parser.
    let node = parse_str(source).map_err(|parse_error| RunError::ExprParseError {
        line_num,
        parse_error,
    })?;

    if config.dump {
        print_dump(&node);
    }

    // Evaluate the tree.
    let value = evaluate_with_trace(&node, config.verbose).map_err(|eval_error| {
        RunError::ExprEvalError {
            line_num,
            eval_error,
        }
    })?;

    return Ok(value.to_string());
}

/// Evaluate every expression line of the configured source file. Results are
/// returned one per line; the first failing line stops the run.
pub fn run_file_interpreter(
    src_filepath: &str,
    config: &InterpreterConfig,
) -> Result<String, RunError> {
    // Read the input file into a string.
    let program_string = fs::read_to_string(src_filepath)?;

    let mut out = vec![];

    for (line_idx, line) in program_string.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        out.push(run_expression(line, line_idx + 1, config)?);
    }

    return Ok(out.join("\n"));
}

/// Run the interpreter (i.e. the lexer, parser, and evaluator) given an
/// interpreter config.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    match (&config.expression, &config.src_filepath) {
        (Some(expression), None) => return run_expression(expression, 1, config),

        (None, Some(src_filepath)) => return run_file_interpreter(src_filepath, config),

        (Some(_), Some(_)) => {
            return Err(RunError::ConfigError(String::from(
                "Give either an expression or a source file, not both",
            )))
        }

        (None, None) => {
            return Err(RunError::ConfigError(String::from(
                "Give an expression or a source file to evaluate",
            )))
        }
    };
}
