//! Evaluate arithmetic expressions and print the results to standard output.
//!
//! Example usage:
//!
//!     cargo run -- --expression "(1 + 2) * 3"
//!     cargo run -- --dump --src-filepath expressions.txt

use clap::Parser;
use expr_ast::end_to_end::{run_interpreter, InterpreterConfig};

fn main() {
    let interpreter_config = InterpreterConfig::parse();

    let interpreter_result = run_interpreter(&interpreter_config);

    match interpreter_result {
        Ok(execution_result) => {
            println!("{}", execution_result);
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            std::process::exit(1);
        }
    }
}
