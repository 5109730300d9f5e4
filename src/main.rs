//! Run a given lambda calculus program and print the result to standard
//! output.
//!
//! Example usage:
//!
//!     cargo run -- \
//!         --impl-name box_tree \
//!         --expr "(((lambda (f) (lambda (x) (f (f x)))) add1) (const 1))"

use clap::Parser;
use lambda_interp::end_to_end::{init_tracing, run_interpreter, InterpreterConfig};

fn main() {
    let interpreter_config = InterpreterConfig::parse();

    init_tracing(interpreter_config.verbose);

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
