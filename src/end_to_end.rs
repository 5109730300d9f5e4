//! Code to configure and run the interpreter on a source program, acting as
//! the host around the core: it builds the starting environment, picks an
//! implementation and turns results into text.

use std::fs;
use std::sync::Once;

use clap::Parser;
use num::{BigInt, One};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::box_tree_impl::box_tree_ast::free_variables;
use crate::box_tree_impl::box_tree_environment::Environment;
use crate::box_tree_impl::box_tree_execution::{evaluate, EvalError};
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{parse, ParseError};
use crate::box_tree_impl::box_tree_value::Value;
use crate::resolved_impl::resolved_execution;

/// Supported interpreter implementations.
pub const SUPPORTED_IMPLS: [&str; 2] = ["box_tree", "resolved"];

/// Inclusive range of the host `rand` primitive.
pub const RAND_MIN: i64 = 1;
pub const RAND_MAX: i64 = 42;

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// Which implementation to use. Must be present inside `SUPPORTED_IMPLS`.
    #[arg(short, long, default_value_t = String::from("box_tree"))]
    pub impl_name: String,

    /// The input filepath to run on.
    #[arg(short, long, conflicts_with = "expr")]
    pub src_filepath: Option<String>,

    /// Program text to run, given inline.
    #[arg(short, long)]
    pub expr: Option<String>,

    /// Log every parse and evaluation step.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Errors that may be thrown when running the interpreter.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("Interpreter configuration error: {0}")]
    Config(String),

    #[error("Input file error: {0}")]
    InputFile(#[from] std::io::Error),

    #[error("No program given. Pass --src-filepath or --expr.")]
    NoInput,

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
}

static TRACING_INIT: Once = Once::new();

/// Installs the log subscriber. Filtering follows `RUST_LOG`, and `verbose`
/// turns on trace output for this crate. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        if verbose {
            if let Ok(directive) = "lambda_interp=trace".parse() {
                filter = filter.add_directive(directive);
            }
        }

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}

/// Builds the host `add1` primitive, which increments an integer.
pub fn add1_primitive() -> Value {
    return Value::primitive("add1", |argument| {
        return Ok(Value::Integer(argument.as_integer()? + BigInt::one()));
    });
}

/// Builds the host `rand` primitive, which ignores its argument and returns a
/// random integer between `RAND_MIN` and `RAND_MAX` inclusive.
pub fn rand_primitive() -> Value {
    return Value::primitive("rand", |_| {
        let drawn = rand::thread_rng().gen_range(RAND_MIN..=RAND_MAX);
        return Ok(Value::from(drawn));
    });
}

/// The environment programs start in.
pub fn host_environment() -> Environment {
    return Environment::empty()
        .extend("rand", rand_primitive())
        .extend("add1", add1_primitive());
}

// Programs are a single line; a newline left by an editor is not part of it.
fn strip_trailing_newline(program_string: &str) -> &str {
    return program_string
        .strip_suffix("\r\n")
        .or_else(|| program_string.strip_suffix('\n'))
        .unwrap_or(program_string);
}

/// Reads the program text named by the config.
pub fn read_program(config: &InterpreterConfig) -> Result<String, RunError> {
    match (&config.src_filepath, &config.expr) {
        (Some(src_filepath), _) => {
            let program_string = fs::read_to_string(src_filepath)?;
            return Ok(String::from(strip_trailing_newline(program_string.as_str())));
        }
        (None, Some(expr)) => return Ok(expr.clone()),
        (None, None) => return Err(RunError::NoInput),
    }
}

/// Run the named implementation on program text in the given starting
/// environment.
pub fn run_program(
    impl_name: &str,
    program_string: &str,
    env: &Environment,
) -> Result<Value, RunError> {
    if !SUPPORTED_IMPLS.contains(&impl_name) {
        return Err(RunError::Config(format!(
            "Unrecognized implementation name {}",
            impl_name
        )));
    }

    let expr = parse(program_string)?;

    for name in free_variables(&expr) {
        if env.find(name).is_none() {
            warn!(name, "program refers to a name the host does not bind");
        }
    }

    debug!(impl_name, %expr, "evaluating");

    let value = match impl_name {
        "resolved" => resolved_execution::run(&expr, env)?,
        _ => evaluate(&expr, env)?,
    };

    info!(%value, "evaluation finished");
    return Ok(value);
}

/// Run an interpreter (i.e. the parser and evaluator) given an interpreter
/// config, returning the text to show the user.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    let program_string = read_program(config)?;
    let value = run_program(
        config.impl_name.as_str(),
        program_string.as_str(),
        &host_environment(),
    )?;

    return Ok(value.to_string());
}
