//! Evaluates lambda-calculus expressions given in the box-tree representation.
//!
//! Evaluation is call-by-value: the argument of an application is reduced to
//! a value before the call is made. An abstraction evaluates to a closure
//! over the environment active at that point, and a call runs the closure
//! body in that captured environment extended with the parameter.

use std::sync::Arc;

use tracing::trace;

use crate::box_tree_impl::box_tree_ast::Expr;
use crate::box_tree_impl::box_tree_environment::Environment;
use crate::box_tree_impl::box_tree_value::{Closure, Value};

/// Errors that may be raised while evaluating an expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    #[error("Not a function: {0}")]
    NotAFunction(String),

    #[error("Not an integer")]
    NotAnInteger,
}

/// Runs the body of `closure` with its parameter bound to `argument`.
pub fn apply_closure(closure: &Closure, argument: Value) -> Result<Value, EvalError> {
    let call_env = closure.env.extend(closure.parameter.as_str(), argument);
    return evaluate(&closure.body, &call_env);
}

/// Evaluates `expr` in `env`.
pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Value, EvalError> {
    match expr {
        Expr::Variable { name } => {
            trace!(name = name.as_str(), "evaluate variable");
            return env.lookup(name);
        }

        Expr::Constant { value } => {
            return Ok(Value::Integer(value.clone()));
        }

        // Capture the current environment; the body stays unevaluated.
        Expr::Abstraction { parameter, body } => {
            trace!(
                parameter = parameter.as_str(),
                env_depth = env.depth(),
                "evaluate abstraction"
            );
            return Ok(Value::Closure(Arc::new(Closure {
                parameter: parameter.clone(),
                body: Arc::clone(body),
                env: env.clone(),
            })));
        }

        Expr::Application { function, argument } => {
            let function_value = evaluate(function, env)?;

            if !function_value.is_function() {
                return Err(EvalError::NotAFunction(function_value.to_string()));
            }

            let argument_value = evaluate(argument, env)?;

            trace!(function = %function_value, argument = %argument_value, "apply");
            return function_value.apply(argument_value);
        }
    };
}

#[cfg(test)]
mod tests {
    use num::{BigInt, One};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::box_tree_impl::box_tree_recursive_descent_parsing::parse;

    fn add1() -> Value {
        return Value::primitive("add1", |argument| {
            return Ok(Value::Integer(argument.as_integer()? + BigInt::one()));
        });
    }

    // Parses and evaluates program_str in env.
    fn run_program(program_str: &str, env: &Environment) -> Result<Value, EvalError> {
        let expr = parse(program_str).expect("Unable to parse program string.");
        return evaluate(&expr, env);
    }

    fn run_to_integer(program_str: &str, env: &Environment) -> BigInt {
        return run_program(program_str, env)
            .expect("Unable to evaluate program string.")
            .as_integer()
            .expect("Program did not produce an integer.")
            .clone();
    }

    #[test]
    fn test_constant() {
        assert_eq!(
            run_to_integer("(const 5)", &Environment::empty()),
            BigInt::from(5)
        );
    }

    #[test]
    fn test_unbound_variable() {
        assert_eq!(
            run_program("y", &Environment::empty()).err(),
            Some(EvalError::UnboundVariable(String::from("y")))
        );
    }

    #[test]
    fn test_identity_application() {
        assert_eq!(
            run_to_integer("((lambda (x) x) (const 7))", &Environment::empty()),
            BigInt::from(7)
        );
    }

    // The inner parameter shadows the outer one.
    #[test]
    fn test_shadowing() {
        assert_eq!(
            run_to_integer(
                "(((lambda (x) (lambda (x) x)) (const 1)) (const 2))",
                &Environment::empty()
            ),
            BigInt::from(2)
        );
    }

    // A closure sees the environment of its definition, not of its call.
    #[test]
    fn test_lexical_scoping() {
        let program_str =
            "((lambda (x) ((lambda (f) ((lambda (x) (f (const 0))) (const 2))) (lambda (y) x))) (const 1))";

        assert_eq!(
            run_to_integer(program_str, &Environment::empty()),
            BigInt::from(1)
        );
    }

    #[test]
    fn test_abstraction_is_a_closure() {
        let value = run_program("(lambda (x) (x x))", &Environment::empty())
            .expect("Unable to evaluate abstraction.");

        assert!(value.is_function());
        assert_eq!(value.to_string(), "<closure (lambda (x) (x x))>");
        assert_eq!(value.as_integer().err(), Some(EvalError::NotAnInteger));
    }

    // Free variables in an unapplied body are not looked up.
    #[test]
    fn test_body_not_evaluated_until_applied() {
        assert!(run_program("(lambda (x) undefined)", &Environment::empty()).is_ok());
        assert_eq!(
            run_program("((lambda (x) undefined) (const 0))", &Environment::empty()).err(),
            Some(EvalError::UnboundVariable(String::from("undefined")))
        );
    }

    #[test]
    fn test_applying_integer_is_not_a_function() {
        assert_eq!(
            run_program("((const 3) (const 4))", &Environment::empty()).err(),
            Some(EvalError::NotAFunction(String::from("3")))
        );
    }

    // The argument is evaluated before the call, even when unused.
    #[test]
    fn test_call_by_value() {
        assert_eq!(
            run_program("((lambda (x) (const 1)) missing)", &Environment::empty()).err(),
            Some(EvalError::UnboundVariable(String::from("missing")))
        );
    }

    #[test]
    fn test_host_primitive() {
        let env = Environment::empty().extend("add1", add1());

        assert_eq!(
            run_to_integer(
                "(((lambda (f) (lambda (x) (f (f x)))) add1) (const 1))",
                &env
            ),
            BigInt::from(3)
        );
        assert_eq!(
            run_program("(add1 (lambda (x) x))", &env).err(),
            Some(EvalError::NotAnInteger)
        );
    }

    // twice applied to itself three times applies add1 2^16 times.
    #[test]
    fn test_iterated_self_application() {
        let twice = run_program("(lambda (f) (lambda (x) (f (f x))))", &Environment::empty())
            .expect("Unable to evaluate twice.");

        let result = twice
            .apply(twice.clone())
            .and_then(|value| value.apply(twice.clone()))
            .and_then(|value| value.apply(twice.clone()))
            .and_then(|value| value.apply(add1()))
            .and_then(|value| value.apply(Value::from(0)))
            .expect("Unable to apply twice.");

        assert_eq!(result.as_integer(), Ok(&BigInt::from(65536)));
    }

    // The same scenario written entirely in source text.
    #[test]
    fn test_iterated_self_application_from_source() {
        let env = Environment::empty().extend(
            "twice",
            run_program("(lambda (f) (lambda (x) (f (f x))))", &Environment::empty())
                .expect("Unable to evaluate twice."),
        );
        let env = env.extend("add1", add1());

        assert_eq!(
            run_to_integer(
                "(((((twice twice) twice) twice) add1) (const 0))",
                &env
            ),
            BigInt::from(65536)
        );
    }

    // Evaluation only reads shared trees and environments.
    #[test]
    fn test_concurrent_evaluation_shares_tree_and_environment() {
        let expr = parse("((lambda (x) (add1 (add1 x))) base)").expect("Unable to parse.");
        let env = Environment::empty()
            .extend("add1", add1())
            .extend("base", Value::from(40));

        std::thread::scope(|scope| {
            let mut handles = Vec::new();
            for _ in 0..4 {
                handles.push(scope.spawn(|| evaluate(&expr, &env)));
            }

            for handle in handles {
                let result = handle
                    .join()
                    .expect("Evaluation thread panicked.")
                    .expect("Unable to evaluate.");
                assert_eq!(result.as_integer(), Ok(&BigInt::from(42)));
            }
        });
    }

    // The result is a closure whose captured environment holds a closure,
    // 65536 levels deep. Releasing it must not use stack per level.
    #[test]
    fn test_dropping_deeply_nested_closure() {
        let value = run_program(
            "((((((lambda (f) (lambda (x) (f (f x)))) (lambda (f) (lambda (x) (f (f x))))) (lambda (f) (lambda (x) (f (f x))))) (lambda (f) (lambda (x) (f (f x))))) (lambda (k) (lambda (y) k))) (const 0))",
            &Environment::empty(),
        )
        .expect("Unable to evaluate program string.");
        assert_eq!(value.to_string(), "<closure (lambda (y) k)>");

        std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(move || drop(value))
            .expect("Unable to spawn thread.")
            .join()
            .expect("Dropping the closure overflowed the stack.");
    }
}
