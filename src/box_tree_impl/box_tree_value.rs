//! Runtime values produced by evaluation.

use std::sync::Arc;

use num::BigInt;

use crate::box_tree_impl::box_tree_ast::{expr_to_string, Expr};
use crate::box_tree_impl::box_tree_environment::Environment;
use crate::box_tree_impl::box_tree_execution::{apply_closure, EvalError};
use crate::resolved_impl::resolved_execution::{apply_resolved_closure, ResolvedClosure};

/// A function value created by evaluating an abstraction. The captured
/// environment is the one the abstraction was evaluated in.
#[derive(Debug)]
pub struct Closure {
    pub parameter: String,
    pub body: Arc<Expr>,
    pub env: Environment,
}

/// Signature of a host-implemented function value.
pub type PrimitiveFn = dyn Fn(Value) -> Result<Value, EvalError> + Send + Sync;

/// A function value implemented outside the interpreter and supplied by the
/// host through the starting environment.
#[derive(Clone)]
pub struct Primitive {
    name: Arc<str>,
    function: Arc<PrimitiveFn>,
}

impl Primitive {
    pub fn new<F>(name: &str, function: F) -> Primitive
    where
        F: Fn(Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        return Primitive {
            name: Arc::from(name),
            function: Arc::new(function),
        };
    }

    pub fn name(&self) -> &str {
        return &self.name;
    }

    pub fn call(&self, argument: Value) -> Result<Value, EvalError> {
        return (self.function)(argument);
    }
}

impl std::fmt::Debug for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f.debug_tuple("Primitive").field(&self.name).finish();
    }
}

/// Represents a runtime value: an integer or one of the function kinds.
/// Cloning never copies a closure body or environment.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(BigInt),
    Closure(Arc<Closure>),
    Primitive(Primitive),
    Resolved(Arc<ResolvedClosure>),
}

impl Value {
    /// Wraps a host function as a value.
    pub fn primitive<F>(name: &str, function: F) -> Value
    where
        F: Fn(Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        return Value::Primitive(Primitive::new(name, function));
    }

    pub fn is_function(&self) -> bool {
        return !matches!(self, Value::Integer(_));
    }

    /// Extracts the integer held by this value.
    pub fn as_integer(&self) -> Result<&BigInt, EvalError> {
        match self {
            Value::Integer(n) => return Ok(n),
            _ => return Err(EvalError::NotAnInteger),
        }
    }

    /// Calls this value with `argument`, which must already be evaluated.
    pub fn apply(&self, argument: Value) -> Result<Value, EvalError> {
        match self {
            Value::Integer(_) => return Err(EvalError::NotAFunction(self.to_string())),
            Value::Closure(closure) => return apply_closure(closure, argument),
            Value::Primitive(primitive) => return primitive.call(argument),
            Value::Resolved(closure) => return apply_resolved_closure(closure, argument),
        }
    }

    // Hands back the captured environment of a closure this value is the last
    // owner of, so the caller can release it without recursing.
    pub(crate) fn into_captured_env(self) -> Option<Environment> {
        match self {
            Value::Closure(closure) => {
                return Arc::try_unwrap(closure).ok().map(|closure| closure.env);
            }
            Value::Resolved(closure) => {
                return Arc::try_unwrap(closure).ok().map(ResolvedClosure::into_env);
            }
            Value::Integer(_) | Value::Primitive(_) => return None,
        }
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        return Value::Integer(value);
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        return Value::Integer(BigInt::from(value));
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        return Value::Integer(BigInt::from(value));
    }
}

/// Display trait implementation for Value. Integers print as bare digits so
/// the host can show them directly.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => return write!(f, "{}", n),
            Value::Closure(closure) => {
                return write!(
                    f,
                    "<closure (lambda ({}) {})>",
                    closure.parameter,
                    expr_to_string(&closure.body)
                );
            }
            Value::Primitive(primitive) => return write!(f, "<primitive {}>", primitive.name()),
            Value::Resolved(closure) => return write!(f, "<closure {}>", closure.lambda()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_integer_value() {
        let value = Value::from(5);

        assert!(!value.is_function());
        assert_eq!(value.as_integer(), Ok(&BigInt::from(5)));
        assert_eq!(value.to_string(), "5");
    }

    #[test]
    fn test_integer_is_not_a_function() {
        let result = Value::from(5).apply(Value::from(1));

        assert_eq!(result.err(), Some(EvalError::NotAFunction(String::from("5"))));
    }

    #[test]
    fn test_closure_is_not_an_integer() {
        let closure = Value::Closure(Arc::new(Closure {
            parameter: String::from("x"),
            body: Arc::new(Expr::variable("x")),
            env: Environment::empty(),
        }));

        assert!(closure.is_function());
        assert_eq!(closure.as_integer().err(), Some(EvalError::NotAnInteger));
        assert_eq!(closure.to_string(), "<closure (lambda (x) x)>");
    }

    #[test]
    fn test_primitive_call() {
        let double = Value::primitive("double", |argument| {
            return Ok(Value::from(argument.as_integer()? * BigInt::from(2)));
        });

        let result = double.apply(Value::from(21)).expect("Unable to apply primitive.");

        assert_eq!(result.as_integer(), Ok(&BigInt::from(42)));
        assert_eq!(double.to_string(), "<primitive double>");
        assert_eq!(
            double.apply(double.clone()).err(),
            Some(EvalError::NotAnInteger)
        );
    }
}
