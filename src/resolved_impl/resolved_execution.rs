//! Executes resolved code. Semantics match the box-tree evaluator exactly;
//! only variable access differs, going by offset instead of by name.

use std::sync::Arc;

use tracing::trace;

use crate::box_tree_impl::box_tree_ast::Expr;
use crate::box_tree_impl::box_tree_environment::Environment;
use crate::box_tree_impl::box_tree_execution::EvalError;
use crate::box_tree_impl::box_tree_value::Value;
use crate::resolved_impl::resolved_ast::{resolve, Code, ResolvedLambda};

/// A function value created by executing a resolved abstraction.
#[derive(Debug)]
pub struct ResolvedClosure {
    lambda: Arc<ResolvedLambda>,
    env: Environment,
}

impl ResolvedClosure {
    pub fn lambda(&self) -> &ResolvedLambda {
        return &self.lambda;
    }

    pub(crate) fn into_env(self) -> Environment {
        return self.env;
    }
}

/// Runs the body of `closure` with its parameter bound to `argument`.
pub fn apply_resolved_closure(
    closure: &ResolvedClosure,
    argument: Value,
) -> Result<Value, EvalError> {
    let call_env = closure
        .env
        .extend(closure.lambda.parameter.as_str(), argument);
    return execute(&closure.lambda.body, &call_env);
}

/// Executes `code` against `env`, which must be the environment the code was
/// resolved against, extended by any enclosing calls. A local is fetched with
/// [`Environment::get`], which is linear in its offset.
pub fn execute(code: &Code, env: &Environment) -> Result<Value, EvalError> {
    match code {
        Code::Constant { value } => {
            return Ok(Value::Integer(value.clone()));
        }

        Code::Local { index, name } => {
            trace!(index, name = name.as_str(), "execute local");
            return env
                .get(*index)
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(name.clone()));
        }

        Code::Unbound { name } => {
            return Err(EvalError::UnboundVariable(name.clone()));
        }

        Code::Abstraction { lambda } => {
            return Ok(Value::Resolved(Arc::new(ResolvedClosure {
                lambda: Arc::clone(lambda),
                env: env.clone(),
            })));
        }

        Code::Application { function, argument } => {
            let function_value = execute(function, env)?;

            if !function_value.is_function() {
                return Err(EvalError::NotAFunction(function_value.to_string()));
            }

            let argument_value = execute(argument, env)?;
            return function_value.apply(argument_value);
        }
    };
}

/// Resolves `expr` against `env` and executes the result.
pub fn run(expr: &Expr, env: &Environment) -> Result<Value, EvalError> {
    let code = resolve(expr, env);
    return execute(&code, env);
}
