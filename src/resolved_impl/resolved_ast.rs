/// Expressions with variable references resolved ahead of time to offsets
/// into the runtime environment, and the pass that produces them.
use std::sync::Arc;

use num::BigInt;

use crate::box_tree_impl::box_tree_ast::Expr;
use crate::box_tree_impl::box_tree_environment::Environment;

/// The parameter and body of a resolved abstraction. Shared between the code
/// tree and every closure created from it.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedLambda {
    pub parameter: String,
    pub body: Code,
}

/// Represents a resolved lambda-calculus expression.
#[derive(Debug, PartialEq, Eq)]
pub enum Code {
    Constant {
        value: BigInt,
    },
    /// Reads the binding `index` steps out from the innermost one. The name
    /// is kept for printing only.
    Local {
        index: usize,
        name: String,
    },
    /// A name with no binder in scope. Fails only if it is executed.
    Unbound {
        name: String,
    },
    Abstraction {
        lambda: Arc<ResolvedLambda>,
    },
    Application {
        function: Box<Code>,
        argument: Box<Code>,
    },
}

// Recursively resolves expr against the names currently in scope, innermost
// last.
fn resolve_helper<'a>(expr: &'a Expr, scope: &mut Vec<&'a str>) -> Code {
    match expr {
        Expr::Variable { name } => {
            let offset = scope
                .iter()
                .rev()
                .position(|bound_name| *bound_name == name.as_str());

            match offset {
                Some(index) => {
                    return Code::Local {
                        index: index,
                        name: name.clone(),
                    };
                }
                None => return Code::Unbound { name: name.clone() },
            }
        }
        Expr::Constant { value } => {
            return Code::Constant {
                value: value.clone(),
            };
        }
        Expr::Abstraction { parameter, body } => {
            scope.push(parameter.as_str());
            let resolved_body = resolve_helper(body, scope);
            scope.pop();

            return Code::Abstraction {
                lambda: Arc::new(ResolvedLambda {
                    parameter: parameter.clone(),
                    body: resolved_body,
                }),
            };
        }
        Expr::Application { function, argument } => {
            return Code::Application {
                function: Box::new(resolve_helper(function, scope)),
                argument: Box::new(resolve_helper(argument, scope)),
            };
        }
    };
}

/// Resolves every variable in `expr` to its offset in `env` as extended by
/// the abstractions enclosing the variable. The resulting code must be run
/// against the same `env`.
pub fn resolve(expr: &Expr, env: &Environment) -> Code {
    let mut scope: Vec<&str> = env.iter().map(|(name, _)| name).collect();
    scope.reverse();

    return resolve_helper(expr, &mut scope);
}

// Helper function to produce a string representation of Code, in the same
// surface syntax the parser reads.
fn code_to_string_helper(code: &Code, string_so_far: &mut String) {
    match code {
        Code::Constant { value } => {
            string_so_far.push_str(format!("(const {})", value).as_str());
        }
        Code::Local { name, .. } | Code::Unbound { name } => {
            string_so_far.push_str(name.as_str());
        }
        Code::Abstraction { lambda } => {
            lambda_to_string_helper(lambda, string_so_far);
        }
        Code::Application { function, argument } => {
            string_so_far.push('(');
            code_to_string_helper(function, string_so_far);
            string_so_far.push(' ');
            code_to_string_helper(argument, string_so_far);
            string_so_far.push(')');
        }
    };
}

fn lambda_to_string_helper(lambda: &ResolvedLambda, string_so_far: &mut String) {
    string_so_far.push_str(format!("(lambda ({}) ", lambda.parameter).as_str());
    code_to_string_helper(&lambda.body, string_so_far);
    string_so_far.push(')');
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out_string = String::new();
        code_to_string_helper(self, &mut out_string);
        return write!(f, "{}", out_string.as_str());
    }
}

impl std::fmt::Display for ResolvedLambda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out_string = String::new();
        lambda_to_string_helper(self, &mut out_string);
        return write!(f, "{}", out_string.as_str());
    }
}
