/// Data structures to represent lambda calculus expressions, and some utility
/// functions to display and inspect them.
use std::collections::HashSet;
use std::sync::Arc;

use num::BigInt;

/// Represents a lambda-calculus expression.
///
/// Abstraction bodies sit behind an `Arc` so that every closure created from
/// the same abstraction shares one copy of the body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expr {
    Variable {
        name: String,
    },
    Constant {
        value: BigInt,
    },
    Abstraction {
        parameter: String,
        body: Arc<Expr>,
    },
    Application {
        function: Box<Expr>,
        argument: Box<Expr>,
    },
}

impl Expr {
    pub fn variable(name: &str) -> Expr {
        return Expr::Variable {
            name: String::from(name),
        };
    }

    pub fn constant(value: impl Into<BigInt>) -> Expr {
        return Expr::Constant {
            value: value.into(),
        };
    }

    pub fn abstraction(parameter: &str, body: Expr) -> Expr {
        return Expr::Abstraction {
            parameter: String::from(parameter),
            body: Arc::new(body),
        };
    }

    pub fn application(function: Expr, argument: Expr) -> Expr {
        return Expr::Application {
            function: Box::new(function),
            argument: Box::new(argument),
        };
    }
}

// Helper function to produce a string representation of an Expr.
fn expr_to_string_helper(expr: &Expr, string_so_far: &mut String) {
    match expr {
        Expr::Variable { name } => {
            string_so_far.push_str(name.as_str());
        }
        Expr::Constant { value } => {
            string_so_far.push_str("(const ");
            string_so_far.push_str(value.to_string().as_str());
            string_so_far.push(')');
        }
        Expr::Abstraction { parameter, body } => {
            string_so_far.push_str("(lambda (");
            string_so_far.push_str(parameter.as_str());
            string_so_far.push_str(") ");
            expr_to_string_helper(body, string_so_far);
            string_so_far.push(')');
        }
        Expr::Application { function, argument } => {
            string_so_far.push('(');
            expr_to_string_helper(function, string_so_far);
            string_so_far.push(' ');
            expr_to_string_helper(argument, string_so_far);
            string_so_far.push(')');
        }
    };
}

/// Renders an expression back to source text that parses to the same tree.
pub fn expr_to_string(expr: &Expr) -> String {
    let mut out_string = String::new();
    expr_to_string_helper(expr, &mut out_string);
    return out_string;
}

// Display trait implementation for Expr using expr_to_string function.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", expr_to_string(self).as_str());
    }
}

/// Computes the free variables in the given lambda calculus expression.
pub fn free_variables(expr: &Expr) -> HashSet<&str> {
    match expr {
        Expr::Variable { name } => {
            return HashSet::from([name.as_str()]);
        }
        Expr::Constant { .. } => {
            return HashSet::new();
        }
        Expr::Abstraction { parameter, body } => {
            let mut body_free_vars = free_variables(body);
            body_free_vars.remove(parameter.as_str());
            return body_free_vars;
        }
        Expr::Application { function, argument } => {
            let function_free_vars = free_variables(function);
            let argument_free_vars = free_variables(argument);

            return function_free_vars
                .union(&argument_free_vars)
                .copied()
                .collect();
        }
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // lambda (f) . lambda (x) . (f (f x))
    fn twice_expr() -> Expr {
        return Expr::abstraction(
            "f",
            Expr::abstraction(
                "x",
                Expr::application(
                    Expr::variable("f"),
                    Expr::application(Expr::variable("f"), Expr::variable("x")),
                ),
            ),
        );
    }

    #[test]
    fn test_expr_to_string_each_form() {
        assert_eq!(expr_to_string(&Expr::variable("x")), "x");
        assert_eq!(expr_to_string(&Expr::constant(-42)), "(const -42)");
        assert_eq!(
            expr_to_string(&Expr::abstraction("x", Expr::variable("x"))),
            "(lambda (x) x)"
        );
        assert_eq!(
            expr_to_string(&Expr::application(
                Expr::variable("f"),
                Expr::variable("x")
            )),
            "(f x)"
        );
    }

    #[test]
    fn test_expr_to_string_nested() {
        let expected_output = "(((lambda (f) (lambda (x) (f (f x)))) add1) (const 1))";

        let test_input = Expr::application(
            Expr::application(twice_expr(), Expr::variable("add1")),
            Expr::constant(1),
        );

        assert_eq!(expected_output, format!("{}", test_input).as_str());
    }

    #[test]
    fn test_constant_beyond_machine_width() {
        let big: BigInt = "123456789012345678901234567890"
            .parse()
            .expect("Unable to parse big integer literal.");

        assert_eq!(
            expr_to_string(&Expr::constant(big)),
            "(const 123456789012345678901234567890)"
        );
    }

    #[test]
    fn test_free_variables() {
        assert_eq!(free_variables(&twice_expr()), HashSet::new());

        let open_expr = Expr::application(
            Expr::abstraction("x", Expr::application(Expr::variable("x"), Expr::variable("y"))),
            Expr::application(Expr::variable("add1"), Expr::constant(3)),
        );
        assert_eq!(free_variables(&open_expr), HashSet::from(["y", "add1"]));
    }
}
