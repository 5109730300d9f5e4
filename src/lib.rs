//! This crate contains code for a small call-by-value lambda calculus
//! interpreter over arbitrary-precision integers.

pub mod box_tree_impl;
pub mod end_to_end;
pub mod lexical_analysis;
pub mod resolved_impl;

pub use box_tree_impl::box_tree_ast::{expr_to_string, Expr};
pub use box_tree_impl::box_tree_environment::Environment;
pub use box_tree_impl::box_tree_execution::{evaluate, EvalError};
pub use box_tree_impl::box_tree_recursive_descent_parsing::{parse, ParseError};
pub use box_tree_impl::box_tree_value::Value;
