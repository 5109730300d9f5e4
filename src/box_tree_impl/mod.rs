//! Parser, runtime model and evaluator that represent programs as a tree where
//! each node references its children via `Box` and `Arc` smart pointers.

pub mod box_tree_ast;
pub mod box_tree_environment;
pub mod box_tree_execution;
pub mod box_tree_recursive_descent_parsing;
pub mod box_tree_value;
