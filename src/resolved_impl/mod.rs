//! Two-phase implementation: variable references are resolved once to
//! environment offsets, then the resolved code is executed.
//!
//! An offset still walks the environment chain one binding at a time, so a
//! lookup costs the same number of steps as a lookup by name. What resolving
//! saves is the name comparison at each step.

pub mod resolved_ast;
pub mod resolved_execution;
