//! Persistent environments mapping names to runtime values.
//!
//! An environment is a singly linked chain of bindings, innermost first.
//! Extending never touches the chain being extended, so any number of
//! closures and in-flight calls can hold on to a shared tail.

use std::sync::Arc;

use crate::box_tree_impl::box_tree_execution::EvalError;
use crate::box_tree_impl::box_tree_value::Value;

// A single name-to-value binding and the environment it extends.
struct Binding {
    name: String,
    value: Value,
    parent: Environment,
}

/// An immutable chain of bindings. Cloning is O(1) and shares the chain.
#[derive(Clone, Default)]
pub struct Environment {
    head: Option<Arc<Binding>>,
}

impl Environment {
    /// The environment with no bindings.
    pub fn empty() -> Environment {
        return Environment { head: None };
    }

    pub fn is_empty(&self) -> bool {
        return self.head.is_none();
    }

    /// Returns a new environment that binds `name` to `value` in front of
    /// `self`. `self` is left untouched.
    pub fn extend(&self, name: &str, value: Value) -> Environment {
        return Environment {
            head: Some(Arc::new(Binding {
                name: String::from(name),
                value: value,
                parent: self.clone(),
            })),
        };
    }

    /// Finds the innermost binding of `name`.
    pub fn find(&self, name: &str) -> Option<&Value> {
        return self
            .iter()
            .find(|(bound_name, _)| *bound_name == name)
            .map(|(_, value)| value);
    }

    /// Looks up `name`, failing with `UnboundVariable` when no binding in the
    /// chain matches.
    pub fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        return self
            .find(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable(String::from(name)));
    }

    /// Returns the value `index` bindings out from the innermost one.
    pub fn get(&self, index: usize) -> Option<&Value> {
        return self.iter().nth(index).map(|(_, value)| value);
    }

    /// Number of bindings in the chain, shadowed ones included.
    pub fn depth(&self) -> usize {
        return self.iter().count();
    }

    /// Iterates over `(name, value)` pairs from the innermost binding out.
    pub fn iter(&self) -> EnvironmentIter<'_> {
        return EnvironmentIter {
            next_binding: self.head.as_deref(),
        };
    }
}

/// Iterator over the bindings of an [`Environment`], innermost first.
pub struct EnvironmentIter<'a> {
    next_binding: Option<&'a Binding>,
}

impl<'a> Iterator for EnvironmentIter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.next_binding?;
        self.next_binding = binding.parent.head.as_deref();
        return Some((binding.name.as_str(), &binding.value));
    }
}

// Chains reach through closure values into further chains, and can be far
// deeper than the stack. Bindings this environment owns outright are
// unlinked with a worklist; shared ones only lose a reference.
impl Drop for Environment {
    fn drop(&mut self) {
        let mut unlinked: Vec<Arc<Binding>> = self.head.take().into_iter().collect();

        while let Some(binding) = unlinked.pop() {
            let Ok(binding) = Arc::try_unwrap(binding) else {
                continue;
            };
            let Binding { value, mut parent, .. } = binding;

            unlinked.extend(parent.head.take());
            if let Some(mut captured) = value.into_captured_env() {
                unlinked.extend(captured.head.take());
            }
        }
    }
}

// Values can be arbitrarily large, so only the bound names are shown.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f
            .debug_list()
            .entries(self.iter().map(|(name, _)| name))
            .finish();
    }
}
