use std::collections::HashMap;

use crate::value::Value;

/// The capability an external host exposes to this engine: resolving a
/// variable by name, and optionally classifying a name as arbitrary-precision.
///
/// This collapses the two collaborator responsibilities named in the Design
/// Notes (resolve-variable, classify-bigint) into a single trait with no
/// back-reference to any host engine.
pub trait Environment {
    /// Resolve `name` to a value, or `None` if unbound.
    fn resolve(&self, name: &str) -> Option<Value>;

    /// Whether `name` should be treated as arbitrary-precision even if its
    /// resolved value currently fits a host width. Defaults to `false`.
    fn is_bigint(&self, _name: &str) -> bool {
        false
    }
}

/// A minimal [`Environment`] backed by a plain map, for tests and simple hosts.
#[derive(Clone, Debug, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, Value>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl FromIterator<(String, Value)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        MapEnvironment {
            vars: iter.into_iter().collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.vars.get(name).cloned()
    }
}

/// An [`Environment`] with no bindings, useful when a caller has none to offer.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyEnvironment;

impl Environment for EmptyEnvironment {
    fn resolve(&self, _name: &str) -> Option<Value> {
        None
    }
}
