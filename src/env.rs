use std::collections::HashMap;
use std::fmt;

/// Source of environment variables for interpolation.
///
/// The default, [`ProcessEnv`], reads the real process environment. Tests and
/// embedders can pass a [`MapEnv`] snapshot instead of mutating global state.
pub trait EnvProvider: fmt::Debug + Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the process environment at lookup time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        std::env::var(name).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs, e.g. `std::env::vars()` or test data.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Snapshot the current process environment.
    pub fn snapshot() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvProvider for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_vars(iter.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}
