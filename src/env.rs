//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, eliminating the need for
//! `unsafe` calls to [`std::env::set_var`] / [`std::env::remove_var`].

use std::collections::HashMap;

use thiserror::Error;

/// A required environment variable was absent or empty.
#[derive(Error, Debug)]
#[error("missing environment variable: {0}")]
pub struct MissingVar(pub String);

/// Environment variable reader.
///
/// Wraps lookups so that production code hits `std::env` while tests
/// can supply a controlled set of values.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Look up a variable, treating absent and empty identically.
    pub fn get(&self, name: &str) -> Option<String> {
        self.var(name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Look up a variable that must be present and non-empty.
    pub fn require(&self, name: &str) -> Result<String, MissingVar> {
        self.get(name).ok_or_else(|| MissingVar(name.to_string()))
    }

    /// Returns `true` if the variable is present (non-empty).
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Interpret a variable as a boolean toggle (`true`/`1`/`yes`/`on`).
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.get(name).map(|v| v.to_lowercase()).as_deref(),
            Some("true" | "1" | "yes" | "on")
        )
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
