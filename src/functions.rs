// Copyright 2025 Infix Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Function registry
//!
//! Expressions may call named functions registered by the caller. A function
//! accepts a variadic sequence of values and returns a value or an error.
//! The lexer resolves names against the registry once, at lex time, and
//! stores the resolved callable in the token, so evaluation never performs a
//! lookup.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::{Result, Value};

/// A registered expression function
///
/// Called with the evaluated argument list: empty for `f()`, one element for
/// `f(x)`, and one element per comma-separated argument otherwise.
pub type ExpressionFunction = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// Named function table consulted during lexing
#[derive(Clone, Default)]
pub struct Functions {
    entries: FxHashMap<String, ExpressionFunction>,
}

impl Functions {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under a name, replacing any previous entry
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(function));
        self
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&ExpressionFunction> {
        self.entries.get(name)
    }

    /// Returns true if a function with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no functions are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Functions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Functions").field("names", &names).finish()
    }
}
