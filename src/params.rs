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

//! Parameter resolution
//!
//! Expressions see variables through the [`Parameters`] trait. The numeric
//! coercion rule is enforced structurally: anything turned into a [`Value`]
//! widens to a double on the way in, so the evaluator never sees a foreign
//! numeric width.

use std::collections::HashMap;

use rustc_hash::FxHashMap;

use crate::core::{Error, Result, Value};

/// Named-value source consulted during evaluation
pub trait Parameters {
    /// Get the parameter of the given name
    fn get(&self, name: &str) -> Result<Value>;

    /// Resolve a dotted accessor path
    ///
    /// `path` is the full path, head first; the head names a parameter and
    /// the remaining segments walk fields or invoke methods on whatever
    /// runtime representation the implementation holds. `args` carries the
    /// evaluated argument list of an accessor invocation: `None` for a bare
    /// access, `Some` for a call (empty for `()`).
    ///
    /// The default implementation refuses, for sources that hold plain
    /// values only.
    fn resolve_path(&self, path: &[String], args: Option<&[Value]>) -> Result<Value> {
        let _ = args;
        Err(Error::AccessorFailed {
            path: path.join("."),
            cause: "parameter source does not support accessors".to_string(),
        })
    }
}

/// Map-backed parameter source
///
/// `insert` accepts anything convertible into a [`Value`], which is where
/// the numeric widening happens:
///
/// ```
/// use infix::{MapParameters, Parameters, Value};
///
/// let mut params = MapParameters::new();
/// params.insert("count", 7u8).insert("label", "x");
/// assert_eq!(params.get("count").unwrap(), Value::Number(7.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapParameters {
    entries: FxHashMap<String, Value>,
}

impl MapParameters {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name, replacing any previous binding
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no names are bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Parameters for MapParameters {
    fn get(&self, name: &str) -> Result<Value> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }
}

impl<S: std::hash::BuildHasher> Parameters for HashMap<String, Value, S> {
    fn get(&self, name: &str) -> Result<Value> {
        HashMap::get(self, name)
            .cloned()
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }
}
