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

//! Compiled expressions
//!
//! [`Expression`] pairs the lexed token list with the planned evaluation
//! tree. Compile once, evaluate as often as needed; the tree is immutable
//! and may be shared across threads as long as the parameter source and
//! registered functions are thread-safe themselves.

use std::fmt;

use crate::core::{Result, Value};
use crate::executor::{evaluate, Stage};
use crate::functions::Functions;
use crate::params::Parameters;
use crate::parser::{lex, Token, TokenKind, TokenValue};
use crate::planner::plan;

/// A parsed and planned expression
pub struct Expression {
    input: String,
    tokens: Vec<Token>,
    root: Stage,
}

impl Expression {
    /// Compile an expression with no functions available
    pub fn new(input: &str) -> Result<Self> {
        Self::with_functions(input, &Functions::default())
    }

    /// Compile an expression against a function registry
    ///
    /// Function names resolve during lexing; the registry is not needed
    /// again at evaluation time.
    pub fn with_functions(input: &str, functions: &Functions) -> Result<Self> {
        let tokens = lex(input, functions)?;
        let root = plan(tokens.clone())?;
        Ok(Self {
            input: input.to_string(),
            tokens,
            root,
        })
    }

    /// Evaluate against a parameter source
    pub fn evaluate(&self, params: &dyn Parameters) -> Result<Value> {
        evaluate(&self.root, params)
    }

    /// The original expression source
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The lexed token list
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Names of the variables the expression references, deduplicated, in
    /// order of first appearance
    pub fn vars(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for token in &self.tokens {
            if token.kind != TokenKind::Variable {
                continue;
            }
            if let TokenValue::Ident(name) = &token.value {
                if !names.iter().any(|seen| seen == name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.input)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MapParameters;

    #[test]
    fn test_compile_and_reuse() {
        let expr = Expression::new("a + 1").unwrap();

        let mut params = MapParameters::new();
        params.insert("a", 1);
        assert_eq!(expr.evaluate(&params).unwrap(), Value::Number(2.0));

        params.insert("a", 41);
        assert_eq!(expr.evaluate(&params).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_display_round_trips_input() {
        let source = "(2 + 2) * 3";
        let expr = Expression::new(source).unwrap();
        assert_eq!(expr.to_string(), source);
        assert_eq!(expr.input(), source);
    }

    #[test]
    fn test_vars_dedup_in_order() {
        let expr = Expression::new("b + a + b + c").unwrap();
        assert_eq!(expr.vars(), vec!["b", "a", "c"]);

        // accessors and functions are not variables
        let expr = Expression::new("user.Name + b").unwrap();
        assert_eq!(expr.vars(), vec!["b"]);
    }

    #[test]
    fn test_shared_across_threads() {
        let expr = std::sync::Arc::new(Expression::new("n * 2").unwrap());
        let mut handles = Vec::new();
        for i in 0..4 {
            let expr = expr.clone();
            handles.push(std::thread::spawn(move || {
                let mut params = MapParameters::new();
                params.insert("n", i);
                expr.evaluate(&params).unwrap()
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Value::Number(i as f64 * 2.0));
        }
    }
}
