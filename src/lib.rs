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

//! # Infix - dynamically-typed infix expression evaluation
//!
//! Infix compiles expression strings into immutable evaluation trees and
//! evaluates them against caller-supplied parameters and functions.
//! Expressions mix arithmetic, boolean, comparison, bitwise, ternary,
//! regex, membership, and function/accessor operations over numbers,
//! booleans, strings, timestamps, regex patterns, and arrays.
//!
//! ## Key Features
//!
//! - **Compile once, evaluate many** - the planned tree is immutable and
//!   `Send + Sync`
//! - **Short-circuit semantics** - `&&`, `||`, `??`, and both ternary halves
//!   skip their right subtree, errors included
//! - **Constant folding** - constant regex operands of `=~`/`!~` compile at
//!   plan time
//! - **Timestamp literals** - quoted strings that parse under the accepted
//!   formats become instants
//! - **Caller-defined functions and accessors** - names resolve through a
//!   registry at lex time; dotted paths resolve through a capability on the
//!   parameter source
//!
//! ## Quick Start
//!
//! ```rust
//! use infix::{evaluate, Expression, MapParameters, Value};
//!
//! // one-shot
//! assert_eq!(evaluate("(2 + 2) * 3").unwrap(), Value::Number(12.0));
//!
//! // compile once, evaluate many
//! let expr = Expression::new("score > 0 ? score : -score").unwrap();
//! let mut params = MapParameters::new();
//! params.insert("score", -5);
//! assert_eq!(expr.evaluate(&params).unwrap(), Value::Number(5.0));
//! ```
//!
//! ## Modules
//!
//! - [`core`] - [`Value`] domain and [`Error`] types
//! - [`parser`] - lexer, token model, and the legal-transition state machine
//! - [`planner`] - balance check, regex precompile, tree construction
//! - [`executor`] - evaluation stages, operators, and the tree walker
//! - [`params`] - [`Parameters`] trait and [`MapParameters`]
//! - [`functions`] - the [`Functions`] registry

pub mod core;
pub mod executor;
pub mod expression;
pub mod functions;
pub mod params;
pub mod parser;
pub mod planner;

// Re-export main types for convenience
pub use crate::core::{Error, Result, Value, ValueKind};
pub use expression::Expression;
pub use functions::{ExpressionFunction, Functions};
pub use params::{MapParameters, Parameters};
pub use parser::{Token, TokenKind};

/// Compile and evaluate an expression with no parameters or functions
pub fn evaluate(input: &str) -> Result<Value> {
    Expression::new(input)?.evaluate(&MapParameters::new())
}

/// Compile and evaluate an expression against a parameter source
pub fn evaluate_with(input: &str, params: &dyn Parameters) -> Result<Value> {
    Expression::new(input)?.evaluate(params)
}
