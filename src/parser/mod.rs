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

//! Expression lexer
//!
//! - [`lex`] - tokenize an expression string against a function registry
//! - [`Token`] / [`TokenKind`] - the token model
//! - [`stream`] - rewindable character cursor
//! - [`state`] - legal-transition state machine

pub mod lexer;
pub mod state;
pub mod stream;
pub mod token;

pub use lexer::lex;
pub use token::{Token, TokenKind, TokenValue};
