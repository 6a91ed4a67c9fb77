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

//! Core types for infix
//!
//! - [`Value`] - runtime values (number, bool, text, timestamp, pattern, array, null)
//! - [`Error`] / [`Result`] - error types for lexing, planning, and evaluation

pub mod error;
pub mod value;

pub use error::{Error, ErrorFormat, Result};
pub use value::{parse_timestamp, Value, ValueKind};
