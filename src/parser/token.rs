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

//! Token types for the expression lexer
//!
//! This module defines token kinds, token payloads, and the process-wide
//! operator symbol tables. The tables are populated once behind `LazyLock`
//! and are read-only afterwards.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::core::Value;
use crate::executor::stage::OperatorSymbol;
use crate::functions::ExpressionFunction;

/// TokenKind classifies a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Placeholder before classification
    Unknown,
    /// Unary prefix operator (`-`, `!`, `~`)
    Prefix,
    /// Numeric literal
    Numeric,
    /// Boolean literal
    Boolean,
    /// String literal
    String,
    /// Precompiled regex pattern
    Pattern,
    /// Timestamp literal (string literal that parsed as a time)
    Time,
    /// Variable reference
    Variable,
    /// Registered function reference
    Function,
    /// Argument separator `,`
    Separator,
    /// Comparison operator
    Comparator,
    /// Logical operator (`&&`, `||`)
    LogicalOp,
    /// Arithmetic/bitwise modifier
    Modifier,
    /// Open parenthesis
    Clause,
    /// Close parenthesis
    ClauseClose,
    /// Ternary/coalesce operator (`?`, `:`, `??`)
    Ternary,
    /// Dotted accessor path
    Accessor,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Prefix => "PREFIX",
            TokenKind::Numeric => "NUMERIC",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::String => "STRING",
            TokenKind::Pattern => "PATTERN",
            TokenKind::Time => "TIME",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Function => "FUNCTION",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Comparator => "COMPARATOR",
            TokenKind::LogicalOp => "LOGICALOP",
            TokenKind::Modifier => "MODIFIER",
            TokenKind::Clause => "CLAUSE",
            TokenKind::ClauseClose => "CLAUSE_CLOSE",
            TokenKind::Ternary => "TERNARY",
            TokenKind::Accessor => "ACCESSOR",
        };
        write!(f, "{}", name)
    }
}

/// Payload carried by a token
#[derive(Clone)]
pub enum TokenValue {
    /// Literal value (numeric, boolean, string, time, pattern)
    Literal(Value),
    /// Operator or punctuation spelling
    Symbol(String),
    /// Variable name
    Ident(String),
    /// Accessor path; non-empty, head first
    Path(Vec<String>),
    /// Function name plus the callable resolved at lex time
    Func(String, ExpressionFunction),
}

impl fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            TokenValue::Symbol(s) => f.debug_tuple("Symbol").field(s).finish(),
            TokenValue::Ident(s) => f.debug_tuple("Ident").field(s).finish(),
            TokenValue::Path(p) => f.debug_tuple("Path").field(p).finish(),
            TokenValue::Func(name, _) => f.debug_tuple("Func").field(name).finish(),
        }
    }
}

/// Functions compare by name; the callable itself has no identity
impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::Literal(a), TokenValue::Literal(b)) => a == b,
            (TokenValue::Symbol(a), TokenValue::Symbol(b)) => a == b,
            (TokenValue::Ident(a), TokenValue::Ident(b)) => a == b,
            (TokenValue::Path(a), TokenValue::Path(b)) => a == b,
            (TokenValue::Func(a, _), TokenValue::Func(b, _)) => a == b,
            _ => false,
        }
    }
}

/// A lexed token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Classification of the token
    pub kind: TokenKind,
    /// Payload
    pub value: TokenValue,
}

impl Token {
    /// Create a literal-valued token
    pub fn literal(kind: TokenKind, value: Value) -> Self {
        Self {
            kind,
            value: TokenValue::Literal(value),
        }
    }

    /// Create an operator/punctuation token
    pub fn symbol(kind: TokenKind, symbol: impl Into<String>) -> Self {
        Self {
            kind,
            value: TokenValue::Symbol(symbol.into()),
        }
    }

    /// Create a variable token
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Variable,
            value: TokenValue::Ident(name.into()),
        }
    }

    /// Create an accessor token
    pub fn accessor(path: Vec<String>) -> Self {
        Self {
            kind: TokenKind::Accessor,
            value: TokenValue::Path(path),
        }
    }

    /// Create a function token carrying its resolved callable
    pub fn function(name: impl Into<String>, function: ExpressionFunction) -> Self {
        Self {
            kind: TokenKind::Function,
            value: TokenValue::Func(name.into(), function),
        }
    }

    /// The operator spelling, for operator-kind tokens
    pub fn symbol_str(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// The literal payload, for literal-kind tokens
    pub fn literal_value(&self) -> Option<&Value> {
        match &self.value {
            TokenValue::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true if this token is the given operator
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.symbol_str() == Some(symbol)
    }
}

// =============================================================================
// Operator symbol tables
// =============================================================================

/// Unary prefix operators
static PREFIX_SYMBOLS: LazyLock<FxHashMap<&'static str, OperatorSymbol>> = LazyLock::new(|| {
    FxHashMap::from_iter([
        ("-", OperatorSymbol::Negate),
        ("!", OperatorSymbol::Invert),
        ("~", OperatorSymbol::BitwiseNot),
    ])
});

/// Binary arithmetic, bitwise, and shift operators
static MODIFIER_SYMBOLS: LazyLock<FxHashMap<&'static str, OperatorSymbol>> = LazyLock::new(|| {
    FxHashMap::from_iter([
        ("+", OperatorSymbol::Add),
        ("-", OperatorSymbol::Subtract),
        ("*", OperatorSymbol::Multiply),
        ("/", OperatorSymbol::Divide),
        ("%", OperatorSymbol::Modulus),
        ("**", OperatorSymbol::Exponent),
        ("&", OperatorSymbol::BitwiseAnd),
        ("|", OperatorSymbol::BitwiseOr),
        ("^", OperatorSymbol::BitwiseXor),
        ("<<", OperatorSymbol::LeftShift),
        (">>", OperatorSymbol::RightShift),
    ])
});

/// Short-circuiting logical operators
static LOGICAL_SYMBOLS: LazyLock<FxHashMap<&'static str, OperatorSymbol>> = LazyLock::new(|| {
    FxHashMap::from_iter([
        ("&&", OperatorSymbol::And),
        ("||", OperatorSymbol::Or),
    ])
});

/// Comparison operators, including regex match and membership
static COMPARATOR_SYMBOLS: LazyLock<FxHashMap<&'static str, OperatorSymbol>> =
    LazyLock::new(|| {
        FxHashMap::from_iter([
            ("==", OperatorSymbol::Eq),
            ("!=", OperatorSymbol::Neq),
            (">", OperatorSymbol::Gt),
            (">=", OperatorSymbol::Gte),
            ("<", OperatorSymbol::Lt),
            ("<=", OperatorSymbol::Lte),
            ("=~", OperatorSymbol::RegexMatch),
            ("!~", OperatorSymbol::NotRegexMatch),
            ("in", OperatorSymbol::In),
        ])
    });

/// Ternary branch and coalesce operators
static TERNARY_SYMBOLS: LazyLock<FxHashMap<&'static str, OperatorSymbol>> = LazyLock::new(|| {
    FxHashMap::from_iter([
        ("?", OperatorSymbol::TernaryTrue),
        (":", OperatorSymbol::TernaryFalse),
        ("??", OperatorSymbol::Coalesce),
    ])
});

/// Resolve a prefix operator spelling
pub fn prefix_symbol(s: &str) -> Option<OperatorSymbol> {
    PREFIX_SYMBOLS.get(s).copied()
}

/// Resolve a modifier operator spelling
pub fn modifier_symbol(s: &str) -> Option<OperatorSymbol> {
    MODIFIER_SYMBOLS.get(s).copied()
}

/// Resolve a logical operator spelling
pub fn logical_symbol(s: &str) -> Option<OperatorSymbol> {
    LOGICAL_SYMBOLS.get(s).copied()
}

/// Resolve a comparator spelling
pub fn comparator_symbol(s: &str) -> Option<OperatorSymbol> {
    COMPARATOR_SYMBOLS.get(s).copied()
}

/// Resolve a ternary/coalesce spelling
pub fn ternary_symbol(s: &str) -> Option<OperatorSymbol> {
    TERNARY_SYMBOLS.get(s).copied()
}
