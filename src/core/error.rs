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

//! Error types for infix
//!
//! All failures are values returned synchronously; nothing is reported
//! through in-band sentinel values.

use thiserror::Error;

/// Result type alias for infix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type covering lexing, planning, and evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Lex errors
    // =========================================================================
    /// Symbol run that matches no operator table
    #[error("invalid token: '{0}'")]
    InvalidToken(String),

    /// String literal with no terminating quote
    #[error("unclosed string literal")]
    UnclosedString,

    /// Bracketed parameter with no terminating ']'
    #[error("unclosed parameter bracket")]
    UnclosedBracket,

    /// Numeric literal that does not parse as a number
    #[error("unable to parse numeric value '{0}'")]
    InvalidNumeric(String),

    /// Hex literal that does not parse as a 64-bit unsigned integer
    #[error("unable to parse hex value '{0}'")]
    InvalidHex(String),

    /// Accessor ending in a period
    #[error("hanging accessor on token '{0}'")]
    HangingAccessor(String),

    /// Accessor segment after the head that does not start uppercase
    #[error("unable to access unexported field '{field}' in token '{token}'")]
    UnexportedField { field: String, token: String },

    /// Token kind that may not follow the previous token
    #[error("cannot transition from {previous} to {next}")]
    InvalidSequence { previous: String, next: String },

    /// Input ended where the grammar still expects a token
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    // =========================================================================
    // Planner errors
    // =========================================================================
    /// Clause tokens that do not pair up
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,

    /// Constant regex operand that fails to compile
    #[error("unable to compile regexp pattern '{pattern}': {cause}")]
    RegexCompile { pattern: String, cause: String },

    /// Tokens left over after a complete expression
    #[error("unexpected token {0} after expression")]
    UnexpectedToken(String),

    // =========================================================================
    // Type errors
    // =========================================================================
    /// Non-bool operand on a logical operator
    #[error("value '{value}' cannot be used with the logical operator '{symbol}', it is not a bool")]
    LogicalTypeMismatch { value: String, symbol: String },

    /// Non-number operand on an arithmetic or bitwise modifier
    #[error("value '{value}' cannot be used with the modifier '{symbol}', it is not a number")]
    ModifierTypeMismatch { value: String, symbol: String },

    /// Inoperable operand on a comparator
    #[error("value '{value}' cannot be used with the comparator '{symbol}'")]
    ComparatorTypeMismatch { value: String, symbol: String },

    /// Non-bool condition on a ternary operator
    #[error("value '{value}' cannot be used with the ternary operator '{symbol}', it is not a bool")]
    TernaryTypeMismatch { value: String, symbol: String },

    /// Inoperable operand on a unary prefix
    #[error("value '{value}' cannot be used with the prefix '{symbol}'")]
    PrefixTypeMismatch { value: String, symbol: String },

    // =========================================================================
    // Runtime errors
    // =========================================================================
    /// Parameter name with no binding
    #[error("no parameter '{0}' found")]
    UnknownParameter(String),

    /// Accessor walk that faulted (missing member, bad arity, failed call)
    #[error("failed to access '{path}': {cause}")]
    AccessorFailed { path: String, cause: String },

    /// Free-form error raised by a user function or parameter source
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create a free-form error, for use by registered functions and
    /// custom parameter sources
    pub fn message(msg: impl Into<String>) -> Self {
        Error::Message(msg.into())
    }
}

/// Which type-error template a stage reports with
///
/// Stored on every non-leaf stage next to its checks, so a failed check can
/// interpolate the offending value and operator symbol into the right
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    Logical,
    Modifier,
    Comparator,
    Ternary,
    Prefix,
}

impl ErrorFormat {
    /// Build the templated type error for an offending value
    pub fn type_error(self, value: impl ToString, symbol: impl ToString) -> Error {
        let value = value.to_string();
        let symbol = symbol.to_string();
        match self {
            ErrorFormat::Logical => Error::LogicalTypeMismatch { value, symbol },
            ErrorFormat::Modifier => Error::ModifierTypeMismatch { value, symbol },
            ErrorFormat::Comparator => Error::ComparatorTypeMismatch { value, symbol },
            ErrorFormat::Ternary => Error::TernaryTypeMismatch { value, symbol },
            ErrorFormat::Prefix => Error::PrefixTypeMismatch { value, symbol },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        assert_eq!(
            Error::InvalidToken("@@".to_string()).to_string(),
            "invalid token: '@@'"
        );
        assert_eq!(Error::UnclosedString.to_string(), "unclosed string literal");
        assert_eq!(
            Error::UnknownParameter("foo".to_string()).to_string(),
            "no parameter 'foo' found"
        );
    }

    #[test]
    fn test_type_error_templates() {
        let err = ErrorFormat::Modifier.type_error("foo", "+");
        assert_eq!(
            err.to_string(),
            "value 'foo' cannot be used with the modifier '+', it is not a number"
        );

        let err = ErrorFormat::Logical.type_error("1", "&&");
        assert_eq!(
            err.to_string(),
            "value '1' cannot be used with the logical operator '&&', it is not a bool"
        );

        let err = ErrorFormat::Ternary.type_error("x", "?");
        assert_eq!(
            err.to_string(),
            "value 'x' cannot be used with the ternary operator '?', it is not a bool"
        );
    }

    #[test]
    fn test_accessor_error_display() {
        let err = Error::AccessorFailed {
            path: "user.Name".to_string(),
            cause: "no such field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to access 'user.Name': no such field"
        );
    }
}
