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

//! Expression planner
//!
//! Turns the flat token list into an evaluation tree in three passes:
//! a parenthesis balance check, a regex precompile pass that rewrites
//! constant right-hand regex operands into compiled patterns, and a
//! recursive descent by precedence band. The lowest band sits at the root
//! so evaluation short-circuits at the outermost operator.
//!
//! Bands, loosest binding first (left-associative unless noted):
//! separator, ternary/coalesce (ternary nests right), logical or, logical
//! and, bitwise or, bitwise xor, bitwise and, equality, relational, shift,
//! additive, multiplicative, exponent (right-associative), prefix, primary.

use regex::Regex;

use crate::core::{Error, Result, Value};
use crate::executor::ops::{
    accessor_stage, binary_stage, function_stage, literal_stage, parameter_stage, prefix_stage,
};
use crate::executor::{OperatorSymbol, Stage};
use crate::parser::token::{
    comparator_symbol, logical_symbol, modifier_symbol, prefix_symbol, ternary_symbol, Token,
    TokenValue,
};
use crate::parser::TokenKind;

/// Plan a token list into an evaluation tree
pub fn plan(tokens: Vec<Token>) -> Result<Stage> {
    check_balance(&tokens)?;
    let tokens = precompile_patterns(tokens)?;

    let mut stream = TokenStream::new(tokens);
    match plan_separator(&mut stream)? {
        Some(root) => match stream.peek() {
            // the state machine admits some token runs the grammar cannot
            // use, e.g. an operand right after a closing clause
            Some(extra) => Err(Error::UnexpectedToken(extra.kind.to_string())),
            None => Ok(root),
        },
        None => Err(Error::UnexpectedEnd),
    }
}

/// Every open clause must pair with a later close at nesting depth >= 1
fn check_balance(tokens: &[Token]) -> Result<()> {
    let mut depth = 0i64;
    for token in tokens {
        match token.kind {
            TokenKind::Clause => depth += 1,
            TokenKind::ClauseClose => {
                depth -= 1;
                if depth < 0 {
                    return Err(Error::UnbalancedParenthesis);
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::UnbalancedParenthesis);
    }
    Ok(())
}

/// Rewrite the constant right-hand operand of `=~`/`!~` into a compiled
/// pattern; dynamic operands stay strings and compile at evaluation time
fn precompile_patterns(mut tokens: Vec<Token>) -> Result<Vec<Token>> {
    for index in 0..tokens.len() {
        if tokens[index].kind != TokenKind::Comparator {
            continue;
        }
        if !matches!(tokens[index].symbol_str(), Some("=~") | Some("!~")) {
            continue;
        }

        let constant = match tokens.get(index + 1) {
            Some(next) if next.kind == TokenKind::String => match &next.value {
                TokenValue::Literal(Value::Text(text)) => Some(text.to_string()),
                _ => None,
            },
            _ => None,
        };

        if let Some(pattern) = constant {
            let compiled = Regex::new(&pattern).map_err(|e| Error::RegexCompile {
                pattern: pattern.clone(),
                cause: e.to_string(),
            })?;
            tokens[index + 1] = Token::literal(TokenKind::Pattern, Value::pattern(compiled));
        }
    }
    Ok(tokens)
}

/// Scratch cursor over the token list during planning
struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenStream {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn rewind(&mut self) {
        self.index -= 1;
    }
}

/// The operator symbol a token resolves to during planning, if any
fn resolve_operator(token: &Token) -> Option<OperatorSymbol> {
    match token.kind {
        TokenKind::Separator => Some(OperatorSymbol::Separate),
        TokenKind::Modifier => modifier_symbol(token.symbol_str()?),
        TokenKind::Comparator => comparator_symbol(token.symbol_str()?),
        TokenKind::LogicalOp => logical_symbol(token.symbol_str()?),
        TokenKind::Ternary => ternary_symbol(token.symbol_str()?),
        _ => None,
    }
}

type BandPlanner = fn(&mut TokenStream) -> Result<Option<Stage>>;

/// Left-fold one precedence band over its next-tighter band
fn plan_band(
    stream: &mut TokenStream,
    accepts: &[OperatorSymbol],
    next: BandPlanner,
) -> Result<Option<Stage>> {
    let mut left = match next(stream)? {
        Some(stage) => stage,
        None => return Ok(None),
    };

    while let Some(token) = stream.peek() {
        let symbol = match resolve_operator(token) {
            Some(symbol) if accepts.contains(&symbol) => symbol,
            _ => break,
        };
        stream.next();

        let right = match next(stream)? {
            Some(stage) => stage,
            None => return Err(Error::UnexpectedEnd),
        };
        left = binary_stage(symbol, left, right);
    }

    Ok(Some(left))
}

fn plan_separator(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(stream, &[OperatorSymbol::Separate], plan_ternary)
}

/// Ternary band: `?` and `??` fold left, while `:` recurses back into this
/// band so chained ternaries nest to the right and both branches keep their
/// short-circuit shape
fn plan_ternary(stream: &mut TokenStream) -> Result<Option<Stage>> {
    let mut left = match plan_logical_or(stream)? {
        Some(stage) => stage,
        None => return Ok(None),
    };

    while let Some(token) = stream.peek() {
        let symbol = match resolve_operator(token) {
            Some(symbol) => symbol,
            None => break,
        };
        match symbol {
            OperatorSymbol::TernaryTrue | OperatorSymbol::Coalesce => {
                stream.next();
                let right = match plan_logical_or(stream)? {
                    Some(stage) => stage,
                    None => return Err(Error::UnexpectedEnd),
                };
                left = binary_stage(symbol, left, right);
            }
            OperatorSymbol::TernaryFalse => {
                stream.next();
                let right = match plan_ternary(stream)? {
                    Some(stage) => stage,
                    None => return Err(Error::UnexpectedEnd),
                };
                left = binary_stage(symbol, left, right);
            }
            _ => break,
        }
    }

    Ok(Some(left))
}

fn plan_logical_or(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(stream, &[OperatorSymbol::Or], plan_logical_and)
}

fn plan_logical_and(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(stream, &[OperatorSymbol::And], plan_bitwise_or)
}

fn plan_bitwise_or(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(stream, &[OperatorSymbol::BitwiseOr], plan_bitwise_xor)
}

fn plan_bitwise_xor(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(stream, &[OperatorSymbol::BitwiseXor], plan_bitwise_and)
}

fn plan_bitwise_and(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(stream, &[OperatorSymbol::BitwiseAnd], plan_equality)
}

fn plan_equality(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(
        stream,
        &[OperatorSymbol::Eq, OperatorSymbol::Neq],
        plan_relational,
    )
}

fn plan_relational(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(
        stream,
        &[
            OperatorSymbol::Gt,
            OperatorSymbol::Gte,
            OperatorSymbol::Lt,
            OperatorSymbol::Lte,
            OperatorSymbol::RegexMatch,
            OperatorSymbol::NotRegexMatch,
            OperatorSymbol::In,
        ],
        plan_shift,
    )
}

fn plan_shift(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(
        stream,
        &[OperatorSymbol::LeftShift, OperatorSymbol::RightShift],
        plan_additive,
    )
}

fn plan_additive(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(
        stream,
        &[OperatorSymbol::Add, OperatorSymbol::Subtract],
        plan_multiplicative,
    )
}

fn plan_multiplicative(stream: &mut TokenStream) -> Result<Option<Stage>> {
    plan_band(
        stream,
        &[
            OperatorSymbol::Multiply,
            OperatorSymbol::Divide,
            OperatorSymbol::Modulus,
        ],
        plan_exponent,
    )
}

/// Exponentiation associates right: `2 ** 3 ** 2` is `2 ** (3 ** 2)`
fn plan_exponent(stream: &mut TokenStream) -> Result<Option<Stage>> {
    let left = match plan_prefix(stream)? {
        Some(stage) => stage,
        None => return Ok(None),
    };

    if let Some(token) = stream.peek() {
        if resolve_operator(token) == Some(OperatorSymbol::Exponent) {
            stream.next();
            let right = match plan_exponent(stream)? {
                Some(stage) => stage,
                None => return Err(Error::UnexpectedEnd),
            };
            return Ok(Some(binary_stage(OperatorSymbol::Exponent, left, right)));
        }
    }

    Ok(Some(left))
}

fn plan_prefix(stream: &mut TokenStream) -> Result<Option<Stage>> {
    if let Some(token) = stream.peek() {
        if token.kind == TokenKind::Prefix {
            let symbol = token.symbol_str().and_then(prefix_symbol);
            if let Some(symbol) = symbol {
                stream.next();
                let right = match plan_prefix(stream)? {
                    Some(stage) => stage,
                    None => return Err(Error::UnexpectedEnd),
                };
                return Ok(Some(prefix_stage(symbol, right)));
            }
        }
    }
    plan_primary(stream)
}

/// Literals, variables, parenthesized subexpressions, function application,
/// and accessor invocation
fn plan_primary(stream: &mut TokenStream) -> Result<Option<Stage>> {
    let token = match stream.next() {
        Some(token) => token,
        None => return Ok(None),
    };

    match token.kind {
        TokenKind::Numeric
        | TokenKind::Boolean
        | TokenKind::String
        | TokenKind::Time
        | TokenKind::Pattern => match token.value {
            TokenValue::Literal(value) => Ok(Some(literal_stage(value))),
            _ => Err(Error::UnexpectedEnd),
        },

        TokenKind::Variable => match token.value {
            TokenValue::Ident(name) => Ok(Some(parameter_stage(name))),
            _ => Err(Error::UnexpectedEnd),
        },

        TokenKind::Function => {
            let function = match token.value {
                TokenValue::Func(_, function) => function,
                _ => return Err(Error::UnexpectedEnd),
            };
            // the state machine guarantees an open clause follows
            match stream.next() {
                Some(open) if open.kind == TokenKind::Clause => {}
                _ => return Err(Error::UnexpectedEnd),
            }
            let arguments = plan_separator(stream)?;
            expect_clause_close(stream)?;
            Ok(Some(function_stage(function, arguments)))
        }

        TokenKind::Accessor => {
            let path = match token.value {
                TokenValue::Path(path) => path,
                _ => return Err(Error::UnexpectedEnd),
            };
            // an optional parenthesized argument expression makes this an
            // invocation rather than a bare access
            let arguments = match stream.peek() {
                Some(next) if next.kind == TokenKind::Clause => {
                    stream.next();
                    let arguments = plan_separator(stream)?;
                    expect_clause_close(stream)?;
                    arguments
                }
                _ => None,
            };
            Ok(Some(accessor_stage(path, arguments)))
        }

        TokenKind::Clause => {
            let inner = plan_separator(stream)?;
            expect_clause_close(stream)?;
            Ok(inner)
        }

        TokenKind::ClauseClose => {
            stream.rewind();
            Ok(None)
        }

        _ => Err(Error::UnexpectedEnd),
    }
}

fn expect_clause_close(stream: &mut TokenStream) -> Result<()> {
    match stream.next() {
        Some(token) if token.kind == TokenKind::ClauseClose => Ok(()),
        _ => Err(Error::UnbalancedParenthesis),
    }
}
