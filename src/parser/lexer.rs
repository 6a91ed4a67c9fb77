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
//! Classifies tokens by their leading character class and consumes each
//! class under its own predicate:
//!
//! - digits and `.` start numerics (with `0x` hex escape)
//! - `'` and `"` start string literals, which become TIME tokens when the
//!   payload parses as a timestamp
//! - `[` starts a bracketed variable that may contain spaces
//! - letters start identifiers: booleans, the textual `in` comparator,
//!   registered functions, dotted accessors, or plain variables
//! - everything else is a symbolic run resolved against the operator tables
//!
//! After each token the legal-transition state machine is consulted; a
//! disallowed successor is a lex error.

use super::state::{state_for, LexerState, INITIAL_STATE};
use super::stream::CharStream;
use super::token::{
    comparator_symbol, logical_symbol, modifier_symbol, prefix_symbol, ternary_symbol, Token,
    TokenKind,
};
use crate::core::{parse_timestamp, Error, Result, Value};
use crate::functions::Functions;

/// Tokenize an expression against a function registry
///
/// Function names resolve here, once; the resolved callable is stored in
/// the token.
pub fn lex(input: &str, functions: &Functions) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input, functions);
    lexer.run()
}

/// Expression lexer over a character stream
struct Lexer<'a> {
    stream: CharStream,
    functions: &'a Functions,
}

impl<'a> Lexer<'a> {
    fn new(input: &str, functions: &'a Functions) -> Self {
        Self {
            stream: CharStream::new(input),
            functions,
        }
    }

    /// Lex the whole input, enforcing the state machine between tokens
    fn run(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut state: &LexerState = &INITIAL_STATE;

        while self.stream.can_read() {
            let token = match self.read_token(state)? {
                Some(token) => token,
                None => break,
            };

            if !state.can_transition_to(token.kind) {
                return Err(Error::InvalidSequence {
                    previous: state.kind.to_string(),
                    next: token.kind.to_string(),
                });
            }

            state = state_for(token.kind);
            tokens.push(token);
        }

        if !tokens.is_empty() && !state.is_eof {
            return Err(Error::UnexpectedEnd);
        }
        Ok(tokens)
    }

    /// Read one token, or `None` when only whitespace remains
    fn read_token(&mut self, state: &LexerState) -> Result<Option<Token>> {
        while self.stream.can_read() {
            let character = self.stream.read();

            if character.is_whitespace() {
                continue;
            }

            // numeric constant, possibly hex
            if is_numeric(character) {
                if character == '0' && self.stream.can_read() {
                    let next = self.stream.read();
                    if next == 'x' && self.stream.can_read() {
                        let (digits, _) = self.read_until_false(false, true, is_hex_digit);
                        let parsed = u64::from_str_radix(&digits, 16)
                            .map_err(|_| Error::InvalidHex(digits.clone()))?;
                        return Ok(Some(Token::literal(
                            TokenKind::Numeric,
                            Value::Number(parsed as f64),
                        )));
                    }
                    self.stream.rewind(1);
                }

                let digits = self.read_token_until_false(is_numeric);
                let parsed: f64 = digits
                    .parse()
                    .map_err(|_| Error::InvalidNumeric(digits.clone()))?;
                return Ok(Some(Token::literal(
                    TokenKind::Numeric,
                    Value::Number(parsed),
                )));
            }

            // argument separator
            if character == ',' {
                return Ok(Some(Token::symbol(TokenKind::Separator, ",")));
            }

            // bracketed variable; permits spaces
            if character == '[' {
                let (name, completed) = self.read_until_false(true, false, |c| c != ']');
                if !completed {
                    return Err(Error::UnclosedBracket);
                }
                // the terminator was left in place; skip past it
                self.stream.rewind(-1);
                return Ok(Some(Token::variable(name)));
            }

            // identifier: variable, boolean, textual comparator, function,
            // or accessor
            if character.is_alphabetic() {
                return self.read_identifier().map(Some);
            }

            // string literal, possibly a timestamp
            if character == '\'' || character == '"' {
                let (payload, completed) = self.read_until_false(true, false, |c| c != character);
                if !completed {
                    return Err(Error::UnclosedString);
                }
                self.stream.rewind(-1);

                let token = match parse_timestamp(&payload) {
                    Some(instant) => {
                        Token::literal(TokenKind::Time, Value::Timestamp(instant))
                    }
                    None => Token::literal(TokenKind::String, Value::text(payload)),
                };
                return Ok(Some(token));
            }

            if character == '(' {
                return Ok(Some(Token::symbol(TokenKind::Clause, "(")));
            }
            if character == ')' {
                return Ok(Some(Token::symbol(TokenKind::ClauseClose, ")")));
            }

            // must be a known symbol
            let symbol = self.read_token_until_false(is_not_alphanumeric);

            // a leading '-' means negation only where a prefix may appear
            if state.can_transition_to(TokenKind::Prefix) {
                if prefix_symbol(&symbol).is_some() {
                    return Ok(Some(Token::symbol(TokenKind::Prefix, symbol)));
                }
            }
            if modifier_symbol(&symbol).is_some() {
                return Ok(Some(Token::symbol(TokenKind::Modifier, symbol)));
            }
            if logical_symbol(&symbol).is_some() {
                return Ok(Some(Token::symbol(TokenKind::LogicalOp, symbol)));
            }
            if comparator_symbol(&symbol).is_some() {
                return Ok(Some(Token::symbol(TokenKind::Comparator, symbol)));
            }
            if ternary_symbol(&symbol).is_some() {
                return Ok(Some(Token::symbol(TokenKind::Ternary, symbol)));
            }

            return Err(Error::InvalidToken(symbol));
        }

        Ok(None)
    }

    /// Read an identifier-led token and classify it
    fn read_identifier(&mut self) -> Result<Token> {
        let text = self.read_token_until_false(is_variable_name);

        // dotted path: accessor, which overrides every other reading
        if let Some(dot) = text.find('.') {
            if dot > 0 {
                if text.ends_with('.') {
                    return Err(Error::HangingAccessor(text));
                }

                let segments: Vec<String> = text.split('.').map(str::to_string).collect();

                // every segment after the head must be an exported member
                for segment in &segments[1..] {
                    if let Some(first) = segment.chars().next() {
                        if first.to_uppercase().next() != Some(first) {
                            return Err(Error::UnexportedField {
                                field: segment.clone(),
                                token: text.clone(),
                            });
                        }
                    }
                }

                return Ok(Token::accessor(segments));
            }
        }

        let token = match text.as_str() {
            "true" => Token::literal(TokenKind::Boolean, Value::Bool(true)),
            "false" => Token::literal(TokenKind::Boolean, Value::Bool(false)),
            // forced lower case for consistency
            "in" | "IN" => Token::symbol(TokenKind::Comparator, "in"),
            _ => Token::variable(text.clone()),
        };

        // a registered function wins over any of the above
        if let Some(function) = self.functions.get(&text) {
            return Ok(Token::function(text, function.clone()));
        }

        Ok(token)
    }

    /// Re-include the dispatch character, then read while `condition` holds
    fn read_token_until_false(&mut self, condition: impl Fn(char) -> bool) -> String {
        self.stream.rewind(1);
        let (text, _) = self.read_until_false(false, true, condition);
        text
    }

    /// Read until `condition` is false or whitespace breaks the run
    ///
    /// `\` escapes the next code point, which is taken literally whatever it
    /// is. Returns the text plus whether a terminator was actually seen;
    /// false means the stream ran out first. On a condition stop the
    /// terminating character is left in the stream.
    fn read_until_false(
        &mut self,
        include_whitespace: bool,
        break_whitespace: bool,
        condition: impl Fn(char) -> bool,
    ) -> (String, bool) {
        let mut buffer = String::new();
        let mut conditioned = false;

        while self.stream.can_read() {
            let character = self.stream.read();

            if character == '\\' {
                if self.stream.can_read() {
                    buffer.push(self.stream.read());
                }
                continue;
            }

            if character.is_whitespace() {
                if break_whitespace && !buffer.is_empty() {
                    conditioned = true;
                    break;
                }
                if !include_whitespace {
                    continue;
                }
            }

            if condition(character) {
                buffer.push(character);
            } else {
                conditioned = true;
                self.stream.rewind(1);
                break;
            }
        }

        (buffer, conditioned)
    }
}

fn is_numeric(character: char) -> bool {
    character.is_ascii_digit() || character == '.'
}

fn is_hex_digit(character: char) -> bool {
    character.is_ascii_hexdigit()
}

fn is_variable_name(character: char) -> bool {
    character.is_alphanumeric() || character == '_' || character == '.'
}

fn is_not_alphanumeric(character: char) -> bool {
    !(character.is_alphanumeric()
        || character == '('
        || character == ')'
        || character == '['
        || character == ']'
        || character == '\''
        || character == '"')
}
