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

//! Lexer integration tests
//!
//! Token classification over whole expressions, the legal-transition state
//! machine, and the render/re-lex round trip.

use infix::parser::{lex, Token, TokenKind, TokenValue};
use infix::{Error, Functions, Value};

fn lex_ok(input: &str) -> Vec<Token> {
    lex(input, &Functions::new()).expect(input)
}

/// Render a token back to expression source
fn render(token: &Token) -> String {
    match (&token.kind, &token.value) {
        (TokenKind::String, TokenValue::Literal(Value::Text(s))) => format!("'{}'", s),
        (TokenKind::Time, TokenValue::Literal(Value::Timestamp(t))) => {
            format!("'{}'", t.to_rfc3339())
        }
        (_, TokenValue::Literal(value)) => value.to_string(),
        (_, TokenValue::Symbol(s)) => s.clone(),
        (_, TokenValue::Ident(name)) => format!("[{}]", name),
        (_, TokenValue::Path(path)) => path.join("."),
        (_, TokenValue::Func(name, _)) => name.clone(),
    }
}

/// Tokenizing, rendering, and re-tokenizing yields the same token list
fn assert_round_trip(input: &str) {
    let tokens = lex_ok(input);
    let rendered = tokens
        .iter()
        .map(render)
        .collect::<Vec<_>>()
        .join(" ");
    let relexed = lex_ok(&rendered);
    assert_eq!(tokens, relexed, "round trip failed through: {}", rendered);
}

#[test]
fn test_round_trip_parseability() {
    for input in [
        "1 + 2 * 3",
        "(2 + 2) * 3",
        "a > 0 ? a : -a",
        "x =~ 'pattern' && y != 'other'",
        "v in (1, 2, 3)",
        "[response time] < 100",
        "user.Name == 'Alice'",
        "0x10 << 2",
        "missing ?? 'default'",
        "'2024-01-15T10:30:00Z' == t",
        "!done && count >= 10 % 3",
    ] {
        assert_round_trip(input);
    }
}

#[test]
fn test_whole_expression_kinds() {
    let kinds: Vec<TokenKind> = lex_ok("a.B(1) + [x y] =~ 'p' ? f : 2")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Accessor,
            TokenKind::Clause,
            TokenKind::Numeric,
            TokenKind::ClauseClose,
            TokenKind::Modifier,
            TokenKind::Variable,
            TokenKind::Comparator,
            TokenKind::String,
            TokenKind::Ternary,
            TokenKind::Variable,
            TokenKind::Ternary,
            TokenKind::Numeric,
        ]
    );
}

#[test]
fn test_adjacent_operands_rejected_at_any_depth() {
    for input in ["1 2", "'a' 'b'", "true false", "a (b)"] {
        assert!(
            matches!(
                lex(input, &Functions::new()),
                Err(Error::InvalidSequence { .. })
            ),
            "expected invalid sequence: {}",
            input
        );
    }
}

#[test]
fn test_dangling_operators_rejected() {
    for input in ["1 +", "a &&", "! ", "x ==", "1 ?"] {
        assert_eq!(
            lex(input, &Functions::new()),
            Err(Error::UnexpectedEnd),
            "expected unexpected end: {}",
            input
        );
    }
}

#[test]
fn test_leading_operators_rejected() {
    for input in ["&& a", "* 2", "== 1", ", 1", "?? x"] {
        assert!(
            matches!(
                lex(input, &Functions::new()),
                Err(Error::InvalidSequence { .. })
            ),
            "expected invalid sequence: {}",
            input
        );
    }
}

#[test]
fn test_minus_prefix_vs_modifier() {
    // spec boundary: -x at start is prefix, a - b is subtraction,
    // a - -b subtracts a negation
    let tokens = lex_ok("-x");
    assert_eq!(tokens[0].kind, TokenKind::Prefix);

    let tokens = lex_ok("a - b");
    assert_eq!(tokens[1].kind, TokenKind::Modifier);

    let tokens = lex_ok("a - -b");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Variable,
            TokenKind::Modifier,
            TokenKind::Prefix,
            TokenKind::Variable,
        ]
    );

    // inside a clause the prefix reading returns
    let tokens = lex_ok("(-1)");
    assert_eq!(tokens[1].kind, TokenKind::Prefix);
}

#[test]
fn test_lowercase_accessor_tail_rejected_at_lex_time() {
    assert_eq!(
        lex("a.b", &Functions::new()),
        Err(Error::UnexportedField {
            field: "b".to_string(),
            token: "a.b".to_string(),
        })
    );
    // only the tail is restricted; the head may be anything
    assert!(lex("lower.Upper", &Functions::new()).is_ok());
    // deeper violations are caught too
    assert_eq!(
        lex("a.B.c", &Functions::new()),
        Err(Error::UnexportedField {
            field: "c".to_string(),
            token: "a.B.c".to_string(),
        })
    );
}

#[test]
fn test_function_must_be_called() {
    let mut functions = Functions::new();
    functions.register("f", |_| Ok(Value::Null));

    // a bare function name cannot end the expression
    assert_eq!(lex("f", &functions), Err(Error::UnexpectedEnd));
    // and may only be followed by an open clause
    assert!(matches!(
        lex("f + 1", &functions),
        Err(Error::InvalidSequence { .. })
    ));
    assert!(lex("f(1)", &functions).is_ok());
}

#[test]
fn test_timestamp_token_values() {
    use chrono::{TimeZone, Utc};

    let tokens = lex_ok("'2024-06-01 08:00:00'");
    assert_eq!(
        tokens[0],
        Token::literal(
            TokenKind::Time,
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap())
        )
    );
}

#[test]
fn test_escaped_characters_in_strings_and_brackets() {
    let tokens = lex_ok(r"'a\'b'");
    assert_eq!(tokens[0].literal_value(), Some(&Value::text("a'b")));

    let tokens = lex_ok(r"[weird\]name]");
    assert_eq!(tokens[0], Token::variable("weird]name"));
}
