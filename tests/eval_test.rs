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

//! End-to-end expression evaluation tests
//!
//! Covers the full pipeline: lex, plan, evaluate. Constant expressions,
//! parameters, functions, and the documented error behaviors.

use infix::{evaluate, evaluate_with, Error, Expression, Functions, MapParameters, Value};

fn eval_const(input: &str) -> Value {
    evaluate(input).expect(input)
}

// Basic arithmetic

#[test]
fn test_constant_arithmetic() {
    assert_eq!(eval_const("(2 + 2) * 3"), Value::Number(12.0));
    assert_eq!(eval_const("1 + 2 * 3"), Value::Number(7.0));
    assert_eq!(eval_const("10 / 4"), Value::Number(2.5));
    assert_eq!(eval_const("7 % 4"), Value::Number(3.0));
    assert_eq!(eval_const("2 ** 10"), Value::Number(1024.0));
    assert_eq!(eval_const("1 - 2 - 3"), Value::Number(-4.0));
    assert_eq!(eval_const("2 ** 3 ** 2"), Value::Number(512.0));
}

#[test]
fn test_prefix_operators() {
    assert_eq!(eval_const("-5"), Value::Number(-5.0));
    assert_eq!(eval_const("- 5"), Value::Number(-5.0));
    assert_eq!(eval_const("!true"), Value::Bool(false));
    assert_eq!(eval_const("~0"), Value::Number(-1.0));
    assert_eq!(eval_const("1 - -1"), Value::Number(2.0));
    assert_eq!(eval_const("-(1 + 2)"), Value::Number(-3.0));
}

#[test]
fn test_hex_literals() {
    assert_eq!(eval_const("0x10 + 1"), Value::Number(17.0));
    assert_eq!(eval_const("0xFF"), Value::Number(255.0));
    // 64-bit unsigned max survives within double precision
    assert_eq!(
        eval_const("0xFFFFFFFFFFFFFFFF"),
        Value::Number(u64::MAX as f64)
    );
}

#[test]
fn test_bitwise_operators() {
    assert_eq!(eval_const("6 & 3"), Value::Number(2.0));
    assert_eq!(eval_const("6 | 1"), Value::Number(7.0));
    assert_eq!(eval_const("6 ^ 3"), Value::Number(5.0));
    assert_eq!(eval_const("1 << 4"), Value::Number(16.0));
    assert_eq!(eval_const("256 >> 4"), Value::Number(16.0));
    // negative operands truncate through signed 64-bit
    assert_eq!(eval_const("-2 & 3"), Value::Number(2.0));
}

#[test]
fn test_bitwise_binds_looser_than_equality() {
    // 1 | 2 == 2 parses as 1 | (2 == 2), which fails the numeric check
    assert!(matches!(
        evaluate("1 | 2 == 2"),
        Err(Error::ModifierTypeMismatch { .. })
    ));
    assert_eq!(eval_const("(1 | 2) == 3"), Value::Bool(true));
}

// Strings

#[test]
fn test_string_concatenation() {
    assert_eq!(eval_const("'foo' + 1"), Value::text("foo1"));
    assert_eq!(eval_const("1 + 'foo'"), Value::text("1foo"));
    assert_eq!(eval_const("'a' + 'b' + 'c'"), Value::text("abc"));
    assert_eq!(eval_const("'yes: ' + true"), Value::text("yes: true"));
    assert_eq!(eval_const("12.5 + 'x'"), Value::text("12.5x"));
}

#[test]
fn test_string_comparison() {
    assert_eq!(eval_const("'abc' < 'abd'"), Value::Bool(true));
    assert_eq!(eval_const("'b' >= 'b'"), Value::Bool(true));
    assert_eq!(eval_const("'z' > 'a'"), Value::Bool(true));
}

#[test]
fn test_mixed_comparison_is_type_error() {
    let err = evaluate("'abc' < 1").unwrap_err();
    assert_eq!(
        err,
        Error::ComparatorTypeMismatch {
            value: "abc".to_string(),
            symbol: "<".to_string(),
        }
    );
}

// Equality

#[test]
fn test_equality() {
    assert_eq!(eval_const("1 == 1"), Value::Bool(true));
    assert_eq!(eval_const("1 != 2"), Value::Bool(true));
    assert_eq!(eval_const("'a' == 'a'"), Value::Bool(true));
    assert_eq!(eval_const("true == true"), Value::Bool(true));
    // equality is structural, never coercing
    assert_eq!(eval_const("'1' == 1"), Value::Bool(false));
    assert_eq!(eval_const("(1, 2) == (1, 2)"), Value::Bool(true));
    assert_eq!(eval_const("(1, 2) != (2, 1)"), Value::Bool(true));
}

#[test]
fn test_timestamp_equality() {
    assert_eq!(
        eval_const("'2024-01-15T10:30:00Z' == '2024-01-15 10:30:00'"),
        Value::Bool(true)
    );
    assert_eq!(
        eval_const("'2024-01-15' != '2024-01-16'"),
        Value::Bool(true)
    );
}

// Logical operators and ternaries

#[test]
fn test_logical_operators() {
    assert_eq!(eval_const("true && false"), Value::Bool(false));
    assert_eq!(eval_const("true || false"), Value::Bool(true));
    assert_eq!(eval_const("!false && true"), Value::Bool(true));
    assert_eq!(eval_const("true && true || false"), Value::Bool(true));
}

#[test]
fn test_logical_type_errors() {
    let err = evaluate("1 && true").unwrap_err();
    assert_eq!(
        err,
        Error::LogicalTypeMismatch {
            value: "1".to_string(),
            symbol: "&&".to_string(),
        }
    );
}

#[test]
fn test_ternary() {
    assert_eq!(eval_const("true ? 1 : 2"), Value::Number(1.0));
    assert_eq!(eval_const("false ? 1 : 2"), Value::Number(2.0));
    assert_eq!(eval_const("1 < 2 ? 'lt' : 'ge'"), Value::text("lt"));
    // a lone true-half yields null when the condition fails
    assert_eq!(eval_const("false ? 1"), Value::Null);
    // chained ternary nests right
    assert_eq!(
        eval_const("false ? 1 : false ? 2 : 3"),
        Value::Number(3.0)
    );
}

#[test]
fn test_ternary_with_parameters() {
    let mut params = MapParameters::new();
    params.insert("a", -5);
    assert_eq!(
        evaluate_with("a > 0 ? a : -a", &params).unwrap(),
        Value::Number(5.0)
    );

    params.insert("a", 7);
    assert_eq!(
        evaluate_with("a > 0 ? a : -a", &params).unwrap(),
        Value::Number(7.0)
    );
}

#[test]
fn test_coalesce() {
    let mut params = MapParameters::new();
    params.insert("missing", Value::Null);
    assert_eq!(
        evaluate_with("missing ?? 'default'", &params).unwrap(),
        Value::text("default")
    );

    params.insert("missing", "present");
    assert_eq!(
        evaluate_with("missing ?? 'default'", &params).unwrap(),
        Value::text("present")
    );

    assert_eq!(eval_const("1 ?? 2 ?? 3"), Value::Number(1.0));
}

#[test]
fn test_non_bool_ternary_condition() {
    let err = evaluate("1 ? 2 : 3").unwrap_err();
    assert_eq!(
        err,
        Error::TernaryTypeMismatch {
            value: "1".to_string(),
            symbol: "?".to_string(),
        }
    );
}

// Regex

#[test]
fn test_regex_match() {
    let mut params = MapParameters::new();
    params.insert("x", "hello");
    assert_eq!(
        evaluate_with("x =~ '^he'", &params).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_with("x !~ '^he'", &params).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        evaluate_with("x =~ 'xyz'", &params).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn test_regex_dynamic_pattern() {
    let mut params = MapParameters::new();
    params.insert("subject", "hello");
    params.insert("pat", "l+o$");
    assert_eq!(
        evaluate_with("subject =~ pat", &params).unwrap(),
        Value::Bool(true)
    );

    // dynamic compile failures surface at evaluation time
    params.insert("pat", "(");
    assert!(matches!(
        evaluate_with("subject =~ pat", &params),
        Err(Error::RegexCompile { .. })
    ));
}

#[test]
fn test_regex_constant_compile_failure_is_plan_error() {
    assert!(matches!(
        Expression::new("x =~ '('"),
        Err(Error::RegexCompile { .. })
    ));
}

// Membership

#[test]
fn test_membership() {
    let mut params = MapParameters::new();
    params.insert("v", 2);
    assert_eq!(
        evaluate_with("v in (1, 2, 3)", &params).unwrap(),
        Value::Bool(true)
    );

    params.insert("v", 4);
    assert_eq!(
        evaluate_with("v in (1, 2, 3)", &params).unwrap(),
        Value::Bool(false)
    );

    assert_eq!(eval_const("'b' in ('a', 'b')"), Value::Bool(true));
    assert_eq!(eval_const("2 IN (1, 2)"), Value::Bool(true));
}

#[test]
fn test_membership_against_array_parameter() {
    let mut params = MapParameters::new();
    params.insert(
        "allowed",
        Value::array([Value::text("read"), Value::text("write")]),
    );
    assert_eq!(
        evaluate_with("'read' in allowed", &params).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        evaluate_with("'admin' in allowed", &params).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn test_membership_requires_array() {
    let err = evaluate("1 in 2").unwrap_err();
    assert_eq!(
        err,
        Error::ComparatorTypeMismatch {
            value: "2".to_string(),
            symbol: "in".to_string(),
        }
    );
}

// Functions

#[test]
fn test_function_calls() {
    let mut functions = Functions::new();
    functions.register("max", |args| {
        let mut best = f64::NEG_INFINITY;
        for arg in args {
            match arg.as_number() {
                Some(n) if n > best => best = n,
                Some(_) => {}
                None => return Err(Error::message("max takes numbers")),
            }
        }
        Ok(Value::Number(best))
    });
    functions.register("answer", |_| Ok(Value::Number(42.0)));

    let expr = Expression::with_functions("max(1, 7, 3) + answer()", &functions).unwrap();
    assert_eq!(
        expr.evaluate(&MapParameters::new()).unwrap(),
        Value::Number(49.0)
    );
}

#[test]
fn test_function_single_argument() {
    let mut functions = Functions::new();
    functions.register("argc", |args| Ok(Value::Number(args.len() as f64)));

    for (input, expected) in [("argc()", 0.0), ("argc(1)", 1.0), ("argc(1, 2, 3)", 3.0)] {
        let expr = Expression::with_functions(input, &functions).unwrap();
        assert_eq!(
            expr.evaluate(&MapParameters::new()).unwrap(),
            Value::Number(expected),
            "{}",
            input
        );
    }
}

#[test]
fn test_function_error_propagates() {
    let mut functions = Functions::new();
    functions.register("boom", |_| Err(Error::message("boom called")));

    let expr = Expression::with_functions("boom() + 1", &functions).unwrap();
    assert_eq!(
        expr.evaluate(&MapParameters::new()).unwrap_err(),
        Error::Message("boom called".to_string())
    );
}

#[test]
fn test_false_and_suppresses_function_error() {
    let mut functions = Functions::new();
    functions.register("boom", |_| Err(Error::message("boom called")));

    let expr = Expression::with_functions("false && boom()", &functions).unwrap();
    assert_eq!(
        expr.evaluate(&MapParameters::new()).unwrap(),
        Value::Bool(false)
    );
}

// Parameters

#[test]
fn test_unknown_parameter() {
    assert_eq!(
        evaluate("nope + 1").unwrap_err(),
        Error::UnknownParameter("nope".to_string())
    );
}

#[test]
fn test_bracketed_parameter_names() {
    let mut params = MapParameters::new();
    params.insert("response time", 47);
    assert_eq!(
        evaluate_with("[response time] < 100", &params).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_type_errors_interpolate_parameter_values() {
    let mut params = MapParameters::new();
    params.insert("x", "oops");
    assert_eq!(
        evaluate_with("x * 2", &params).unwrap_err(),
        Error::ModifierTypeMismatch {
            value: "oops".to_string(),
            symbol: "*".to_string(),
        }
    );
}

// Determinism

#[test]
fn test_repeated_evaluation_is_deterministic() {
    let expr = Expression::new("(a + 2) * 3 == 15 && 'x' + a == 'x3'").unwrap();
    let mut params = MapParameters::new();
    params.insert("a", 3);

    let first = expr.evaluate(&params).unwrap();
    assert_eq!(first, Value::Bool(true));
    for _ in 0..20 {
        assert_eq!(expr.evaluate(&params).unwrap(), first);
    }
}
