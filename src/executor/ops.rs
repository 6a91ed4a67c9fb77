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

//! Operator implementations and stage construction
//!
//! Every operation a stage can perform lives here, together with the type
//! checks the evaluator runs before invoking it. Binary and prefix stages
//! are assembled from the symbol alone; leaf stages capture their payload
//! in a closure.

use std::sync::Arc;

use regex::Regex;

use super::stage::{OperatorFn, OperatorSymbol, Stage};
use crate::core::{Error, ErrorFormat, Result, Value};
use crate::functions::ExpressionFunction;
use crate::params::Parameters;

// =============================================================================
// Type checks
// =============================================================================

pub fn is_number(value: &Value) -> bool {
    matches!(value, Value::Number(_))
}

pub fn is_bool(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

pub fn is_text(value: &Value) -> bool {
    matches!(value, Value::Text(_))
}

pub fn is_pattern_or_text(value: &Value) -> bool {
    matches!(value, Value::Pattern(_) | Value::Text(_))
}

pub fn is_array(value: &Value) -> bool {
    matches!(value, Value::Array(_))
}

/// Addition is numeric unless either side is a string, in which case both
/// sides stringify and concatenate
pub fn addition_type_check(left: &Value, right: &Value) -> bool {
    if is_number(left) && is_number(right) {
        return true;
    }
    is_text(left) || is_text(right)
}

/// Ordering compares two numbers or two strings, never a mix
pub fn comparison_type_check(left: &Value, right: &Value) -> bool {
    if is_number(left) && is_number(right) {
        return true;
    }
    is_text(left) && is_text(right)
}

// =============================================================================
// Operand extraction
// =============================================================================

fn number_of(value: Value) -> Result<f64> {
    value
        .as_number()
        .ok_or_else(|| Error::message("operand is not a number"))
}

fn bool_of(value: Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::message("operand is not a bool"))
}

// =============================================================================
// Operator functions
// =============================================================================

fn add(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    if is_text(&left) || is_text(&right) {
        return Ok(Value::text(format!("{}{}", left, right)));
    }
    Ok(Value::Number(number_of(left)? + number_of(right)?))
}

fn subtract(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(number_of(left)? - number_of(right)?))
}

fn multiply(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(number_of(left)? * number_of(right)?))
}

fn divide(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(number_of(left)? / number_of(right)?))
}

fn modulus(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(number_of(left)? % number_of(right)?))
}

fn exponent(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(number_of(left)?.powf(number_of(right)?)))
}

fn gt(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    if let (Value::Text(l), Value::Text(r)) = (&left, &right) {
        return Ok(Value::Bool(l > r));
    }
    Ok(Value::Bool(number_of(left)? > number_of(right)?))
}

fn gte(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    if let (Value::Text(l), Value::Text(r)) = (&left, &right) {
        return Ok(Value::Bool(l >= r));
    }
    Ok(Value::Bool(number_of(left)? >= number_of(right)?))
}

fn lt(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    if let (Value::Text(l), Value::Text(r)) = (&left, &right) {
        return Ok(Value::Bool(l < r));
    }
    Ok(Value::Bool(number_of(left)? < number_of(right)?))
}

fn lte(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    if let (Value::Text(l), Value::Text(r)) = (&left, &right) {
        return Ok(Value::Bool(l <= r));
    }
    Ok(Value::Bool(number_of(left)? <= number_of(right)?))
}

fn equal(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Bool(left == right))
}

fn not_equal(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Bool(left != right))
}

fn and(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Bool(bool_of(left)? && bool_of(right)?))
}

fn or(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Bool(bool_of(left)? || bool_of(right)?))
}

fn regex_match(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    let pattern = match right {
        Value::Pattern(p) => p,
        Value::Text(s) => Arc::new(Regex::new(&s).map_err(|e| Error::RegexCompile {
            pattern: s.to_string(),
            cause: e.to_string(),
        })?),
        other => {
            return Err(Error::message(format!(
                "'{}' is not a regex pattern",
                other
            )))
        }
    };
    match left {
        Value::Text(subject) => Ok(Value::Bool(pattern.is_match(&subject))),
        other => Err(Error::message(format!("'{}' is not a string", other))),
    }
}

fn not_regex_match(left: Value, right: Value, params: &dyn Parameters) -> Result<Value> {
    match regex_match(left, right, params)? {
        Value::Bool(matched) => Ok(Value::Bool(!matched)),
        other => Ok(other),
    }
}

/// Membership compares primitives only; arrays and patterns never equal
/// anything
fn primitive_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Array(_), _) | (_, Value::Array(_)) => false,
        (Value::Pattern(_), _) | (_, Value::Pattern(_)) => false,
        _ => left == right,
    }
}

fn membership(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    match right {
        Value::Array(values) => Ok(Value::Bool(
            values.iter().any(|value| primitive_eq(&left, value)),
        )),
        other => Err(Error::message(format!("'{}' is not an array", other))),
    }
}

fn bitwise_and(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(
        ((number_of(left)? as i64) & (number_of(right)? as i64)) as f64,
    ))
}

fn bitwise_or(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(
        ((number_of(left)? as i64) | (number_of(right)? as i64)) as f64,
    ))
}

fn bitwise_xor(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(
        ((number_of(left)? as i64) ^ (number_of(right)? as i64)) as f64,
    ))
}

/// Shifts operate on unsigned 64-bit operands; amounts of 64 or more
/// shift everything out and yield 0
fn left_shift(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    let value = number_of(left)? as u64;
    let amount = number_of(right)? as u64;
    let shifted = u32::try_from(amount)
        .ok()
        .and_then(|a| value.checked_shl(a))
        .unwrap_or(0);
    Ok(Value::Number(shifted as f64))
}

fn right_shift(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    let value = number_of(left)? as u64;
    let amount = number_of(right)? as u64;
    let shifted = u32::try_from(amount)
        .ok()
        .and_then(|a| value.checked_shr(a))
        .unwrap_or(0);
    Ok(Value::Number(shifted as f64))
}

fn negate(_: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(-number_of(right)?))
}

fn invert(_: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Bool(!bool_of(right)?))
}

fn bitwise_not(_: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    Ok(Value::Number(!(number_of(right)? as i64) as f64))
}

fn ternary_if(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    if bool_of(left)? {
        return Ok(right);
    }
    Ok(Value::Null)
}

/// Shared by `:` and `??`: keep the left value unless it is null
fn ternary_else(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    if !left.is_null() {
        return Ok(left);
    }
    Ok(right)
}

fn separate(left: Value, right: Value, _: &dyn Parameters) -> Result<Value> {
    match left {
        Value::Array(mut values) => {
            values.push(right);
            Ok(Value::Array(values))
        }
        single => Ok(Value::Array(vec![single, right])),
    }
}

// =============================================================================
// Stage construction
// =============================================================================

/// Leaf stage producing a constant
pub fn literal_stage(value: Value) -> Stage {
    leaf(
        OperatorSymbol::Literal,
        Box::new(move |_, _, _| Ok(value.clone())),
    )
}

/// Leaf stage resolving a parameter by name
pub fn parameter_stage(name: String) -> Stage {
    leaf(
        OperatorSymbol::Parameter,
        Box::new(move |_, _, params| params.get(&name)),
    )
}

/// Function-application stage; `right` holds the argument expression, or
/// nothing for a zero-argument call
pub fn function_stage(function: ExpressionFunction, right: Option<Stage>) -> Stage {
    let operator: OperatorFn = Box::new(move |_, right, _| match right {
        Value::Null => function(&[]),
        Value::Array(args) => function(&args),
        single => function(&[single]),
    });
    Stage {
        symbol: OperatorSymbol::Functional,
        left: None,
        right: right.map(Box::new),
        operator,
        left_check: None,
        right_check: None,
        combined_check: None,
        error_format: ErrorFormat::Modifier,
    }
}

/// Accessor stage; the dotted path is walked by the caller's parameter
/// source, and any fault other than a missing head parameter is reported as
/// an accessor failure
pub fn accessor_stage(path: Vec<String>, right: Option<Stage>) -> Stage {
    let operator: OperatorFn = Box::new(move |_, right, params| {
        let args = match right {
            Value::Null => None,
            Value::Array(items) => Some(items),
            single => Some(vec![single]),
        };
        params
            .resolve_path(&path, args.as_deref())
            .map_err(|cause| match cause {
                Error::UnknownParameter(_) | Error::AccessorFailed { .. } => cause,
                other => Error::AccessorFailed {
                    path: path.join("."),
                    cause: other.to_string(),
                },
            })
    });
    Stage {
        symbol: OperatorSymbol::Access,
        left: None,
        right: right.map(Box::new),
        operator,
        left_check: None,
        right_check: None,
        combined_check: None,
        error_format: ErrorFormat::Modifier,
    }
}

/// Unary prefix stage; only the right subtree is populated
pub fn prefix_stage(symbol: OperatorSymbol, right: Stage) -> Stage {
    let (operator, right_check): (OperatorFn, _) = match symbol {
        OperatorSymbol::Negate => (Box::new(negate), Some(is_number as fn(&Value) -> bool)),
        OperatorSymbol::Invert => (Box::new(invert), Some(is_bool as fn(&Value) -> bool)),
        OperatorSymbol::BitwiseNot => {
            (Box::new(bitwise_not), Some(is_number as fn(&Value) -> bool))
        }
        other => unreachable!("not a prefix symbol: {:?}", other),
    };
    Stage {
        symbol,
        left: None,
        right: Some(Box::new(right)),
        operator,
        left_check: None,
        right_check,
        combined_check: None,
        error_format: ErrorFormat::Prefix,
    }
}

/// Binary stage for every two-operand operator
pub fn binary_stage(symbol: OperatorSymbol, left: Stage, right: Stage) -> Stage {
    let spec: BinarySpec = match symbol {
        OperatorSymbol::Add => BinarySpec {
            combined_check: Some(addition_type_check),
            ..BinarySpec::bare(Box::new(add))
        },
        OperatorSymbol::Subtract => BinarySpec::numeric(Box::new(subtract)),
        OperatorSymbol::Multiply => BinarySpec::numeric(Box::new(multiply)),
        OperatorSymbol::Divide => BinarySpec::numeric(Box::new(divide)),
        OperatorSymbol::Modulus => BinarySpec::numeric(Box::new(modulus)),
        OperatorSymbol::Exponent => BinarySpec::numeric(Box::new(exponent)),
        OperatorSymbol::BitwiseAnd => BinarySpec::numeric(Box::new(bitwise_and)),
        OperatorSymbol::BitwiseOr => BinarySpec::numeric(Box::new(bitwise_or)),
        OperatorSymbol::BitwiseXor => BinarySpec::numeric(Box::new(bitwise_xor)),
        OperatorSymbol::LeftShift => BinarySpec::numeric(Box::new(left_shift)),
        OperatorSymbol::RightShift => BinarySpec::numeric(Box::new(right_shift)),
        OperatorSymbol::And => BinarySpec::logical(Box::new(and)),
        OperatorSymbol::Or => BinarySpec::logical(Box::new(or)),
        OperatorSymbol::Eq => BinarySpec {
            error_format: ErrorFormat::Comparator,
            ..BinarySpec::bare(Box::new(equal))
        },
        OperatorSymbol::Neq => BinarySpec {
            error_format: ErrorFormat::Comparator,
            ..BinarySpec::bare(Box::new(not_equal))
        },
        OperatorSymbol::Gt => BinarySpec::ordering(Box::new(gt)),
        OperatorSymbol::Gte => BinarySpec::ordering(Box::new(gte)),
        OperatorSymbol::Lt => BinarySpec::ordering(Box::new(lt)),
        OperatorSymbol::Lte => BinarySpec::ordering(Box::new(lte)),
        OperatorSymbol::RegexMatch => BinarySpec::regex(Box::new(regex_match)),
        OperatorSymbol::NotRegexMatch => BinarySpec::regex(Box::new(not_regex_match)),
        OperatorSymbol::In => BinarySpec {
            right_check: Some(is_array as fn(&Value) -> bool),
            error_format: ErrorFormat::Comparator,
            ..BinarySpec::bare(Box::new(membership))
        },
        OperatorSymbol::TernaryTrue => BinarySpec {
            left_check: Some(is_bool as fn(&Value) -> bool),
            error_format: ErrorFormat::Ternary,
            ..BinarySpec::bare(Box::new(ternary_if))
        },
        OperatorSymbol::TernaryFalse | OperatorSymbol::Coalesce => BinarySpec {
            error_format: ErrorFormat::Ternary,
            ..BinarySpec::bare(Box::new(ternary_else))
        },
        OperatorSymbol::Separate => BinarySpec::bare(Box::new(separate)),
        other => unreachable!("not a binary symbol: {:?}", other),
    };

    Stage {
        symbol,
        left: Some(Box::new(left)),
        right: Some(Box::new(right)),
        operator: spec.operator,
        left_check: spec.left_check,
        right_check: spec.right_check,
        combined_check: spec.combined_check,
        error_format: spec.error_format,
    }
}

/// Everything a binary stage needs besides its subtrees
struct BinarySpec {
    operator: OperatorFn,
    left_check: Option<fn(&Value) -> bool>,
    right_check: Option<fn(&Value) -> bool>,
    combined_check: Option<fn(&Value, &Value) -> bool>,
    error_format: ErrorFormat,
}

impl BinarySpec {
    fn bare(operator: OperatorFn) -> Self {
        Self {
            operator,
            left_check: None,
            right_check: None,
            combined_check: None,
            error_format: ErrorFormat::Modifier,
        }
    }

    fn numeric(operator: OperatorFn) -> Self {
        Self {
            left_check: Some(is_number),
            right_check: Some(is_number),
            error_format: ErrorFormat::Modifier,
            ..Self::bare(operator)
        }
    }

    fn logical(operator: OperatorFn) -> Self {
        Self {
            left_check: Some(is_bool),
            right_check: Some(is_bool),
            error_format: ErrorFormat::Logical,
            ..Self::bare(operator)
        }
    }

    fn ordering(operator: OperatorFn) -> Self {
        Self {
            combined_check: Some(comparison_type_check),
            error_format: ErrorFormat::Comparator,
            ..Self::bare(operator)
        }
    }

    fn regex(operator: OperatorFn) -> Self {
        Self {
            left_check: Some(is_text),
            right_check: Some(is_pattern_or_text),
            error_format: ErrorFormat::Comparator,
            ..Self::bare(operator)
        }
    }
}

fn leaf(symbol: OperatorSymbol, operator: OperatorFn) -> Stage {
    Stage {
        symbol,
        left: None,
        right: None,
        operator,
        left_check: None,
        right_check: None,
        combined_check: None,
        error_format: ErrorFormat::Modifier,
    }
}
