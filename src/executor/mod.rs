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

//! Evaluation-tree executor
//!
//! Walks a planned [`Stage`] tree against a parameter source. Evaluation is
//! synchronous and allocation-light; short-circuiting operators skip their
//! right subtree entirely, which also suppresses any errors that subtree
//! would have raised.

pub mod ops;
pub mod stage;

pub use stage::{OperatorSymbol, Stage};

use crate::core::{Error, Result, Value};
use crate::params::Parameters;

/// Evaluate a stage tree to a single value
///
/// Leaves are invoked with null operands. For short-circuitable stages the
/// left value alone may decide the result:
///
/// - `&&` with a false left yields false
/// - `||` with a true left yields true
/// - `??` with a non-null left yields the left value
/// - `?` with a false condition yields null
/// - `:` with a non-null left yields the left value
pub fn evaluate(stage: &Stage, params: &dyn Parameters) -> Result<Value> {
    let left = match &stage.left {
        Some(subtree) => evaluate(subtree, params)?,
        None => Value::Null,
    };

    if stage.symbol.is_short_circuitable() {
        match stage.symbol {
            OperatorSymbol::And if left == Value::Bool(false) => {
                return Ok(Value::Bool(false));
            }
            OperatorSymbol::Or if left == Value::Bool(true) => {
                return Ok(Value::Bool(true));
            }
            OperatorSymbol::Coalesce if !left.is_null() => {
                return Ok(left);
            }
            OperatorSymbol::TernaryTrue if left == Value::Bool(false) => {
                return Ok(Value::Null);
            }
            OperatorSymbol::TernaryFalse if !left.is_null() => {
                return Ok(left);
            }
            _ => {}
        }
    }

    let right = match &stage.right {
        Some(subtree) => evaluate(subtree, params)?,
        None => Value::Null,
    };

    if let Some(check) = stage.combined_check {
        if !check(&left, &right) {
            return Err(type_error(stage, &left));
        }
    } else {
        if let Some(check) = stage.left_check {
            if !check(&left) {
                return Err(type_error(stage, &left));
            }
        }
        if let Some(check) = stage.right_check {
            if !check(&right) {
                return Err(type_error(stage, &right));
            }
        }
    }

    (stage.operator)(left, right, params)
}

fn type_error(stage: &Stage, offending: &Value) -> Error {
    stage.error_format.type_error(offending, stage.symbol)
}

#[cfg(test)]
mod tests {
    use super::ops::{binary_stage, literal_stage, parameter_stage, prefix_stage};
    use super::*;
    use crate::params::MapParameters;

    fn number(n: f64) -> Stage {
        literal_stage(Value::Number(n))
    }

    #[test]
    fn test_leaf_literal() {
        let stage = literal_stage(Value::text("hi"));
        assert_eq!(
            evaluate(&stage, &MapParameters::new()).unwrap(),
            Value::text("hi")
        );
    }

    #[test]
    fn test_binary_arithmetic() {
        let stage = binary_stage(OperatorSymbol::Multiply, number(6.0), number(7.0));
        assert_eq!(
            evaluate(&stage, &MapParameters::new()).unwrap(),
            Value::Number(42.0)
        );
    }

    #[test]
    fn test_prefix_only_populates_right() {
        let stage = prefix_stage(OperatorSymbol::Negate, number(5.0));
        assert!(stage.left.is_none());
        assert_eq!(
            evaluate(&stage, &MapParameters::new()).unwrap(),
            Value::Number(-5.0)
        );
    }

    #[test]
    fn test_type_check_reports_left_value() {
        let stage = binary_stage(
            OperatorSymbol::Subtract,
            literal_stage(Value::text("oops")),
            number(1.0),
        );
        let err = evaluate(&stage, &MapParameters::new()).unwrap_err();
        assert_eq!(
            err,
            Error::ModifierTypeMismatch {
                value: "oops".to_string(),
                symbol: "-".to_string(),
            }
        );
    }

    #[test]
    fn test_and_short_circuits_unknown_parameter() {
        // the right subtree would fail with an unknown parameter; a false
        // left must suppress it
        let stage = binary_stage(
            OperatorSymbol::And,
            literal_stage(Value::Bool(false)),
            parameter_stage("missing".to_string()),
        );
        assert_eq!(
            evaluate(&stage, &MapParameters::new()).unwrap(),
            Value::Bool(false)
        );

        // a true left must not
        let stage = binary_stage(
            OperatorSymbol::And,
            literal_stage(Value::Bool(true)),
            parameter_stage("missing".to_string()),
        );
        assert_eq!(
            evaluate(&stage, &MapParameters::new()).unwrap_err(),
            Error::UnknownParameter("missing".to_string())
        );
    }

    #[test]
    fn test_coalesce_keeps_non_null_left() {
        let stage = binary_stage(
            OperatorSymbol::Coalesce,
            number(1.0),
            parameter_stage("missing".to_string()),
        );
        assert_eq!(
            evaluate(&stage, &MapParameters::new()).unwrap(),
            Value::Number(1.0)
        );
    }

    #[test]
    fn test_deterministic_evaluation() {
        let stage = binary_stage(
            OperatorSymbol::Add,
            number(1.5),
            binary_stage(OperatorSymbol::Exponent, number(2.0), number(3.0)),
        );
        let params = MapParameters::new();
        let first = evaluate(&stage, &params).unwrap();
        for _ in 0..10 {
            assert_eq!(evaluate(&stage, &params).unwrap(), first);
        }
    }
}
