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

//! Evaluation-tree nodes
//!
//! A stage couples an operator symbol with the callable that implements it,
//! optional subtrees, and the type checks the evaluator applies before
//! invoking the callable. The symbol stays distinct from the callable so
//! short-circuit classification survives operator replacement during
//! planner optimizations.

use std::fmt;

use crate::core::{ErrorFormat, Result, Value};
use crate::params::Parameters;

/// Operator callable: `(left, right, params) -> value`
///
/// Leaves are invoked with null operands.
pub type OperatorFn = Box<dyn Fn(Value, Value, &dyn Parameters) -> Result<Value> + Send + Sync>;

/// Single-operand type predicate
pub type TypeCheck = fn(&Value) -> bool;

/// Joint two-operand type predicate; overrides the unary checks
pub type CombinedCheck = fn(&Value, &Value) -> bool;

/// Identifies the operation a stage performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorSymbol {
    /// Constant leaf
    Literal,
    /// Parameter lookup leaf
    Parameter,
    /// Function application
    Functional,
    /// Accessor path walk
    Access,
    /// Argument accumulation (`,`)
    Separate,
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    RegexMatch,
    NotRegexMatch,
    In,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Exponent,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
    Negate,
    Invert,
    BitwiseNot,
    TernaryTrue,
    TernaryFalse,
    Coalesce,
}

impl OperatorSymbol {
    /// Returns true for the operators whose left value alone may decide the
    /// result, letting the evaluator skip the right subtree
    pub fn is_short_circuitable(self) -> bool {
        matches!(
            self,
            OperatorSymbol::And
                | OperatorSymbol::Or
                | OperatorSymbol::TernaryTrue
                | OperatorSymbol::TernaryFalse
                | OperatorSymbol::Coalesce
        )
    }
}

impl fmt::Display for OperatorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spelling = match self {
            OperatorSymbol::Literal => "<literal>",
            OperatorSymbol::Parameter => "<parameter>",
            OperatorSymbol::Functional => "<function>",
            OperatorSymbol::Access => "<accessor>",
            OperatorSymbol::Separate => ",",
            OperatorSymbol::Eq => "==",
            OperatorSymbol::Neq => "!=",
            OperatorSymbol::Gt => ">",
            OperatorSymbol::Lt => "<",
            OperatorSymbol::Gte => ">=",
            OperatorSymbol::Lte => "<=",
            OperatorSymbol::RegexMatch => "=~",
            OperatorSymbol::NotRegexMatch => "!~",
            OperatorSymbol::In => "in",
            OperatorSymbol::And => "&&",
            OperatorSymbol::Or => "||",
            OperatorSymbol::Add => "+",
            OperatorSymbol::Subtract => "-",
            OperatorSymbol::Multiply => "*",
            OperatorSymbol::Divide => "/",
            OperatorSymbol::Modulus => "%",
            OperatorSymbol::Exponent => "**",
            OperatorSymbol::BitwiseAnd => "&",
            OperatorSymbol::BitwiseOr => "|",
            OperatorSymbol::BitwiseXor => "^",
            OperatorSymbol::LeftShift => "<<",
            OperatorSymbol::RightShift => ">>",
            OperatorSymbol::Negate => "-",
            OperatorSymbol::Invert => "!",
            OperatorSymbol::BitwiseNot => "~",
            OperatorSymbol::TernaryTrue => "?",
            OperatorSymbol::TernaryFalse => ":",
            OperatorSymbol::Coalesce => "??",
        };
        write!(f, "{}", spelling)
    }
}

/// A node of the evaluation tree
///
/// Leaves have no subtrees; unary prefixes populate only `right`. The tree
/// is immutable after planning and safe to share across threads.
pub struct Stage {
    /// What this stage does, for short-circuit classification
    pub symbol: OperatorSymbol,
    /// Left subtree
    pub left: Option<Box<Stage>>,
    /// Right subtree
    pub right: Option<Box<Stage>>,
    /// The operation evaluated over the subtree results
    pub operator: OperatorFn,
    /// Left-operand type check
    pub left_check: Option<TypeCheck>,
    /// Right-operand type check
    pub right_check: Option<TypeCheck>,
    /// Joint check; when present the unary checks are ignored
    pub combined_check: Option<CombinedCheck>,
    /// Template used when a check fails
    pub error_format: ErrorFormat,
}

impl Stage {
    /// Returns true if this stage has no subtrees
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("symbol", &self.symbol)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish_non_exhaustive()
    }
}
