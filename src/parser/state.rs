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

//! Legal-transition state machine for the lexer
//!
//! A state is the set of token kinds allowed next. The state after a token
//! is indexed solely by that token's kind; a disallowed successor is an
//! invalid-sequence error. `is_eof` marks states where the expression may
//! legally end, `is_nullable` states where it may still be empty.

use super::token::TokenKind;

/// One entry of the transition table
#[derive(Debug)]
pub struct LexerState {
    /// The token kind this state follows
    pub kind: TokenKind,
    /// Whether the expression may end in this state
    pub is_eof: bool,
    /// Whether the expression may be empty at this point
    pub is_nullable: bool,
    /// Token kinds that may come next
    pub valid_next: &'static [TokenKind],
}

impl LexerState {
    /// Returns true if a token of `kind` may follow this state
    pub fn can_transition_to(&self, kind: TokenKind) -> bool {
        self.valid_next.contains(&kind)
    }
}

/// State at the start of an expression
pub static INITIAL_STATE: LexerState = LexerState {
    kind: TokenKind::Unknown,
    is_eof: false,
    is_nullable: true,
    valid_next: &[
        TokenKind::Prefix,
        TokenKind::Numeric,
        TokenKind::Boolean,
        TokenKind::Variable,
        TokenKind::Pattern,
        TokenKind::Function,
        TokenKind::Accessor,
        TokenKind::String,
        TokenKind::Time,
        TokenKind::Clause,
    ],
};

/// Successor kinds shared by every literal and variable token
static AFTER_OPERAND: &[TokenKind] = &[
    TokenKind::Modifier,
    TokenKind::Comparator,
    TokenKind::LogicalOp,
    TokenKind::ClauseClose,
    TokenKind::Ternary,
    TokenKind::Separator,
];

static STATES: &[LexerState] = &[
    LexerState {
        kind: TokenKind::Clause,
        is_eof: false,
        is_nullable: true,
        valid_next: &[
            TokenKind::Prefix,
            TokenKind::Numeric,
            TokenKind::Boolean,
            TokenKind::Variable,
            TokenKind::Pattern,
            TokenKind::Function,
            TokenKind::Accessor,
            TokenKind::String,
            TokenKind::Time,
            TokenKind::Clause,
            TokenKind::ClauseClose,
        ],
    },
    LexerState {
        kind: TokenKind::ClauseClose,
        is_eof: true,
        is_nullable: true,
        valid_next: &[
            TokenKind::Modifier,
            TokenKind::Comparator,
            TokenKind::LogicalOp,
            TokenKind::Ternary,
            TokenKind::Separator,
            TokenKind::Numeric,
            TokenKind::Boolean,
            TokenKind::Variable,
            TokenKind::String,
            TokenKind::Pattern,
            TokenKind::Time,
            TokenKind::Clause,
            TokenKind::ClauseClose,
        ],
    },
    LexerState {
        kind: TokenKind::Numeric,
        is_eof: true,
        is_nullable: false,
        valid_next: AFTER_OPERAND,
    },
    LexerState {
        kind: TokenKind::Boolean,
        is_eof: true,
        is_nullable: false,
        valid_next: AFTER_OPERAND,
    },
    LexerState {
        kind: TokenKind::String,
        is_eof: true,
        is_nullable: false,
        valid_next: AFTER_OPERAND,
    },
    LexerState {
        kind: TokenKind::Time,
        is_eof: true,
        is_nullable: false,
        valid_next: AFTER_OPERAND,
    },
    LexerState {
        kind: TokenKind::Pattern,
        is_eof: true,
        is_nullable: false,
        valid_next: AFTER_OPERAND,
    },
    LexerState {
        kind: TokenKind::Variable,
        is_eof: true,
        is_nullable: false,
        valid_next: AFTER_OPERAND,
    },
    LexerState {
        kind: TokenKind::Modifier,
        is_eof: false,
        is_nullable: false,
        valid_next: &[
            TokenKind::Prefix,
            TokenKind::Numeric,
            TokenKind::Variable,
            TokenKind::Function,
            TokenKind::Accessor,
            TokenKind::String,
            TokenKind::Boolean,
            TokenKind::Clause,
            TokenKind::ClauseClose,
        ],
    },
    LexerState {
        kind: TokenKind::Comparator,
        is_eof: false,
        is_nullable: false,
        valid_next: &[
            TokenKind::Prefix,
            TokenKind::Numeric,
            TokenKind::Boolean,
            TokenKind::Variable,
            TokenKind::Function,
            TokenKind::Accessor,
            TokenKind::String,
            TokenKind::Time,
            TokenKind::Clause,
            TokenKind::ClauseClose,
            TokenKind::Pattern,
        ],
    },
    LexerState {
        kind: TokenKind::LogicalOp,
        is_eof: false,
        is_nullable: false,
        valid_next: &[
            TokenKind::Prefix,
            TokenKind::Numeric,
            TokenKind::Boolean,
            TokenKind::Variable,
            TokenKind::Function,
            TokenKind::Accessor,
            TokenKind::String,
            TokenKind::Time,
            TokenKind::Clause,
            TokenKind::ClauseClose,
        ],
    },
    LexerState {
        kind: TokenKind::Prefix,
        is_eof: false,
        is_nullable: false,
        valid_next: &[
            TokenKind::Numeric,
            TokenKind::Boolean,
            TokenKind::Variable,
            TokenKind::Function,
            TokenKind::Accessor,
            TokenKind::Clause,
            TokenKind::ClauseClose,
        ],
    },
    LexerState {
        kind: TokenKind::Ternary,
        is_eof: false,
        is_nullable: false,
        valid_next: &[
            TokenKind::Prefix,
            TokenKind::Numeric,
            TokenKind::Boolean,
            TokenKind::String,
            TokenKind::Time,
            TokenKind::Variable,
            TokenKind::Function,
            TokenKind::Accessor,
            TokenKind::Clause,
            TokenKind::Separator,
        ],
    },
    LexerState {
        kind: TokenKind::Function,
        is_eof: false,
        is_nullable: false,
        valid_next: &[TokenKind::Clause],
    },
    LexerState {
        kind: TokenKind::Accessor,
        is_eof: true,
        is_nullable: false,
        valid_next: &[
            TokenKind::Clause,
            TokenKind::Modifier,
            TokenKind::Comparator,
            TokenKind::LogicalOp,
            TokenKind::ClauseClose,
            TokenKind::Ternary,
            TokenKind::Separator,
        ],
    },
    LexerState {
        kind: TokenKind::Separator,
        is_eof: false,
        is_nullable: true,
        valid_next: &[
            TokenKind::Prefix,
            TokenKind::Numeric,
            TokenKind::Boolean,
            TokenKind::String,
            TokenKind::Time,
            TokenKind::Variable,
            TokenKind::Function,
            TokenKind::Accessor,
            TokenKind::Clause,
        ],
    },
];

/// The state entered after a token of the given kind
pub fn state_for(kind: TokenKind) -> &'static LexerState {
    STATES
        .iter()
        .find(|state| state.kind == kind)
        .unwrap_or(&INITIAL_STATE)
}
