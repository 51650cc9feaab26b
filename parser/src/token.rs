// Copyright (C) 2019-2023 Aleo Systems Inc.
// This file is part of the sqltree library.

// The sqltree library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The sqltree library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the sqltree library. If not, see <https://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Represents all valid SQL token kinds the parser consumes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Colon,
    DColon,
    Semicolon,

    // Operators
    Plus,
    Dash,
    Star,
    Slash,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Amp,
    Pipe,
    DPipe,
    Caret,
    Tilda,
    LShift,
    RShift,

    // Literals and identifiers
    String,
    Number,
    Null,
    Identifier,
    Var,

    // Type keywords
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    Char,
    VarChar,
    Text,
    Binary,
    Json,
    Timestamp,
    TimestampTz,
    Date,
    Array,
    Map,

    // Keywords
    All,
    And,
    As,
    Asc,
    AutoIncrement,
    Between,
    Case,
    Cast,
    CharacterSet,
    Collate,
    CommentEnd,
    Count,
    Create,
    Cross,
    CurrentRow,
    Default,
    Desc,
    Distinct,
    Drop,
    Else,
    End,
    Engine,
    Exists,
    Extract,
    Following,
    Format,
    From,
    Full,
    Group,
    Having,
    Hint,
    If,
    In,
    Inner,
    Insert,
    Interval,
    Into,
    Is,
    Join,
    Lateral,
    Left,
    Like,
    Limit,
    Not,
    On,
    Or,
    Order,
    Ordinality,
    Outer,
    Over,
    Overwrite,
    Partition,
    Preceding,
    Range,
    Recursive,
    Replace,
    Right,
    Rlike,
    Rows,
    SchemaComment,
    Select,
    Set,
    Stored,
    Table,
    Temporary,
    Then,
    Time,
    Unbounded,
    Union,
    Unnest,
    Update,
    Values,
    View,
    When,
    Where,
    With,
    Without,
    Zone,
}

/// The token kinds naming a data type.
pub const TYPE_TOKENS: &[TokenKind] = &[
    TokenKind::Boolean,
    TokenKind::TinyInt,
    TokenKind::SmallInt,
    TokenKind::Int,
    TokenKind::BigInt,
    TokenKind::Float,
    TokenKind::Double,
    TokenKind::Decimal,
    TokenKind::Char,
    TokenKind::VarChar,
    TokenKind::Text,
    TokenKind::Binary,
    TokenKind::Json,
    TokenKind::Timestamp,
    TokenKind::TimestampTz,
    TokenKind::Date,
    TokenKind::Array,
    TokenKind::Map,
];

/// Type keywords that double as function names or constructors. When one of
/// these is followed by `(` or `[` the type parser stands down and lets the
/// function and column paths take over.
pub const AMBIGUOUS_TOKENS: &[TokenKind] = &[TokenKind::Array, TokenKind::Date, TokenKind::Map];

/// The token kinds accepted where an identifier is expected. Many keywords
/// double as identifiers in permissive SQL.
pub const ID_VAR_TOKENS: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::Var,
    TokenKind::All,
    TokenKind::Asc,
    TokenKind::Collate,
    TokenKind::Count,
    TokenKind::Default,
    TokenKind::Desc,
    TokenKind::Engine,
    TokenKind::Following,
    TokenKind::Format,
    TokenKind::If,
    TokenKind::Interval,
    TokenKind::Ordinality,
    TokenKind::Over,
    TokenKind::Preceding,
    TokenKind::Range,
    TokenKind::Rows,
    TokenKind::SchemaComment,
    TokenKind::Unbounded,
    TokenKind::Boolean,
    TokenKind::TinyInt,
    TokenKind::SmallInt,
    TokenKind::Int,
    TokenKind::BigInt,
    TokenKind::Float,
    TokenKind::Double,
    TokenKind::Decimal,
    TokenKind::Char,
    TokenKind::VarChar,
    TokenKind::Text,
    TokenKind::Binary,
    TokenKind::Json,
    TokenKind::Timestamp,
    TokenKind::TimestampTz,
    TokenKind::Date,
    TokenKind::Array,
    TokenKind::Map,
];

/// The token kinds that open a primary expression on their own.
pub const PRIMARY_TOKENS: &[TokenKind] =
    &[TokenKind::String, TokenKind::Number, TokenKind::Star, TokenKind::Null];

/// The token kinds a column reference may be built from: the identifier set
/// plus `*`, minus `ARRAY` (which is a constructor in column position).
pub const COLUMN_TOKENS: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::Var,
    TokenKind::Star,
    TokenKind::All,
    TokenKind::Asc,
    TokenKind::Collate,
    TokenKind::Count,
    TokenKind::Default,
    TokenKind::Desc,
    TokenKind::Engine,
    TokenKind::Following,
    TokenKind::Format,
    TokenKind::If,
    TokenKind::Interval,
    TokenKind::Ordinality,
    TokenKind::Over,
    TokenKind::Preceding,
    TokenKind::Range,
    TokenKind::Rows,
    TokenKind::SchemaComment,
    TokenKind::Unbounded,
    TokenKind::Boolean,
    TokenKind::TinyInt,
    TokenKind::SmallInt,
    TokenKind::Int,
    TokenKind::BigInt,
    TokenKind::Float,
    TokenKind::Double,
    TokenKind::Decimal,
    TokenKind::Char,
    TokenKind::VarChar,
    TokenKind::Text,
    TokenKind::Binary,
    TokenKind::Json,
    TokenKind::Timestamp,
    TokenKind::TimestampTz,
    TokenKind::Date,
    TokenKind::Map,
];

/// The token kinds that terminate a column position without consuming.
pub const NON_COLUMN_TOKENS: &[TokenKind] =
    &[TokenKind::Comma, TokenKind::RightParen, TokenKind::When];

impl TokenKind {
    /// Whether this kind names a data type.
    pub fn is_type(self) -> bool {
        TYPE_TOKENS.contains(&self)
    }

    /// The canonical data type name for a type keyword, or [`None`].
    pub fn type_name(self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::TinyInt => "TINYINT",
            TokenKind::SmallInt => "SMALLINT",
            TokenKind::Int => "INT",
            TokenKind::BigInt => "BIGINT",
            TokenKind::Float => "FLOAT",
            TokenKind::Double => "DOUBLE",
            TokenKind::Decimal => "DECIMAL",
            TokenKind::Char => "CHAR",
            TokenKind::VarChar => "VARCHAR",
            TokenKind::Text => "TEXT",
            TokenKind::Binary => "BINARY",
            TokenKind::Json => "JSON",
            TokenKind::Timestamp => "TIMESTAMP",
            TokenKind::TimestampTz => "TIMESTAMPTZ",
            TokenKind::Date => "DATE",
            TokenKind::Array => "ARRAY",
            TokenKind::Map => "MAP",
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A token produced by the lexer: a kind, the original text, and the
/// 1-based line and column of the token's first character.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

impl Token {
    /// Returns a new token at the given source position.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, col: usize) -> Self {
        Self { kind, text: text.into(), line, col }
    }

    /// Returns a token with no real source position, anchored at line 1,
    /// column 1. Used for tokens the parser materializes itself.
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::new(kind, text, 1, 1)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.text)
    }
}
