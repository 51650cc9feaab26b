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

/// The argument slot schema of a node kind: each entry is a slot name and
/// whether the slot is mandatory.
pub type ArgTypes = &'static [(&'static str, bool)];

const NO_ARGS: ArgTypes = &[];
const UNARY: ArgTypes = &[("this", true)];
const BINARY: ArgTypes = &[("this", true), ("expression", true)];

/// The tag of a syntax tree node.
///
/// Binary operators each get their own kind so that a tree can be matched on
/// without inspecting argument slots.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    // Statements.
    Create,
    Drop,
    Insert,
    Update,

    // Queries and clauses.
    Cte,
    Select,
    Union,
    Values,
    Tuple,
    Hint,
    From,
    Lateral,
    Join,
    Where,
    Group,
    Having,
    Order,
    Ordered,
    Limit,

    // Tables and schemas.
    Table,
    Schema,
    ColumnDef,
    FileFormat,
    CharacterSet,
    Unnest,

    // Leaves and access.
    Alias,
    Column,
    Dot,
    Bracket,
    Paren,
    Identifier,
    Literal,
    Star,
    Null,
    DataType,

    // Conjunctions, predicates and comparisons.
    And,
    Or,
    Eq,
    Neq,
    Is,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    RegexpLike,
    In,
    Between,

    // Arithmetic and bitwise operators.
    Plus,
    Minus,
    Mul,
    Div,
    IntDiv,
    Mod,
    DPipe,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseLeftShift,
    BitwiseRightShift,

    // Unary operators.
    Not,
    BitwiseNot,
    Neg,

    // Type expressions.
    Cast,
    Interval,
    Decimal,

    // Conditionals and windows.
    Case,
    If,
    Window,
    WindowSpec,

    // Functions.
    Anonymous,
    Abs,
    ApproxDistinct,
    Array,
    ArrayAgg,
    ArrayContains,
    ArraySize,
    Avg,
    Ceil,
    Coalesce,
    Concat,
    Count,
    DateAdd,
    DateDiff,
    Day,
    Extract,
    Floor,
    Greatest,
    Initcap,
    JsonExtract,
    Least,
    Length,
    Ln,
    Log2,
    Log10,
    Lower,
    Max,
    Min,
    Month,
    Pow,
    Quantile,
    Round,
    Sqrt,
    StrPosition,
    StrToTime,
    StrToUnix,
    Sum,
    TimeToStr,
    TimeToUnix,
    UnixToStr,
    UnixToTime,
    Upper,
    Year,
}

/// The function kinds that seed the parser's registry, each under the SQL
/// names reported by [`ExprKind::sql_names`].
pub const FUNCTION_KINDS: &[ExprKind] = &[
    ExprKind::Abs,
    ExprKind::ApproxDistinct,
    ExprKind::Array,
    ExprKind::ArrayAgg,
    ExprKind::ArrayContains,
    ExprKind::ArraySize,
    ExprKind::Avg,
    ExprKind::Ceil,
    ExprKind::Coalesce,
    ExprKind::Concat,
    ExprKind::Count,
    ExprKind::DateAdd,
    ExprKind::DateDiff,
    ExprKind::Day,
    ExprKind::Extract,
    ExprKind::Floor,
    ExprKind::Greatest,
    ExprKind::If,
    ExprKind::Initcap,
    ExprKind::JsonExtract,
    ExprKind::Least,
    ExprKind::Length,
    ExprKind::Ln,
    ExprKind::Log2,
    ExprKind::Log10,
    ExprKind::Lower,
    ExprKind::Max,
    ExprKind::Min,
    ExprKind::Month,
    ExprKind::Pow,
    ExprKind::Quantile,
    ExprKind::Round,
    ExprKind::Sqrt,
    ExprKind::StrPosition,
    ExprKind::StrToTime,
    ExprKind::StrToUnix,
    ExprKind::Sum,
    ExprKind::TimeToStr,
    ExprKind::TimeToUnix,
    ExprKind::UnixToStr,
    ExprKind::UnixToTime,
    ExprKind::Upper,
    ExprKind::Year,
];

impl ExprKind {
    /// The argument slot schema of this kind.
    pub fn arg_types(self) -> ArgTypes {
        use ExprKind::*;
        match self {
            Create => &[
                ("this", true),
                ("kind", true),
                ("expression", false),
                ("exists", false),
                ("file_format", false),
                ("temporary", false),
                ("replace", false),
                ("engine", false),
                ("auto_increment", false),
                ("character_set", false),
                ("collate", false),
                ("comment", false),
            ],
            Drop => &[("this", false), ("kind", false), ("exists", false)],
            Insert => &[("this", true), ("expression", true), ("overwrite", false), ("exists", false)],
            Update => &[("this", true), ("expressions", true), ("where", false)],

            Cte => &[("this", true), ("expressions", true), ("recursive", false)],
            Select => &[
                ("hint", false),
                ("distinct", false),
                ("expressions", true),
                ("from", false),
                ("laterals", false),
                ("joins", false),
                ("where", false),
                ("group", false),
                ("having", false),
                ("order", false),
                ("limit", false),
            ],
            Union => &[("this", true), ("expression", true), ("distinct", false)],
            Values => &[("expressions", true)],
            Tuple => &[("expressions", false)],
            Hint => UNARY,
            From => &[("expressions", true)],
            Lateral => &[("this", true), ("outer", false), ("table", false), ("columns", false)],
            Join => &[("this", true), ("on", false), ("side", false), ("kind", false)],
            Where => UNARY,
            Group => &[("expressions", true)],
            Having => UNARY,
            Order => &[("expressions", true)],
            Ordered => &[("this", true), ("desc", false)],
            Limit => UNARY,

            Table => &[("this", true), ("db", false)],
            Schema => &[("this", false), ("expressions", false)],
            ColumnDef => &[
                ("this", true),
                ("kind", true),
                ("not_null", false),
                ("auto_increment", false),
                ("collate", false),
                ("comment", false),
                ("default", false),
            ],
            FileFormat => UNARY,
            CharacterSet => &[("this", true), ("default", false)],
            Unnest => &[("expressions", true), ("ordinality", false), ("table", false), ("columns", false)],

            Alias => &[("this", true), ("alias", false)],
            Column => &[("this", true), ("db", false), ("table", false)],
            Dot => BINARY,
            Bracket => &[("this", true), ("expressions", false)],
            Paren => UNARY,
            Identifier => &[("this", true), ("quoted", false)],
            Literal => &[("this", true), ("is_string", true)],
            Star | Null => NO_ARGS,
            DataType => UNARY,

            And | Or | Eq | Neq | Is | Gt | Gte | Lt | Lte | Like | RegexpLike => BINARY,
            In => &[("this", true), ("expressions", false), ("query", false)],
            Between => &[("this", true), ("low", true), ("high", true)],

            Plus | Minus | Mul | Div | IntDiv | Mod | DPipe => BINARY,
            BitwiseAnd | BitwiseOr | BitwiseXor | BitwiseLeftShift | BitwiseRightShift => BINARY,

            Not | BitwiseNot | Neg => UNARY,

            Cast => &[("this", true), ("to", true)],
            Interval => &[("this", true), ("unit", false)],
            Decimal => &[("precision", false), ("scale", false)],

            Case => &[("this", false), ("ifs", true), ("default", false)],
            If => &[("this", true), ("true", true), ("false", false)],
            Window => &[("this", true), ("partition", false), ("order", false), ("spec", false)],
            WindowSpec => &[
                ("kind", false),
                ("start", false),
                ("start_side", false),
                ("end", false),
                ("end_side", false),
            ],

            Anonymous => &[("this", true), ("expressions", false)],
            // An empty array literal `ARRAY[]` is legal.
            Array => &[("expressions", false)],
            Concat => &[("expressions", true)],
            Coalesce | Greatest | Least => &[("this", true), ("expressions", false)],
            ArrayContains | DateAdd | DateDiff | JsonExtract => BINARY,
            Count => &[("this", true), ("distinct", false)],
            Extract => BINARY,
            Pow => &[("this", true), ("power", true)],
            Quantile => &[("this", true), ("quantile", true)],
            Round => &[("this", true), ("decimals", false)],
            StrPosition => &[("this", true), ("substr", true)],
            StrToTime | StrToUnix | TimeToStr | UnixToStr => &[("this", true), ("format", false)],
            Abs | ApproxDistinct | ArrayAgg | ArraySize | Avg | Ceil | Day | Floor | Initcap | Length
            | Ln | Log2 | Log10 | Lower | Max | Min | Month | Sqrt | Sum | TimeToUnix | UnixToTime
            | Upper | Year => UNARY,
        }
    }

    /// Whether the final slot of this kind absorbs surplus positional
    /// arguments when the node is built from an argument list.
    pub fn is_var_len_args(self) -> bool {
        use ExprKind::*;
        matches!(self, Anonymous | Array | Coalesce | Concat | Greatest | Least)
    }

    /// The SQL names a function kind answers to in the registry. Empty for
    /// kinds that are not callable functions.
    pub fn sql_names(self) -> &'static [&'static str] {
        use ExprKind::*;
        match self {
            Abs => &["ABS"],
            ApproxDistinct => &["APPROX_DISTINCT"],
            Array => &["ARRAY"],
            ArrayAgg => &["ARRAY_AGG"],
            ArrayContains => &["ARRAY_CONTAINS"],
            ArraySize => &["ARRAY_SIZE"],
            Avg => &["AVG"],
            Ceil => &["CEIL", "CEILING"],
            Coalesce => &["COALESCE", "IFNULL"],
            Concat => &["CONCAT"],
            Count => &["COUNT"],
            DateAdd => &["DATE_ADD"],
            DateDiff => &["DATE_DIFF"],
            Day => &["DAY"],
            Extract => &["EXTRACT"],
            Floor => &["FLOOR"],
            Greatest => &["GREATEST"],
            If => &["IF"],
            Initcap => &["INITCAP"],
            JsonExtract => &["JSON_EXTRACT"],
            Least => &["LEAST"],
            Length => &["LENGTH"],
            Ln => &["LN"],
            Log2 => &["LOG2"],
            Log10 => &["LOG10"],
            Lower => &["LOWER"],
            Max => &["MAX"],
            Min => &["MIN"],
            Month => &["MONTH"],
            Pow => &["POW", "POWER"],
            Quantile => &["QUANTILE"],
            Round => &["ROUND"],
            Sqrt => &["SQRT"],
            StrPosition => &["STR_POSITION"],
            StrToTime => &["STR_TO_TIME"],
            StrToUnix => &["STR_TO_UNIX"],
            Sum => &["SUM"],
            TimeToStr => &["TIME_TO_STR"],
            TimeToUnix => &["TIME_TO_UNIX"],
            UnixToStr => &["UNIX_TO_STR"],
            UnixToTime => &["UNIX_TO_TIME"],
            Upper => &["UPPER"],
            Year => &["YEAR"],
            _ => &[],
        }
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
