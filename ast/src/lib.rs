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

//! The core syntax tree of the sqltree library.
//!
//! A parsed statement is a tree of [`Expression`] nodes. Each node carries an
//! [`ExprKind`] tag and a mapping from named argument slots to child
//! [`Value`]s; the legal slots of every kind, and whether they are mandatory,
//! are declared once in the kind's [schema](ExprKind::arg_types).

#![forbid(unsafe_code)]

pub mod expression;
pub use expression::*;

pub mod kind;
pub use kind::*;
