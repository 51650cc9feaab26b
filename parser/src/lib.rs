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

//! The parser to convert SQL token streams into sqltree syntax trees.
//!
//! The parser consumes a list of [`Token`]s produced by an external lexer
//! and produces one [`Expression`](sqltree_ast::Expression) tree per SQL
//! statement. See [`Parser`] for the configuration knobs (extra registry
//! functions, error level, diagnostic context width).

#![forbid(unsafe_code)]

pub mod token;
pub use token::*;

pub mod functions;
pub use functions::FunctionBuilder;

pub mod parser;
pub use parser::*;

use sqltree_ast::Expression;
use sqltree_errors::{ParseError, Result};


/// Parses a token stream with a default [`Parser`], returning one tree per
/// statement. `source` is the original SQL text, used to render diagnostics.
pub fn parse(tokens: Vec<Token>, source: &str) -> Result<Vec<Option<Expression>>> {
    Parser::new().parse(tokens, source)
}

/// Parses a token stream and returns the first statement's tree.
pub fn parse_one(tokens: Vec<Token>, source: &str) -> Result<Expression> {
    parse(tokens, source)?
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| ParseError::new("No statement was parsed"))
}
