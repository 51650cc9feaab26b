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

//! Error types and the error policy machinery of the sqltree SQL front-end.

#![forbid(unsafe_code)]

pub mod emitter;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// A `Result` defaulting to sqltree's [`ParseError`].
pub type Result<T, E = ParseError> = core::result::Result<T, E>;

/// Determines what the parser does with a diagnostic.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ErrorLevel {
    /// Abort parsing of the current statement with a [`ParseError`].
    #[default]
    Raise,
    /// Log the diagnostic and keep parsing; the tree may be partially valid.
    Warn,
    /// Suppress diagnostics entirely; schema validation is skipped.
    Ignore,
}

/// An error raised while parsing a statement.
///
/// The message carries the fully rendered diagnostic, including the
/// 1-based line and column of the offending token and the surrounding
/// source context.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// The rendered diagnostic.
    pub message: String,
}

impl ParseError {
    /// Creates an error from an already rendered message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Renders a diagnostic of the form
    /// `<message>. Line L, Col: C.` followed by the source context with the
    /// offending token text underlined.
    pub fn rendered(
        message: &str,
        line: usize,
        col: usize,
        start_context: &str,
        highlight: &str,
        end_context: &str,
    ) -> Self {
        Self {
            message: format!(
                "{message}. Line {line}, Col: {col}.\n{start_context}{}{end_context}",
                highlight.underline()
            ),
        }
    }
}
