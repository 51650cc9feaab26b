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

use crate::{ErrorLevel, ParseError, Result};

use std::cell::RefCell;

/// Used to side-channel emit errors from the parser.
///
/// Every diagnostic flows through [`Handler::emit_err`], which records it as
/// the most recent error and then applies the configured [`ErrorLevel`]:
/// raise it, log it, or swallow it. The most recent error is retained
/// regardless of the level so callers can inspect it after the fact.
#[derive(Debug, Default)]
pub struct Handler {
    level: ErrorLevel,
    last_err: RefCell<Option<ParseError>>,
}

impl Handler {
    /// Returns a new `Handler` applying the given error level.
    pub fn new(level: ErrorLevel) -> Self {
        Self { level, last_err: RefCell::new(None) }
    }

    /// The error level this handler applies.
    pub fn level(&self) -> ErrorLevel {
        self.level
    }

    /// Emit the error `err`.
    pub fn emit_err(&self, err: ParseError) -> Result<()> {
        self.last_err.borrow_mut().replace(err.clone());

        match self.level {
            ErrorLevel::Raise => Err(err),
            ErrorLevel::Warn => {
                tracing::error!("{err}");
                Ok(())
            }
            ErrorLevel::Ignore => Ok(()),
        }
    }

    /// The most recently emitted error, if any.
    pub fn last_err(&self) -> Option<ParseError> {
        self.last_err.borrow().clone()
    }

    /// Forgets the most recently emitted error.
    pub fn clear_last_err(&self) {
        self.last_err.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_returns_the_error() {
        let handler = Handler::default();
        let err = ParseError::new("boom");
        assert_eq!(handler.emit_err(err.clone()), Err(err.clone()));
        assert_eq!(handler.last_err(), Some(err));
    }

    #[test]
    fn warn_and_ignore_continue() {
        for level in [ErrorLevel::Warn, ErrorLevel::Ignore] {
            let handler = Handler::new(level);
            assert_eq!(handler.emit_err(ParseError::new("boom")), Ok(()));
            assert_eq!(handler.last_err(), Some(ParseError::new("boom")));
        }
    }

    #[test]
    fn last_error_tracks_the_most_recent_diagnostic() {
        let handler = Handler::new(ErrorLevel::Ignore);
        handler.emit_err(ParseError::new("first")).unwrap();
        handler.emit_err(ParseError::new("second")).unwrap();
        assert_eq!(handler.last_err(), Some(ParseError::new("second")));

        handler.clear_last_err();
        assert_eq!(handler.last_err(), None);
    }

    #[test]
    fn rendered_diagnostics_carry_position_and_context() {
        let err = ParseError::rendered("Expecting )", 1, 8, "SELECT ", "(", "a FROM t");
        assert!(err.message.starts_with("Expecting ). Line 1, Col: 8.\n"));
        assert!(err.message.contains("SELECT "));
        assert!(err.message.contains("a FROM t"));
    }
}
