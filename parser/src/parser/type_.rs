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

//! The type grammar: INTERVAL literals, type tokens with their ambiguity
//! rules, the `::` cast operator, typed literals like `DATE '…'`, and
//! column definitions inside schemas.

use super::{Arg, Parser};
use crate::token::{AMBIGUOUS_TOKENS, PRIMARY_TOKENS, TYPE_TOKENS};
use crate::{Token, TokenKind};

use sqltree_ast::ExprKind;
use sqltree_errors::Result;

impl Parser {
    /// Parses the type rung of the ladder: INTERVAL, a typed literal
    /// (`DATE '…'` becomes a cast), a bare type, the `::` cast operator,
    /// or a primary with an optional column definition.
    pub(crate) fn parse_type(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Interval).is_some() {
            let this = self.eat_any(&[TokenKind::String, TokenKind::Number]);
            let unit = self.eat(TokenKind::Var);
            return Ok(Some(Arg::Exp(self.expression(
                ExprKind::Interval,
                vec![("this", this.into()), ("unit", unit.into())],
            )?)));
        }

        let type_token = self.parse_types()?;
        let this = self.parse_primary()?;

        if let Some(type_token) = type_token {
            if let Some(this) = this {
                return Ok(Some(Arg::Exp(self.expression(
                    ExprKind::Cast,
                    vec![("this", this.into()), ("to", type_token)],
                )?)));
            }
            return Ok(Some(type_token));
        }

        if self.eat(TokenKind::DColon).is_some() {
            let type_token = self.parse_types()?;
            if type_token.is_none() {
                self.raise_error("Expected type")?;
            }
            return Ok(Some(Arg::Exp(self.expression(
                ExprKind::Cast,
                vec![("this", this.into()), ("to", type_token.into())],
            )?)));
        }

        self.parse_column_def(this)
    }

    /// Consumes a type, or yields nothing when the current token is an
    /// ambiguous keyword followed by `(` or `[` (function or constructor
    /// position). `TIMESTAMP WITH TIME ZONE` collapses to TIMESTAMPTZ.
    pub(crate) fn parse_types(&mut self) -> Result<Option<Arg>> {
        let ambiguous = self
            .curr_kind()
            .is_some_and(|kind| AMBIGUOUS_TOKENS.contains(&kind))
            && self
                .next_kind()
                .is_some_and(|kind| matches!(kind, TokenKind::LeftParen | TokenKind::LeftBracket));
        if ambiguous {
            return Ok(None);
        }

        if self
            .eat_any(&[TokenKind::Timestamp, TokenKind::TimestampTz])
            .is_some()
        {
            let tz = self.eat(TokenKind::With).is_some();
            self.eat(TokenKind::Without);
            self.eat(TokenKind::Time);
            self.eat(TokenKind::Zone);

            if tz {
                return Ok(Some(Arg::Token(Token::synthetic(
                    TokenKind::TimestampTz,
                    "TIMESTAMPTZ",
                ))));
            }
            return Ok(Some(Arg::Token(Token::synthetic(TokenKind::Timestamp, "TIMESTAMP"))));
        }

        let type_token = self.eat_any(TYPE_TOKENS);
        self.parse_function(type_token.map(Arg::Token), false)
    }

    /// Attaches a column definition to `this` when a type follows, with the
    /// order-independent option set `NOT NULL / AUTO_INCREMENT / COLLATE /
    /// DEFAULT / COMMENT`.
    fn parse_column_def(&mut self, this: Option<Arg>) -> Result<Option<Arg>> {
        let Some(kind) = self.parse_types()? else {
            return Ok(this);
        };

        let mut not_null = false;
        let mut auto_increment = false;
        let mut collate: Option<Token> = None;
        let mut default: Option<Token> = None;
        let mut comment: Option<Token> = None;

        let mut parsed = true;
        while parsed {
            parsed = false;

            if !auto_increment && self.eat(TokenKind::AutoIncrement).is_some() {
                auto_increment = true;
                parsed = true;
            }
            if collate.is_none() && self.eat(TokenKind::Collate).is_some() {
                collate = self.eat(TokenKind::Var);
                parsed = collate.is_some();
            }
            if default.is_none() && self.eat(TokenKind::Default).is_some() {
                default = self.eat_any(PRIMARY_TOKENS);
                parsed = default.is_some();
            }
            if !not_null && self.eat(TokenKind::Not).is_some() {
                not_null = self.eat(TokenKind::Null).is_some();
                parsed = not_null;
            }
            if comment.is_none() && self.eat(TokenKind::SchemaComment).is_some() {
                comment = self.eat(TokenKind::String);
                parsed = comment.is_some();
            }
        }

        Ok(Some(Arg::Exp(self.expression(
            ExprKind::ColumnDef,
            vec![
                ("this", this.into()),
                ("kind", kind),
                ("not_null", not_null.into()),
                ("auto_increment", auto_increment.into()),
                ("collate", collate.into()),
                ("comment", comment.into()),
                ("default", default.into()),
            ],
        )?)))
    }
}
