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

//! The token view: a windowed cursor over the current statement's tokens
//! with one token of lookahead and lookbehind. All token consumption flows
//! through [`eat`](Parser::eat) / [`eat_any`](Parser::eat_any); tokens are
//! consumed strictly left to right and never backtracked over.

use super::{Arg, Parser};
use crate::TokenKind;
use crate::token::Token;

use sqltree_ast::ExprKind;
use sqltree_errors::Result;

impl Parser {
    /// Advances the cursor by one token, updating the
    /// `(prev, curr, next)` window.
    pub(crate) fn advance(&mut self) {
        self.index += 1;
        self.prev = std::mem::replace(&mut self.curr, self.tokens.get(self.index).cloned());
        self.next = self.tokens.get(self.index + 1).cloned();
    }

    /// Whether the current token has the given kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.curr.as_ref().is_some_and(|token| token.kind == kind)
    }

    /// The kind of the current token, if any.
    pub(crate) fn curr_kind(&self) -> Option<TokenKind> {
        self.curr.as_ref().map(|token| token.kind)
    }

    /// The kind of the upcoming token, if any.
    pub(crate) fn next_kind(&self) -> Option<TokenKind> {
        self.next.as_ref().map(|token| token.kind)
    }

    /// Consumes and returns the current token if its kind matches.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            self.advance();
            self.prev.clone()
        } else {
            None
        }
    }

    /// Consumes and returns the current token if its kind is one of
    /// `kinds`. This is the sole means of consuming tokens; every grammar
    /// decision flows through it.
    pub(crate) fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        let matched = self.curr.as_ref().is_some_and(|token| kinds.contains(&token.kind));
        if matched {
            self.advance();
            self.prev.clone()
        } else {
            None
        }
    }

    /// Parses `item {, item}` with `parse`, discarding items that come back
    /// empty. A comma with no following item is the inner parser's problem.
    pub(crate) fn parse_csv<T>(
        &mut self,
        mut parse: impl FnMut(&mut Self) -> Result<Option<T>>,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();

        if let Some(item) = parse(self)? {
            items.push(item);
        }
        while self.eat(TokenKind::Comma).is_some() {
            if let Some(item) = parse(self)? {
                items.push(item);
            }
        }

        Ok(items)
    }

    /// Parses a left-associative run of binary operators: `next` parses the
    /// operands, `ops` maps operator tokens to the node kind they build.
    pub(crate) fn parse_op_ladder(
        &mut self,
        ops: &[(TokenKind, ExprKind)],
        mut next: impl FnMut(&mut Self) -> Result<Option<Arg>>,
    ) -> Result<Option<Arg>> {
        let mut this = next(self)?;

        loop {
            let op = self
                .curr
                .as_ref()
                .and_then(|token| ops.iter().find(|(kind, _)| *kind == token.kind))
                .map(|(_, op)| *op);
            let Some(op) = op else { break };

            self.advance();
            let right = next(self)?;
            this = Some(Arg::Exp(self.expression(
                op,
                vec![("this", this.into()), ("expression", right.into())],
            )?));
        }

        Ok(this)
    }
}
