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

//! The expression grammar: the precedence ladder from conjunctions down to
//! primaries, plus columns, function calls, CASE, windows and bracket
//! access. Each rung parses its operands with the next rung and folds
//! left-associative operators with the generic ladder loop.

use super::{coerce, Arg, Parser};
use crate::token::{COLUMN_TOKENS, ID_VAR_TOKENS, NON_COLUMN_TOKENS, PRIMARY_TOKENS, TYPE_TOKENS};
use crate::{Token, TokenKind};

use sqltree_ast::{ExprKind, Expression};
use sqltree_errors::Result;

const CONJUNCTION: &[(TokenKind, ExprKind)] =
    &[(TokenKind::And, ExprKind::And), (TokenKind::Or, ExprKind::Or)];

const EQUALITY: &[(TokenKind, ExprKind)] = &[
    (TokenKind::Eq, ExprKind::Eq),
    (TokenKind::Neq, ExprKind::Neq),
    (TokenKind::Is, ExprKind::Is),
];

const COMPARISON: &[(TokenKind, ExprKind)] = &[
    (TokenKind::Gt, ExprKind::Gt),
    (TokenKind::Gte, ExprKind::Gte),
    (TokenKind::Lt, ExprKind::Lt),
    (TokenKind::Lte, ExprKind::Lte),
];

const BITWISE: &[(TokenKind, ExprKind)] = &[
    (TokenKind::LShift, ExprKind::BitwiseLeftShift),
    (TokenKind::RShift, ExprKind::BitwiseRightShift),
    (TokenKind::Amp, ExprKind::BitwiseAnd),
    (TokenKind::Caret, ExprKind::BitwiseXor),
    (TokenKind::Pipe, ExprKind::BitwiseOr),
    (TokenKind::DPipe, ExprKind::DPipe),
];

const TERM: &[(TokenKind, ExprKind)] = &[
    (TokenKind::Dash, ExprKind::Minus),
    (TokenKind::Plus, ExprKind::Plus),
    (TokenKind::Mod, ExprKind::Mod),
];

const FACTOR: &[(TokenKind, ExprKind)] = &[
    (TokenKind::Div, ExprKind::IntDiv),
    (TokenKind::Slash, ExprKind::Div),
    (TokenKind::Star, ExprKind::Mul),
];

impl Parser {
    /// Parses a full expression: a conjunction with an optional trailing
    /// alias.
    pub(crate) fn parse_expression(&mut self) -> Result<Option<Arg>> {
        let this = self.parse_conjunction()?;
        self.parse_alias(this)
    }

    pub(crate) fn parse_conjunction(&mut self) -> Result<Option<Arg>> {
        self.parse_op_ladder(CONJUNCTION, Self::parse_equality)
    }

    pub(crate) fn parse_equality(&mut self) -> Result<Option<Arg>> {
        self.parse_op_ladder(EQUALITY, Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Result<Option<Arg>> {
        self.parse_op_ladder(COMPARISON, Self::parse_range)
    }

    /// Parses range predicates: `[NOT] LIKE / RLIKE / IN (…) / BETWEEN`.
    fn parse_range(&mut self) -> Result<Option<Arg>> {
        let mut this = self.parse_bitwise()?;

        let negate = self.eat(TokenKind::Not).is_some();

        if self.eat(TokenKind::Like).is_some() {
            let pattern = self.parse_term()?;
            this = Some(Arg::Exp(self.expression(
                ExprKind::Like,
                vec![("this", this.into()), ("expression", pattern.into())],
            )?));
        } else if self.eat(TokenKind::Rlike).is_some() {
            let pattern = self.parse_term()?;
            this = Some(Arg::Exp(self.expression(
                ExprKind::RegexpLike,
                vec![("this", this.into()), ("expression", pattern.into())],
            )?));
        } else if self.eat(TokenKind::In).is_some() {
            if self.eat(TokenKind::LeftParen).is_none() {
                let prev = self.prev.clone();
                self.raise_error_at("Expected ( after IN", prev)?;
            }

            let query = self.parse_select()?;
            this = Some(Arg::Exp(match query {
                Some(query) => self.expression(
                    ExprKind::In,
                    vec![("this", this.into()), ("query", query.into())],
                )?,
                None => {
                    let expressions = self.parse_csv(Self::parse_term)?;
                    self.expression(
                        ExprKind::In,
                        vec![("this", this.into()), ("expressions", Arg::List(expressions))],
                    )?
                }
            }));

            if self.eat(TokenKind::RightParen).is_none() {
                self.raise_error("Expected ) after IN")?;
            }
        } else if self.eat(TokenKind::Between).is_some() {
            let low = self.parse_term()?;
            self.eat(TokenKind::And);
            let high = self.parse_term()?;
            this = Some(Arg::Exp(self.expression(
                ExprKind::Between,
                vec![("this", this.into()), ("low", low.into()), ("high", high.into())],
            )?));
        }

        if negate {
            this = Some(Arg::Exp(
                self.expression(ExprKind::Not, vec![("this", this.into())])?,
            ));
        }

        Ok(this)
    }

    pub(crate) fn parse_bitwise(&mut self) -> Result<Option<Arg>> {
        self.parse_op_ladder(BITWISE, Self::parse_term)
    }

    pub(crate) fn parse_term(&mut self) -> Result<Option<Arg>> {
        self.parse_op_ladder(TERM, Self::parse_factor)
    }

    fn parse_factor(&mut self) -> Result<Option<Arg>> {
        self.parse_op_ladder(FACTOR, Self::parse_unary)
    }

    fn parse_unary(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Not).is_some() {
            let operand = self.parse_unary()?;
            return Ok(Some(Arg::Exp(
                self.expression(ExprKind::Not, vec![("this", operand.into())])?,
            )));
        }
        if self.eat(TokenKind::Tilda).is_some() {
            let operand = self.parse_unary()?;
            return Ok(Some(Arg::Exp(
                self.expression(ExprKind::BitwiseNot, vec![("this", operand.into())])?,
            )));
        }
        if self.eat(TokenKind::Dash).is_some() {
            let operand = self.parse_unary()?;
            return Ok(Some(Arg::Exp(
                self.expression(ExprKind::Neg, vec![("this", operand.into())])?,
            )));
        }
        self.parse_type()
    }

    /// Parses a primary: a literal, `*`, NULL, a parenthesized query or
    /// conjunction, or a column.
    pub(crate) fn parse_primary(&mut self) -> Result<Option<Arg>> {
        if let Some(token) = self.eat_any(PRIMARY_TOKENS) {
            return Ok(Some(Arg::Token(token)));
        }

        if let Some(paren) = self.eat(TokenKind::LeftParen) {
            let this = match self.parse_select()? {
                Some(query) => Some(query),
                None => self.parse_conjunction()?,
            };

            if self.eat(TokenKind::RightParen).is_none() {
                self.raise_error_at("Expecting )", Some(paren))?;
            }
            return Ok(Some(Arg::Exp(
                self.expression(ExprKind::Paren, vec![("this", this.into())])?,
            )));
        }

        if self.curr.is_none() {
            self.raise_error("Expecting expression")?;
            return Ok(None);
        }

        self.parse_column()
    }

    /// Parses a possibly qualified column reference, including function
    /// calls and bracket access rooted at the same token.
    fn parse_column(&mut self) -> Result<Option<Arg>> {
        let Some(kind) = self.curr_kind() else { return Ok(None) };
        if NON_COLUMN_TOKENS.contains(&kind) {
            return Ok(None);
        }

        self.advance();
        let head = self.prev.clone().map(Arg::Token);
        let mut this = self.parse_function(head, false)?;
        let mut table: Option<Arg> = None;
        let mut db: Option<Arg> = None;

        // Consume up to `db.table.col`; deeper qualification becomes Dot
        // expressions below.
        while db.is_none() && self.eat(TokenKind::Dot).is_some() {
            if table.is_some() {
                db = table.take();
            }
            table = this.take();
            this = self.eat_any(COLUMN_TOKENS).map(Arg::Token);
        }

        if matches!(&this, Some(Arg::Token(token)) if COLUMN_TOKENS.contains(&token.kind)) {
            this = Some(Arg::Exp(self.expression(
                ExprKind::Column,
                vec![("this", this.into()), ("db", db.into()), ("table", table.into())],
            )?));
        }

        let this = self.parse_dot(this)?;
        self.parse_brackets(this)
    }

    /// Parses a function-shaped construct rooted at a consumed token.
    ///
    /// CASE takes over before any parenthesis; CAST, COUNT and EXTRACT have
    /// dedicated parsers; otherwise the argument list is parsed and handed
    /// to the registry builder, a `Schema` node (in schema mode), or an
    /// `Anonymous` fallback. Every result gets a chance at a window clause.
    /// Values that are already nodes pass through untouched.
    pub(crate) fn parse_function(&mut self, this: Option<Arg>, schema: bool) -> Result<Option<Arg>> {
        let Some(this) = this else { return Ok(None) };
        let token = match this {
            Arg::Token(token) => token,
            other => return Ok(Some(other)),
        };

        if token.kind == TokenKind::Case {
            return self.parse_case();
        }
        if self.eat(TokenKind::LeftParen).is_none() {
            return Ok(Some(Arg::Token(token)));
        }

        let this = match token.kind {
            TokenKind::Cast => self.parse_cast()?,
            TokenKind::Count => self.parse_count()?,
            TokenKind::Extract => self.parse_extract()?,
            _ => {
                let args = self.parse_csv(Self::parse_conjunction)?;

                if schema {
                    self.expression(
                        ExprKind::Schema,
                        vec![("this", Arg::Token(token)), ("expressions", Arg::List(args))],
                    )?
                } else if let Some(builder) = self.functions.get(&token.text.to_uppercase()).cloned()
                {
                    let values: Vec<_> = args.into_iter().filter_map(coerce).collect();
                    let arg_count = values.len();

                    let built = builder(values);
                    self.validate_expression(&built)?;

                    let max_args = built.kind().arg_types().len();
                    if arg_count > max_args && !built.kind().is_var_len_args() {
                        self.raise_error(&format!(
                            "The number of provided arguments ({arg_count}) is greater than \
                             the maximum number of supported arguments ({max_args})"
                        ))?;
                    }
                    built
                } else {
                    self.expression(
                        ExprKind::Anonymous,
                        vec![("this", Arg::Str(token.text)), ("expressions", Arg::List(args))],
                    )?
                }
            }
        };

        if self.eat(TokenKind::RightParen).is_none() {
            self.raise_error("Expected )")?;
        }

        self.parse_window(Arg::Exp(this))
    }

    /// `CASE [expr] {WHEN cond THEN result}+ [ELSE default] END`.
    fn parse_case(&mut self) -> Result<Option<Arg>> {
        let mut ifs = Vec::new();
        let mut default = None;

        let this = self.parse_conjunction()?;

        while self.eat(TokenKind::When).is_some() {
            let condition = self.parse_conjunction()?;
            self.eat(TokenKind::Then);
            let then = self.parse_conjunction()?;
            ifs.push(Arg::Exp(self.expression(
                ExprKind::If,
                vec![("this", condition.into()), ("true", then.into())],
            )?));
        }

        if self.eat(TokenKind::Else).is_some() {
            default = self.parse_conjunction()?;
        }

        if self.eat(TokenKind::End).is_none() {
            let prev = self.prev.clone();
            self.raise_error_at("Expected END after CASE", prev)?;
        }

        let case = self.expression(
            ExprKind::Case,
            vec![("this", this.into()), ("ifs", Arg::List(ifs)), ("default", default.into())],
        )?;
        self.parse_brackets(Some(Arg::Exp(case)))
    }

    /// `COUNT([DISTINCT] expr)`; the opening parenthesis is already
    /// consumed.
    fn parse_count(&mut self) -> Result<Expression> {
        let distinct = self.eat(TokenKind::Distinct).is_some();
        let this = self.parse_conjunction()?;
        self.expression(
            ExprKind::Count,
            vec![("distinct", distinct.into()), ("this", this.into())],
        )
    }

    /// `EXTRACT(unit FROM expr)`; the opening parenthesis is already
    /// consumed.
    fn parse_extract(&mut self) -> Result<Expression> {
        let this = self.eat(TokenKind::Var);

        if self.eat(TokenKind::From).is_none() {
            let prev = self.prev.clone();
            self.raise_error_at("Expected FROM after EXTRACT", prev)?;
        }

        let expression = self.parse_type()?;
        self.expression(
            ExprKind::Extract,
            vec![("this", this.into()), ("expression", expression.into())],
        )
    }

    /// The function form of CAST: `CAST(expr AS type)`; the opening
    /// parenthesis is already consumed.
    fn parse_cast(&mut self) -> Result<Expression> {
        let this = self.parse_conjunction()?;

        if self.eat(TokenKind::As).is_none() {
            self.raise_error("Expected AS after CAST")?;
        }

        let type_token = self.eat_any(TYPE_TOKENS);
        if type_token.is_none() {
            self.raise_error("Expected TYPE after CAST")?;
        }

        let bracketed = self.parse_brackets(type_token.map(Arg::Token))?;
        let to = self.parse_function(bracketed, false)?;
        self.expression(ExprKind::Cast, vec![("this", this.into()), ("to", to.into())])
    }

    /// An optional `OVER (…)` window clause after a function call.
    fn parse_window(&mut self, this: Arg) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Over).is_none() {
            return Ok(Some(this));
        }

        if self.eat(TokenKind::LeftParen).is_none() {
            self.raise_error("Expecting ( after OVER")?;
        }

        let mut partition = None;
        if self.eat(TokenKind::Partition).is_some() {
            partition = Some(Arg::List(self.parse_csv(Self::parse_type)?));
        }

        let order = self.parse_order()?;

        let mut spec = None;
        if let Some(kind) = self.eat_any(&[TokenKind::Rows, TokenKind::Range]) {
            self.eat(TokenKind::Between);
            let (start, start_side) = self.parse_window_spec()?;
            self.eat(TokenKind::And);
            let (end, end_side) = self.parse_window_spec()?;

            spec = Some(Arg::Exp(self.expression(
                ExprKind::WindowSpec,
                vec![
                    ("kind", Arg::Token(kind)),
                    ("start", start.into()),
                    ("start_side", start_side.into()),
                    ("end", end.into()),
                    ("end_side", end_side.into()),
                ],
            )?));
        }

        if self.eat(TokenKind::RightParen).is_none() {
            self.raise_error("Expecting )")?;
        }

        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Window,
            vec![
                ("this", this),
                ("partition", partition.into()),
                ("order", order.into()),
                ("spec", spec.into()),
            ],
        )?)))
    }

    /// One endpoint of a window frame: `UNBOUNDED | CURRENT ROW | expr`,
    /// optionally followed by `PRECEDING` / `FOLLOWING`.
    fn parse_window_spec(&mut self) -> Result<(Option<Arg>, Option<Token>)> {
        self.eat(TokenKind::Between);

        let value = match self.eat_any(&[TokenKind::Unbounded, TokenKind::CurrentRow]) {
            Some(token) => Some(Arg::Token(token)),
            None => self.parse_bitwise()?,
        };
        let side = self.eat_any(&[TokenKind::Preceding, TokenKind::Following]);

        Ok((value, side))
    }

    /// Bracket access `x[i, j]`, with `ARRAY[…]` building an array literal
    /// instead. Chained brackets and trailing dots are folded in.
    pub(crate) fn parse_brackets(&mut self, this: Option<Arg>) -> Result<Option<Arg>> {
        if self.eat(TokenKind::LeftBracket).is_none() {
            return Ok(this);
        }

        let expressions = self.parse_csv(Self::parse_conjunction)?;

        let bracket = if matches!(&this, Some(Arg::Token(token)) if token.kind == TokenKind::Array) {
            self.expression(ExprKind::Array, vec![("expressions", Arg::List(expressions))])?
        } else {
            self.expression(
                ExprKind::Bracket,
                vec![("this", this.into()), ("expressions", Arg::List(expressions))],
            )?
        };

        if self.eat(TokenKind::RightBracket).is_none() {
            self.raise_error("Expected ]")?;
        }

        let dotted = self.parse_dot(Some(Arg::Exp(bracket)))?;
        self.parse_brackets(dotted)
    }

    /// Folds trailing `.field` accesses into left-leaning Dot expressions.
    fn parse_dot(&mut self, this: Option<Arg>) -> Result<Option<Arg>> {
        let mut this = this;
        while self.eat(TokenKind::Dot).is_some() {
            let field = self.parse_id_var();
            this = Some(Arg::Exp(self.expression(
                ExprKind::Dot,
                vec![("this", this.into()), ("expression", field.into())],
            )?));
        }
        Ok(this)
    }

    /// An optional `[AS] alias` suffix.
    ///
    /// A node with no alias of its own still gets an `Alias` wrapper with an
    /// empty alias slot, so aliased and unaliased results share one shape.
    /// Plain columns and tables (and existing aliases) stay bare.
    pub(crate) fn parse_alias(&mut self, this: Option<Arg>) -> Result<Option<Arg>> {
        self.eat(TokenKind::As);

        if let Some(alias) = self.parse_id_var() {
            return Ok(Some(Arg::Exp(self.expression(
                ExprKind::Alias,
                vec![("this", this.into()), ("alias", Arg::Token(alias))],
            )?)));
        }

        match this {
            Some(Arg::Exp(node))
                if !matches!(node.kind(), ExprKind::Alias | ExprKind::Column | ExprKind::Table) =>
            {
                Ok(Some(Arg::Exp(self.expression(
                    ExprKind::Alias,
                    vec![("this", Arg::Exp(node)), ("alias", Arg::None)],
                )?)))
            }
            other => Ok(other),
        }
    }

    /// Consumes an identifier-flavored token, keywords included.
    pub(crate) fn parse_id_var(&mut self) -> Option<Token> {
        self.eat_any(ID_VAR_TOKENS)
    }
}
