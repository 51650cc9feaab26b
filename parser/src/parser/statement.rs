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

//! The statement grammar: CREATE / DROP / INSERT / UPDATE heads, CTEs, the
//! SELECT pipeline with its clauses, VALUES, tables, joins, laterals and
//! UNNEST.

use super::{Arg, Parser};
use crate::{Token, TokenKind};

use sqltree_ast::{ExprKind, Expression};
use sqltree_errors::Result;

/// How a parsed table expression gets its alias.
pub(crate) enum TableAlias {
    /// Parse an optional trailing `[AS] alias`.
    Trailing,
    /// No alias: return the table expression bare.
    Bare,
    /// Wrap with the given, already parsed alias (CTE bindings).
    Explicit(Option<Arg>),
}

impl Parser {
    /// Parses one statement: a CREATE / DROP / INSERT / UPDATE head, or a
    /// (possibly CTE-prefixed) query, or a bare expression.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Arg>> {
        if self.curr.is_none() {
            return Ok(None);
        }

        if self.eat(TokenKind::Create).is_some() {
            let create = self.parse_create()?;
            return Ok(Some(Arg::Exp(create)));
        }
        if self.eat(TokenKind::Drop).is_some() {
            let drop = self.parse_drop()?;
            return Ok(Some(Arg::Exp(drop)));
        }
        if self.eat(TokenKind::Insert).is_some() {
            let insert = self.parse_insert()?;
            return Ok(Some(Arg::Exp(insert)));
        }
        if self.eat(TokenKind::Update).is_some() {
            let update = self.parse_update()?;
            return Ok(Some(Arg::Exp(update)));
        }

        if let Some(cte) = self.parse_cte()? {
            return Ok(Some(cte));
        }

        self.parse_expression()
    }

    /// `DROP {TABLE | VIEW} [IF EXISTS] name`.
    fn parse_drop(&mut self) -> Result<Expression> {
        let kind = if self.eat(TokenKind::Table).is_some() {
            Some("table")
        } else if self.eat(TokenKind::View).is_some() {
            Some("view")
        } else {
            self.raise_error("Expected TABLE or View")?;
            None
        };

        let exists = self.parse_exists(false);
        let this = self.parse_table_mode(TableAlias::Bare, false)?;
        self.expression(
            ExprKind::Drop,
            vec![("exists", exists.into()), ("this", this.into()), ("kind", kind.into())],
        )
    }

    /// Consumes `IF [NOT] EXISTS`, returning whether the full phrase was
    /// present.
    fn parse_exists(&mut self, not_: bool) -> bool {
        self.eat(TokenKind::If).is_some()
            && (!not_ || self.eat(TokenKind::Not).is_some())
            && self.eat(TokenKind::Exists).is_some()
    }

    /// The CREATE head; the CREATE token is already consumed.
    fn parse_create(&mut self) -> Result<Expression> {
        let temporary = self.eat(TokenKind::Temporary).is_some();
        let replace = self.eat(TokenKind::Or).is_some() && self.eat(TokenKind::Replace).is_some();

        let create_token = self.eat_any(&[TokenKind::Table, TokenKind::View]);
        if create_token.is_none() {
            self.raise_error("Expected TABLE or View")?;
        }

        let exists = self.parse_exists(true);
        let this = self.parse_table_mode(TableAlias::Bare, true)?;
        let mut expression = None;
        let mut file_format = None;

        if create_token.as_ref().map(|token| token.kind) == Some(TokenKind::Table) {
            if self.eat(TokenKind::Stored).is_some() {
                self.eat(TokenKind::As);
                let format = self.parse_id_var();
                file_format = Some(Arg::Exp(self.expression(
                    ExprKind::FileFormat,
                    vec![("this", format.into())],
                )?));
            } else if self.eat(TokenKind::With).is_some() {
                self.eat(TokenKind::LeftParen);
                self.eat(TokenKind::Format);
                self.eat(TokenKind::Eq);
                let format = self.parse_primary()?;
                file_format = Some(Arg::Exp(self.expression(
                    ExprKind::FileFormat,
                    vec![("this", format.into())],
                )?));
                if self.eat(TokenKind::RightParen).is_none() {
                    self.raise_error("Expected ) after format")?;
                }
            }
        }

        if self.eat(TokenKind::As).is_some() {
            expression = self.parse_select()?;
        }

        // Trailing table options come in any order: keep attempting each
        // until a full pass consumes nothing.
        let mut engine: Option<Token> = None;
        let mut auto_increment: Option<Token> = None;
        let mut collate: Option<Token> = None;
        let mut comment: Option<Token> = None;
        let mut character_set: Option<Arg> = None;

        let mut parsed = true;
        while parsed {
            parsed = false;

            if engine.is_none() && self.eat(TokenKind::Engine).is_some() {
                self.eat(TokenKind::Eq);
                engine = self.eat(TokenKind::Var);
                parsed = engine.is_some();
            }
            if auto_increment.is_none() && self.eat(TokenKind::AutoIncrement).is_some() {
                self.eat(TokenKind::Eq);
                auto_increment = self.eat(TokenKind::Number);
                parsed = auto_increment.is_some();
            }
            if collate.is_none() && self.eat(TokenKind::Collate).is_some() {
                self.eat(TokenKind::Eq);
                collate = self.eat(TokenKind::Var);
                parsed = collate.is_some();
            }
            if comment.is_none() && self.eat(TokenKind::SchemaComment).is_some() {
                self.eat(TokenKind::Eq);
                comment = self.eat(TokenKind::String);
                parsed = comment.is_some();
            }
            if character_set.is_none() {
                let default = self.eat(TokenKind::Default).is_some();
                if self.eat(TokenKind::CharacterSet).is_some() {
                    self.eat(TokenKind::Eq);
                    let charset = self.eat(TokenKind::Var);
                    character_set = Some(Arg::Exp(self.expression(
                        ExprKind::CharacterSet,
                        vec![("this", charset.into()), ("default", default.into())],
                    )?));
                    parsed = true;
                }
            }
        }

        self.expression(
            ExprKind::Create,
            vec![
                ("this", this.into()),
                ("kind", create_token.into()),
                ("expression", expression.into()),
                ("exists", exists.into()),
                ("file_format", file_format.into()),
                ("temporary", temporary.into()),
                ("replace", replace.into()),
                ("engine", engine.into()),
                ("auto_increment", auto_increment.into()),
                ("character_set", character_set.into()),
                ("collate", collate.into()),
                ("comment", comment.into()),
            ],
        )
    }

    /// `INSERT [OVERWRITE] [INTO] [TABLE] name [IF EXISTS] select`; the
    /// INSERT token is already consumed.
    fn parse_insert(&mut self) -> Result<Expression> {
        let overwrite = self.eat(TokenKind::Overwrite).is_some();
        self.eat(TokenKind::Into);
        self.eat(TokenKind::Table);

        let this = self.parse_table_mode(TableAlias::Bare, false)?;
        let exists = self.parse_exists(false);
        let expression = self.parse_select()?;
        self.expression(
            ExprKind::Insert,
            vec![
                ("this", this.into()),
                ("exists", exists.into()),
                ("expression", expression.into()),
                ("overwrite", overwrite.into()),
            ],
        )
    }

    /// `UPDATE table SET assignments [WHERE …]`; the UPDATE token is
    /// already consumed.
    fn parse_update(&mut self) -> Result<Expression> {
        let this = self.parse_table_mode(TableAlias::Bare, false)?;
        let expressions = if self.eat(TokenKind::Set).is_some() {
            Some(Arg::List(self.parse_csv(Self::parse_equality)?))
        } else {
            None
        };
        let where_ = self.parse_where()?;
        self.expression(
            ExprKind::Update,
            vec![("this", this.into()), ("expressions", expressions.into()), ("where", where_.into())],
        )
    }

    /// `VALUES (…), (…), …`, or nothing.
    fn parse_values(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Values).is_none() {
            return Ok(None);
        }

        let expressions = self.parse_csv(Self::parse_value)?;
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Values,
            vec![("expressions", Arg::List(expressions))],
        )?)))
    }

    /// One parenthesized tuple of a VALUES list.
    fn parse_value(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::LeftParen).is_none() {
            self.raise_error("Expected ( for values")?;
        }
        let expressions = self.parse_csv(Self::parse_conjunction)?;
        if self.eat(TokenKind::RightParen).is_none() {
            self.raise_error("Expected ) for values")?;
        }
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Tuple,
            vec![("expressions", Arg::List(expressions))],
        )?)))
    }

    /// `WITH [RECURSIVE] alias AS table {, alias AS table} select`, or a
    /// plain select when there is no WITH.
    pub(crate) fn parse_cte(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::With).is_none() {
            return self.parse_select();
        }

        let mut expressions = Vec::new();
        // RECURSIVE may be repeated per binding; the last occurrence wins.
        let mut recursive;

        loop {
            recursive = self.eat(TokenKind::Recursive).is_some();

            let name = self.eat_any(&[TokenKind::Identifier, TokenKind::Var]);
            let alias = self.parse_function(name.map(Arg::Token), false)?;
            if alias.is_none() {
                self.raise_error("Expected alias after WITH")?;
            }
            if self.eat(TokenKind::As).is_none() {
                self.raise_error("Expected AS after WITH")?;
            }

            if let Some(table) = self.parse_table_mode(TableAlias::Explicit(alias), false)? {
                expressions.push(table);
            }

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        let this = self.parse_select()?;
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Cte,
            vec![
                ("this", this.into()),
                ("expressions", Arg::List(expressions)),
                ("recursive", recursive.into()),
            ],
        )?)))
    }

    /// The SELECT pipeline, or a VALUES constructor, with an optional
    /// trailing UNION.
    pub(crate) fn parse_select(&mut self) -> Result<Option<Arg>> {
        let this = if self.eat(TokenKind::Select).is_some() {
            let hint = self.parse_hint()?;
            let distinct = self.eat(TokenKind::Distinct).is_some();
            let expressions = self.parse_csv(Self::parse_expression)?;
            let from = self.parse_from()?;
            let laterals = self.parse_laterals()?;
            let joins = self.parse_joins()?;
            let where_ = self.parse_where()?;
            let group = self.parse_group()?;
            let having = self.parse_having()?;
            let order = self.parse_order()?;
            let limit = self.parse_limit()?;

            Some(Arg::Exp(self.expression(
                ExprKind::Select,
                vec![
                    ("hint", hint.into()),
                    ("distinct", distinct.into()),
                    ("expressions", Arg::List(expressions)),
                    ("from", from.into()),
                    ("laterals", Arg::List(laterals)),
                    ("joins", Arg::List(joins)),
                    ("where", where_.into()),
                    ("group", group.into()),
                    ("having", having.into()),
                    ("order", order.into()),
                    ("limit", limit.into()),
                ],
            )?))
        } else {
            self.parse_values()?
        };

        self.parse_union(this)
    }

    /// An optimizer hint `/*+ … */` right after SELECT.
    fn parse_hint(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Hint).is_none() {
            return Ok(None);
        }

        let hint = self.parse_primary()?;
        if self.eat(TokenKind::CommentEnd).is_none() {
            self.raise_error("Expected */ after HINT")?;
        }
        Ok(Some(Arg::Exp(
            self.expression(ExprKind::Hint, vec![("this", hint.into())])?,
        )))
    }

    fn parse_from(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::From).is_none() {
            return Ok(None);
        }

        let expressions = self.parse_csv(|p| p.parse_table_mode(TableAlias::Trailing, false))?;
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::From,
            vec![("expressions", Arg::List(expressions))],
        )?)))
    }

    /// `LATERAL VIEW [OUTER] expr table [AS col {, col}]`, repeated.
    fn parse_laterals(&mut self) -> Result<Vec<Arg>> {
        let mut laterals = Vec::new();

        loop {
            if self.eat(TokenKind::Lateral).is_none() {
                return Ok(laterals);
            }
            if self.eat(TokenKind::View).is_none() {
                self.raise_error("Expected VIEW after LATERAL")?;
            }

            let outer = self.eat(TokenKind::Outer).is_some();
            let this = self.parse_primary()?;
            let table = self.parse_id_var();
            // Without AS the lateral exposes no column aliases.
            let columns = if self.eat(TokenKind::As).is_some() {
                self.parse_csv(|p| Ok(p.parse_id_var().map(Arg::Token)))?
            } else {
                Vec::new()
            };

            let table = self.expression(ExprKind::Table, vec![("this", table.into())])?;
            laterals.push(Arg::Exp(self.expression(
                ExprKind::Lateral,
                vec![
                    ("this", this.into()),
                    ("outer", outer.into()),
                    ("table", table.into()),
                    ("columns", Arg::List(columns)),
                ],
            )?));
        }
    }

    /// `[LEFT | RIGHT | FULL] [INNER | OUTER | CROSS] JOIN table [ON …]`,
    /// repeated; the first non-join token ends the list.
    fn parse_joins(&mut self) -> Result<Vec<Arg>> {
        let mut joins = Vec::new();

        loop {
            let side = self.eat_any(&[TokenKind::Left, TokenKind::Right, TokenKind::Full]);
            let kind = self.eat_any(&[TokenKind::Inner, TokenKind::Outer, TokenKind::Cross]);

            if self.eat(TokenKind::Join).is_none() {
                return Ok(joins);
            }

            let this = self.parse_table_mode(TableAlias::Trailing, false)?;
            let on = if self.eat(TokenKind::On).is_some() {
                self.parse_conjunction()?
            } else {
                None
            };

            joins.push(Arg::Exp(self.expression(
                ExprKind::Join,
                vec![
                    ("this", this.into()),
                    ("side", side.map(|token| Arg::Str(token.text)).into()),
                    ("kind", kind.map(|token| Arg::Str(token.text)).into()),
                    ("on", on.into()),
                ],
            )?));
        }
    }

    /// Parses a table expression: an UNNEST, a parenthesized query, or a
    /// possibly schema-qualified (and, in schema mode, column-listed) name,
    /// aliased according to `alias`.
    pub(crate) fn parse_table_mode(&mut self, alias: TableAlias, schema: bool) -> Result<Option<Arg>> {
        if let Some(unnest) = self.parse_unnest()? {
            return Ok(Some(unnest));
        }

        let expression = if self.eat(TokenKind::LeftParen).is_some() {
            let inner = self.parse_cte()?;
            if self.eat(TokenKind::RightParen).is_none() {
                self.raise_error("Expecting )")?;
            }
            inner
        } else {
            let mut db: Option<Arg> = None;
            let name = self.eat_any(&[TokenKind::Var, TokenKind::Identifier]);
            let mut table = self.parse_function(name.map(Arg::Token), schema)?;

            if self.eat(TokenKind::Dot).is_some() {
                db = table.take();
                table = self.eat_any(&[TokenKind::Var, TokenKind::Identifier]).map(Arg::Token);
                if table.is_none() {
                    self.raise_error("Expected table name")?;
                }
            }

            Some(Arg::Exp(self.expression(
                ExprKind::Table,
                vec![("this", table.into()), ("db", db.into())],
            )?))
        };

        let this = match alias {
            TableAlias::Bare => expression,
            TableAlias::Explicit(alias) => Some(Arg::Exp(self.expression(
                ExprKind::Alias,
                vec![("this", expression.into()), ("alias", alias.into())],
            )?)),
            TableAlias::Trailing => self.parse_alias(expression)?,
        };

        // Anything that is not already a table or alias gets an anonymous
        // alias wrapper, so FROM lists are uniform.
        let this = match this {
            Some(Arg::Exp(node))
                if !matches!(node.kind(), ExprKind::Alias | ExprKind::Table) =>
            {
                Some(Arg::Exp(self.expression(
                    ExprKind::Alias,
                    vec![("this", Arg::Exp(node)), ("alias", Arg::None)],
                )?))
            }
            other => other,
        };

        Ok(this)
    }

    /// `UNNEST(id {, id}) [WITH ORDINALITY] [AS] table [(col {, col})]`.
    fn parse_unnest(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Unnest).is_none() {
            return Ok(None);
        }

        if self.eat(TokenKind::LeftParen).is_none() {
            self.raise_error("Expecting ( after unnest")?;
        }
        let expressions = self.parse_csv(|p| Ok(p.parse_id_var().map(Arg::Token)))?;
        if self.eat(TokenKind::RightParen).is_none() {
            self.raise_error("Expecting )")?;
        }

        let ordinality =
            self.eat(TokenKind::With).is_some() && self.eat(TokenKind::Ordinality).is_some();
        self.eat(TokenKind::As);
        let table = self.parse_id_var();

        if self.eat(TokenKind::LeftParen).is_none() {
            return Ok(Some(Arg::Exp(self.expression(
                ExprKind::Unnest,
                vec![
                    ("expressions", Arg::List(expressions)),
                    ("ordinality", ordinality.into()),
                    ("table", table.into()),
                ],
            )?)));
        }

        let columns = self.parse_csv(|p| Ok(p.parse_id_var().map(Arg::Token)))?;
        let unnest = self.expression(
            ExprKind::Unnest,
            vec![
                ("expressions", Arg::List(expressions)),
                ("ordinality", ordinality.into()),
                ("table", table.into()),
                ("columns", Arg::List(columns)),
            ],
        )?;

        if self.eat(TokenKind::RightParen).is_none() {
            self.raise_error("Expecting )")?;
        }

        Ok(Some(Arg::Exp(unnest)))
    }

    pub(crate) fn parse_where(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Where).is_none() {
            return Ok(None);
        }
        let this = self.parse_conjunction()?;
        Ok(Some(Arg::Exp(
            self.expression(ExprKind::Where, vec![("this", this.into())])?,
        )))
    }

    fn parse_group(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Group).is_none() {
            return Ok(None);
        }

        let expressions = self.parse_csv(Self::parse_conjunction)?;
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Group,
            vec![("expressions", Arg::List(expressions))],
        )?)))
    }

    fn parse_having(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Having).is_none() {
            return Ok(None);
        }
        let this = self.parse_conjunction()?;
        Ok(Some(Arg::Exp(
            self.expression(ExprKind::Having, vec![("this", this.into())])?,
        )))
    }

    pub(crate) fn parse_order(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Order).is_none() {
            return Ok(None);
        }

        let expressions = self.parse_csv(Self::parse_ordered)?;
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Order,
            vec![("expressions", Arg::List(expressions))],
        )?)))
    }

    /// One ORDER BY item; direction defaults to ascending.
    fn parse_ordered(&mut self) -> Result<Option<Arg>> {
        let this = self.parse_bitwise()?;
        let direction = self.eat_any(&[TokenKind::Asc, TokenKind::Desc]);
        let desc = direction.is_some_and(|token| token.kind == TokenKind::Desc);
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Ordered,
            vec![("this", this.into()), ("desc", desc.into())],
        )?)))
    }

    fn parse_limit(&mut self) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Limit).is_none() {
            return Ok(None);
        }

        let limit_number = self.eat(TokenKind::Number);
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Limit,
            vec![("this", limit_number.map(|token| Arg::Str(token.text)).into())],
        )?)))
    }

    /// `UNION [ALL] select`, or just `this` when there is no UNION.
    fn parse_union(&mut self, this: Option<Arg>) -> Result<Option<Arg>> {
        if self.eat(TokenKind::Union).is_none() {
            return Ok(this);
        }

        let distinct = self.eat(TokenKind::All).is_none();
        let expression = self.parse_select()?;
        Ok(Some(Arg::Exp(self.expression(
            ExprKind::Union,
            vec![
                ("this", this.into()),
                ("expression", expression.into()),
                ("distinct", distinct.into()),
            ],
        )?)))
    }
}
