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

//! The recursive-descent driver: statement chunking, the node factory with
//! schema validation, token coercion, and diagnostic rendering. The grammar
//! itself lives in the sibling modules.

use crate::functions::built_in_functions;
use crate::{FunctionBuilder, Token, TokenKind};

use sqltree_ast::{ExprKind, Expression, Value};
use sqltree_errors::emitter::Handler;
use sqltree_errors::{ErrorLevel, ParseError, Result};

use indexmap::IndexMap;

mod context;
mod expression;
mod statement;
mod type_;

/// A value on its way into the node factory: either a raw consumed token
/// still to be normalized, a finished node, a primitive, a list, or nothing.
///
/// Grammar routines freely hand both tokens and nodes to the factory; the
/// factory normalizes them in one place (see [`coerce`]), so completed trees
/// never contain raw tokens.
#[derive(Clone, Debug)]
pub enum Arg {
    Token(Token),
    Exp(Expression),
    Str(String),
    Bool(bool),
    List(Vec<Arg>),
    None,
}

impl From<Token> for Arg {
    fn from(token: Token) -> Self {
        Arg::Token(token)
    }
}

impl From<Expression> for Arg {
    fn from(expression: Expression) -> Self {
        Arg::Exp(expression)
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Arg::Str(text)
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Str(text.to_owned())
    }
}

impl From<bool> for Arg {
    fn from(flag: bool) -> Self {
        Arg::Bool(flag)
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::List(items)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Arg::None,
        }
    }
}

/// Normalizes a factory argument into a stored [`Value`].
///
/// This is the single token-to-node coercion point: recognized token kinds
/// become their semantic nodes, anything else collapses to its text.
/// [`Arg::None`] (and `None` children of lists) disappear entirely.
pub(crate) fn coerce(arg: Arg) -> Option<Value> {
    match arg {
        Arg::None => None,
        Arg::Token(token) => Some(token_to_expression(token)),
        Arg::Exp(expression) => Some(Value::Exp(expression)),
        Arg::Str(text) => Some(Value::Str(text)),
        Arg::Bool(flag) => Some(Value::Bool(flag)),
        Arg::List(items) => Some(Value::List(items.into_iter().filter_map(coerce).collect())),
    }
}

/// The fixed token-to-node mapping.
fn token_to_expression(token: Token) -> Value {
    match token.kind {
        TokenKind::Star => Value::Exp(Expression::new(ExprKind::Star, vec![])),
        TokenKind::Null => Value::Exp(Expression::new(ExprKind::Null, vec![])),
        TokenKind::String => Value::Exp(Expression::new(
            ExprKind::Literal,
            vec![("this", Value::Str(token.text)), ("is_string", Value::Bool(true))],
        )),
        TokenKind::Number => Value::Exp(Expression::new(
            ExprKind::Literal,
            vec![("this", Value::Str(token.text)), ("is_string", Value::Bool(false))],
        )),
        TokenKind::Identifier => Value::Exp(Expression::new(
            ExprKind::Identifier,
            vec![("this", Value::Str(token.text)), ("quoted", Value::Bool(true))],
        )),
        TokenKind::Var => Value::Exp(Expression::new(
            ExprKind::Identifier,
            vec![("this", Value::Str(token.text)), ("quoted", Value::Bool(false))],
        )),
        kind => match kind.type_name() {
            Some(name) => Value::Exp(Expression::new(
                ExprKind::DataType,
                vec![("this", Value::Str(name.to_owned()))],
            )),
            // Non-recognized tokens collapse to their textual form.
            None => Value::Str(token.text),
        },
    }
}

/// Consumes a list of tokens produced by an external lexer and produces one
/// syntax tree per SQL statement.
///
/// A parser holds mutable cursor state and must not be shared across
/// concurrent invocations; independent instances are fully isolated. All
/// per-parse state is re-initialized on each [`parse`](Parser::parse) call.
pub struct Parser {
    /// Registry of SQL function name (uppercase) to node builder.
    functions: IndexMap<String, FunctionBuilder>,
    /// Characters of source context captured around a diagnostic.
    error_message_context: usize,
    /// Applies the error level and retains the most recent diagnostic.
    handler: Handler,

    // Per-parse state.
    source: String,
    tokens: Vec<Token>,
    index: usize,
    prev: Option<Token>,
    curr: Option<Token>,
    next: Option<Token>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Returns a parser with the built-in function registry, the `Raise`
    /// error level, and 50 characters of diagnostic context.
    pub fn new() -> Self {
        Self {
            functions: built_in_functions(),
            error_message_context: 50,
            handler: Handler::default(),
            source: String::new(),
            tokens: Vec::new(),
            index: 0,
            prev: None,
            curr: None,
            next: None,
        }
    }

    /// Replaces the error level.
    pub fn with_error_level(mut self, level: ErrorLevel) -> Self {
        self.handler = Handler::new(level);
        self
    }

    /// Merges extra registry entries on top of the built-ins. Keys are
    /// uppercase SQL function names; caller entries win on collision.
    pub fn with_functions(mut self, functions: IndexMap<String, FunctionBuilder>) -> Self {
        self.functions.extend(functions);
        self
    }

    /// Replaces the number of characters of source context captured around
    /// a diagnostic.
    pub fn with_error_message_context(mut self, error_message_context: usize) -> Self {
        self.error_message_context = error_message_context;
        self
    }

    /// The configured error level.
    pub fn error_level(&self) -> ErrorLevel {
        self.handler.level()
    }

    /// The most recent diagnostic, retained regardless of the error level.
    pub fn last_error(&self) -> Option<ParseError> {
        self.handler.last_err()
    }

    /// Parses the given list of tokens and returns one syntax tree per SQL
    /// statement. Statements are separated by `;` tokens; a trailing empty
    /// statement is dropped. A statement that parses to nothing (an empty
    /// chunk) yields `None` in its slot.
    ///
    /// `source` is the original SQL text the tokens were lexed from, used
    /// only to render diagnostics.
    pub fn parse(&mut self, raw_tokens: Vec<Token>, source: &str) -> Result<Vec<Option<Expression>>> {
        self.reset();
        self.source = source.to_owned();

        let total = raw_tokens.len();
        let mut chunks: Vec<Vec<Token>> = vec![Vec::new()];
        for (i, token) in raw_tokens.into_iter().enumerate() {
            if token.kind == TokenKind::Semicolon {
                if i < total - 1 {
                    chunks.push(Vec::new());
                }
            } else {
                let last = chunks.len() - 1;
                chunks[last].push(token);
            }
        }

        let mut expressions = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            self.load_chunk(chunk);
            let statement = self.parse_statement()?;

            if self.index < self.tokens.len() {
                self.raise_error("Invalid expression / Unexpected token")?;
            }

            expressions.push(statement.and_then(|arg| match coerce(arg) {
                Some(Value::Exp(expression)) => Some(expression),
                _ => None,
            }));
        }

        for expression in expressions.iter().flatten() {
            expression.wire_references();
        }

        tracing::debug!(statements = expressions.len(), "parsed token stream");
        Ok(expressions)
    }

    /// Constructs a node of the given kind from keyword arguments,
    /// normalizing tokens and dropping absent values, then validates it
    /// against the kind's slot schema subject to the error level.
    pub fn expression(&mut self, kind: ExprKind, args: Vec<(&'static str, Arg)>) -> Result<Expression> {
        let mut slots = Vec::with_capacity(args.len());
        for (key, arg) in args {
            if let Some(value) = coerce(arg) {
                slots.push((key, value));
            }
        }

        let expression = Expression::new(kind, slots);
        self.validate_expression(&expression)?;
        Ok(expression)
    }

    /// Checks a node against its slot schema: every present slot must be
    /// declared, and every mandatory slot must hold a non-empty value.
    /// Skipped entirely under [`ErrorLevel::Ignore`].
    pub(crate) fn validate_expression(&mut self, expression: &Expression) -> Result<()> {
        if self.handler.level() == ErrorLevel::Ignore {
            return Ok(());
        }

        let arg_types = expression.kind().arg_types();

        for key in expression.args().keys() {
            if !arg_types.iter().any(|(name, _)| name == key) {
                self.raise_error(&format!("Unexpected keyword: '{key}' for {}", expression.kind()))?;
            }
        }

        for &(key, mandatory) in arg_types {
            if !mandatory {
                continue;
            }
            let missing = match expression.arg(key) {
                None => true,
                Some(Value::List(values)) => values.is_empty(),
                Some(_) => false,
            };
            if missing {
                self.raise_error(&format!("Required keyword: '{key}' missing for {}", expression.kind()))?;
            }
        }

        Ok(())
    }

    /// Emits a diagnostic anchored at the current token (falling back to
    /// the previous one). Whether this returns an error depends on the
    /// configured level.
    pub(crate) fn raise_error(&mut self, message: &str) -> Result<()> {
        self.raise_error_at(message, None)
    }

    /// Emits a diagnostic anchored at the given token.
    pub(crate) fn raise_error_at(&mut self, message: &str, token: Option<Token>) -> Result<()> {
        let token = token
            .or_else(|| self.curr.clone())
            .or_else(|| self.prev.clone())
            .unwrap_or_else(|| Token::synthetic(TokenKind::String, ""));

        let chars: Vec<char> = self.source.chars().collect();
        let start = Self::token_offset(&chars, &token);
        let end = (start + token.text.chars().count()).min(chars.len());
        let context = self.error_message_context;

        let start_context: String = chars[start.saturating_sub(context)..start].iter().collect();
        let highlight: String = chars[start..end].iter().collect();
        let end_context: String = chars[end..(end + context).min(chars.len())].iter().collect();

        self.handler.emit_err(ParseError::rendered(
            message,
            token.line,
            token.col,
            &start_context,
            &highlight,
            &end_context,
        ))
    }

    /// The character offset of a token's 1-based (line, col) position
    /// within the source.
    fn token_offset(chars: &[char], token: &Token) -> usize {
        let mut line = 1;
        let mut col = 1;
        let mut index = 0;

        while (line < token.line || col < token.col) && index < chars.len() {
            if chars[index] == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
            index += 1;
        }

        index
    }

    fn reset(&mut self) {
        self.source.clear();
        self.tokens.clear();
        self.index = 0;
        self.prev = None;
        self.curr = None;
        self.next = None;
        self.handler.clear_last_err();
    }

    fn load_chunk(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
        self.index = 0;
        self.prev = None;
        self.curr = self.tokens.first().cloned();
        self.next = self.tokens.get(1).cloned();
    }
}
