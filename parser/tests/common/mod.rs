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

//! Test support: a compact SQL lexer so integration tests can drive the
//! parser from literal SQL text. Tokenization is the caller's job in
//! production; this lexer exists only for the test suite.

// Each integration test binary uses its own subset of these helpers.
#![allow(dead_code)]

use sqltree_ast::Expression;
use sqltree_parser::{Parser, Token, TokenKind};

/// Lexes `sql` into the token stream the parser consumes. Panics on input
/// the test lexer does not understand.
pub fn tokenize(sql: &str) -> Vec<Token> {
    Lexer::new(sql).run()
}

/// Tokenizes and parses `sql` with a default parser.
pub fn parse(sql: &str) -> Vec<Option<Expression>> {
    Parser::new().parse(tokenize(sql), sql).unwrap()
}

/// Tokenizes and parses `sql`, returning the first statement's tree.
pub fn parse_one(sql: &str) -> Expression {
    sqltree_parser::parse_one(tokenize(sql), sql).unwrap()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(sql: &str) -> Self {
        Self { chars: sql.chars().collect(), pos: 0, line: 1, col: 1, tokens: Vec::new() }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, line: usize, col: usize) {
        self.tokens.push(Token::new(kind, text, line, col));
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(ch) = self.peek(0) {
            let (line, col) = (self.line, self.col);

            match ch {
                ch if ch.is_whitespace() => {
                    self.bump();
                }
                '-' if self.peek(1) == Some('-') => {
                    while self.peek(0).is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '/' if self.peek(1) == Some('*') => {
                    if self.peek(2) == Some('+') {
                        self.bump();
                        self.bump();
                        self.bump();
                        self.push(TokenKind::Hint, "/*+", line, col);
                    } else {
                        // A plain block comment; skip to its close.
                        self.bump();
                        self.bump();
                        while self.peek(0).is_some() {
                            if self.peek(0) == Some('*') && self.peek(1) == Some('/') {
                                self.bump();
                                self.bump();
                                break;
                            }
                            self.bump();
                        }
                    }
                }
                '*' if self.peek(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    self.push(TokenKind::CommentEnd, "*/", line, col);
                }
                '\'' => {
                    self.bump();
                    let mut text = String::new();
                    loop {
                        match self.peek(0) {
                            Some('\'') if self.peek(1) == Some('\'') => {
                                self.bump();
                                self.bump();
                                text.push('\'');
                            }
                            Some('\'') => {
                                self.bump();
                                break;
                            }
                            Some(_) => text.push(self.bump()),
                            None => panic!("unterminated string literal"),
                        }
                    }
                    self.push(TokenKind::String, text, line, col);
                }
                '"' => {
                    self.bump();
                    let mut text = String::new();
                    loop {
                        match self.peek(0) {
                            Some('"') => {
                                self.bump();
                                break;
                            }
                            Some(_) => text.push(self.bump()),
                            None => panic!("unterminated quoted identifier"),
                        }
                    }
                    self.push(TokenKind::Identifier, text, line, col);
                }
                ch if ch.is_ascii_digit() => {
                    let mut text = String::new();
                    while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                        text.push(self.bump());
                    }
                    if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit())
                    {
                        text.push(self.bump());
                        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                            text.push(self.bump());
                        }
                    }
                    self.push(TokenKind::Number, text, line, col);
                }
                ch if ch.is_ascii_alphabetic() || ch == '_' => {
                    let mut text = String::new();
                    while self
                        .peek(0)
                        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        text.push(self.bump());
                    }
                    let (kind, text) = self.word_token(text);
                    self.push(kind, text, line, col);
                }
                _ => {
                    let (kind, len) = self.operator_kind(ch);
                    let mut text = String::new();
                    for _ in 0..len {
                        text.push(self.bump());
                    }
                    self.push(kind, text, line, col);
                }
            }
        }

        self.tokens
    }

    /// Maps a bare word (possibly extending it to a two-word keyword) to
    /// its token kind and final text.
    fn word_token(&mut self, word: String) -> (TokenKind, String) {
        let upper = word.to_uppercase();

        // Two-word keywords lex as a single token.
        let composite = match upper.as_str() {
            "GROUP" => Some(("BY", TokenKind::Group)),
            "ORDER" => Some(("BY", TokenKind::Order)),
            "PARTITION" => Some(("BY", TokenKind::Partition)),
            "CHARACTER" => Some(("SET", TokenKind::CharacterSet)),
            "CURRENT" => Some(("ROW", TokenKind::CurrentRow)),
            _ => None,
        };
        if let Some((second, kind)) = composite {
            if let Some(follow) = self.try_follow_word(second) {
                return (kind, format!("{word} {follow}"));
            }
        }

        (keyword(&upper).unwrap_or(TokenKind::Var), word)
    }

    /// Consumes whitespace plus `word` if they come next, returning the
    /// word as written; otherwise leaves the cursor untouched.
    fn try_follow_word(&mut self, word: &str) -> Option<String> {
        let (pos, line, col) = (self.pos, self.line, self.col);

        while self.peek(0).is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
        let mut text = String::new();
        while self
            .peek(0)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            text.push(self.bump());
        }

        if text.eq_ignore_ascii_case(word) {
            Some(text)
        } else {
            self.pos = pos;
            self.line = line;
            self.col = col;
            None
        }
    }

    /// Maps a punctuation or operator character (with one of lookahead) to
    /// its token kind and length.
    fn operator_kind(&self, ch: char) -> (TokenKind, usize) {
        match (ch, self.peek(1)) {
            ('(', _) => (TokenKind::LeftParen, 1),
            (')', _) => (TokenKind::RightParen, 1),
            ('[', _) => (TokenKind::LeftBracket, 1),
            (']', _) => (TokenKind::RightBracket, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('.', _) => (TokenKind::Dot, 1),
            (';', _) => (TokenKind::Semicolon, 1),
            (':', Some(':')) => (TokenKind::DColon, 2),
            (':', _) => (TokenKind::Colon, 1),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', _) => (TokenKind::Dash, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', Some('/')) => (TokenKind::Div, 2),
            ('/', _) => (TokenKind::Slash, 1),
            ('%', _) => (TokenKind::Mod, 1),
            ('=', _) => (TokenKind::Eq, 1),
            ('!', Some('=')) => (TokenKind::Neq, 2),
            ('<', Some('>')) => (TokenKind::Neq, 2),
            ('<', Some('=')) => (TokenKind::Lte, 2),
            ('<', Some('<')) => (TokenKind::LShift, 2),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', Some('=')) => (TokenKind::Gte, 2),
            ('>', Some('>')) => (TokenKind::RShift, 2),
            ('>', _) => (TokenKind::Gt, 1),
            ('&', _) => (TokenKind::Amp, 1),
            ('|', Some('|')) => (TokenKind::DPipe, 2),
            ('|', _) => (TokenKind::Pipe, 1),
            ('^', _) => (TokenKind::Caret, 1),
            ('~', _) => (TokenKind::Tilda, 1),
            other => panic!("test lexer cannot tokenize {other:?}"),
        }
    }
}

fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "ALL" => TokenKind::All,
        "AND" => TokenKind::And,
        "AS" => TokenKind::As,
        "ASC" => TokenKind::Asc,
        "AUTO_INCREMENT" => TokenKind::AutoIncrement,
        "BETWEEN" => TokenKind::Between,
        "CASE" => TokenKind::Case,
        "CAST" => TokenKind::Cast,
        "COLLATE" => TokenKind::Collate,
        "COMMENT" => TokenKind::SchemaComment,
        "COUNT" => TokenKind::Count,
        "CREATE" => TokenKind::Create,
        "CROSS" => TokenKind::Cross,
        "DEFAULT" => TokenKind::Default,
        "DESC" => TokenKind::Desc,
        "DISTINCT" => TokenKind::Distinct,
        "DIV" => TokenKind::Div,
        "DROP" => TokenKind::Drop,
        "ELSE" => TokenKind::Else,
        "END" => TokenKind::End,
        "ENGINE" => TokenKind::Engine,
        "EXISTS" => TokenKind::Exists,
        "EXTRACT" => TokenKind::Extract,
        "FOLLOWING" => TokenKind::Following,
        "FORMAT" => TokenKind::Format,
        "FROM" => TokenKind::From,
        "FULL" => TokenKind::Full,
        "HAVING" => TokenKind::Having,
        "IF" => TokenKind::If,
        "IN" => TokenKind::In,
        "INNER" => TokenKind::Inner,
        "INSERT" => TokenKind::Insert,
        "INTERVAL" => TokenKind::Interval,
        "INTO" => TokenKind::Into,
        "IS" => TokenKind::Is,
        "JOIN" => TokenKind::Join,
        "LATERAL" => TokenKind::Lateral,
        "LEFT" => TokenKind::Left,
        "LIKE" => TokenKind::Like,
        "LIMIT" => TokenKind::Limit,
        "MOD" => TokenKind::Mod,
        "NOT" => TokenKind::Not,
        "NULL" => TokenKind::Null,
        "ON" => TokenKind::On,
        "OR" => TokenKind::Or,
        "ORDINALITY" => TokenKind::Ordinality,
        "OUTER" => TokenKind::Outer,
        "OVER" => TokenKind::Over,
        "OVERWRITE" => TokenKind::Overwrite,
        "PRECEDING" => TokenKind::Preceding,
        "RANGE" => TokenKind::Range,
        "RECURSIVE" => TokenKind::Recursive,
        "REPLACE" => TokenKind::Replace,
        "RIGHT" => TokenKind::Right,
        "RLIKE" => TokenKind::Rlike,
        "ROWS" => TokenKind::Rows,
        "SELECT" => TokenKind::Select,
        "SET" => TokenKind::Set,
        "STORED" => TokenKind::Stored,
        "TABLE" => TokenKind::Table,
        "TEMPORARY" => TokenKind::Temporary,
        "THEN" => TokenKind::Then,
        "TIME" => TokenKind::Time,
        "UNBOUNDED" => TokenKind::Unbounded,
        "UNION" => TokenKind::Union,
        "UNNEST" => TokenKind::Unnest,
        "UPDATE" => TokenKind::Update,
        "VALUES" => TokenKind::Values,
        "VIEW" => TokenKind::View,
        "WHEN" => TokenKind::When,
        "WHERE" => TokenKind::Where,
        "WITH" => TokenKind::With,
        "WITHOUT" => TokenKind::Without,
        "ZONE" => TokenKind::Zone,
        // Types
        "BOOLEAN" => TokenKind::Boolean,
        "TINYINT" => TokenKind::TinyInt,
        "SMALLINT" => TokenKind::SmallInt,
        "INT" | "INTEGER" => TokenKind::Int,
        "BIGINT" => TokenKind::BigInt,
        "FLOAT" => TokenKind::Float,
        "DOUBLE" => TokenKind::Double,
        "DECIMAL" | "NUMERIC" => TokenKind::Decimal,
        "CHAR" => TokenKind::Char,
        "VARCHAR" => TokenKind::VarChar,
        "TEXT" => TokenKind::Text,
        "BINARY" => TokenKind::Binary,
        "JSON" => TokenKind::Json,
        "TIMESTAMP" => TokenKind::Timestamp,
        "TIMESTAMPTZ" => TokenKind::TimestampTz,
        "DATE" => TokenKind::Date,
        "ARRAY" => TokenKind::Array,
        "MAP" => TokenKind::Map,
        _ => return None,
    })
}
