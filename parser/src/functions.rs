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

//! The function registry: uppercased SQL function name to node builder.
//!
//! The built-in table is enumerated once from the schema's function kinds
//! (each contributing its accepted SQL names) plus the DECIMAL / NUMERIC
//! aliases, which build a `Decimal` node from positional precision and
//! scale. Caller-supplied entries are merged on top and win collisions.

use sqltree_ast::{ExprKind, Expression, Value, FUNCTION_KINDS};

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use std::sync::Arc;

/// Builds a node from a parsed, already normalized argument list. The
/// parser validates the built node afterwards.
pub type FunctionBuilder = Arc<dyn Fn(Vec<Value>) -> Expression + Send + Sync>;

static BUILT_IN: Lazy<IndexMap<String, FunctionBuilder>> = Lazy::new(|| {
    let mut functions: IndexMap<String, FunctionBuilder> = IndexMap::new();

    for &kind in FUNCTION_KINDS {
        let builder: FunctionBuilder = Arc::new(move |args| Expression::from_arg_list(kind, args));
        for name in kind.sql_names() {
            functions.insert((*name).to_owned(), builder.clone());
        }
    }

    let decimal: FunctionBuilder = Arc::new(build_decimal);
    functions.insert("DECIMAL".to_owned(), decimal.clone());
    functions.insert("NUMERIC".to_owned(), decimal);

    functions
});

/// `DECIMAL(precision, scale)` and its NUMERIC alias, both arguments
/// optional.
fn build_decimal(args: Vec<Value>) -> Expression {
    let mut args = args.into_iter();
    let mut slots = Vec::new();

    if let Some(precision) = args.next() {
        slots.push(("precision", precision));
    }
    if let Some(scale) = args.next() {
        slots.push(("scale", scale));
    }

    Expression::new(ExprKind::Decimal, slots)
}

/// A fresh copy of the built-in registry.
pub(crate) fn built_in_functions() -> IndexMap<String, FunctionBuilder> {
    BUILT_IN.clone()
}
