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

use crate::ExprKind;

use indexmap::IndexMap;
use serde::Serialize;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// The value held by a node's argument slot.
///
/// Raw tokens cannot appear here: a completed tree only ever holds finished
/// nodes, primitives, or lists of them. Token normalization happens once, at
/// the node factory boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A child node.
    Exp(Expression),
    /// A string primitive, e.g. an alias text or a keyword collapsed to text.
    Str(String),
    /// A boolean flag, e.g. `distinct` on a SELECT.
    Bool(bool),
    /// A list of values, e.g. the projections of a SELECT.
    List(Vec<Value>),
}

impl Value {
    /// The child node, if this value is one.
    pub fn as_exp(&self) -> Option<&Expression> {
        match self {
            Value::Exp(expression) => Some(expression),
            _ => None,
        }
    }

    /// The string primitive, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    /// The boolean flag, if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The list of values, if this value is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<Expression> for Value {
    fn from(expression: Expression) -> Self {
        Value::Exp(expression)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Str(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Str(text.to_owned())
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

/// The parent edge of a node: non-owning, so trees stay strictly owned
/// top-down.
#[derive(Debug)]
struct ParentLink {
    parent: Weak<Node>,
    arg_key: &'static str,
}

#[derive(Debug, Serialize)]
struct Node {
    kind: ExprKind,
    args: IndexMap<&'static str, Value>,
    #[serde(skip)]
    parent: RefCell<Option<ParentLink>>,
}

/// A node of the syntax tree: a kind tag plus named argument slots.
///
/// `Expression` is a cheap-to-clone shared handle. The node itself is
/// immutable after construction; only the parent back-reference is wired in
/// afterwards, in a single [`wire_references`](Expression::wire_references)
/// pass over the finished statement.
#[derive(Clone, Serialize)]
#[serde(transparent)]
pub struct Expression(Rc<Node>);

impl Expression {
    /// Creates a node from its kind and argument slots.
    ///
    /// No schema validation happens here; the parser validates nodes against
    /// [`ExprKind::arg_types`] subject to its error level.
    pub fn new(kind: ExprKind, args: Vec<(&'static str, Value)>) -> Self {
        Self(Rc::new(Node {
            kind,
            args: args.into_iter().collect(),
            parent: RefCell::new(None),
        }))
    }

    /// Builds a node from a positional argument list by zipping the
    /// arguments onto the kind's slot schema in order.
    ///
    /// For [variable-arity](ExprKind::is_var_len_args) kinds the final slot
    /// absorbs all remaining arguments as a list.
    pub fn from_arg_list(kind: ExprKind, args: Vec<Value>) -> Self {
        let keys = kind.arg_types();
        let mut slots = Vec::with_capacity(keys.len());

        if kind.is_var_len_args() {
            let pivot = keys.len() - 1;
            let mut args = args.into_iter();
            for (key, _) in &keys[..pivot] {
                match args.next() {
                    Some(value) => slots.push((*key, value)),
                    None => break,
                }
            }
            slots.push((keys[pivot].0, Value::List(args.collect())));
        } else {
            for ((key, _), value) in keys.iter().zip(args) {
                slots.push((*key, value));
            }
        }

        Self::new(kind, slots)
    }

    /// The kind tag of this node.
    pub fn kind(&self) -> ExprKind {
        self.0.kind
    }

    /// The argument slots of this node, in insertion order.
    pub fn args(&self) -> &IndexMap<&'static str, Value> {
        &self.0.args
    }

    /// The value of the given argument slot.
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.0.args.get(key)
    }

    /// The value of the `this` slot, the conventional principal child.
    pub fn this(&self) -> Option<&Value> {
        self.arg("this")
    }

    /// The node owning this one, if the tree has been wired.
    pub fn parent(&self) -> Option<Expression> {
        self.0
            .parent
            .borrow()
            .as_ref()
            .and_then(|link| link.parent.upgrade())
            .map(Expression)
    }

    /// The slot of the parent through which this node is owned.
    pub fn arg_key(&self) -> Option<&'static str> {
        self.0.parent.borrow().as_ref().map(|link| link.arg_key)
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Expression) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Visits this node and all descendants in pre-order. Each item carries
    /// the node together with its parent and owning slot within the walk.
    pub fn walk(&self) -> Walk {
        Walk { stack: vec![(self.clone(), None)] }
    }

    /// All descendants (including this node) of the given kind, in walk
    /// order.
    pub fn find_all(&self, kind: ExprKind) -> Vec<Expression> {
        self.walk()
            .map(|(node, _)| node)
            .filter(|node| node.kind() == kind)
            .collect()
    }

    /// Wires the `parent` and `arg_key` back-references of every descendant
    /// in one pass. Called once per statement after the tree is fully built.
    pub fn wire_references(&self) {
        for (node, context) in self.walk() {
            if let Some((parent, arg_key)) = context {
                node.0
                    .parent
                    .borrow_mut()
                    .replace(ParentLink { parent: Rc::downgrade(&parent.0), arg_key });
            }
        }
    }
}

/// Structural equality: kind and argument slots; parent wiring is ignored.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind == other.0.kind && self.0.args == other.0.args
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind())?;
        for (i, (key, value)) in self.args().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Exp(expression) => write!(f, "{expression}"),
            Value::Str(text) => write!(f, "{text:?}"),
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Pre-order traversal over a tree, yielding each node with its parent and
/// owning slot.
pub struct Walk {
    stack: Vec<(Expression, Option<(Expression, &'static str)>)>,
}

impl Iterator for Walk {
    type Item = (Expression, Option<(Expression, &'static str)>);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, context) = self.stack.pop()?;

        let mut children = Vec::new();
        for (key, value) in node.args() {
            match value {
                Value::Exp(child) => children.push((child.clone(), Some((node.clone(), *key)))),
                Value::List(values) => {
                    for value in values {
                        if let Value::Exp(child) = value {
                            children.push((child.clone(), Some((node.clone(), *key))));
                        }
                    }
                }
                _ => {}
            }
        }
        // Reversed so the leftmost child is visited first.
        self.stack.extend(children.into_iter().rev());

        Some((node, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> Expression {
        let identifier = Expression::new(
            ExprKind::Identifier,
            vec![("this", name.into()), ("quoted", false.into())],
        );
        Expression::new(ExprKind::Column, vec![("this", identifier.into())])
    }

    #[test]
    fn walk_is_preorder_and_complete() {
        let left = column("a");
        let right = column("b");
        let and = Expression::new(
            ExprKind::And,
            vec![("this", left.into()), ("expression", right.into())],
        );

        let kinds: Vec<ExprKind> = and.walk().map(|(node, _)| node.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ExprKind::And,
                ExprKind::Column,
                ExprKind::Identifier,
                ExprKind::Column,
                ExprKind::Identifier,
            ]
        );
        assert_eq!(and.find_all(ExprKind::Column).len(), 2);
    }

    #[test]
    fn wiring_sets_parent_and_arg_key() {
        let tuple = Expression::new(
            ExprKind::Tuple,
            vec![("expressions", Value::List(vec![column("a").into(), column("b").into()]))],
        );
        tuple.wire_references();

        for child in tuple.find_all(ExprKind::Column) {
            let parent = child.parent().unwrap();
            assert!(parent.ptr_eq(&tuple));
            assert_eq!(child.arg_key(), Some("expressions"));
        }
        assert_eq!(tuple.parent(), None);
    }

    #[test]
    fn from_arg_list_zips_onto_the_schema() {
        let one = Expression::new(
            ExprKind::Literal,
            vec![("this", "1".into()), ("is_string", false.into())],
        );
        let round = Expression::from_arg_list(ExprKind::Round, vec![one.clone().into()]);
        assert_eq!(round.arg("this"), Some(&Value::Exp(one)));
        assert_eq!(round.arg("decimals"), None);
    }

    #[test]
    fn var_len_kinds_absorb_surplus_arguments() {
        let args: Vec<Value> = ["a", "b", "c"].into_iter().map(|name| column(name).into()).collect();
        let coalesce = Expression::from_arg_list(ExprKind::Coalesce, args);

        assert!(coalesce.arg("this").is_some());
        let rest = coalesce.arg("expressions").unwrap().as_list().unwrap();
        assert_eq!(rest.len(), 2);

        // An exactly-saturated call still collects a (possibly empty) list.
        let concat = Expression::from_arg_list(ExprKind::Concat, vec![]);
        assert_eq!(concat.arg("expressions").unwrap().as_list().unwrap().len(), 0);
    }

    #[test]
    fn structural_equality_ignores_parent_wiring() {
        let a = column("a");
        let b = column("a");
        let holder = Expression::new(ExprKind::Paren, vec![("this", a.clone().into())]);
        holder.wire_references();
        assert_eq!(a, b);
    }

    #[test]
    fn serialization_skips_the_parent_edge() {
        let paren = Expression::new(ExprKind::Paren, vec![("this", column("a").into())]);
        paren.wire_references();
        let json = serde_json::to_value(&paren).unwrap();
        assert_eq!(json["kind"], "Paren");
        assert_eq!(json["args"]["this"]["kind"], "Column");
        assert!(json["args"]["this"].get("parent").is_none());
    }
}
