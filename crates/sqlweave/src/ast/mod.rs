//! Expression tree types.
//!
//! Every node implements [`Expression`]. Nodes own their children as
//! [`Expr`] boxes and are immutable once built. The compiler only needs a
//! node's [`Kind`] to find its handler; handlers read concrete node data
//! back through [`downcast`].

use std::any::{self, Any};
use std::fmt;

use crate::compiler::Precedence;
use crate::error::{Result, WeaveError};

mod functions;
mod kind;
pub mod kinds;
mod operators;
mod query;
mod value;

pub use functions::{Arity, Function, Signature};
pub use kind::Kind;
pub use operators::{BinaryOp, BinaryOperator, BooleanChain, ChainOp, UnaryOp, UnaryOperator};
pub use query::{Column, Select, SetOp, SetOperation, Table};
pub use value::{Null, SqlValue, ToSqlValue};

pub(crate) use functions::register as register_functions;
pub(crate) use operators::register as register_operators;
pub(crate) use query::register as register_query;
pub(crate) use value::register as register_values;

/// An owned, type-erased expression node.
pub type Expr = Box<dyn Expression>;

/// A node of an SQL expression tree.
pub trait Expression: fmt::Debug + Send + Sync {
    /// The most specific kind of this node.
    fn kind(&self) -> &'static Kind;

    /// The precedence used to decide whether this node needs brackets.
    fn precedence(&self) -> Precedence {
        self.kind().precedence()
    }

    /// The value to bind when this node is a literal.
    fn to_value(&self) -> Option<SqlValue> {
        None
    }

    /// Returns the node as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Clones the node into a new box.
    fn boxed(&self) -> Expr;
}

impl Clone for Expr {
    fn clone(&self) -> Self {
        self.boxed()
    }
}

/// Conversion into an owned expression node.
pub trait IntoExpr {
    /// Boxes `self` as an expression.
    fn into_expr(self) -> Expr;
}

impl<T: Expression + 'static> IntoExpr for T {
    fn into_expr(self) -> Expr {
        Box::new(self)
    }
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

/// Boxes any expression-like value.
#[must_use]
pub fn expr(value: impl IntoExpr) -> Expr {
    value.into_expr()
}

/// Reads the concrete node behind `expr`.
///
/// # Errors
///
/// Returns [`WeaveError::UnexpectedNode`] when `expr` is not a `T`.
pub fn downcast<T: Expression + 'static>(expr: &dyn Expression) -> Result<&T> {
    expr.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| WeaveError::UnexpectedNode {
            kind: expr.kind().name(),
            expected: any::type_name::<T>(),
        })
}
