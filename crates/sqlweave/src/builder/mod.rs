//! Expression builders.
//!
//! Free functions build every built-in node:
//!
//! ```rust
//! use sqlweave::builder::{add, col, eq, mul};
//! use sqlweave::compile;
//!
//! let (sql, params) = compile(&mul(add(1, 2), 3)).unwrap();
//! assert_eq!(sql, "(? + ?) * ?");
//! assert_eq!(params.len(), 3);
//!
//! let (sql, _) = compile(&eq(col("name"), "alice")).unwrap();
//! assert_eq!(sql, "name = ?");
//! ```
//!
//! [`ExprExt`] offers the same operators fluently on non-literal nodes:
//!
//! ```rust
//! use sqlweave::builder::{col, ExprExt};
//! use sqlweave::compile;
//!
//! let filter = col("age").gt_eq(18).and(col("email").is_not_null());
//! let (sql, _) = compile(&filter).unwrap();
//! assert_eq!(sql, "age >= ? AND email IS NOT NULL");
//! ```

use std::ops;

use crate::ast::{
    BinaryOp, BinaryOperator, BooleanChain, ChainOp, Column, Expr, Function, IntoExpr, Null,
    Select, SetOp, SetOperation, Signature, Table, UnaryOp, UnaryOperator,
};
use crate::error::Result;

/// Creates a column reference.
#[must_use]
pub fn col(name: impl Into<String>) -> Column {
    Column::new(name)
}

/// Creates a table reference.
#[must_use]
pub fn table(name: impl Into<String>) -> Table {
    Table::new(name)
}

/// Starts a `SELECT *`.
#[must_use]
pub fn select() -> Select {
    Select::new()
}

macro_rules! binary_builders {
    ($($(#[$meta:meta])* $name:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $name(left: impl IntoExpr, right: impl IntoExpr) -> BinaryOperator {
                BinaryOperator::new(BinaryOp::$op, left, right)
            }
        )*
    };
}

binary_builders! {
    /// `left + right`.
    add => Add,
    /// `left - right`.
    sub => Sub,
    /// `left * right`.
    mul => Mul,
    /// `left / right`.
    div => Div,
    /// `left % right`.
    modulo => Mod,
    /// `left = right`. Compiles to `IS NULL` when `right` is null.
    eq => Eq,
    /// `left != right`. Compiles to `IS NOT NULL` when `right` is null.
    not_eq => NotEq,
    /// `left > right`.
    gt => Gt,
    /// `left >= right`.
    gt_eq => GtEq,
    /// `left < right`.
    lt => Lt,
    /// `left <= right`.
    lt_eq => LtEq,
    /// `left IS right`.
    is => Is,
    /// `left IS NOT right`.
    is_not => IsNot,
    /// `left IN right`.
    is_in => In,
    /// `left NOT IN right`.
    not_in => NotIn,
}

/// `left AND right`.
#[must_use]
pub fn and(left: impl IntoExpr, right: impl IntoExpr) -> BooleanChain {
    BooleanChain::pair(ChainOp::And, left, right)
}

/// `left OR right`.
#[must_use]
pub fn or(left: impl IntoExpr, right: impl IntoExpr) -> BooleanChain {
    BooleanChain::pair(ChainOp::Or, left, right)
}

/// Joins every operand with `AND`.
///
/// # Errors
///
/// Returns a construction error when `operands` is empty.
pub fn all(operands: Vec<Expr>) -> Result<BooleanChain> {
    BooleanChain::new(ChainOp::And, operands)
}

/// Joins every operand with `OR`.
///
/// # Errors
///
/// Returns a construction error when `operands` is empty.
pub fn any(operands: Vec<Expr>) -> Result<BooleanChain> {
    BooleanChain::new(ChainOp::Or, operands)
}

/// `NOT operand`.
#[must_use]
pub fn not(operand: impl IntoExpr) -> UnaryOperator {
    UnaryOperator::new(UnaryOp::Not, operand)
}

/// `-operand`.
#[must_use]
pub fn neg(operand: impl IntoExpr) -> UnaryOperator {
    UnaryOperator::new(UnaryOp::Minus, operand)
}

/// `+operand`.
#[must_use]
pub fn plus(operand: impl IntoExpr) -> UnaryOperator {
    UnaryOperator::new(UnaryOp::Plus, operand)
}

/// `min(args...)`.
///
/// # Errors
///
/// Returns a construction error when `args` is empty.
pub fn min(args: Vec<Expr>) -> Result<Function> {
    Function::call(Signature::min(), args)
}

/// `max(args...)`.
///
/// # Errors
///
/// Returns a construction error when `args` is empty.
pub fn max(args: Vec<Expr>) -> Result<Function> {
    Function::call(Signature::max(), args)
}

/// `sqrt(x)`.
#[must_use]
pub fn sqrt(x: impl IntoExpr) -> Function {
    Function::sqrt(x)
}

/// `power(x, y)`.
#[must_use]
pub fn power(x: impl IntoExpr, y: impl IntoExpr) -> Function {
    Function::power(x, y)
}

/// `left UNION right`.
#[must_use]
pub fn union(left: impl IntoExpr, right: impl IntoExpr) -> SetOperation {
    SetOperation::new(SetOp::Union, left, right)
}

/// `left INTERSECT right`.
#[must_use]
pub fn intersect(left: impl IntoExpr, right: impl IntoExpr) -> SetOperation {
    SetOperation::new(SetOp::Intersect, left, right)
}

/// `left EXCEPT right`.
#[must_use]
pub fn except(left: impl IntoExpr, right: impl IntoExpr) -> SetOperation {
    SetOperation::new(SetOp::Except, left, right)
}

/// Fluent operators for non-literal nodes.
///
/// Literals are left out so these methods never shadow `PartialEq::eq` or
/// `PartialOrd::lt` on plain values; use the free functions for those.
pub trait ExprExt: IntoExpr + Sized {
    /// `self = other`.
    #[must_use]
    fn eq(self, other: impl IntoExpr) -> BinaryOperator {
        eq(self, other)
    }

    /// `self != other`.
    #[must_use]
    fn not_eq(self, other: impl IntoExpr) -> BinaryOperator {
        not_eq(self, other)
    }

    /// `self < other`.
    #[must_use]
    fn lt(self, other: impl IntoExpr) -> BinaryOperator {
        lt(self, other)
    }

    /// `self <= other`.
    #[must_use]
    fn lt_eq(self, other: impl IntoExpr) -> BinaryOperator {
        lt_eq(self, other)
    }

    /// `self > other`.
    #[must_use]
    fn gt(self, other: impl IntoExpr) -> BinaryOperator {
        gt(self, other)
    }

    /// `self >= other`.
    #[must_use]
    fn gt_eq(self, other: impl IntoExpr) -> BinaryOperator {
        gt_eq(self, other)
    }

    /// `self IS NULL`.
    #[must_use]
    fn is_null(self) -> BinaryOperator {
        is(self, Null)
    }

    /// `self IS NOT NULL`.
    #[must_use]
    fn is_not_null(self) -> BinaryOperator {
        is_not(self, Null)
    }

    /// `self IN other`.
    #[must_use]
    fn is_in(self, other: impl IntoExpr) -> BinaryOperator {
        is_in(self, other)
    }

    /// `self NOT IN other`.
    #[must_use]
    fn not_in(self, other: impl IntoExpr) -> BinaryOperator {
        not_in(self, other)
    }

    /// `self AND other`.
    #[must_use]
    fn and(self, other: impl IntoExpr) -> BooleanChain {
        and(self, other)
    }

    /// `self OR other`.
    #[must_use]
    fn or(self, other: impl IntoExpr) -> BooleanChain {
        or(self, other)
    }
}

impl ExprExt for Expr {}
impl ExprExt for Column {}
impl ExprExt for Function {}
impl ExprExt for UnaryOperator {}
impl ExprExt for BinaryOperator {}
impl ExprExt for BooleanChain {}
impl ExprExt for Select {}

// Arithmetic and logical operators on nodes, so `col("a") + 1` builds
// `a + ?`. Comparisons cannot be overloaded this way; see `ExprExt`.
macro_rules! operator_overloads {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<R: IntoExpr> ops::Add<R> for $ty {
                type Output = BinaryOperator;

                fn add(self, rhs: R) -> BinaryOperator {
                    add(self, rhs)
                }
            }

            impl<R: IntoExpr> ops::Sub<R> for $ty {
                type Output = BinaryOperator;

                fn sub(self, rhs: R) -> BinaryOperator {
                    sub(self, rhs)
                }
            }

            impl<R: IntoExpr> ops::Mul<R> for $ty {
                type Output = BinaryOperator;

                fn mul(self, rhs: R) -> BinaryOperator {
                    mul(self, rhs)
                }
            }

            impl<R: IntoExpr> ops::Div<R> for $ty {
                type Output = BinaryOperator;

                fn div(self, rhs: R) -> BinaryOperator {
                    div(self, rhs)
                }
            }

            impl<R: IntoExpr> ops::Rem<R> for $ty {
                type Output = BinaryOperator;

                fn rem(self, rhs: R) -> BinaryOperator {
                    modulo(self, rhs)
                }
            }

            impl ops::Neg for $ty {
                type Output = UnaryOperator;

                fn neg(self) -> UnaryOperator {
                    neg(self)
                }
            }

            impl ops::Not for $ty {
                type Output = UnaryOperator;

                fn not(self) -> UnaryOperator {
                    not(self)
                }
            }
        )*
    };
}

operator_overloads!(Column, Function, UnaryOperator, BinaryOperator);
