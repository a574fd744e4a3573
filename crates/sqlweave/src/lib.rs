//! # sqlweave
//!
//! SQL expression trees compiled to parameterized SQL.
//!
//! This crate provides:
//! - Expression nodes identified by [`Kind`]s that generalize one another
//! - A [`Compiler`] that dispatches on kinds, falling back to more general
//!   kinds and then to a parent compiler
//! - Bracket insertion driven by operator [`Precedence`]
//! - A scoped [`State`] that carries the demanded precedence and collects
//!   bound parameters
//!
//! ## Compiling expressions
//!
//! Literals never reach the SQL text. Each one becomes a placeholder and
//! its value is returned alongside the SQL:
//!
//! ```rust
//! use sqlweave::builder::{add, mul};
//! use sqlweave::{compile, SqlValue};
//!
//! let (sql, params) = compile(&add(mul(1, 2), 3)).unwrap();
//! assert_eq!(sql, "? * ? + ?");
//! assert_eq!(params, vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]);
//! ```
//!
//! ## Comparing with null
//!
//! `=` and `!=` against null are rewritten into `IS` and `IS NOT`:
//!
//! ```rust
//! use sqlweave::builder::{col, not_eq};
//! use sqlweave::{compile, Null};
//!
//! let (sql, params) = compile(&not_eq(col("deleted_at"), Null)).unwrap();
//! assert_eq!(sql, "deleted_at IS NOT NULL");
//! assert!(params.is_empty());
//! ```
//!
//! ## Extending the compiler
//!
//! A derived compiler registers handlers for the kinds it cares about and
//! inherits everything else:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sqlweave::compiler::Fragment;
//! use sqlweave::{kinds, Compiler, Function};
//!
//! let mut compiler = Compiler::with_parent(Arc::new(Compiler::standard()));
//! compiler.when(&[&kinds::SQRT], |_, _, _| Ok(Fragment::sql("0")));
//!
//! let (sql, _) = compiler.compile(&Function::sqrt(9)).unwrap();
//! assert_eq!(sql, "0");
//! let (sql, _) = compiler.compile(&Function::power(2, 3)).unwrap();
//! assert_eq!(sql, "power(?, ?)");
//! ```

pub mod ast;
pub mod builder;
pub mod compiler;
pub mod dialect;
pub mod error;

pub use ast::{
    expr, kinds, BinaryOperator, BooleanChain, Column, Expr, Expression, Function, IntoExpr, Kind,
    Null, Select, SetOperation, SqlValue, Table, ToSqlValue, UnaryOperator,
};
pub use compiler::{compile, default_compiler, Compiler, Precedence, State};
pub use error::{Result, WeaveError};
