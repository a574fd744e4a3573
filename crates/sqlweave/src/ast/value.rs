//! Literal values and parameter binding.
//!
//! Literals are ordinary expressions. Compiling one appends its value to the
//! state's parameter list and emits the dialect placeholder, so values never
//! reach the SQL text.

use std::any::Any;

use tracing::trace;

use super::{kinds, Expr, Expression, Kind};
use crate::compiler::{Compiler, Fragment, State};
use crate::error::{Result, WeaveError};

/// A SQL value that can be used as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns true for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for Null {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Null
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

/// The absent value. Compiles to `NULL` without binding a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl Expression for SqlValue {
    fn kind(&self) -> &'static Kind {
        match self {
            Self::Null => &kinds::NULL,
            Self::Bool(_) => &kinds::BOOLEAN,
            Self::Int(_) => &kinds::INTEGER,
            Self::Float(_) => &kinds::FLOAT,
            Self::Text(_) => &kinds::TEXT,
            Self::Blob(_) => &kinds::BLOB,
        }
    }

    fn to_value(&self) -> Option<SqlValue> {
        Some(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn boxed(&self) -> Expr {
        Box::new(self.clone())
    }
}

macro_rules! value_expression {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Expression for $ty {
                fn kind(&self) -> &'static Kind {
                    &kinds::$kind
                }

                fn to_value(&self) -> Option<SqlValue> {
                    Some(ToSqlValue::to_sql_value(self.clone()))
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn boxed(&self) -> Expr {
                    Box::new(self.clone())
                }
            }
        )*
    };
}

value_expression! {
    Null => NULL,
    bool => BOOLEAN,
    i64 => INTEGER,
    i32 => INTEGER,
    i16 => INTEGER,
    u32 => INTEGER,
    u16 => INTEGER,
    f64 => FLOAT,
    f32 => FLOAT,
    String => TEXT,
    &'static str => TEXT,
    Vec<u8> => BLOB,
}

impl<T> Expression for Option<T>
where
    T: Expression + ToSqlValue + Clone + 'static,
{
    fn kind(&self) -> &'static Kind {
        self.as_ref().map_or(&kinds::NULL, Expression::kind)
    }

    fn to_value(&self) -> Option<SqlValue> {
        Some(self.clone().to_sql_value())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn boxed(&self) -> Expr {
        Box::new(self.clone())
    }
}

pub(crate) fn register(compiler: &mut Compiler) {
    compiler.when(&[&kinds::VALUE], compile_value);
    compiler.when(&[&kinds::NULL], compile_null);
}

fn compile_value(compiler: &Compiler, expr: &dyn Expression, state: &mut State) -> Result<Fragment> {
    let value = expr.to_value().ok_or_else(|| WeaveError::UnexpectedNode {
        kind: expr.kind().name(),
        expected: "value",
    })?;
    trace!(kind = expr.kind().name(), "binding parameter");
    state.bind(value)?;
    Ok(Fragment::sql(compiler.dialect().parameter_placeholder()))
}

#[allow(clippy::unnecessary_wraps)]
fn compile_null(compiler: &Compiler, _expr: &dyn Expression, _state: &mut State) -> Result<Fragment> {
    Ok(Fragment::sql(compiler.dialect().null_keyword()))
}
