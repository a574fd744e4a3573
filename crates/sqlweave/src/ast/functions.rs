//! Function calls.

use std::any::Any;
use std::fmt;

use super::{downcast, kinds, Expr, Expression, IntoExpr, Kind};
use crate::compiler::{Compiler, Fragment, State};
use crate::error::{Result, WeaveError};

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// `n` or more arguments.
    AtLeast(usize),
}

impl Arity {
    /// Returns true when `count` arguments are acceptable.
    #[must_use]
    pub const fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (qualifier, n) = match *self {
            Self::Exact(n) => ("exactly", n),
            Self::AtLeast(n) => ("at least", n),
        };
        let noun = if n == 1 { "argument" } else { "arguments" };
        write!(f, "{qualifier} {n} {noun}")
    }
}

/// Name, kind and arity of a function.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    kind: &'static Kind,
    name: &'static str,
    arity: Arity,
}

impl Signature {
    /// Creates a signature.
    #[must_use]
    pub const fn new(kind: &'static Kind, name: &'static str, arity: Arity) -> Self {
        Self { kind, name, arity }
    }

    /// `min(x, ...)`.
    #[must_use]
    pub fn min() -> Self {
        Self::new(&kinds::MIN, "min", Arity::AtLeast(1))
    }

    /// `max(x, ...)`.
    #[must_use]
    pub fn max() -> Self {
        Self::new(&kinds::MAX, "max", Arity::AtLeast(1))
    }

    /// `sqrt(x)`.
    #[must_use]
    pub fn sqrt() -> Self {
        Self::new(&kinds::SQRT, "sqrt", Arity::Exact(1))
    }

    /// `power(x, y)`.
    #[must_use]
    pub fn power() -> Self {
        Self::new(&kinds::POWER, "power", Arity::Exact(2))
    }

    /// Returns the SQL function name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the accepted arity.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }
}

/// A call of a named SQL function.
#[derive(Debug, Clone)]
pub struct Function {
    kind: &'static Kind,
    name: String,
    args: Vec<Expr>,
}

impl Function {
    /// Calls `signature` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::Construction`] when the argument count does not
    /// match the signature's arity.
    pub fn call(signature: Signature, args: Vec<Expr>) -> Result<Self> {
        if !signature.arity.accepts(args.len()) {
            return Err(WeaveError::construction(
                signature.kind.name(),
                format!("expected {}, got {}", signature.arity, args.len()),
            ));
        }
        Ok(Self {
            kind: signature.kind,
            name: String::from(signature.name),
            args,
        })
    }

    /// Calls an arbitrary function without arity checks.
    #[must_use]
    pub fn named(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            kind: &kinds::FUNCTION,
            name: name.into(),
            args,
        }
    }

    /// `sqrt(x)`.
    #[must_use]
    pub fn sqrt(x: impl IntoExpr) -> Self {
        Self {
            kind: &kinds::SQRT,
            name: String::from("sqrt"),
            args: vec![x.into_expr()],
        }
    }

    /// `power(x, y)`.
    #[must_use]
    pub fn power(x: impl IntoExpr, y: impl IntoExpr) -> Self {
        Self {
            kind: &kinds::POWER,
            name: String::from("power"),
            args: vec![x.into_expr(), y.into_expr()],
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments in call order.
    #[must_use]
    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

impl Expression for Function {
    fn kind(&self) -> &'static Kind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn boxed(&self) -> Expr {
        Box::new(self.clone())
    }
}

pub(crate) fn register(compiler: &mut Compiler) {
    compiler.when(&[&kinds::FUNCTION], compile_function);
}

fn compile_function(
    compiler: &Compiler,
    expr: &dyn Expression,
    state: &mut State,
) -> Result<Fragment> {
    let node = downcast::<Function>(expr)?;
    let args = node
        .args()
        .iter()
        .map(|arg| compiler.compile_clause(arg.as_ref(), state))
        .collect::<Result<Vec<_>>>()?;
    Ok(Fragment::Sql(format!("{}({})", node.name(), args.join(", "))))
}
