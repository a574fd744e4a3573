//! Kind-dispatched compilation of expression trees.
//!
//! A [`Compiler`] maps expression kinds to handlers. To compile a node it
//! walks the node's kind lineage, most-derived first, and runs the first
//! handler registered for any of those kinds. If its own table has none it
//! asks its parent compiler, so a derived compiler only needs to register
//! what it changes.
//!
//! Each handler runs in a fresh scope of the [`State`] whose `precedence`
//! is the node's own. Children compiled from inside the handler therefore
//! see it as their demanded precedence, and a child is bracketed when its
//! precedence is lower than what is demanded of it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace};

use crate::ast::{self, Expr, Expression, Kind, SqlValue};
use crate::dialect::{Dialect, GenericDialect};
use crate::error::{Result, WeaveError};

pub mod precedence;
mod state;

pub use precedence::{Associativity, Precedence};
pub use state::{Attribute, Bindings, ParentView, Scope, State, PARAMETERS, PRECEDENCE};

/// The output of a handler.
#[derive(Debug)]
pub enum Fragment {
    /// Finished SQL for the node, without surrounding brackets.
    Sql(String),
    /// A node to compile in place of the current one, against the caller's
    /// scope.
    Rewrite(Expr),
}

impl Fragment {
    /// Creates a SQL fragment.
    #[must_use]
    pub fn sql(sql: impl Into<String>) -> Self {
        Self::Sql(sql.into())
    }
}

/// A compile handler.
pub type Handler =
    Arc<dyn Fn(&Compiler, &dyn Expression, &mut State) -> Result<Fragment> + Send + Sync>;

/// Compiles expression trees to SQL text and bound parameters.
pub struct Compiler {
    parent: Option<Arc<Compiler>>,
    handlers: HashMap<&'static str, Handler>,
    dialect: Arc<dyn Dialect>,
}

impl Compiler {
    /// Creates a compiler with no handlers and the generic dialect.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            handlers: HashMap::new(),
            dialect: Arc::new(GenericDialect::new()),
        }
    }

    /// Creates a compiler with every built-in handler registered.
    #[must_use]
    pub fn standard() -> Self {
        let mut compiler = Self::new();
        ast::register_values(&mut compiler);
        ast::register_operators(&mut compiler);
        ast::register_functions(&mut compiler);
        ast::register_query(&mut compiler);
        compiler
    }

    /// Creates an empty compiler that falls back to `parent` for kinds it
    /// does not handle. The parent's dialect is inherited.
    #[must_use]
    pub fn with_parent(parent: Arc<Self>) -> Self {
        Self {
            dialect: Arc::clone(&parent.dialect),
            parent: Some(parent),
            handlers: HashMap::new(),
        }
    }

    /// Sets the dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Returns the parent compiler.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// Registers `handler` for each of `kinds`, replacing any handler this
    /// compiler already had for them.
    pub fn when<F>(&mut self, kinds: &[&'static Kind], handler: F) -> &mut Self
    where
        F: Fn(&Self, &dyn Expression, &mut State) -> Result<Fragment> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        for kind in kinds {
            debug!(kind = kind.name(), "registering compile handler");
            self.handlers.insert(kind.name(), Arc::clone(&handler));
        }
        self
    }

    /// Returns true when this compiler or an ancestor handles `kind`.
    #[must_use]
    pub fn handles(&self, kind: &'static Kind) -> bool {
        self.lookup(kind).is_some()
    }

    fn lookup(&self, kind: &'static Kind) -> Option<&Handler> {
        kind.lineage()
            .find_map(|candidate| {
                self.handlers.get(candidate.name()).inspect(|_| {
                    trace!(kind = kind.name(), matched = candidate.name(), "resolved handler");
                })
            })
            .or_else(|| self.parent.as_deref().and_then(|parent| parent.lookup(kind)))
    }

    fn handler_for(&self, kind: &'static Kind) -> Result<&Handler> {
        self.lookup(kind)
            .ok_or_else(|| WeaveError::NoHandler { kind: kind.name() })
    }

    /// Compiles `expr` in a fresh state.
    ///
    /// Returns the SQL text and the bound parameters in placeholder order.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NoHandler`] when some node in the tree has no
    /// handler, or any error raised by a handler.
    pub fn compile(&self, expr: &dyn Expression) -> Result<(String, Vec<SqlValue>)> {
        let mut state = State::new();
        let sql = self.compile_with(expr, &mut state)?;
        let params = state.into_parameters()?;
        debug!(kind = expr.kind().name(), params = params.len(), "compiled expression");
        Ok((sql, params))
    }

    /// Compiles `expr` against `state`, demanding the state's current
    /// precedence.
    ///
    /// This is how handlers compile their children.
    ///
    /// # Errors
    ///
    /// Same as [`Compiler::compile`], plus attribute errors when `state`
    /// lacks a `precedence`.
    pub fn compile_with(&self, expr: &dyn Expression, state: &mut State) -> Result<String> {
        let demanded = state.precedence()?;
        self.compile_demanding(expr, state, demanded)
    }

    /// Compiles `expr` in a delimited position such as a function argument,
    /// where only queries need brackets.
    ///
    /// # Errors
    ///
    /// Same as [`Compiler::compile_with`].
    pub fn compile_clause(&self, expr: &dyn Expression, state: &mut State) -> Result<String> {
        self.compile_demanding(expr, state, Precedence::CLAUSE)
    }

    /// Compiles `expr` against `state`, bracketing it when its precedence is
    /// lower than `demanded`.
    ///
    /// # Errors
    ///
    /// Same as [`Compiler::compile_with`].
    pub fn compile_demanding(
        &self,
        expr: &dyn Expression,
        state: &mut State,
        demanded: Precedence,
    ) -> Result<String> {
        let handler = self.handler_for(expr.kind())?;
        let own = expr.precedence();
        trace!(kind = expr.kind().name(), %own, %demanded, "compiling");

        let mut scope = state.scope(Bindings::new().precedence(own))?;
        let sql = match handler(self, expr, &mut *scope)? {
            Fragment::Sql(sql) => sql,
            Fragment::Rewrite(replacement) => {
                let mut caller = scope.parent_view()?;
                return self.compile_demanding(replacement.as_ref(), &mut *caller, demanded);
            }
        };

        if own < demanded {
            Ok(format!("({sql})"))
        } else {
            Ok(sql)
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort_unstable();
        f.debug_struct("Compiler")
            .field("dialect", &self.dialect.name())
            .field("handlers", &kinds)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Returns the process-wide compiler with every built-in handler.
#[must_use]
pub fn default_compiler() -> &'static Compiler {
    static DEFAULT: OnceLock<Compiler> = OnceLock::new();
    DEFAULT.get_or_init(Compiler::standard)
}

/// Compiles `expr` with the [`default_compiler`].
///
/// # Errors
///
/// Same as [`Compiler::compile`].
pub fn compile(expr: &dyn Expression) -> Result<(String, Vec<SqlValue>)> {
    default_compiler().compile(expr)
}
