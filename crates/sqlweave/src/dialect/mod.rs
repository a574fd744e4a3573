//! SQL dialect support.
//!
//! The compiler asks its dialect for the few tokens that differ between
//! databases. Everything else is emitted the same way for every dialect.

use std::fmt;

mod generic;

pub use generic::GenericDialect;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the parameter placeholder emitted for each bound value.
    fn parameter_placeholder(&self) -> &'static str {
        "?"
    }

    /// Returns the keyword for the absent value.
    fn null_keyword(&self) -> &'static str {
        "NULL"
    }
}
