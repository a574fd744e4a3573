//! Expression kinds and their generalization chain.

use std::fmt;
use std::iter;

use crate::compiler::Precedence;

/// The identity of an expression kind.
///
/// Every kind names the kind it generalizes, forming a chain that ends at a
/// root. Handler lookup walks this chain most-derived first, and a kind
/// without a declared precedence inherits the nearest declared one.
///
/// Kinds are compared by name, so names must be unique within a compiler.
///
/// ```rust
/// use sqlweave::compiler::Precedence;
/// use sqlweave::kinds;
/// use sqlweave::Kind;
///
/// static GREATEST: Kind = Kind::new("greatest", &kinds::FUNCTION);
///
/// assert!(GREATEST.is(&kinds::FUNCTION));
/// assert_eq!(GREATEST.precedence(), Precedence::TIGHTEST);
/// ```
pub struct Kind {
    name: &'static str,
    generalizes: Option<&'static Kind>,
    precedence: Option<Precedence>,
}

impl Kind {
    /// Creates a kind with no parent.
    #[must_use]
    pub const fn root(name: &'static str) -> Self {
        Self {
            name,
            generalizes: None,
            precedence: None,
        }
    }

    /// Creates a kind generalized by `parent`.
    #[must_use]
    pub const fn new(name: &'static str, parent: &'static Self) -> Self {
        Self {
            name,
            generalizes: Some(parent),
            precedence: None,
        }
    }

    /// Declares the precedence of this kind and its descendants.
    #[must_use]
    pub const fn with_precedence(self, precedence: Precedence) -> Self {
        Self {
            name: self.name,
            generalizes: self.generalizes,
            precedence: Some(precedence),
        }
    }

    /// Returns the kind name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the kind this one generalizes, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&'static Self> {
        self.generalizes
    }

    /// Iterates this kind and its ancestors, most-derived first.
    pub fn lineage(&'static self) -> impl Iterator<Item = &'static Self> {
        iter::successors(Some(self), |kind| kind.generalizes)
    }

    /// Returns true when `other` is this kind or one of its ancestors.
    #[must_use]
    pub fn is(&'static self, other: &Self) -> bool {
        self.lineage().any(|kind| kind == other)
    }

    /// Returns the nearest declared precedence, or [`Precedence::TIGHTEST`].
    #[must_use]
    pub fn precedence(&'static self) -> Precedence {
        self.lineage()
            .find_map(|kind| kind.precedence)
            .unwrap_or_default()
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Kind {}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kind").field(&self.name).finish()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
