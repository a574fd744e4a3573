//! Operator precedence and associativity.
//!
//! Brackets are placed by comparing precedences. A [`Precedence`] is a
//! `(rank, associativity)` pair ordered by rank first and associativity
//! second, so the whole type is totally ordered.
//!
//! The ranks used by the built-in kinds follow the PostgreSQL operator table:
//!
//! | Rank | Associativity | Operators                                  |
//! |------|---------------|--------------------------------------------|
//! | 1400 | left          | `.`                                        |
//! | 1300 | left          | `::`                                       |
//! | 1200 | left          | `[` `]`                                    |
//! | 1100 | right         | unary `+`, unary `-`                       |
//! | 1000 | left          | `^`                                        |
//! | 900  | left          | `*`, `/`, `%`                              |
//! | 800  | left          | binary `+`, `-`                            |
//! | 700  | left          | any other operator                         |
//! | 600  | none          | `BETWEEN`, `IN`, `LIKE`, `ILIKE`, `SIMILAR`|
//! | 500  | none          | `<`, `>`, `=`, `<=`, `>=`, `!=`            |
//! | 400  | none          | `IS`, `IS NOT`                             |
//! | 300  | right         | `NOT`                                      |
//! | 200  | left          | `AND`                                      |
//! | 100  | left          | `OR`                                       |
//!
//! Queries rank below every operator. A `SELECT` binds tighter than
//! `INTERSECT`, which binds tighter than `UNION` and `EXCEPT`:
//!
//! | Rank | Associativity | Queries                                    |
//! |------|---------------|--------------------------------------------|
//! | 30   | none          | `SELECT`                                   |
//! | 20   | left          | `INTERSECT`                                |
//! | 10   | left          | `UNION`, `EXCEPT`                          |

use std::fmt;

/// Ranks of the reference dialect.
pub mod rank {
    /// Member access (`.`).
    pub const MEMBER: i32 = 1400;
    /// Type cast (`::`).
    pub const CAST: i32 = 1300;
    /// Array subscript.
    pub const SUBSCRIPT: i32 = 1200;
    /// Unary plus and minus.
    pub const UNARY: i32 = 1100;
    /// Exponentiation.
    pub const EXPONENT: i32 = 1000;
    /// `*`, `/`, `%`.
    pub const MULTIPLICATIVE: i32 = 900;
    /// Binary `+` and `-`.
    pub const ADDITIVE: i32 = 800;
    /// Operators without a dedicated row.
    pub const OTHER: i32 = 700;
    /// `IN`, `BETWEEN`, `LIKE`.
    pub const CONTAINMENT: i32 = 600;
    /// Comparison operators.
    pub const COMPARISON: i32 = 500;
    /// `IS` forms.
    pub const IS: i32 = 400;
    /// Logical `NOT`.
    pub const NOT: i32 = 300;
    /// Logical `AND`.
    pub const AND: i32 = 200;
    /// Logical `OR`.
    pub const OR: i32 = 100;
    /// A single query.
    pub const QUERY: i32 = 30;
    /// `INTERSECT`.
    pub const INTERSECT: i32 = 20;
    /// `UNION` and `EXCEPT`.
    pub const UNION: i32 = 10;
    /// Whole statements.
    pub const STATEMENT: i32 = 0;
}

/// Operator associativity, ordered `None < Left < Right`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Associativity {
    /// No associativity.
    #[default]
    None,
    /// Left-associative.
    Left,
    /// Right-associative.
    Right,
}

impl Associativity {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// A `(rank, associativity)` pair. Higher ranks bind tighter.
///
/// Field order matters: the derived ordering compares `rank` before
/// `associativity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precedence {
    rank: i32,
    associativity: Associativity,
}

impl Precedence {
    /// Binds tightest and is never bracketed. Used by atoms.
    pub const TIGHTEST: Self = Self::new(i32::MAX, Associativity::None);

    /// Binds loosest. Used as the demand at the root of a compile.
    pub const LOOSEST: Self = Self::new(rank::STATEMENT, Associativity::None);

    /// Demanded of expressions in a delimited position, such as a function
    /// argument or a `SELECT` clause. Only queries get brackets.
    pub const CLAUSE: Self = Self::left(rank::QUERY);

    /// Creates a precedence.
    #[must_use]
    pub const fn new(rank: i32, associativity: Associativity) -> Self {
        Self {
            rank,
            associativity,
        }
    }

    /// Creates a non-associative precedence.
    #[must_use]
    pub const fn with_rank(rank: i32) -> Self {
        Self::new(rank, Associativity::None)
    }

    /// Creates a left-associative precedence.
    #[must_use]
    pub const fn left(rank: i32) -> Self {
        Self::new(rank, Associativity::Left)
    }

    /// Creates a right-associative precedence.
    #[must_use]
    pub const fn right(rank: i32) -> Self {
        Self::new(rank, Associativity::Right)
    }

    /// Returns the rank.
    #[must_use]
    pub const fn rank(&self) -> i32 {
        self.rank
    }

    /// Returns the associativity.
    #[must_use]
    pub const fn associativity(&self) -> Associativity {
        self.associativity
    }

    /// Returns the smallest precedence strictly greater than `self`.
    ///
    /// Demanding `p.next_tighter()` of an operand brackets any operand whose
    /// precedence is `<= p`.
    #[must_use]
    pub const fn next_tighter(&self) -> Self {
        match self.associativity {
            Associativity::None => Self::new(self.rank, Associativity::Left),
            Associativity::Left => Self::new(self.rank, Associativity::Right),
            Associativity::Right => {
                Self::new(self.rank.saturating_add(1), Associativity::None)
            }
        }
    }
}

impl Default for Precedence {
    fn default() -> Self {
        Self::TIGHTEST
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.rank, self.associativity.as_str())
    }
}
