//! Built-in expression kinds.
//!
//! The taxonomy mirrors the PostgreSQL precedence table documented in
//! [`crate::compiler::precedence`]. Kinds without a declared precedence
//! inherit their parent's.

use crate::ast::Kind;
use crate::compiler::precedence::rank;
use crate::compiler::Precedence;

/// Root of every built-in kind.
pub static EXPRESSION: Kind = Kind::root("expression");

// Literal values

/// Any bound value.
pub static VALUE: Kind = Kind::new("value", &EXPRESSION);
/// Integer literal.
pub static INTEGER: Kind = Kind::new("integer", &VALUE);
/// Floating point literal.
pub static FLOAT: Kind = Kind::new("float", &VALUE);
/// Text literal.
pub static TEXT: Kind = Kind::new("text", &VALUE);
/// Boolean literal.
pub static BOOLEAN: Kind = Kind::new("boolean", &VALUE);
/// Binary literal.
pub static BLOB: Kind = Kind::new("blob", &VALUE);
/// The absent value, rendered as `NULL`.
pub static NULL: Kind = Kind::new("null", &VALUE);

// Operators

/// Any operator.
pub static OPERATOR: Kind =
    Kind::new("operator", &EXPRESSION).with_precedence(Precedence::left(rank::OTHER));

/// Prefix operators.
pub static UNARY_OPERATOR: Kind =
    Kind::new("unary_operator", &OPERATOR).with_precedence(Precedence::right(rank::OTHER));
/// Unary `+`.
pub static UNARY_PLUS: Kind =
    Kind::new("unary_plus", &UNARY_OPERATOR).with_precedence(Precedence::right(rank::UNARY));
/// Unary `-`.
pub static UNARY_MINUS: Kind =
    Kind::new("unary_minus", &UNARY_OPERATOR).with_precedence(Precedence::right(rank::UNARY));
/// Logical `NOT`.
pub static NOT: Kind =
    Kind::new("not", &UNARY_OPERATOR).with_precedence(Precedence::right(rank::NOT));

/// Infix operators with two operands.
pub static BINARY_OPERATOR: Kind = Kind::new("binary_operator", &OPERATOR);
/// `+`.
pub static ADD: Kind =
    Kind::new("add", &BINARY_OPERATOR).with_precedence(Precedence::left(rank::ADDITIVE));
/// `-`.
pub static SUBTRACT: Kind =
    Kind::new("subtract", &BINARY_OPERATOR).with_precedence(Precedence::left(rank::ADDITIVE));
/// `*`.
pub static MULTIPLY: Kind = Kind::new("multiply", &BINARY_OPERATOR)
    .with_precedence(Precedence::left(rank::MULTIPLICATIVE));
/// `/`.
pub static DIVIDE: Kind = Kind::new("divide", &BINARY_OPERATOR)
    .with_precedence(Precedence::left(rank::MULTIPLICATIVE));
/// `%`.
pub static MODULO: Kind = Kind::new("modulo", &BINARY_OPERATOR)
    .with_precedence(Precedence::left(rank::MULTIPLICATIVE));
/// `IN`.
pub static IN: Kind =
    Kind::new("in", &BINARY_OPERATOR).with_precedence(Precedence::with_rank(rank::CONTAINMENT));
/// `NOT IN`.
pub static NOT_IN: Kind = Kind::new("not_in", &BINARY_OPERATOR)
    .with_precedence(Precedence::with_rank(rank::CONTAINMENT));
/// `IS`.
pub static IS: Kind =
    Kind::new("is", &BINARY_OPERATOR).with_precedence(Precedence::with_rank(rank::IS));
/// `IS NOT`.
pub static IS_NOT: Kind =
    Kind::new("is_not", &BINARY_OPERATOR).with_precedence(Precedence::with_rank(rank::IS));
/// `=`. Compiled as `IS` when the right operand is null.
pub static EQUAL: Kind = Kind::new("equal", &BINARY_OPERATOR)
    .with_precedence(Precedence::with_rank(rank::COMPARISON));
/// `!=`. Compiled as `IS NOT` when the right operand is null.
///
/// Ranked with the other comparisons as in PostgreSQL, not as a generic
/// operator at 700/left.
pub static NOT_EQUAL: Kind = Kind::new("not_equal", &BINARY_OPERATOR)
    .with_precedence(Precedence::with_rank(rank::COMPARISON));
/// `>`.
pub static GREATER_THAN: Kind = Kind::new("greater_than", &BINARY_OPERATOR)
    .with_precedence(Precedence::with_rank(rank::COMPARISON));
/// `>=`.
pub static GREATER_THAN_EQUAL: Kind = Kind::new("greater_than_equal", &BINARY_OPERATOR)
    .with_precedence(Precedence::with_rank(rank::COMPARISON));
/// `<`.
pub static LESS_THAN: Kind = Kind::new("less_than", &BINARY_OPERATOR)
    .with_precedence(Precedence::with_rank(rank::COMPARISON));
/// `<=`.
pub static LESS_THAN_EQUAL: Kind = Kind::new("less_than_equal", &BINARY_OPERATOR)
    .with_precedence(Precedence::with_rank(rank::COMPARISON));

/// Operators joining any number of operands with one keyword.
pub static BOOLEAN_CHAIN: Kind = Kind::new("boolean_chain", &OPERATOR);
/// `AND`.
pub static AND: Kind =
    Kind::new("and", &BOOLEAN_CHAIN).with_precedence(Precedence::left(rank::AND));
/// `OR`.
pub static OR: Kind = Kind::new("or", &BOOLEAN_CHAIN).with_precedence(Precedence::left(rank::OR));

// Functions

/// Any function call.
pub static FUNCTION: Kind = Kind::new("function", &EXPRESSION);
/// `min(..)`.
pub static MIN: Kind = Kind::new("min", &FUNCTION);
/// `max(..)`.
pub static MAX: Kind = Kind::new("max", &FUNCTION);
/// `sqrt(x)`.
pub static SQRT: Kind = Kind::new("sqrt", &FUNCTION);
/// `power(x, y)`.
pub static POWER: Kind = Kind::new("power", &FUNCTION);

// Queries

/// A table reference.
pub static TABLE: Kind = Kind::new("table", &EXPRESSION);
/// A column reference.
pub static COLUMN: Kind = Kind::new("column", &EXPRESSION);
/// A `SELECT` statement.
pub static SELECT: Kind =
    Kind::new("select", &EXPRESSION).with_precedence(Precedence::with_rank(rank::QUERY));

/// Set operations between two queries.
pub static SET_OPERATION: Kind =
    Kind::new("set_operation", &EXPRESSION).with_precedence(Precedence::left(rank::UNION));
/// `UNION`.
pub static UNION: Kind = Kind::new("union", &SET_OPERATION);
/// `INTERSECT`.
pub static INTERSECT: Kind = Kind::new("intersect", &SET_OPERATION)
    .with_precedence(Precedence::left(rank::INTERSECT));
/// `EXCEPT`.
pub static EXCEPT: Kind = Kind::new("except", &SET_OPERATION);
