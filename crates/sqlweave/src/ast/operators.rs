//! Unary, binary and boolean chain operators.

use std::any::Any;

use tracing::debug;

use super::{downcast, kinds, Expr, Expression, IntoExpr, Kind};
use crate::compiler::{Associativity, Compiler, Fragment, State};
use crate::error::{Result, WeaveError};

/// Built-in prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Unary `+`.
    Plus,
    /// Unary `-`.
    Minus,
    /// Logical `NOT`.
    Not,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "NOT",
        }
    }

    /// Returns the expression kind of the operator.
    #[must_use]
    pub fn kind(&self) -> &'static Kind {
        match self {
            Self::Plus => &kinds::UNARY_PLUS,
            Self::Minus => &kinds::UNARY_MINUS,
            Self::Not => &kinds::NOT,
        }
    }
}

/// Built-in binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Containment
    In,
    NotIn,

    // Comparison
    Is,
    IsNot,
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
        }
    }

    /// Returns the expression kind of the operator.
    #[must_use]
    pub fn kind(&self) -> &'static Kind {
        match self {
            Self::Add => &kinds::ADD,
            Self::Sub => &kinds::SUBTRACT,
            Self::Mul => &kinds::MULTIPLY,
            Self::Div => &kinds::DIVIDE,
            Self::Mod => &kinds::MODULO,
            Self::In => &kinds::IN,
            Self::NotIn => &kinds::NOT_IN,
            Self::Is => &kinds::IS,
            Self::IsNot => &kinds::IS_NOT,
            Self::Eq => &kinds::EQUAL,
            Self::NotEq => &kinds::NOT_EQUAL,
            Self::Gt => &kinds::GREATER_THAN,
            Self::GtEq => &kinds::GREATER_THAN_EQUAL,
            Self::Lt => &kinds::LESS_THAN,
            Self::LtEq => &kinds::LESS_THAN_EQUAL,
        }
    }
}

/// Built-in boolean chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    /// Logical `AND`.
    And,
    /// Logical `OR`.
    Or,
}

impl ChainOp {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns the expression kind of the chain.
    #[must_use]
    pub fn kind(&self) -> &'static Kind {
        match self {
            Self::And => &kinds::AND,
            Self::Or => &kinds::OR,
        }
    }
}

/// A prefix operator applied to one operand.
#[derive(Debug, Clone)]
pub struct UnaryOperator {
    kind: &'static Kind,
    symbol: &'static str,
    operand: Expr,
}

impl UnaryOperator {
    /// Creates a built-in unary operator.
    #[must_use]
    pub fn new(op: UnaryOp, operand: impl IntoExpr) -> Self {
        Self::with_kind(op.kind(), op.as_str(), operand)
    }

    /// Creates a unary operator of any kind.
    ///
    /// `kind` should generalize [`kinds::UNARY_OPERATOR`] for the built-in
    /// handler to pick it up.
    #[must_use]
    pub fn with_kind(kind: &'static Kind, symbol: &'static str, operand: impl IntoExpr) -> Self {
        Self {
            kind,
            symbol,
            operand: operand.into_expr(),
        }
    }

    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Returns the operand.
    #[must_use]
    pub fn operand(&self) -> &dyn Expression {
        self.operand.as_ref()
    }
}

impl Expression for UnaryOperator {
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

/// An infix operator applied to two operands.
#[derive(Debug, Clone)]
pub struct BinaryOperator {
    kind: &'static Kind,
    symbol: &'static str,
    left: Expr,
    right: Expr,
}

impl BinaryOperator {
    /// Creates a built-in binary operator.
    #[must_use]
    pub fn new(op: BinaryOp, left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::with_kind(op.kind(), op.as_str(), left, right)
    }

    /// Creates a binary operator of any kind.
    ///
    /// `kind` should generalize [`kinds::BINARY_OPERATOR`] for the built-in
    /// handler to pick it up.
    #[must_use]
    pub fn with_kind(
        kind: &'static Kind,
        symbol: &'static str,
        left: impl IntoExpr,
        right: impl IntoExpr,
    ) -> Self {
        Self {
            kind,
            symbol,
            left: left.into_expr(),
            right: right.into_expr(),
        }
    }

    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Returns the left operand.
    #[must_use]
    pub fn left(&self) -> &dyn Expression {
        self.left.as_ref()
    }

    /// Returns the right operand.
    #[must_use]
    pub fn right(&self) -> &dyn Expression {
        self.right.as_ref()
    }
}

impl Expression for BinaryOperator {
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

/// Operands joined by one keyword, such as `a AND b AND c`.
#[derive(Debug, Clone)]
pub struct BooleanChain {
    kind: &'static Kind,
    keyword: &'static str,
    operands: Vec<Expr>,
}

impl BooleanChain {
    /// Creates a built-in chain over `operands`.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::Construction`] when `operands` is empty.
    pub fn new(op: ChainOp, operands: Vec<Expr>) -> Result<Self> {
        Self::with_kind(op.kind(), op.as_str(), operands)
    }

    /// Creates a built-in chain of exactly two operands.
    #[must_use]
    pub fn pair(op: ChainOp, left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self {
            kind: op.kind(),
            keyword: op.as_str(),
            operands: vec![left.into_expr(), right.into_expr()],
        }
    }

    /// Creates a chain of any kind.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::Construction`] when `operands` is empty.
    pub fn with_kind(
        kind: &'static Kind,
        keyword: &'static str,
        operands: Vec<Expr>,
    ) -> Result<Self> {
        if operands.is_empty() {
            return Err(WeaveError::construction(
                kind.name(),
                "expected at least 1 operand, got 0",
            ));
        }
        Ok(Self {
            kind,
            keyword,
            operands,
        })
    }

    /// Returns the joining keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Returns the operands in order.
    #[must_use]
    pub fn operands(&self) -> &[Expr] {
        &self.operands
    }

    /// Appends another operand.
    #[must_use]
    pub fn push(mut self, operand: impl IntoExpr) -> Self {
        self.operands.push(operand.into_expr());
        self
    }
}

impl Expression for BooleanChain {
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
    compiler.when(&[&kinds::UNARY_OPERATOR], compile_unary);
    compiler.when(&[&kinds::BINARY_OPERATOR], compile_binary);
    compiler.when(&[&kinds::EQUAL, &kinds::NOT_EQUAL], compile_equality);
    compiler.when(&[&kinds::BOOLEAN_CHAIN], compile_chain);
}

fn compile_unary(compiler: &Compiler, expr: &dyn Expression, state: &mut State) -> Result<Fragment> {
    let node = downcast::<UnaryOperator>(expr)?;
    let operand = compiler.compile_with(node.operand(), state)?;

    // Keyword operators need a space before their operand, and `--` would
    // start a comment.
    let symbol = node.symbol();
    let separator = if symbol.ends_with(char::is_alphabetic)
        || (symbol.ends_with(['-', '+']) && operand.starts_with(['-', '+']))
    {
        " "
    } else {
        ""
    };
    Ok(Fragment::Sql(format!("{symbol}{separator}{operand}")))
}

/// Compiles `left op right`.
///
/// The operand on the side the operator does not associate towards is held
/// to a strictly tighter precedence, so `1 - (2 - 3)` keeps its brackets.
fn compile_binary(compiler: &Compiler, expr: &dyn Expression, state: &mut State) -> Result<Fragment> {
    let node = downcast::<BinaryOperator>(expr)?;
    let own = expr.precedence();
    let tighter = own.next_tighter();
    let (left_demand, right_demand) = match own.associativity() {
        Associativity::Left => (own, tighter),
        Associativity::Right => (tighter, own),
        Associativity::None => (tighter, tighter),
    };

    let left = compiler.compile_demanding(node.left(), state, left_demand)?;
    let right = compiler.compile_demanding(node.right(), state, right_demand)?;
    Ok(Fragment::Sql(format!("{left} {} {right}", node.symbol())))
}

/// Compiles `=` and `!=`, rewriting comparisons against null into
/// `IS NULL` and `IS NOT NULL`.
fn compile_equality(
    compiler: &Compiler,
    expr: &dyn Expression,
    state: &mut State,
) -> Result<Fragment> {
    let node = downcast::<BinaryOperator>(expr)?;
    if !node.right().kind().is(&kinds::NULL) {
        return compile_binary(compiler, expr, state);
    }

    let op = if expr.kind().is(&kinds::NOT_EQUAL) {
        BinaryOp::IsNot
    } else {
        BinaryOp::Is
    };
    debug!(from = expr.kind().name(), to = op.kind().name(), "rewriting comparison with null");
    Ok(Fragment::Rewrite(Box::new(BinaryOperator::new(
        op,
        node.left.clone(),
        node.right.clone(),
    ))))
}

fn compile_chain(compiler: &Compiler, expr: &dyn Expression, state: &mut State) -> Result<Fragment> {
    let node = downcast::<BooleanChain>(expr)?;
    let separator = format!(" {} ", node.keyword());
    let operands = node
        .operands()
        .iter()
        .map(|operand| compiler.compile_with(operand.as_ref(), state))
        .collect::<Result<Vec<_>>>()?;
    Ok(Fragment::Sql(operands.join(&separator)))
}
