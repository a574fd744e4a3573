//! Tables, columns and query statements.

use std::any::Any;

use super::{downcast, kinds, Expr, Expression, IntoExpr, Kind};
use crate::compiler::{Compiler, Fragment, State};
use crate::error::Result;

/// A table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
}

impl Table {
    /// Creates a table reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a reference to a column of this table.
    #[must_use]
    pub fn column(&self, name: impl Into<String>) -> Column {
        Column::qualified(self.name.clone(), name)
    }
}

impl Expression for Table {
    fn kind(&self) -> &'static Kind {
        &kinds::TABLE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn boxed(&self) -> Expr {
        Box::new(self.clone())
    }
}

/// A column reference, optionally qualified with its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    table: Option<String>,
    name: String,
}

impl Column {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table qualifier.
    #[must_use]
    pub fn table(&self) -> Option<Table> {
        self.table.as_deref().map(Table::new)
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match &self.table {
            Some(t) => format!("{t}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl Expression for Column {
    fn kind(&self) -> &'static Kind {
        &kinds::COLUMN
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn boxed(&self) -> Expr {
        Box::new(self.clone())
    }
}

/// A `SELECT` statement.
///
/// Clauses are rendered in SQL order: `DISTINCT`, columns (`*` when none
/// were given), `FROM`, `WHERE`, `GROUP BY`, `HAVING`, `ORDER BY`, `LIMIT`,
/// `OFFSET`.
#[derive(Debug, Clone, Default)]
pub struct Select {
    distinct: bool,
    columns: Vec<Expr>,
    tables: Vec<Expr>,
    where_clause: Option<Expr>,
    group_by: Vec<Expr>,
    having: Option<Expr>,
    order_by: Vec<Expr>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Creates an empty `SELECT *`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a result column.
    #[must_use]
    pub fn column(mut self, column: impl IntoExpr) -> Self {
        self.columns.push(column.into_expr());
        self
    }

    /// Adds result columns.
    #[must_use]
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.columns.extend(columns.into_iter().map(IntoExpr::into_expr));
        self
    }

    /// Adds a table or subquery to the FROM clause.
    #[must_use]
    pub fn from(mut self, table: impl IntoExpr) -> Self {
        self.tables.push(table.into_expr());
        self
    }

    /// Sets the WHERE clause.
    #[must_use]
    pub fn where_clause(mut self, expr: impl IntoExpr) -> Self {
        self.where_clause = Some(expr.into_expr());
        self
    }

    /// Adds a GROUP BY expression.
    #[must_use]
    pub fn group_by(mut self, expr: impl IntoExpr) -> Self {
        self.group_by.push(expr.into_expr());
        self
    }

    /// Sets the HAVING clause.
    #[must_use]
    pub fn having(mut self, expr: impl IntoExpr) -> Self {
        self.having = Some(expr.into_expr());
        self
    }

    /// Adds an ORDER BY expression.
    #[must_use]
    pub fn order_by(mut self, expr: impl IntoExpr) -> Self {
        self.order_by.push(expr.into_expr());
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}

impl Expression for Select {
    fn kind(&self) -> &'static Kind {
        &kinds::SELECT
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn boxed(&self) -> Expr {
        Box::new(self.clone())
    }
}

/// Built-in set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    /// `UNION`.
    Union,
    /// `INTERSECT`.
    Intersect,
    /// `EXCEPT`.
    Except,
}

impl SetOp {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }

    /// Returns the expression kind.
    #[must_use]
    pub fn kind(&self) -> &'static Kind {
        match self {
            Self::Union => &kinds::UNION,
            Self::Intersect => &kinds::INTERSECT,
            Self::Except => &kinds::EXCEPT,
        }
    }
}

/// Two queries combined with a set operation.
#[derive(Debug, Clone)]
pub struct SetOperation {
    op: SetOp,
    left: Expr,
    right: Expr,
}

impl SetOperation {
    /// Creates a set operation.
    #[must_use]
    pub fn new(op: SetOp, left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self {
            op,
            left: left.into_expr(),
            right: right.into_expr(),
        }
    }

    /// Returns the operation.
    #[must_use]
    pub const fn op(&self) -> SetOp {
        self.op
    }
}

impl Expression for SetOperation {
    fn kind(&self) -> &'static Kind {
        self.op.kind()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn boxed(&self) -> Expr {
        Box::new(self.clone())
    }
}

pub(crate) fn register(compiler: &mut Compiler) {
    compiler.when(&[&kinds::TABLE], compile_table);
    compiler.when(&[&kinds::COLUMN], compile_column);
    compiler.when(&[&kinds::SELECT], compile_select);
    compiler.when(&[&kinds::SET_OPERATION], compile_set_operation);
}

fn compile_table(_compiler: &Compiler, expr: &dyn Expression, _state: &mut State) -> Result<Fragment> {
    let node = downcast::<Table>(expr)?;
    Ok(Fragment::sql(node.name()))
}

fn compile_column(_compiler: &Compiler, expr: &dyn Expression, _state: &mut State) -> Result<Fragment> {
    let node = downcast::<Column>(expr)?;
    Ok(Fragment::Sql(node.to_sql()))
}

fn compile_list(compiler: &Compiler, exprs: &[Expr], state: &mut State) -> Result<String> {
    let compiled = exprs
        .iter()
        .map(|expr| compiler.compile_clause(expr.as_ref(), state))
        .collect::<Result<Vec<_>>>()?;
    Ok(compiled.join(", "))
}

fn compile_select(compiler: &Compiler, expr: &dyn Expression, state: &mut State) -> Result<Fragment> {
    let node = downcast::<Select>(expr)?;
    let mut tokens = vec![String::from("SELECT")];

    if node.distinct {
        tokens.push(String::from("DISTINCT"));
    }

    if node.columns.is_empty() {
        tokens.push(String::from("*"));
    } else {
        tokens.push(compile_list(compiler, &node.columns, state)?);
    }

    if !node.tables.is_empty() {
        tokens.push(String::from("FROM"));
        tokens.push(compile_list(compiler, &node.tables, state)?);
    }

    if let Some(ref where_expr) = node.where_clause {
        tokens.push(String::from("WHERE"));
        tokens.push(compiler.compile_clause(where_expr.as_ref(), state)?);
    }

    if !node.group_by.is_empty() {
        tokens.push(String::from("GROUP BY"));
        tokens.push(compile_list(compiler, &node.group_by, state)?);
    }

    if let Some(ref having_expr) = node.having {
        tokens.push(String::from("HAVING"));
        tokens.push(compiler.compile_clause(having_expr.as_ref(), state)?);
    }

    if !node.order_by.is_empty() {
        tokens.push(String::from("ORDER BY"));
        tokens.push(compile_list(compiler, &node.order_by, state)?);
    }

    if let Some(limit) = node.limit {
        tokens.push(format!("LIMIT {limit}"));
    }

    if let Some(offset) = node.offset {
        tokens.push(format!("OFFSET {offset}"));
    }

    Ok(Fragment::Sql(tokens.join(" ")))
}

fn compile_set_operation(
    compiler: &Compiler,
    expr: &dyn Expression,
    state: &mut State,
) -> Result<Fragment> {
    let node = downcast::<SetOperation>(expr)?;
    // Left-associative: only the right operand must bind strictly tighter.
    let own = expr.precedence();
    let left = compiler.compile_demanding(node.left.as_ref(), state, own)?;
    let right = compiler.compile_demanding(node.right.as_ref(), state, own.next_tighter())?;
    Ok(Fragment::Sql(format!("{left} {} {right}", node.op.as_str())))
}
