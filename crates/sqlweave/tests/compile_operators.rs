//! Tests for operator compilation: placeholders, bracketing by precedence
//! and associativity, and the null comparison rewrite.

mod common;
use common::*;

use sqlweave::builder::{
    add, all, and, col, div, eq, gt, is_in, lt_eq, modulo, mul, neg, not, not_eq, or, plus,
    select, sub, table, ExprExt,
};
use sqlweave::{expr, Null, SqlValue};

// ===================================================================
// Arithmetic
// ===================================================================

#[test]
fn tighter_operand_not_bracketed() {
    let (sql, params) = compiled(&add(mul(1, 2), 3));
    assert_eq!(sql, "? * ? + ?");
    assert_eq!(params, ints(&[1, 2, 3]));
}

#[test]
fn looser_operand_bracketed() {
    let (sql, params) = compiled(&mul(add(1, 2), 3));
    assert_eq!(sql, "(? + ?) * ?");
    assert_eq!(params, ints(&[1, 2, 3]));
}

#[test]
fn looser_right_operand_bracketed() {
    let (sql, params) = compiled(&div(1, sub(2, 3)));
    assert_eq!(sql, "? / (? - ?)");
    assert_eq!(params, ints(&[1, 2, 3]));
}

#[test]
fn left_associative_chain_flat() {
    assert_eq!(sql(&sub(sub(1, 2), 3)), "? - ? - ?");
    assert_eq!(sql(&add(sub(1, 2), 3)), "? - ? + ?");
}

#[test]
fn left_associative_right_nesting_bracketed() {
    assert_eq!(sql(&sub(1, sub(2, 3))), "? - (? - ?)");
    assert_eq!(sql(&sub(1, add(2, 3))), "? - (? + ?)");
    assert_eq!(sql(&modulo(1, mul(2, 3))), "? % (? * ?)");
}

#[test]
fn parameters_in_placeholder_order() {
    let (_, params) = compiled(&mul(add(1, 2), sub(3, 4)));
    assert_eq!(params, ints(&[1, 2, 3, 4]));
}

// ===================================================================
// Unary operators
// ===================================================================

#[test]
fn unary_minus() {
    assert_eq!(sql(&neg(1)), "-?");
    assert_eq!(sql(&plus(1)), "+?");
    assert_eq!(sql(&neg(add(1, 2))), "-(? + ?)");
    assert_eq!(sql(&mul(neg(1), 2)), "-? * ?");
}

#[test]
fn stacked_signs_never_form_a_comment() {
    assert_eq!(sql(&neg(neg(col("x")))), "- -x");
    assert_eq!(sql(&plus(neg(1))), "+ -?");
    assert_eq!(sql(&neg(plus(col("x")))), "- +x");
    assert_eq!(sql(&neg(not(col("x")))), "-(NOT x)");
}

#[test]
fn logical_not() {
    assert_eq!(sql(&not(col("active"))), "NOT active");
    assert_eq!(sql(&not(eq(col("a"), 1))), "NOT a = ?");
    assert_eq!(sql(&not(and(col("a"), col("b")))), "NOT (a AND b)");
}

// ===================================================================
// Comparison and logic
// ===================================================================

#[test]
fn comparisons_are_non_associative() {
    assert_eq!(sql(&eq(eq(1, 2), 3)), "(? = ?) = ?");
    assert_eq!(sql(&eq(1, eq(2, 3))), "? = (? = ?)");
}

#[test]
fn arithmetic_inside_comparison() {
    let (sql, params) = compiled(&gt(add(col("a"), 1), mul(col("b"), 2)));
    assert_eq!(sql, "a + ? > b * ?");
    assert_eq!(params, ints(&[1, 2]));
}

#[test]
fn boolean_chains() {
    assert_eq!(sql(&or(and(col("a"), col("b")), col("c"))), "a AND b OR c");
    assert_eq!(sql(&and(or(col("a"), col("b")), col("c"))), "(a OR b) AND c");
    assert_eq!(sql(&and(col("a"), and(col("b"), col("c")))), "a AND b AND c");
}

#[test]
fn long_chain() {
    let chain = all(vec![
        expr(eq(col("a"), 1)),
        expr(lt_eq(col("b"), 2)),
        expr(or(col("c"), col("d"))),
    ])
    .unwrap();
    let (sql, params) = compiled(&chain);
    assert_eq!(sql, "a = ? AND b <= ? AND (c OR d)");
    assert_eq!(params, ints(&[1, 2]));
}

#[test]
fn in_subquery_bracketed() {
    let query = select().column(col("id")).from(table("admins"));
    assert_eq!(
        sql(&is_in(col("id"), query)),
        "id IN (SELECT id FROM admins)"
    );
}

#[test]
fn fluent_builders() {
    let filter = col("age").gt_eq(18).and(col("name").not_eq("bob"));
    let (sql, params) = compiled(&filter);
    assert_eq!(sql, "age >= ? AND name != ?");
    assert_eq!(
        params,
        vec![SqlValue::Int(18), SqlValue::Text(String::from("bob"))]
    );
}

// ===================================================================
// Null rewrite
// ===================================================================

#[test]
fn equal_null_becomes_is_null() {
    let (sql, params) = compiled(&eq(1, Null));
    assert_eq!(sql, "? IS NULL");
    assert_eq!(params, ints(&[1]));
}

#[test]
fn not_equal_null_becomes_is_not_null() {
    let (sql, params) = compiled(&not_eq(1, Null));
    assert_eq!(sql, "? IS NOT NULL");
    assert_eq!(params, ints(&[1]));
}

#[test]
fn null_options_rewrite_too() {
    assert_eq!(sql(&eq(col("a"), None::<i64>)), "a IS NULL");
    assert_eq!(sql(&eq(col("a"), SqlValue::Null)), "a IS NULL");

    let (sql, params) = compiled(&eq(col("a"), Some(3_i64)));
    assert_eq!(sql, "a = ?");
    assert_eq!(params, ints(&[3]));
}

#[test]
fn null_on_left_not_rewritten() {
    let (sql, params) = compiled(&eq(Null, 1));
    assert_eq!(sql, "NULL = ?");
    assert_eq!(params, ints(&[1]));
}

#[test]
fn rewrite_bracketed_for_caller() {
    let (sql, params) = compiled(&mul(eq(1, Null), 2));
    assert_eq!(sql, "(? IS NULL) * ?");
    assert_eq!(params, ints(&[1, 2]));
}

#[test]
fn rewrite_inside_chain() {
    let filter = and(eq(col("deleted_at"), Null), not_eq(col("owner"), Null));
    let (sql, params) = compiled(&filter);
    assert_eq!(sql, "deleted_at IS NULL AND owner IS NOT NULL");
    assert!(params.is_empty());
}

#[test]
fn fluent_null_checks() {
    assert_eq!(sql(&col("a").is_null()), "a IS NULL");
    assert_eq!(sql(&col("a").eq(Null)), "a IS NULL");
    assert_eq!(sql(&col("a").is_not_null()), "a IS NOT NULL");
}

// ===================================================================
// Operator overloads
// ===================================================================

#[test]
fn overloaded_arithmetic() {
    let (text, params) = compiled(&(col("price") * 2 + 1));
    assert_eq!(text, "price * ? + ?");
    assert_eq!(params, ints(&[2, 1]));

    assert_eq!(sql(&((col("a") + 1) * 2)), "(a + ?) * ?");
    assert_eq!(sql(&(col("a") - (col("b") - 1))), "a - (b - ?)");
    assert_eq!(sql(&-(col("a") % 3)), "-(a % ?)");
    assert_eq!(sql(&!col("archived")), "NOT archived");
}
