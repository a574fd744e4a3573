//! Tests for function calls and their arity checks.

mod common;
use common::*;

use sqlweave::ast::{kinds, Arity, Signature};
use sqlweave::builder::{add, col, max, min, power, select, sqrt};
use sqlweave::{expr, Function, Kind, WeaveError};

#[test]
fn min_of_two() {
    let (sql, params) = compiled(&min(vec![expr(1), expr(2)]).unwrap());
    assert_eq!(sql, "min(?, ?)");
    assert_eq!(params, ints(&[1, 2]));
}

#[test]
fn max_of_many() {
    let call = max(vec![expr(col("a")), expr(2), expr(col("b"))]).unwrap();
    let (sql, params) = compiled(&call);
    assert_eq!(sql, "max(a, ?, b)");
    assert_eq!(params, ints(&[2]));
}

#[test]
fn sqrt_of_one() {
    let (sql, params) = compiled(&sqrt(9));
    assert_eq!(sql, "sqrt(?)");
    assert_eq!(params, ints(&[9]));
}

#[test]
fn power_of_two() {
    let (sql, params) = compiled(&power(2, 10));
    assert_eq!(sql, "power(?, ?)");
    assert_eq!(params, ints(&[2, 10]));
}

#[test]
fn arguments_never_bracketed() {
    assert_eq!(sql(&sqrt(add(1, 2))), "sqrt(? + ?)");
    assert_eq!(sql(&power(add(1, 2), add(3, 4))), "power(? + ?, ? + ?)");
}

#[test]
fn subquery_argument_bracketed() {
    let query = select().column(col("x"));
    let call = Function::named("coalesce", vec![expr(query), expr(0)]);
    assert_eq!(sql(&call), "coalesce((SELECT x), ?)");
}

#[test]
fn nested_calls() {
    let call = min(vec![expr(sqrt(4)), expr(power(2, 3))]).unwrap();
    let (sql, params) = compiled(&call);
    assert_eq!(sql, "min(sqrt(?), power(?, ?))");
    assert_eq!(params, ints(&[4, 2, 3]));
}

#[test]
fn wrong_arity_rejected() {
    let err = Function::call(Signature::sqrt(), vec![expr(1), expr(2)]).unwrap_err();
    assert!(matches!(err, WeaveError::Construction { kind: "sqrt", .. }));
    assert_eq!(
        err.to_string(),
        "cannot construct 'sqrt': expected exactly 1 argument, got 2"
    );

    let err = Function::call(Signature::power(), vec![expr(1)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot construct 'power': expected exactly 2 arguments, got 1"
    );

    assert!(min(vec![]).is_err());
}

#[test]
fn custom_signature() {
    static GREATEST: Kind = Kind::new("greatest", &kinds::FUNCTION);
    let signature = Signature::new(&GREATEST, "greatest", Arity::AtLeast(2));

    assert!(Function::call(signature, vec![expr(1)]).is_err());

    let call = Function::call(signature, vec![expr(1), expr(2)]).unwrap();
    let (sql, params) = compiled(&call);
    assert_eq!(sql, "greatest(?, ?)");
    assert_eq!(params, ints(&[1, 2]));
}

#[test]
fn named_function_without_arguments() {
    assert_eq!(sql(&Function::named("now", vec![])), "now()");
}
