#![allow(dead_code)]

use std::sync::Once;

use sqlweave::{compile, Compiler, Expression, SqlValue};

static TRACING: Once = Once::new();

/// Routes compiler logs through the test harness so `--nocapture` shows them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

pub fn compiled(expr: &dyn Expression) -> (String, Vec<SqlValue>) {
    init_tracing();
    compile(expr).unwrap_or_else(|e| panic!("Failed to compile: {expr:?}\nError: {e}"))
}

pub fn compiled_with(compiler: &Compiler, expr: &dyn Expression) -> (String, Vec<SqlValue>) {
    init_tracing();
    compiler
        .compile(expr)
        .unwrap_or_else(|e| panic!("Failed to compile: {expr:?}\nError: {e}"))
}

pub fn sql(expr: &dyn Expression) -> String {
    compiled(expr).0
}

pub fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().copied().map(SqlValue::Int).collect()
}
