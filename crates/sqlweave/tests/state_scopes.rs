//! Tests for the scoped compile state.

use sqlweave::compiler::{Attribute, Bindings, PARAMETERS, PRECEDENCE};
use sqlweave::{Precedence, SqlValue, State, WeaveError};

#[test]
fn fresh_state_has_one_scope() {
    let state = State::new();
    assert_eq!(state.scope_count(), 1);
    assert_eq!(state.precedence(), Ok(Precedence::LOOSEST));
    assert!(state.parameters().unwrap().is_empty());
}

#[test]
fn scope_count_tracks_push_and_pop() {
    let mut state = State::new();
    for depth in 2..=5 {
        state.push(Bindings::new()).unwrap();
        assert_eq!(state.scope_count(), depth);
    }
    for depth in (1..=4).rev() {
        state.pop().unwrap();
        assert_eq!(state.scope_count(), depth);
    }
    assert_eq!(state.pop(), Err(WeaveError::RootScope));
}

#[test]
fn copied_attribute_restored_on_pop() {
    let mut state = State::new();
    state.bind(SqlValue::Int(1)).unwrap();

    state.push(Bindings::new().copy(PARAMETERS)).unwrap();
    state.bind(SqlValue::Int(2)).unwrap();
    assert_eq!(state.parameters().unwrap().len(), 2);

    state.pop().unwrap();
    assert_eq!(state.parameters(), Ok(&[SqlValue::Int(1)][..]));
}

#[test]
fn shared_attribute_survives_pop() {
    let mut state = State::new();
    state.push(Bindings::new()).unwrap();
    state.push(Bindings::new().precedence(Precedence::left(900))).unwrap();
    state.bind(SqlValue::Int(1)).unwrap();
    state.pop().unwrap();
    state.bind(SqlValue::Int(2)).unwrap();
    state.pop().unwrap();

    assert_eq!(
        state.into_parameters(),
        Ok(vec![SqlValue::Int(1), SqlValue::Int(2)])
    );
}

#[test]
fn shadowed_precedence_history() {
    let mut state = State::new();
    state.push(Bindings::new().precedence(Precedence::left(800))).unwrap();
    state.push(Bindings::new()).unwrap();
    state.push(Bindings::new().precedence(Precedence::left(900))).unwrap();

    let history: Vec<_> = state
        .get_all(PRECEDENCE)
        .filter_map(Attribute::as_precedence)
        .collect();
    assert_eq!(
        history,
        [Precedence::left(900), Precedence::left(800), Precedence::LOOSEST]
    );

    let per_scope = state.get_all_or(PRECEDENCE, None).count();
    assert_eq!(per_scope, 4);
}

#[test]
fn parent_view_sees_caller_scope() {
    let mut state =
        State::with_bindings(Bindings::new().precedence(Precedence::left(800))).unwrap();
    {
        let mut scope = state
            .scope(Bindings::new().precedence(Precedence::with_rank(500)))
            .unwrap();
        let view = scope.parent_view().unwrap();
        assert_eq!(view.precedence(), Ok(Precedence::left(800)));
        assert_eq!(view.scope_count(), 2);
    }
    assert_eq!(state.scope_count(), 2);
    assert_eq!(state.precedence(), Ok(Precedence::left(800)));
}

#[test]
fn set_and_compact() {
    let mut state = State::new();
    state.push(Bindings::new()).unwrap();
    state.set("alias", "u");
    state.set(PRECEDENCE, Precedence::TIGHTEST);

    let visible = state.compact();
    assert_eq!(visible["alias"], Attribute::from("u"));
    assert_eq!(visible[PRECEDENCE], Attribute::Precedence(Precedence::TIGHTEST));

    state.pop().unwrap();
    assert!(state.get("alias").is_err());
    assert_eq!(state.precedence(), Ok(Precedence::TIGHTEST));
}
