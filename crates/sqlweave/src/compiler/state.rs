//! Scoped compile state.
//!
//! A [`State`] is a stack of frames mapping attribute names to values.
//! Lookups walk from the innermost frame outwards, so inner frames shadow
//! outer ones. The root frame carries the two attributes the compiler
//! relies on:
//!
//! - `precedence`: what the caller demands of the expression compiled next.
//! - `parameters`: every bound value so far, in placeholder order.
//!
//! An attribute that is not re-bound in a pushed frame is shared with the
//! outer frame, so parameters bound deep in the tree land in the root list.
//! Naming an attribute in [`Bindings::copy`] gives the new frame its own
//! copy instead, and changes to it are discarded on pop.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use super::Precedence;
use crate::ast::SqlValue;
use crate::error::{Result, WeaveError};

/// Name of the demanded-precedence attribute.
pub const PRECEDENCE: &str = "precedence";

/// Name of the bound-parameter attribute.
pub const PARAMETERS: &str = "parameters";

/// A value stored in a compile state frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// A precedence.
    Precedence(Precedence),
    /// A single value.
    Value(SqlValue),
    /// An ordered list of values.
    Values(Vec<SqlValue>),
    /// Free-form text.
    Text(String),
}

impl Attribute {
    /// Returns the precedence, if this is one.
    #[must_use]
    pub const fn as_precedence(&self) -> Option<Precedence> {
        match self {
            Self::Precedence(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the value list, if this is one.
    #[must_use]
    pub fn as_values(&self) -> Option<&[SqlValue]> {
        match self {
            Self::Values(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the value list mutably, if this is one.
    pub fn as_values_mut(&mut self) -> Option<&mut Vec<SqlValue>> {
        match self {
            Self::Values(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the single value, if this is one.
    #[must_use]
    pub const fn as_value(&self) -> Option<&SqlValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the text, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Precedence> for Attribute {
    fn from(p: Precedence) -> Self {
        Self::Precedence(p)
    }
}

impl From<SqlValue> for Attribute {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

impl From<Vec<SqlValue>> for Attribute {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::Values(values)
    }
}

impl From<String> for Attribute {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Attribute {
    fn from(text: &str) -> Self {
        Self::Text(String::from(text))
    }
}

type Frame = BTreeMap<String, Attribute>;

/// Attributes for a new frame.
///
/// Names passed to [`Bindings::copy`] are duplicated from their nearest
/// current value before the explicit bindings are applied.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    copy_of: Vec<String>,
    values: Vec<(String, Attribute)>,
}

impl Bindings {
    /// Creates empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives the new frame its own copy of `name`.
    #[must_use]
    pub fn copy(mut self, name: impl Into<String>) -> Self {
        self.copy_of.push(name.into());
        self
    }

    /// Binds `name` to `value` in the new frame.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }

    /// Binds the demanded precedence.
    #[must_use]
    pub fn precedence(self, precedence: Precedence) -> Self {
        self.bind(PRECEDENCE, precedence)
    }
}

/// The attribute stack threaded through one compile.
///
/// There is always at least one frame; the root frame is never popped.
#[derive(Debug, Clone)]
pub struct State {
    frames: Vec<Frame>,
}

impl State {
    /// Creates a root-only state demanding [`Precedence::LOOSEST`] with no
    /// parameters.
    #[must_use]
    pub fn new() -> Self {
        let mut root = Frame::new();
        root.insert(String::from(PRECEDENCE), Attribute::Precedence(Precedence::LOOSEST));
        root.insert(String::from(PARAMETERS), Attribute::Values(Vec::new()));
        Self { frames: vec![root] }
    }

    /// Creates a fresh state and pushes `bindings` as one extra frame.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NoSuchAttribute`] if `bindings` copies an
    /// attribute the root does not define.
    pub fn with_bindings(bindings: Bindings) -> Result<Self> {
        let mut state = Self::new();
        state.push(bindings)?;
        Ok(state)
    }

    /// Creates a state whose root frame holds exactly `attributes`.
    ///
    /// Such a state has no `precedence` or `parameters` unless given, so it
    /// is only suitable for attribute bookkeeping, not for compiling.
    #[must_use]
    pub fn from_root<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Attribute>,
    {
        let root = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { frames: vec![root] }
    }

    /// Returns the number of active frames, including the root.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns the nearest value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NoSuchAttribute`] if no frame defines `name`.
    pub fn get(&self, name: &str) -> Result<&Attribute> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .ok_or_else(|| no_such_attribute(name))
    }

    /// Returns the nearest value of `name` for in-place mutation.
    ///
    /// The value is changed in whichever frame holds it, so a shared
    /// attribute stays changed after inner frames are popped.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NoSuchAttribute`] if no frame defines `name`.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Attribute> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
            .ok_or_else(|| no_such_attribute(name))
    }

    /// Assigns `name`.
    ///
    /// An existing binding is overwritten in the frame that holds it;
    /// otherwise the attribute is defined in the innermost frame.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Attribute>) {
        let name = name.into();
        let value = value.into();
        if let Ok(slot) = self.get_mut(&name) {
            *slot = value;
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, value);
        }
    }

    /// Iterates the values of `name`, innermost frame first, skipping frames
    /// that do not define it.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Attribute> + 'a {
        self.frames.iter().rev().filter_map(move |frame| frame.get(name))
    }

    /// Iterates one entry per frame, innermost first, yielding `default` for
    /// frames that do not define `name`.
    pub fn get_all_or<'a>(
        &'a self,
        name: &'a str,
        default: Option<&'a Attribute>,
    ) -> impl Iterator<Item = Option<&'a Attribute>> + 'a {
        self.frames
            .iter()
            .rev()
            .map(move |frame| frame.get(name).or(default))
    }

    /// Returns every visible attribute with its nearest value.
    #[must_use]
    pub fn compact(&self) -> BTreeMap<String, Attribute> {
        let mut merged = BTreeMap::new();
        for frame in &self.frames {
            for (name, value) in frame {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }

    /// Pushes a new innermost frame.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NoSuchAttribute`] if `bindings` copies an
    /// attribute no frame defines. The stack is unchanged on error.
    pub fn push(&mut self, bindings: Bindings) -> Result<()> {
        let mut frame = Frame::new();
        for name in bindings.copy_of {
            let value = self.get(&name)?.clone();
            frame.insert(name, value);
        }
        frame.extend(bindings.values);
        self.frames.push(frame);
        Ok(())
    }

    /// Discards the innermost frame.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::RootScope`] when only the root frame remains.
    pub fn pop(&mut self) -> Result<()> {
        if self.frames.len() <= 1 {
            return Err(WeaveError::RootScope);
        }
        self.frames.pop();
        Ok(())
    }

    /// Pushes a frame that is popped when the returned guard is dropped,
    /// on every exit path.
    ///
    /// # Errors
    ///
    /// Same as [`State::push`].
    pub fn scope(&mut self, bindings: Bindings) -> Result<Scope<'_>> {
        self.push(bindings)?;
        let depth = self.frames.len();
        Ok(Scope { state: self, depth })
    }

    /// Hides the innermost frame until the returned guard is dropped.
    ///
    /// Through the view the state looks as it did before the current frame
    /// was pushed. Shared attributes such as `parameters` are still written
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::RootScope`] when only the root frame remains.
    pub fn parent_view(&mut self) -> Result<ParentView<'_>> {
        if self.frames.len() <= 1 {
            return Err(WeaveError::RootScope);
        }
        let hidden = self.frames.pop();
        let depth = self.frames.len();
        Ok(ParentView {
            state: self,
            hidden,
            depth,
        })
    }

    /// Returns the demanded precedence.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NoSuchAttribute`] or
    /// [`WeaveError::AttributeType`] if `precedence` is missing or not a
    /// precedence.
    pub fn precedence(&self) -> Result<Precedence> {
        self.get(PRECEDENCE)?
            .as_precedence()
            .ok_or_else(|| wrong_type(PRECEDENCE, "precedence"))
    }

    /// Returns the parameters bound so far.
    ///
    /// # Errors
    ///
    /// Returns [`WeaveError::NoSuchAttribute`] or
    /// [`WeaveError::AttributeType`] if `parameters` is missing or not a
    /// value list.
    pub fn parameters(&self) -> Result<&[SqlValue]> {
        self.get(PARAMETERS)?
            .as_values()
            .ok_or_else(|| wrong_type(PARAMETERS, "value list"))
    }

    /// Appends `value` to the nearest `parameters` list.
    ///
    /// # Errors
    ///
    /// Same as [`State::parameters`].
    pub fn bind(&mut self, value: SqlValue) -> Result<()> {
        self.get_mut(PARAMETERS)?
            .as_values_mut()
            .ok_or_else(|| wrong_type(PARAMETERS, "value list"))?
            .push(value);
        Ok(())
    }

    /// Consumes the state and returns the nearest `parameters` list.
    ///
    /// # Errors
    ///
    /// Same as [`State::parameters`].
    pub fn into_parameters(mut self) -> Result<Vec<SqlValue>> {
        match self.get_mut(PARAMETERS)? {
            Attribute::Values(values) => Ok(std::mem::take(values)),
            _ => Err(wrong_type(PARAMETERS, "value list")),
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

fn no_such_attribute(name: &str) -> WeaveError {
    WeaveError::NoSuchAttribute {
        name: String::from(name),
    }
}

fn wrong_type(name: &str, expected: &'static str) -> WeaveError {
    WeaveError::AttributeType {
        name: String::from(name),
        expected,
    }
}

/// A frame pushed by [`State::scope`]. Dropping it pops the frame along with
/// anything pushed on top of it.
#[derive(Debug)]
pub struct Scope<'a> {
    state: &'a mut State,
    depth: usize,
}

impl Deref for Scope<'_> {
    type Target = State;

    fn deref(&self) -> &State {
        self.state
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut State {
        self.state
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.state.frames.truncate(self.depth - 1);
    }
}

/// The state as seen from the parent of the innermost frame. Dropping it
/// restores the hidden frame.
#[derive(Debug)]
pub struct ParentView<'a> {
    state: &'a mut State,
    hidden: Option<Frame>,
    depth: usize,
}

impl Deref for ParentView<'_> {
    type Target = State;

    fn deref(&self) -> &State {
        self.state
    }
}

impl DerefMut for ParentView<'_> {
    fn deref_mut(&mut self) -> &mut State {
        self.state
    }
}

impl Drop for ParentView<'_> {
    fn drop(&mut self) {
        debug_assert!(
            self.state.frames.len() >= self.depth,
            "parent view popped frames it did not push"
        );
        self.state.frames.truncate(self.depth);
        if let Some(frame) = self.hidden.take() {
            self.state.frames.push(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State::from_root([("foo", "bar"), ("biz", "baz")])
    }

    fn text(state: &State, name: &str) -> String {
        String::from(state.get(name).unwrap().as_text().unwrap())
    }

    #[test]
    fn test_get() {
        let state = state();
        assert_eq!(text(&state, "foo"), "bar");
        assert_eq!(text(&state, "biz"), "baz");
    }

    #[test]
    fn test_get_missing() {
        let state = state();
        assert_eq!(
            state.get("bar"),
            Err(WeaveError::NoSuchAttribute {
                name: String::from("bar")
            })
        );
    }

    #[test]
    fn test_set_defines_in_innermost_frame() {
        let mut state = state();
        state.push(Bindings::new()).unwrap();
        state.set("new", "value");
        assert_eq!(text(&state, "new"), "value");

        state.pop().unwrap();
        assert!(state.get("new").is_err());
    }

    #[test]
    fn test_set_overwrites_where_bound() {
        let mut state = state();
        state.push(Bindings::new()).unwrap();
        state.set("foo", "changed");

        state.pop().unwrap();
        assert_eq!(text(&state, "foo"), "changed");
    }

    #[test]
    fn test_push_shadows() {
        let mut state = state();
        state.push(Bindings::new().bind("foo", "foobar")).unwrap();
        assert_eq!(text(&state, "foo"), "foobar");
        assert_eq!(text(&state, "biz"), "baz");

        state.pop().unwrap();
        assert_eq!(text(&state, "foo"), "bar");
    }

    #[test]
    fn test_push_copy_isolates_and_fallthrough_shares() {
        let mut state = State::from_root([
            ("copied", Vec::<SqlValue>::new()),
            ("shared", Vec::<SqlValue>::new()),
        ]);

        state.push(Bindings::new().copy("copied")).unwrap();
        for name in ["copied", "shared"] {
            state
                .get_mut(name)
                .unwrap()
                .as_values_mut()
                .unwrap()
                .push(SqlValue::Int(1));
        }
        assert_eq!(state.get("copied").unwrap().as_values().unwrap().len(), 1);
        assert_eq!(state.get("shared").unwrap().as_values().unwrap().len(), 1);

        state.pop().unwrap();
        assert_eq!(state.get("copied").unwrap().as_values(), Some(&[][..]));
        assert_eq!(
            state.get("shared").unwrap().as_values(),
            Some(&[SqlValue::Int(1)][..])
        );
    }

    #[test]
    fn test_push_copy_of_missing_attribute_fails() {
        let mut state = state();
        assert!(state.push(Bindings::new().copy("nope")).is_err());
        assert_eq!(state.scope_count(), 1);
    }

    #[test]
    fn test_scope_count() {
        let mut state = state();
        assert_eq!(state.scope_count(), 1);

        state.push(Bindings::new()).unwrap();
        assert_eq!(state.scope_count(), 2);

        state.push(Bindings::new()).unwrap();
        assert_eq!(state.scope_count(), 3);

        state.pop().unwrap();
        assert_eq!(state.scope_count(), 2);

        state.pop().unwrap();
        assert_eq!(state.scope_count(), 1);
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut state = state();
        assert_eq!(state.pop(), Err(WeaveError::RootScope));
        assert_eq!(state.scope_count(), 1);
        assert!(state.parent_view().is_err());
    }

    #[test]
    fn test_scope_guard_pops() {
        let mut state = state();
        {
            let mut scope = state.scope(Bindings::new().bind("foo", "foobar")).unwrap();
            assert_eq!(text(&scope, "foo"), "foobar");
            scope.push(Bindings::new()).unwrap();
            assert_eq!(scope.scope_count(), 3);
        }
        assert_eq!(state.scope_count(), 1);
        assert_eq!(text(&state, "foo"), "bar");
    }

    #[test]
    fn test_scope_guard_pops_on_error_path() {
        fn failing(state: &mut State) -> Result<()> {
            let scope = state.scope(Bindings::new())?;
            scope.get("missing")?;
            Ok(())
        }

        let mut state = state();
        assert!(failing(&mut state).is_err());
        assert_eq!(state.scope_count(), 1);
    }

    #[test]
    fn test_parent_view() {
        let mut state = state();
        let mut scope = state.scope(Bindings::new().bind("foo", "foobar")).unwrap();
        {
            let view = scope.parent_view().unwrap();
            assert_eq!(text(&view, "foo"), "bar");
            assert_eq!(text(&view, "biz"), "baz");
            assert_eq!(view.scope_count(), 1);
        }
        assert_eq!(text(&scope, "foo"), "foobar");
        assert_eq!(scope.scope_count(), 2);
    }

    #[test]
    fn test_parent_view_writes_shared_attributes() {
        let mut state = State::new();
        state.push(Bindings::new().precedence(Precedence::left(800))).unwrap();
        {
            let mut view = state.parent_view().unwrap();
            assert_eq!(view.precedence(), Ok(Precedence::LOOSEST));
            view.bind(SqlValue::Int(7)).unwrap();
        }
        assert_eq!(state.precedence(), Ok(Precedence::left(800)));
        assert_eq!(state.parameters(), Ok(&[SqlValue::Int(7)][..]));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "parent view popped frames it did not push")]
    fn test_parent_view_rejects_popping_past_its_frames() {
        let mut state = State::new();
        state.push(Bindings::new()).unwrap();
        state.push(Bindings::new()).unwrap();
        let mut view = state.parent_view().unwrap();
        view.pop().unwrap();
        drop(view);
    }

    #[test]
    fn test_get_all() {
        let mut state = state();
        assert_eq!(state.get_all("foo").count(), 1);

        state.push(Bindings::new().bind("foo", "foobar")).unwrap();
        let foos: Vec<_> = state.get_all("foo").filter_map(Attribute::as_text).collect();
        assert_eq!(foos, ["foobar", "bar"]);

        let bizs: Vec<_> = state.get_all("biz").filter_map(Attribute::as_text).collect();
        assert_eq!(bizs, ["baz"]);
    }

    #[test]
    fn test_get_all_including_missing() {
        let mut state = state();
        state.push(Bindings::new().bind("foo", "foobar")).unwrap();

        let bizs: Vec<_> = state
            .get_all_or("biz", None)
            .map(|a| a.and_then(Attribute::as_text))
            .collect();
        assert_eq!(bizs, [None, Some("baz")]);

        let fallback = Attribute::from("bizbaz");
        let bizs: Vec<_> = state
            .get_all_or("biz", Some(&fallback))
            .flatten()
            .filter_map(Attribute::as_text)
            .collect();
        assert_eq!(bizs, ["bizbaz", "baz"]);
    }

    #[test]
    fn test_compact() {
        let mut state = state();
        state.push(Bindings::new().bind("foo", "foobar")).unwrap();
        let merged = state.compact();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["foo"], Attribute::from("foobar"));
        assert_eq!(merged["biz"], Attribute::from("baz"));
    }

    #[test]
    fn test_default_state() {
        let state = State::new();
        assert_eq!(state.scope_count(), 1);
        assert_eq!(state.precedence(), Ok(Precedence::LOOSEST));
        assert_eq!(state.parameters(), Ok(&[][..]));
    }

    #[test]
    fn test_with_bindings_pushes_one_frame() {
        let state = State::with_bindings(Bindings::new().bind("flag", "on")).unwrap();
        assert_eq!(state.scope_count(), 2);
        assert_eq!(text(&state, "flag"), "on");
        assert_eq!(state.precedence(), Ok(Precedence::LOOSEST));
    }

    #[test]
    fn test_typed_accessor_mismatch() {
        let mut state = State::new();
        state.set(PRECEDENCE, "high");
        assert!(matches!(
            state.precedence(),
            Err(WeaveError::AttributeType { expected: "precedence", .. })
        ));
    }

    #[test]
    fn test_into_parameters() {
        let mut state = State::new();
        state.bind(SqlValue::Int(1)).unwrap();
        state.bind(SqlValue::Text(String::from("a"))).unwrap();
        assert_eq!(
            state.into_parameters(),
            Ok(vec![SqlValue::Int(1), SqlValue::Text(String::from("a"))])
        );
    }
}
