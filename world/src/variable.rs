//! Named game variables and the predicates that gate menus and tiles on them.

use std::{
    fmt,
    ops::{BitAnd, BitOr, Not},
    sync::Arc,
};

use crate::GameState;

/// Value stored in the game-wide variable table.
///
/// Values of different kinds order by kind first (float, integer, text,
/// boolean) and by value within a kind.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum Variable {
    /// Floating point number.
    Float(f64),
    /// Signed integer.
    Integer(i64),
    /// Free-form text.
    Text(String),
    /// Flag.
    Boolean(bool),
}

impl From<f64> for Variable {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for Variable {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Variable {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for Variable {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Float(value) => write!(f, "{value}"),
            Variable::Integer(value) => write!(f, "{value}"),
            Variable::Text(value) => f.write_str(value),
            Variable::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// Reusable predicate over the game state.
#[derive(Clone)]
pub struct Gate(Arc<dyn Fn(&GameState) -> bool + Send + Sync>);

impl Gate {
    /// Wraps an arbitrary predicate.
    #[must_use]
    pub fn new(predicate: impl Fn(&GameState) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Gate that always passes.
    #[must_use]
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Evaluates the predicate against the current state.
    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> bool {
        (self.0)(state)
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gate(..)")
    }
}

impl BitAnd for Gate {
    type Output = Gate;

    fn bitand(self, rhs: Self) -> Self::Output {
        Gate::new(move |state| self.evaluate(state) && rhs.evaluate(state))
    }
}

impl BitOr for Gate {
    type Output = Gate;

    fn bitor(self, rhs: Self) -> Self::Output {
        Gate::new(move |state| self.evaluate(state) || rhs.evaluate(state))
    }
}

impl Not for Gate {
    type Output = Gate;

    fn not(self) -> Self::Output {
        Gate::new(move |state| !self.evaluate(state))
    }
}

/// Names a variable so that comparisons against it can be built.
#[must_use]
pub fn variable(name: impl Into<String>) -> VariableRef {
    VariableRef { name: name.into() }
}

/// Handle to a named variable used to build [`Gate`]s.
///
/// A comparison against a variable that has never been set is false, except
/// for [`VariableRef::not_equals`] which is true.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableRef {
    name: String,
}

impl VariableRef {
    /// Name of the referenced variable.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Passes while the variable holds exactly `value`.
    #[must_use]
    pub fn equals(self, value: impl Into<Variable>) -> Gate {
        self.compare(Comparison::Equal, value.into())
    }

    /// Passes while the variable is unset or holds anything other than `value`.
    #[must_use]
    pub fn not_equals(self, value: impl Into<Variable>) -> Gate {
        self.compare(Comparison::NotEqual, value.into())
    }

    /// Passes while the variable orders before `value`.
    #[must_use]
    pub fn less_than(self, value: impl Into<Variable>) -> Gate {
        self.compare(Comparison::Less, value.into())
    }

    /// Passes while the variable orders before or equal to `value`.
    #[must_use]
    pub fn at_most(self, value: impl Into<Variable>) -> Gate {
        self.compare(Comparison::LessOrEqual, value.into())
    }

    /// Passes while the variable orders after `value`.
    #[must_use]
    pub fn greater_than(self, value: impl Into<Variable>) -> Gate {
        self.compare(Comparison::Greater, value.into())
    }

    /// Passes while the variable orders after or equal to `value`.
    #[must_use]
    pub fn at_least(self, value: impl Into<Variable>) -> Gate {
        self.compare(Comparison::GreaterOrEqual, value.into())
    }

    /// Passes once the variable holds any value.
    #[must_use]
    pub fn is_set(self) -> Gate {
        let name = self.name;
        Gate::new(move |state| state.variable(&name).is_some())
    }

    fn compare(self, comparison: Comparison, literal: Variable) -> Gate {
        let name = self.name;
        Gate::new(move |state| match state.variable(&name) {
            Some(stored) => comparison.holds(stored, &literal),
            None => comparison == Comparison::NotEqual,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    fn holds(self, stored: &Variable, literal: &Variable) -> bool {
        match self {
            Comparison::Equal => stored == literal,
            Comparison::NotEqual => stored != literal,
            Comparison::Less => stored < literal,
            Comparison::LessOrEqual => stored <= literal,
            Comparison::Greater => stored > literal,
            Comparison::GreaterOrEqual => stored >= literal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travels_core::Size;

    fn state() -> GameState {
        GameState::new(Size::new(8, 8))
    }

    #[test]
    fn unset_variables_only_satisfy_not_equals() {
        let state = state();
        assert!(!variable("missing").equals(true).evaluate(&state));
        assert!(!variable("missing").less_than(3).evaluate(&state));
        assert!(!variable("missing").at_least(0).evaluate(&state));
        assert!(variable("missing").not_equals(true).evaluate(&state));
        assert!(!variable("missing").is_set().evaluate(&state));
    }

    #[test]
    fn comparisons_follow_the_stored_value() {
        let mut state = state();
        state.set_variable("coins", 5);
        assert!(variable("coins").equals(5).evaluate(&state));
        assert!(variable("coins").greater_than(4).evaluate(&state));
        assert!(variable("coins").at_most(5).evaluate(&state));
        assert!(!variable("coins").less_than(5).evaluate(&state));

        state.set_variable("coins", 2);
        assert!(variable("coins").less_than(5).evaluate(&state));
    }

    #[test]
    fn values_of_different_kinds_never_compare_equal() {
        let mut state = state();
        state.set_variable("flag", "true");
        assert!(!variable("flag").equals(true).evaluate(&state));
        assert!(variable("flag").not_equals(true).evaluate(&state));
        assert!(Variable::from(1.5) < Variable::from(0));
        assert!(Variable::from("z") < Variable::from(false));
    }

    #[test]
    fn gates_combine_with_boolean_operators() {
        let mut state = state();
        state.set_variable("a", true);
        let a = variable("a").equals(true);
        let b = variable("b").equals(true);

        assert!(!(a.clone() & b.clone()).evaluate(&state));
        assert!((a.clone() | b.clone()).evaluate(&state));
        assert!((a & !b).evaluate(&state));
        assert!(Gate::always().evaluate(&state));
    }

    #[test]
    fn variables_display_their_bare_value() {
        assert_eq!(Variable::from(3).to_string(), "3");
        assert_eq!(Variable::from(0.5).to_string(), "0.5");
        assert_eq!(Variable::from("Find the way").to_string(), "Find the way");
        assert_eq!(Variable::from(true).to_string(), "true");
    }
}
