//! Optional equality constraints bound to dropdown selections.

use crate::filter::expr::Expr;

/// Selection values that mean "no filter on this column"
const ALL_SENTINELS: [&str; 3] = ["all", "todos", "todas"];

/// An optional equality predicate on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    column: String,
    value: Option<String>,
}

impl Constraint {
    /// A constraint from a selected value
    ///
    /// `None`, an empty value, and the sentinels `all`, `todos` and `todas`
    /// (any case) leave the column unrestricted.
    #[must_use]
    pub fn new(column: impl Into<String>, selected: Option<&str>) -> Self {
        let value = selected
            .map(str::trim)
            .filter(|v| !is_all_sentinel(v))
            .map(str::to_string);
        Self {
            column: column.into(),
            value,
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The selected value, if the constraint restricts anything
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// The equality expression, or `None` when unset
    #[must_use]
    pub fn to_expr(&self) -> Option<Expr> {
        self.value
            .as_ref()
            .map(|value| Expr::eq_str(self.column.clone(), value.clone()))
    }
}

/// Whether a selected value stands for "everything"
#[must_use]
pub fn is_all_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || ALL_SENTINELS.iter().any(|s| s.eq_ignore_ascii_case(value))
}

/// Conjunction of all set constraints
#[must_use]
pub fn constraints_to_expr(constraints: &[Constraint]) -> Expr {
    Expr::all(constraints.iter().filter_map(Constraint::to_expr).collect())
}
