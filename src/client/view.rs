use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::database::models::{Category, InvalidEnumValue, Priority, Todo};

/// Category selector. `All` matches every todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// Priority selector. `All` matches every todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => *wanted == priority,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(PriorityFilter::All)
        } else {
            s.parse().map(PriorityFilter::Only)
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("all"),
            PriorityFilter::Only(priority) => write!(f, "{}", priority),
        }
    }
}

/// The two independent selectors applied to the local list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewFilter {
    pub category: CategoryFilter,
    pub priority: PriorityFilter,
}

/// Filter then sort: priority rank descending, newest first within a rank.
/// Borrows from `todos` and never reorders it.
pub fn derive_view<'a>(todos: &'a [Todo], filter: &ViewFilter) -> Vec<&'a Todo> {
    let mut view: Vec<&Todo> = todos
        .iter()
        .filter(|todo| filter.category.matches(todo.category) && filter.priority.matches(todo.priority))
        .collect();

    view.sort_by_key(|todo| (Reverse(todo.priority.rank()), Reverse(todo.created_at)));
    view
}
