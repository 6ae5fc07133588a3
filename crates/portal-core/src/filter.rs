//! The view filter pipeline.
//!
//! [`apply`] derives the displayed list from the cached collection and the
//! current [`FilterControls`]. It holds no state of its own and never touches
//! the cache, so callers invoke it on every read instead of keeping a second,
//! separately-updated list around.

use strum::IntoEnumIterator;

use crate::{
  suggestion::{Category, Suggestion},
  workflow::Status,
};

// ─── Controls ────────────────────────────────────────────────────────────────

/// `all`, or exactly one value of `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<T> {
  All,
  Only(T),
}

// Derived `Default` would demand `T: Default`.
impl<T> Default for Selector<T> {
  fn default() -> Self { Self::All }
}

impl<T: PartialEq> Selector<T> {
  pub fn matches(&self, value: &T) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == value,
    }
  }
}

impl<T: IntoEnumIterator + PartialEq + Copy> Selector<T> {
  /// Step to the next value: `All`, then each variant in declaration order,
  /// then back to `All`.
  pub fn cycle(self) -> Self {
    let mut variants = T::iter();
    match self {
      Self::All => variants.next().map_or(Self::All, Self::Only),
      Self::Only(current) => {
        variants
          .skip_while(|v| *v != current)
          .nth(1)
          .map_or(Self::All, Self::Only)
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  /// Most recently created first.
  #[default]
  Newest,
  Oldest,
}

impl SortOrder {
  pub fn toggle(self) -> Self {
    match self {
      Self::Newest => Self::Oldest,
      Self::Oldest => Self::Newest,
    }
  }
}

/// UI-local filter state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterControls {
  pub status:   Selector<Status>,
  pub category: Selector<Category>,
  /// Case-insensitive substring matched against title or description.
  pub search:   String,
  pub sort:     SortOrder,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Filter by status, category and search term, then sort by creation time.
///
/// Records with equal `created_at` keep their relative cache order.
pub fn apply<'a>(items: &'a [Suggestion], controls: &FilterControls) -> Vec<&'a Suggestion> {
  let needle = controls.search.to_lowercase();

  let mut out: Vec<&Suggestion> = items
    .iter()
    .filter(|s| controls.status.matches(&s.status))
    .filter(|s| controls.category.matches(&s.category))
    .filter(|s| {
      needle.is_empty()
        || s.title.to_lowercase().contains(&needle)
        || s.description.to_lowercase().contains(&needle)
    })
    .collect();

  // `sort_by` is stable.
  match controls.sort {
    SortOrder::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    SortOrder::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
  }
  out
}
