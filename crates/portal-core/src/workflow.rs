//! The suggestion status workflow.
//!
//! Status is server-authoritative. The client mirrors whatever the backend
//! returns and only *offers* forward transitions:
//!
//! ```text
//! pending ──► in-progress ──► resolved
//!    │              └───────► invalid
//!    ├──────────────────────► resolved
//!    └──────────────────────► invalid
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::Error;

/// Where a suggestion sits in the triage workflow.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Status {
  Pending,
  InProgress,
  Resolved,
  Invalid,
}

impl Status {
  /// Statuses reachable in one step from `self`.
  pub fn transitions(self) -> &'static [Status] {
    match self {
      Self::Pending => &[Self::InProgress, Self::Resolved, Self::Invalid],
      Self::InProgress => &[Self::Resolved, Self::Invalid],
      Self::Resolved | Self::Invalid => &[],
    }
  }

  /// `resolved` and `invalid` accept no further transitions.
  pub fn is_terminal(self) -> bool { self.transitions().is_empty() }

  /// Human-facing label, e.g. `In Progress`.
  pub fn label(self) -> &'static str {
    match self {
      Self::Pending => "Pending",
      Self::InProgress => "In Progress",
      Self::Resolved => "Resolved",
      Self::Invalid => "Invalid",
    }
  }

  /// Parse the wire spelling (`in-progress`), reporting a typed error.
  pub fn parse(s: &str) -> Result<Self, Error> {
    s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn pending_offers_three_forward_moves() {
    assert_eq!(
      Status::Pending.transitions(),
      &[Status::InProgress, Status::Resolved, Status::Invalid]
    );
  }

  #[test]
  fn in_progress_cannot_go_back_to_pending() {
    assert_eq!(Status::InProgress.transitions(), &[Status::Resolved, Status::Invalid]);
  }

  #[test]
  fn terminal_states_offer_nothing() {
    let terminal: Vec<_> = Status::iter().filter(|s| s.is_terminal()).collect();
    assert_eq!(terminal, vec![Status::Resolved, Status::Invalid]);
  }

  #[test]
  fn no_status_transitions_to_itself() {
    for s in Status::iter() {
      assert!(!s.transitions().contains(&s), "{s} loops to itself");
    }
  }

  #[test]
  fn wire_spelling_is_kebab_case() {
    assert_eq!(Status::InProgress.to_string(), "in-progress");
    assert_eq!(
      serde_json::to_string(&Status::InProgress).unwrap(),
      "\"in-progress\""
    );
    assert_eq!(Status::parse("in-progress").unwrap(), Status::InProgress);
  }

  #[test]
  fn parse_rejects_unknown_status() {
    let err = Status::parse("done").unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(ref s) if s == "done"));
  }
}
