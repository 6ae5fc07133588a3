//! Suggestion records and the request bodies that create or update them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result, workflow::Status};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque server-assigned identifier. Unique within a loaded collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionId(String);

impl SuggestionId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SuggestionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for SuggestionId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The area of campus life a suggestion concerns.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
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
pub enum Category {
  Academics,
  Facilities,
  StudentLife,
  Technology,
  Safety,
  Administration,
  Other,
}

impl Category {
  pub fn label(self) -> &'static str {
    match self {
      Self::Academics => "Academics",
      Self::Facilities => "Facilities",
      Self::StudentLife => "Student Life",
      Self::Technology => "Technology",
      Self::Safety => "Safety",
      Self::Administration => "Administration",
      Self::Other => "Other",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownCategory(s.to_owned()))
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A submitted suggestion or complaint as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
  #[serde(alias = "_id")]
  pub id:          SuggestionId,
  pub title:       String,
  pub description: String,
  pub category:    Category,
  pub status:      Status,
  /// The submitting student's address.
  pub email:       String,
  #[serde(default)]
  pub department:  Option<String>,
  /// `Principal` or `HOD`, set by the last status change.
  #[serde(default)]
  pub updated_by:  Option<String>,
  pub created_at:  DateTime<Utc>,
  #[serde(default)]
  pub updated_at:  Option<DateTime<Utc>>,
}

// ─── Request bodies ──────────────────────────────────────────────────────────

/// Body of `POST /api/suggestions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSuggestion {
  pub email:       String,
  pub category:    Category,
  pub title:       String,
  pub description: String,
}

impl NewSuggestion {
  pub fn new(
    email: impl Into<String>,
    category: Category,
    title: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      email: email.into(),
      category,
      title: title.into(),
      description: description.into(),
    }
  }

  /// Reject submissions with a blank title or description.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::BlankField("title"));
    }
    if self.description.trim().is_empty() {
      return Err(Error::BlankField("description"));
    }
    Ok(())
  }
}

/// Body of `PATCH /api/admin/suggestions/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
  pub status:     Status,
  pub updated_by: String,
}
