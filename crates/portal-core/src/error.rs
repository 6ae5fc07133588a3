//! Error types for `portal-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  #[error("{0} must not be empty")]
  BlankField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A failed round-trip to the portal backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
  /// The request never produced a usable response: connection failure,
  /// timeout, or a body that could not be decoded.
  #[error("transport error: {0}")]
  Transport(String),

  /// The backend answered with a non-2xx status. `message` is the server's
  /// `error` field when one was supplied.
  #[error("{message} (HTTP {status})")]
  Rejected { status: u16, message: String },
}
