//! Error types for `portal-engine`.

use portal_core::ApiError;
use thiserror::Error;

/// Shown for transport failures; the details go to the log.
pub const GENERIC_FAILURE: &str = "Something went wrong. Check the log for details.";

#[derive(Debug, Error)]
pub enum Error {
  #[error("not signed in")]
  NotSignedIn,

  #[error("not permitted: {0}")]
  NotPermitted(&'static str),

  #[error(transparent)]
  Invalid(#[from] portal_core::Error),

  #[error(transparent)]
  Api(#[from] ApiError),
}

impl Error {
  /// The text to put in front of the user.
  ///
  /// Server-supplied messages pass through verbatim; transport failures
  /// collapse to [`GENERIC_FAILURE`].
  pub fn user_message(&self) -> String {
    match self {
      Self::NotSignedIn => "Please sign in first.".into(),
      Self::NotPermitted(what) => format!("You are not allowed to {what}."),
      Self::Invalid(e) => {
        let msg = e.to_string();
        let mut chars = msg.chars();
        match chars.next() {
          Some(first) => first.to_uppercase().chain(chars).collect(),
          None => msg,
        }
      }
      Self::Api(ApiError::Rejected { message, .. }) => message.clone(),
      Self::Api(ApiError::Transport(_)) => GENERIC_FAILURE.into(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejected_message_is_verbatim() {
    let err = Error::from(ApiError::Rejected {
      status:  403,
      message: "Only HODs may update".into(),
    });
    assert_eq!(err.user_message(), "Only HODs may update");
  }

  #[test]
  fn transport_failure_is_generic() {
    let err = Error::from(ApiError::Transport("connection refused".into()));
    assert_eq!(err.user_message(), GENERIC_FAILURE);
  }

  #[test]
  fn validation_message_is_capitalised() {
    let err = Error::from(portal_core::Error::BlankField("title"));
    assert_eq!(err.user_message(), "Title must not be empty");
  }
}
